//! Knight's Tour with Warnsdorff's heuristic: candidate moves are tried in
//! ascending order of their onward degree.
//!
//! Even with the heuristic, degenerate starts can blow the search up, so
//! the recursion runs under a hard budget of trial expansions; exhausting
//! it terminates the trace with `solved: false` instead of hanging.

use serde::{Deserialize, Serialize};
use zoetrope_core::{Runner, Step, StepPayload, Trace, TraceBuilder, Validation, ensure};

/// Board size and the knight's starting square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnightInput {
    pub size: usize,
    pub start_x: usize,
    pub start_y: usize,
}

/// Step vocabulary of the Knight's Tour runner. Board cells hold the move
/// number that landed there, `None` while unvisited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum KnightPayload {
    Init {
        board: Vec<Vec<Option<u32>>>,
        size: usize,
        start_x: usize,
        start_y: usize,
    },
    StartPosition {
        board: Vec<Vec<Option<u32>>>,
        size: usize,
        x: usize,
        y: usize,
    },
    /// A candidate square about to be tried; `access_count` is its onward
    /// degree under Warnsdorff's rule.
    TryMove {
        board: Vec<Vec<Option<u32>>>,
        size: usize,
        current_x: usize,
        current_y: usize,
        next_x: usize,
        next_y: usize,
        move_count: u32,
        access_count: usize,
    },
    PlaceKnight {
        board: Vec<Vec<Option<u32>>>,
        size: usize,
        x: usize,
        y: usize,
        move_count: u32,
    },
    Backtrack {
        board: Vec<Vec<Option<u32>>>,
        size: usize,
        x: usize,
        y: usize,
        move_count: u32,
    },
    Complete {
        board: Vec<Vec<Option<u32>>>,
        size: usize,
        solved: bool,
    },
}

impl StepPayload for KnightPayload {
    fn kind(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::StartPosition { .. } => "start-position",
            Self::TryMove { .. } => "try-move",
            Self::PlaceKnight { .. } => "place-knight",
            Self::Backtrack { .. } => "backtrack",
            Self::Complete { .. } => "complete",
        }
    }
}

const MOVES: [(i64, i64); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

/// Ceiling on trial expansions before the search gives up.
const STEP_BUDGET: u32 = 500;

struct TourState {
    board: Vec<Vec<Option<u32>>>,
    size: usize,
    budget: u32,
}

impl TourState {
    fn is_open(&self, x: i64, y: i64) -> bool {
        let n = self.size as i64;
        (0..n).contains(&x) && (0..n).contains(&y) && self.board[x as usize][y as usize].is_none()
    }

    fn onward_degree(&self, x: i64, y: i64) -> usize {
        MOVES
            .iter()
            .filter(|(dx, dy)| self.is_open(x + dx, y + dy))
            .count()
    }

    /// Open squares a knight reaches from (x, y), cheapest onward degree
    /// first. The sort is stable, so ties keep the move-table order.
    fn sorted_moves(&self, x: usize, y: usize) -> Vec<(usize, usize, usize)> {
        let mut moves: Vec<(usize, usize, usize)> = MOVES
            .iter()
            .filter_map(|(dx, dy)| {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                self.is_open(nx, ny).then(|| {
                    let degree = self.onward_degree(nx, ny);
                    (nx as usize, ny as usize, degree)
                })
            })
            .collect();
        moves.sort_by_key(|&(_, _, degree)| degree);
        moves
    }

    fn solve(
        &mut self,
        trace: &mut TraceBuilder<KnightPayload>,
        x: usize,
        y: usize,
        move_count: u32,
    ) -> bool {
        if move_count == (self.size * self.size) as u32 {
            return true;
        }
        if self.budget == 0 {
            return false;
        }
        self.budget -= 1;

        for (nx, ny, degree) in self.sorted_moves(x, y) {
            trace.push(
                Step::new(KnightPayload::TryMove {
                    board: self.board.clone(),
                    size: self.size,
                    current_x: x,
                    current_y: y,
                    next_x: nx,
                    next_y: ny,
                    move_count,
                    access_count: degree,
                })
                .at_line(13)
                .with_description(format!(
                    "Trying move {move_count} to ({nx}, {ny}) - {degree} onward moves available"
                )),
            );

            self.board[nx][ny] = Some(move_count);
            trace.push(
                Step::new(KnightPayload::PlaceKnight {
                    board: self.board.clone(),
                    size: self.size,
                    x: nx,
                    y: ny,
                    move_count,
                })
                .at_line(17)
                .with_description(format!("Placed knight at ({nx}, {ny}) - move {move_count}")),
            );

            if self.solve(trace, nx, ny, move_count + 1) {
                return true;
            }

            self.board[nx][ny] = None;
            trace.push(
                Step::new(KnightPayload::Backtrack {
                    board: self.board.clone(),
                    size: self.size,
                    x: nx,
                    y: ny,
                    move_count,
                })
                .at_line(20)
                .with_description(format!("Backtracking from ({nx}, {ny})")),
            );
        }

        false
    }
}

/// Knight's Tour search under Warnsdorff ordering and a hard step budget.
#[derive(Debug, Clone, Copy, Default)]
pub struct KnightTourRunner;

impl Runner for KnightTourRunner {
    type Input = KnightInput;
    type Payload = KnightPayload;

    fn initial_input(&self) -> KnightInput {
        KnightInput {
            size: 5,
            start_x: 0,
            start_y: 0,
        }
    }

    fn validate(&self, input: &KnightInput) -> Validation {
        ensure(
            (5..=8).contains(&input.size),
            "Board size must be between 5 and 8",
        )?;
        ensure(
            input.start_x < input.size && input.start_y < input.size,
            "Starting position must be within the board",
        )
    }

    fn generate(&self, input: &KnightInput) -> Trace<KnightPayload> {
        let mut trace = TraceBuilder::new();
        let size = input.size.clamp(1, 8);
        let start_x = input.start_x.min(size - 1);
        let start_y = input.start_y.min(size - 1);

        let mut state = TourState {
            board: vec![vec![None; size]; size],
            size,
            budget: STEP_BUDGET,
        };

        trace.push(
            Step::new(KnightPayload::Init {
                board: state.board.clone(),
                size,
                start_x,
                start_y,
            })
            .at_line(0)
            .with_description(format!(
                "Starting Knight's Tour on {size}x{size} board from ({start_x}, {start_y})"
            )),
        );

        state.board[start_x][start_y] = Some(0);
        trace.push(
            Step::new(KnightPayload::StartPosition {
                board: state.board.clone(),
                size,
                x: start_x,
                y: start_y,
            })
            .at_line(26)
            .with_description(format!("Starting position set at ({start_x}, {start_y})")),
        );

        let solved = state.solve(&mut trace, start_x, start_y, 1);
        tracing::debug!(
            solved,
            budget_left = state.budget,
            steps = trace.len(),
            "knight's tour search finished"
        );

        trace.push(
            Step::new(KnightPayload::Complete {
                board: state.board.clone(),
                size,
                solved,
            })
            .at_line(28)
            .with_description(if solved {
                "Knight's Tour complete!"
            } else {
                "No complete tour found (step limit reached or impossible)"
            }),
        );
        trace.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminal(trace: &Trace<KnightPayload>) -> (Vec<Vec<Option<u32>>>, bool) {
        match &trace.last().unwrap().payload {
            KnightPayload::Complete { board, solved, .. } => (board.clone(), *solved),
            other => panic!("expected complete, got {}", other.kind()),
        }
    }

    #[test]
    fn test_corner_start_terminates_within_budget() {
        let runner = KnightTourRunner;
        let trace = runner.generate(&runner.initial_input());
        assert!(trace.is_well_formed());
        // Each budget unit spends at most 8 trials of 3 steps each, plus the
        // three fixed steps; the trace is bounded regardless of outcome.
        assert!(trace.len() < 3 + STEP_BUDGET as usize * 8 * 3 + 1);
    }

    #[test]
    fn test_solved_tour_covers_every_square() {
        let runner = KnightTourRunner;
        let trace = runner.generate(&runner.initial_input());
        let (board, solved) = terminal(&trace);
        if solved {
            let mut seen: Vec<u32> = board.iter().flatten().map(|c| c.unwrap()).collect();
            seen.sort_unstable();
            assert_eq!(seen, (0..25).collect::<Vec<u32>>());
        }
    }

    #[test]
    fn test_offcolor_start_exhausts_and_reports_unsolved() {
        // On 5x5, open tours only exist from squares of the corner's color;
        // (0, 1) has none, so the search must give up within budget.
        let trace = KnightTourRunner.generate(&KnightInput {
            size: 5,
            start_x: 0,
            start_y: 1,
        });
        let (_, solved) = terminal(&trace);
        assert!(!solved);
        assert!(trace.is_well_formed());
    }

    #[test]
    fn test_moves_sorted_by_onward_degree() {
        let mut state = TourState {
            board: vec![vec![None; 5]; 5],
            size: 5,
            budget: STEP_BUDGET,
        };
        state.board[0][0] = Some(0);

        let moves = state.sorted_moves(0, 0);
        assert_eq!(moves.len(), 2);
        let degrees: Vec<usize> = moves.iter().map(|&(_, _, d)| d).collect();
        let mut sorted = degrees.clone();
        sorted.sort_unstable();
        assert_eq!(degrees, sorted);
        // Both knight moves out of the corner exist on an open board.
        let targets: Vec<(usize, usize)> = moves.iter().map(|&(x, y, _)| (x, y)).collect();
        assert!(targets.contains(&(2, 1)));
        assert!(targets.contains(&(1, 2)));
    }

    #[test]
    fn test_validation_bounds() {
        let runner = KnightTourRunner;
        assert!(
            runner
                .validate(&KnightInput {
                    size: 4,
                    start_x: 0,
                    start_y: 0,
                })
                .is_err()
        );
        assert!(
            runner
                .validate(&KnightInput {
                    size: 5,
                    start_x: 5,
                    start_y: 0,
                })
                .is_err()
        );
    }

    #[test]
    fn test_determinism() {
        let input = KnightTourRunner.initial_input();
        assert_eq!(
            KnightTourRunner.generate(&input),
            KnightTourRunner.generate(&input)
        );
    }
}
