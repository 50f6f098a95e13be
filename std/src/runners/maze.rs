//! Rat in a Maze by recursive backtracking: from (0, 0) to the far corner,
//! trying right, down, left, up in that order.
//!
//! Trial coordinates are `i64` because the search probes one cell past every
//! wall before the bounds check rejects it; those probes are recorded too.

use serde::{Deserialize, Serialize};
use zoetrope_core::{Runner, Step, StepPayload, Trace, TraceBuilder, Validation, ensure};

/// A square grid of open (`true`) and blocked (`false`) cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeInput {
    pub maze: Vec<Vec<bool>>,
    pub size: usize,
}

/// Step vocabulary of the maze runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MazePayload {
    Init {
        maze: Vec<Vec<bool>>,
        solution: Vec<Vec<bool>>,
        visited: Vec<Vec<bool>>,
        size: usize,
    },
    TryCell {
        x: i64,
        y: i64,
        maze: Vec<Vec<bool>>,
        solution: Vec<Vec<bool>>,
        visited: Vec<Vec<bool>>,
        size: usize,
    },
    DestinationReached {
        x: i64,
        y: i64,
        maze: Vec<Vec<bool>>,
        solution: Vec<Vec<bool>>,
        visited: Vec<Vec<bool>>,
        size: usize,
    },
    Move {
        x: i64,
        y: i64,
        maze: Vec<Vec<bool>>,
        solution: Vec<Vec<bool>>,
        visited: Vec<Vec<bool>>,
        size: usize,
    },
    Blocked {
        x: i64,
        y: i64,
        maze: Vec<Vec<bool>>,
        solution: Vec<Vec<bool>>,
        visited: Vec<Vec<bool>>,
        size: usize,
    },
    Backtrack {
        x: i64,
        y: i64,
        maze: Vec<Vec<bool>>,
        solution: Vec<Vec<bool>>,
        visited: Vec<Vec<bool>>,
        size: usize,
    },
    Complete {
        maze: Vec<Vec<bool>>,
        solution: Vec<Vec<bool>>,
        visited: Vec<Vec<bool>>,
        size: usize,
        solved: bool,
    },
}

impl StepPayload for MazePayload {
    fn kind(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::TryCell { .. } => "try-cell",
            Self::DestinationReached { .. } => "destination-reached",
            Self::Move { .. } => "move",
            Self::Blocked { .. } => "blocked",
            Self::Backtrack { .. } => "backtrack",
            Self::Complete { .. } => "complete",
        }
    }
}

struct MazeState {
    maze: Vec<Vec<bool>>,
    solution: Vec<Vec<bool>>,
    visited: Vec<Vec<bool>>,
    size: usize,
}

impl MazeState {
    fn snapshot(&self, x: i64, y: i64) -> (i64, i64, Vec<Vec<bool>>, Vec<Vec<bool>>, Vec<Vec<bool>>) {
        (
            x,
            y,
            self.maze.clone(),
            self.solution.clone(),
            self.visited.clone(),
        )
    }

    fn is_safe(&self, x: i64, y: i64) -> bool {
        let n = self.size as i64;
        (0..n).contains(&x)
            && (0..n).contains(&y)
            && self.maze[x as usize][y as usize]
            && !self.visited[x as usize][y as usize]
    }

    fn solve(&mut self, trace: &mut TraceBuilder<MazePayload>, x: i64, y: i64) -> bool {
        let (sx, sy, maze, solution, visited) = self.snapshot(x, y);
        trace.push(
            Step::new(MazePayload::TryCell {
                x: sx,
                y: sy,
                maze,
                solution,
                visited,
                size: self.size,
            })
            .at_line(8)
            .with_description(format!("Trying cell ({x}, {y})")),
        );

        let n = self.size as i64;
        if x == n - 1 && y == n - 1 && self.maze[x as usize][y as usize] {
            self.solution[x as usize][y as usize] = true;
            let (sx, sy, maze, solution, visited) = self.snapshot(x, y);
            trace.push(
                Step::new(MazePayload::DestinationReached {
                    x: sx,
                    y: sy,
                    maze,
                    solution,
                    visited,
                    size: self.size,
                })
                .at_line(9)
                .with_description(format!("Destination reached at ({x}, {y})!")),
            );
            return true;
        }

        if self.is_safe(x, y) {
            self.solution[x as usize][y as usize] = true;
            self.visited[x as usize][y as usize] = true;

            let (sx, sy, maze, solution, visited) = self.snapshot(x, y);
            trace.push(
                Step::new(MazePayload::Move {
                    x: sx,
                    y: sy,
                    maze,
                    solution,
                    visited,
                    size: self.size,
                })
                .at_line(14)
                .with_description(format!("Moving to ({x}, {y})")),
            );

            // Right, down, left, up.
            if self.solve(trace, x, y + 1)
                || self.solve(trace, x + 1, y)
                || self.solve(trace, x, y - 1)
                || self.solve(trace, x - 1, y)
            {
                return true;
            }

            self.solution[x as usize][y as usize] = false;
            let (sx, sy, maze, solution, visited) = self.snapshot(x, y);
            trace.push(
                Step::new(MazePayload::Backtrack {
                    x: sx,
                    y: sy,
                    maze,
                    solution,
                    visited,
                    size: self.size,
                })
                .at_line(22)
                .with_description(format!("Backtracking from ({x}, {y})")),
            );
            return false;
        }

        let (sx, sy, maze, solution, visited) = self.snapshot(x, y);
        trace.push(
            Step::new(MazePayload::Blocked {
                x: sx,
                y: sy,
                maze,
                solution,
                visited,
                size: self.size,
            })
            .at_line(4)
            .with_description(format!("Cell ({x}, {y}) is blocked or already visited")),
        );
        false
    }
}

/// Rat-in-a-Maze solver recording every probe, move, and backtrack.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatMazeRunner;

impl Runner for RatMazeRunner {
    type Input = MazeInput;
    type Payload = MazePayload;

    fn initial_input(&self) -> MazeInput {
        let cells = [
            [1, 0, 0, 0, 0],
            [1, 1, 0, 1, 0],
            [0, 1, 0, 0, 0],
            [0, 1, 1, 1, 0],
            [0, 0, 0, 1, 1],
        ];
        MazeInput {
            maze: cells
                .iter()
                .map(|row| row.iter().map(|&c| c == 1).collect())
                .collect(),
            size: 5,
        }
    }

    fn validate(&self, input: &MazeInput) -> Validation {
        ensure(
            (2..=8).contains(&input.size),
            "Maze size must be between 2 and 8",
        )?;
        ensure(
            input.maze.len() == input.size
                && input.maze.iter().all(|row| row.len() == input.size),
            "Maze grid must match the declared size",
        )
    }

    fn generate(&self, input: &MazeInput) -> Trace<MazePayload> {
        let mut trace = TraceBuilder::new();
        let size = input.size;
        if size == 0
            || input.maze.len() != size
            || input.maze.iter().any(|row| row.len() != size)
        {
            trace.push(
                Step::new(MazePayload::Complete {
                    maze: input.maze.clone(),
                    solution: Vec::new(),
                    visited: Vec::new(),
                    size,
                    solved: false,
                })
                .with_description("Maze grid does not match its size"),
            );
            return trace.finish();
        }

        let mut state = MazeState {
            maze: input.maze.clone(),
            solution: vec![vec![false; size]; size],
            visited: vec![vec![false; size]; size],
            size,
        };

        trace.push(
            Step::new(MazePayload::Init {
                maze: state.maze.clone(),
                solution: state.solution.clone(),
                visited: state.visited.clone(),
                size,
            })
            .at_line(0)
            .with_description(format!("Starting Rat in a Maze ({size}x{size} grid)")),
        );

        let solved = if state.maze[0][0] {
            state.solve(&mut trace, 0, 0)
        } else {
            false
        };

        trace.push(
            Step::new(MazePayload::Complete {
                maze: state.maze.clone(),
                solution: state.solution.clone(),
                visited: state.visited.clone(),
                size,
                solved,
            })
            .at_line(28)
            .with_description(if solved { "Path found!" } else { "No path exists" }),
        );
        trace.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminal(trace: &Trace<MazePayload>) -> (Vec<Vec<bool>>, bool) {
        match &trace.last().unwrap().payload {
            MazePayload::Complete {
                solution, solved, ..
            } => (solution.clone(), *solved),
            other => panic!("expected complete, got {}", other.kind()),
        }
    }

    #[test]
    fn test_canonical_maze_is_solved() {
        let runner = RatMazeRunner;
        let trace = runner.generate(&runner.initial_input());
        assert!(trace.is_well_formed());

        let (solution, solved) = terminal(&trace);
        assert!(solved);
        // Path endpoints are part of the marked solution.
        assert!(solution[0][0]);
        assert!(solution[4][4]);
    }

    #[test]
    fn test_walled_maze_has_no_path() {
        let trace = RatMazeRunner.generate(&MazeInput {
            maze: vec![
                vec![true, false],
                vec![false, true],
            ],
            size: 2,
        });
        let (_, solved) = terminal(&trace);
        assert!(!solved);
        assert!(trace.kinds().any(|k| k == "blocked"));
        assert!(trace.is_well_formed());
    }

    #[test]
    fn test_blocked_entrance_skips_search() {
        let trace = RatMazeRunner.generate(&MazeInput {
            maze: vec![
                vec![false, true],
                vec![true, true],
            ],
            size: 2,
        });
        let (_, solved) = terminal(&trace);
        assert!(!solved);
        // Only init and complete: the search never starts.
        assert_eq!(trace.len(), 2);
    }

    #[test]
    fn test_probes_outside_bounds_are_recorded() {
        // A dead end at (0, 0) forces the left and up probes, one cell past
        // the wall.
        let trace = RatMazeRunner.generate(&MazeInput {
            maze: vec![
                vec![true, false],
                vec![false, true],
            ],
            size: 2,
        });
        let probed_left = trace
            .iter()
            .any(|s| matches!(s.payload, MazePayload::TryCell { x: 0, y: -1, .. }));
        let probed_up = trace
            .iter()
            .any(|s| matches!(s.payload, MazePayload::TryCell { x: -1, y: 0, .. }));
        assert!(probed_left && probed_up);
    }

    #[test]
    fn test_validation_bounds() {
        let runner = RatMazeRunner;
        assert!(
            runner
                .validate(&MazeInput {
                    maze: vec![vec![true]],
                    size: 1,
                })
                .is_err()
        );
        assert!(runner.validate(&runner.initial_input()).is_ok());
    }

    #[test]
    fn test_determinism() {
        let input = RatMazeRunner.initial_input();
        assert_eq!(
            RatMazeRunner.generate(&input),
            RatMazeRunner.generate(&input)
        );
    }
}
