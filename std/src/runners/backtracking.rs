//! N-Queens by recursive backtracking: one step per trial column, per
//! safety check, per placement, per backtrack.
//!
//! The board is one entry per row holding the placed queen's column,
//! `None` while the row is empty.

use serde::{Deserialize, Serialize};
use zoetrope_core::{Runner, Step, StepPayload, Trace, TraceBuilder, Validation, ensure};

/// Board size for the N-Queens puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NQueensInput {
    pub n: usize,
}

/// Step vocabulary of the N-Queens runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum QueensPayload {
    Init {
        n: usize,
        board: Vec<Option<usize>>,
    },
    TryRow {
        row: usize,
        board: Vec<Option<usize>>,
        n: usize,
    },
    TryCol {
        row: usize,
        col: usize,
        board: Vec<Option<usize>>,
        n: usize,
    },
    CheckSafe {
        row: usize,
        col: usize,
        safe: bool,
        board: Vec<Option<usize>>,
        n: usize,
    },
    PlaceQueen {
        row: usize,
        col: usize,
        board: Vec<Option<usize>>,
        n: usize,
    },
    SolutionFound {
        board: Vec<Option<usize>>,
        n: usize,
    },
    Backtrack {
        row: usize,
        col: usize,
        board: Vec<Option<usize>>,
        n: usize,
    },
    NoSolution {
        n: usize,
    },
    Complete {
        board: Vec<Option<usize>>,
        n: usize,
        solution_found: bool,
    },
}

impl StepPayload for QueensPayload {
    fn kind(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::TryRow { .. } => "try-row",
            Self::TryCol { .. } => "try-col",
            Self::CheckSafe { .. } => "check-safe",
            Self::PlaceQueen { .. } => "place-queen",
            Self::SolutionFound { .. } => "solution-found",
            Self::Backtrack { .. } => "backtrack",
            Self::NoSolution { .. } => "no-solution",
            Self::Complete { .. } => "complete",
        }
    }
}

/// N-Queens solver recording its full search, first solution only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NQueensRunner;

impl NQueensRunner {
    fn is_safe(board: &[Option<usize>], row: usize, col: usize) -> bool {
        for (placed_row, placed) in board.iter().enumerate().take(row) {
            let Some(placed_col) = placed else { continue };
            if *placed_col == col {
                return false;
            }
            if placed_col.abs_diff(col) == placed_row.abs_diff(row) {
                return false;
            }
        }
        true
    }

    fn solve(
        trace: &mut TraceBuilder<QueensPayload>,
        board: &mut Vec<Option<usize>>,
        n: usize,
        row: usize,
    ) -> bool {
        if row == n {
            trace.push(
                Step::new(QueensPayload::SolutionFound {
                    board: board.clone(),
                    n,
                })
                .at_line(16)
                .with_description("Solution found!"),
            );
            return true;
        }

        trace.push(
            Step::new(QueensPayload::TryRow {
                row,
                board: board.clone(),
                n,
            })
            .at_line(14)
            .with_description(format!("Trying to place queen in row {row}")),
        );

        for col in 0..n {
            trace.push(
                Step::new(QueensPayload::TryCol {
                    row,
                    col,
                    board: board.clone(),
                    n,
                })
                .at_line(20)
                .with_description(format!("Try column {col} for row {row}")),
            );

            let safe = Self::is_safe(board, row, col);
            trace.push(
                Step::new(QueensPayload::CheckSafe {
                    row,
                    col,
                    safe,
                    board: board.clone(),
                    n,
                })
                .at_line(21)
                .with_description(if safe {
                    format!("Position ({row}, {col}) is safe")
                } else {
                    format!("Position ({row}, {col}) is not safe (attacks existing queen)")
                }),
            );

            if safe {
                board[row] = Some(col);
                trace.push(
                    Step::new(QueensPayload::PlaceQueen {
                        row,
                        col,
                        board: board.clone(),
                        n,
                    })
                    .at_line(22)
                    .with_description(format!("Place queen at ({row}, {col})")),
                );

                if Self::solve(trace, board, n, row + 1) {
                    return true;
                }

                board[row] = None;
                trace.push(
                    Step::new(QueensPayload::Backtrack {
                        row,
                        col,
                        board: board.clone(),
                        n,
                    })
                    .at_line(24)
                    .with_description(format!("Backtrack: remove queen from ({row}, {col})")),
                );
            }
        }

        false
    }
}

impl Runner for NQueensRunner {
    type Input = NQueensInput;
    type Payload = QueensPayload;

    fn initial_input(&self) -> NQueensInput {
        NQueensInput { n: 4 }
    }

    fn validate(&self, input: &NQueensInput) -> Validation {
        ensure(
            (1..=8).contains(&input.n),
            "N must be between 1 and 8",
        )
    }

    fn generate(&self, input: &NQueensInput) -> Trace<QueensPayload> {
        let mut trace = TraceBuilder::new();
        // Defensive clamp: the search space explodes past the validated cap.
        let n = input.n.min(8);
        let mut board: Vec<Option<usize>> = vec![None; n];

        trace.push(
            Step::new(QueensPayload::Init {
                n,
                board: board.clone(),
            })
            .at_line(0)
            .with_description(format!("Solving {n}-Queens problem")),
        );

        let solution_found = Self::solve(&mut trace, &mut board, n, 0);

        if !solution_found {
            trace.push(
                Step::new(QueensPayload::NoSolution { n })
                    .at_line(29)
                    .with_description(format!("No solution found for {n}-Queens")),
            );
        }

        trace.push(
            Step::new(QueensPayload::Complete {
                board,
                n,
                solution_found,
            })
            .at_line(30)
            .with_description(if solution_found {
                "Algorithm complete - solution found!"
            } else {
                "Algorithm complete - no solution exists"
            }),
        );
        trace.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminal(trace: &Trace<QueensPayload>) -> (Vec<Option<usize>>, bool) {
        match &trace.last().unwrap().payload {
            QueensPayload::Complete {
                board,
                solution_found,
                ..
            } => (board.clone(), *solution_found),
            other => panic!("expected complete, got {}", other.kind()),
        }
    }

    fn attacks(a_row: usize, a_col: usize, b_row: usize, b_col: usize) -> bool {
        a_col == b_col || a_row.abs_diff(b_row) == a_col.abs_diff(b_col)
    }

    #[test]
    fn test_four_queens_solution_is_valid() {
        let trace = NQueensRunner.generate(&NQueensInput { n: 4 });
        assert!(trace.is_well_formed());

        let (board, solved) = terminal(&trace);
        assert!(solved);
        let queens: Vec<(usize, usize)> = board
            .iter()
            .enumerate()
            .map(|(row, col)| (row, col.expect("every row holds a queen")))
            .collect();
        assert_eq!(queens.len(), 4);
        for (i, &(ra, ca)) in queens.iter().enumerate() {
            for &(rb, cb) in &queens[i + 1..] {
                assert!(!attacks(ra, ca, rb, cb), "{ra},{ca} attacks {rb},{cb}");
            }
        }
    }

    #[test]
    fn test_search_records_backtracks() {
        // 4-Queens cannot be solved greedily; the search must back up.
        let trace = NQueensRunner.generate(&NQueensInput { n: 4 });
        assert!(trace.kinds().any(|k| k == "backtrack"));
        assert!(trace.kinds().any(|k| k == "place-queen"));
        assert!(trace.kinds().any(|k| k == "check-safe"));
    }

    #[test]
    fn test_three_queens_has_no_solution() {
        let trace = NQueensRunner.generate(&NQueensInput { n: 3 });
        assert!(trace.kinds().any(|k| k == "no-solution"));
        let (_, solved) = terminal(&trace);
        assert!(!solved);
        assert!(trace.is_well_formed());
    }

    #[test]
    fn test_one_queen_trivially_solves() {
        let (board, solved) = terminal(&NQueensRunner.generate(&NQueensInput { n: 1 }));
        assert!(solved);
        assert_eq!(board, vec![Some(0)]);
    }

    #[test]
    fn test_bounds_validation() {
        assert!(NQueensRunner.validate(&NQueensInput { n: 0 }).is_err());
        assert!(NQueensRunner.validate(&NQueensInput { n: 9 }).is_err());
        assert!(NQueensRunner.validate(&NQueensInput { n: 8 }).is_ok());
    }

    #[test]
    fn test_determinism() {
        let input = NQueensInput { n: 5 };
        assert_eq!(
            NQueensRunner.generate(&input),
            NQueensRunner.generate(&input)
        );
    }
}
