//! Sudoku solver by recursive backtracking over the classic 9x9 grid.
//!
//! Cells keep the domain's own convention: `0` means empty. The parallel
//! `fixed` mask marks the given clues so a renderer can distinguish them
//! from solver placements.

use serde::{Deserialize, Serialize};
use zoetrope_core::{Runner, Step, StepPayload, Trace, TraceBuilder, Validation, ensure};

/// A 9x9 puzzle grid, `0` for empty cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SudokuInput {
    pub board: Vec<Vec<u8>>,
}

/// Step vocabulary of the Sudoku runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SudokuPayload {
    Init {
        board: Vec<Vec<u8>>,
        fixed: Vec<Vec<bool>>,
    },
    FindEmpty {
        row: usize,
        col: usize,
        board: Vec<Vec<u8>>,
        fixed: Vec<Vec<bool>>,
    },
    TryNumber {
        row: usize,
        col: usize,
        num: u8,
        board: Vec<Vec<u8>>,
        fixed: Vec<Vec<bool>>,
    },
    CheckValid {
        row: usize,
        col: usize,
        num: u8,
        valid: bool,
        board: Vec<Vec<u8>>,
        fixed: Vec<Vec<bool>>,
    },
    PlaceNumber {
        row: usize,
        col: usize,
        num: u8,
        board: Vec<Vec<u8>>,
        fixed: Vec<Vec<bool>>,
    },
    Backtrack {
        row: usize,
        col: usize,
        board: Vec<Vec<u8>>,
        fixed: Vec<Vec<bool>>,
    },
    Complete {
        board: Vec<Vec<u8>>,
        fixed: Vec<Vec<bool>>,
        solved: bool,
    },
}

impl StepPayload for SudokuPayload {
    fn kind(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::FindEmpty { .. } => "find-empty",
            Self::TryNumber { .. } => "try-number",
            Self::CheckValid { .. } => "check-valid",
            Self::PlaceNumber { .. } => "place-number",
            Self::Backtrack { .. } => "backtrack",
            Self::Complete { .. } => "complete",
        }
    }
}

const GRID: usize = 9;
const BOX: usize = 3;

struct SudokuState {
    board: Vec<Vec<u8>>,
    fixed: Vec<Vec<bool>>,
}

impl SudokuState {
    fn is_valid(&self, row: usize, col: usize, num: u8) -> bool {
        for i in 0..GRID {
            if self.board[row][i] == num || self.board[i][col] == num {
                return false;
            }
        }
        let box_row = (row / BOX) * BOX;
        let box_col = (col / BOX) * BOX;
        for i in 0..BOX {
            for j in 0..BOX {
                if self.board[box_row + i][box_col + j] == num {
                    return false;
                }
            }
        }
        true
    }

    fn first_empty(&self) -> Option<(usize, usize)> {
        for row in 0..GRID {
            for col in 0..GRID {
                if self.board[row][col] == 0 {
                    return Some((row, col));
                }
            }
        }
        None
    }

    fn solve(&mut self, trace: &mut TraceBuilder<SudokuPayload>) -> bool {
        let Some((row, col)) = self.first_empty() else {
            return true;
        };

        trace.push(
            Step::new(SudokuPayload::FindEmpty {
                row,
                col,
                board: self.board.clone(),
                fixed: self.fixed.clone(),
            })
            .at_line(20)
            .with_description(format!("Found empty cell at ({row}, {col})")),
        );

        for num in 1..=9u8 {
            trace.push(
                Step::new(SudokuPayload::TryNumber {
                    row,
                    col,
                    num,
                    board: self.board.clone(),
                    fixed: self.fixed.clone(),
                })
                .at_line(21)
                .with_description(format!("Trying {num} at ({row}, {col})")),
            );

            let valid = self.is_valid(row, col, num);
            trace.push(
                Step::new(SudokuPayload::CheckValid {
                    row,
                    col,
                    num,
                    valid,
                    board: self.board.clone(),
                    fixed: self.fixed.clone(),
                })
                .at_line(22)
                .with_description(if valid {
                    format!("{num} is valid at ({row}, {col})")
                } else {
                    format!("{num} conflicts at ({row}, {col})")
                }),
            );

            if valid {
                self.board[row][col] = num;
                trace.push(
                    Step::new(SudokuPayload::PlaceNumber {
                        row,
                        col,
                        num,
                        board: self.board.clone(),
                        fixed: self.fixed.clone(),
                    })
                    .at_line(23)
                    .with_description(format!("Placed {num} at ({row}, {col})")),
                );

                if self.solve(trace) {
                    return true;
                }

                self.board[row][col] = 0;
                trace.push(
                    Step::new(SudokuPayload::Backtrack {
                        row,
                        col,
                        board: self.board.clone(),
                        fixed: self.fixed.clone(),
                    })
                    .at_line(25)
                    .with_description(format!("Backtracking from ({row}, {col})")),
                );
            }
        }

        false
    }
}

/// Sudoku solver recording every trial, validity check, placement, and
/// backtrack.
#[derive(Debug, Clone, Copy, Default)]
pub struct SudokuRunner;

impl Runner for SudokuRunner {
    type Input = SudokuInput;
    type Payload = SudokuPayload;

    fn initial_input(&self) -> SudokuInput {
        SudokuInput {
            board: vec![
                vec![5, 3, 0, 0, 7, 0, 0, 0, 0],
                vec![6, 0, 0, 1, 9, 5, 0, 0, 0],
                vec![0, 9, 8, 0, 0, 0, 0, 6, 0],
                vec![8, 0, 0, 0, 6, 0, 0, 0, 3],
                vec![4, 0, 0, 8, 0, 3, 0, 0, 1],
                vec![7, 0, 0, 0, 2, 0, 0, 0, 6],
                vec![0, 6, 0, 0, 0, 0, 2, 8, 0],
                vec![0, 0, 0, 4, 1, 9, 0, 0, 5],
                vec![0, 0, 0, 0, 8, 0, 0, 7, 9],
            ],
        }
    }

    fn validate(&self, input: &SudokuInput) -> Validation {
        ensure(
            input.board.len() == GRID && input.board.iter().all(|row| row.len() == GRID),
            "Board must be 9x9",
        )?;
        ensure(
            input.board.iter().flatten().all(|&cell| cell <= 9),
            "Cells must hold 0 (empty) through 9",
        )
    }

    fn generate(&self, input: &SudokuInput) -> Trace<SudokuPayload> {
        let mut trace = TraceBuilder::new();
        if input.board.len() != GRID || input.board.iter().any(|row| row.len() != GRID) {
            trace.push(
                Step::new(SudokuPayload::Complete {
                    board: input.board.clone(),
                    fixed: Vec::new(),
                    solved: false,
                })
                .with_description("Board is not 9x9"),
            );
            return trace.finish();
        }

        let fixed: Vec<Vec<bool>> = input
            .board
            .iter()
            .map(|row| row.iter().map(|&cell| cell != 0).collect())
            .collect();
        let mut state = SudokuState {
            board: input.board.clone(),
            fixed,
        };

        trace.push(
            Step::new(SudokuPayload::Init {
                board: state.board.clone(),
                fixed: state.fixed.clone(),
            })
            .at_line(0)
            .with_description("Starting Sudoku Solver"),
        );

        let solved = state.solve(&mut trace);
        tracing::debug!(solved, steps = trace.len(), "sudoku search finished");

        trace.push(
            Step::new(SudokuPayload::Complete {
                board: state.board.clone(),
                fixed: state.fixed.clone(),
                solved,
            })
            .at_line(31)
            .with_description(if solved {
                "Sudoku solved!"
            } else {
                "No solution exists"
            }),
        );
        trace.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One empty cell per row along the diagonal; solves with no search.
    fn nearly_solved() -> SudokuInput {
        let solved: [[u8; 9]; 9] = [
            [5, 3, 4, 6, 7, 8, 9, 1, 2],
            [6, 7, 2, 1, 9, 5, 3, 4, 8],
            [1, 9, 8, 3, 4, 2, 5, 6, 7],
            [8, 5, 9, 7, 6, 1, 4, 2, 3],
            [4, 2, 6, 8, 5, 3, 7, 9, 1],
            [7, 1, 3, 9, 2, 4, 8, 5, 6],
            [9, 6, 1, 5, 3, 7, 2, 8, 4],
            [2, 8, 7, 4, 1, 9, 6, 3, 5],
            [3, 4, 5, 2, 8, 6, 1, 7, 9],
        ];
        let mut board: Vec<Vec<u8>> = solved.iter().map(|r| r.to_vec()).collect();
        for i in 0..9 {
            board[i][i] = 0;
        }
        SudokuInput { board }
    }

    fn terminal(trace: &Trace<SudokuPayload>) -> (Vec<Vec<u8>>, bool) {
        match &trace.last().unwrap().payload {
            SudokuPayload::Complete { board, solved, .. } => (board.clone(), *solved),
            other => panic!("expected complete, got {}", other.kind()),
        }
    }

    fn assert_grid_valid(board: &[Vec<u8>]) {
        for i in 0..9 {
            let row: std::collections::BTreeSet<u8> = board[i].iter().copied().collect();
            let col: std::collections::BTreeSet<u8> = (0..9).map(|j| board[j][i]).collect();
            assert_eq!(row.len(), 9, "row {i} has duplicates");
            assert_eq!(col.len(), 9, "column {i} has duplicates");
        }
    }

    #[test]
    fn test_solves_nearly_complete_grid() {
        let trace = SudokuRunner.generate(&nearly_solved());
        assert!(trace.is_well_formed());
        let (board, solved) = terminal(&trace);
        assert!(solved);
        assert_grid_valid(&board);
        // Clue cells never change.
        assert!(trace.kinds().any(|k| k == "place-number"));
    }

    #[test]
    fn test_solves_canonical_puzzle() {
        let runner = SudokuRunner;
        let trace = runner.generate(&runner.initial_input());
        let (board, solved) = terminal(&trace);
        assert!(solved);
        assert_grid_valid(&board);
        assert!(trace.kinds().any(|k| k == "backtrack"));
    }

    #[test]
    fn test_unsolvable_puzzle_reports_no_solution() {
        // Cell (0, 0) sees 1-8 in its row and 9 in its column: no candidate.
        let mut board = vec![vec![0u8; 9]; 9];
        board[0] = vec![0, 1, 2, 3, 4, 5, 6, 7, 8];
        board[1][0] = 9;
        let trace = SudokuRunner.generate(&SudokuInput { board });
        let (_, solved) = terminal(&trace);
        assert!(!solved);
        assert!(trace.is_well_formed());
    }

    #[test]
    fn test_validation_rejects_bad_shapes() {
        assert!(
            SudokuRunner
                .validate(&SudokuInput {
                    board: vec![vec![0; 9]; 8],
                })
                .is_err()
        );
        assert!(
            SudokuRunner
                .validate(&SudokuInput {
                    board: vec![vec![10; 9]; 9],
                })
                .is_err()
        );
    }

    #[test]
    fn test_fixed_mask_marks_clues() {
        let runner = SudokuRunner;
        let trace = runner.generate(&runner.initial_input());
        match &trace.first().unwrap().payload {
            SudokuPayload::Init { board, fixed } => {
                for (row_cells, row_fixed) in board.iter().zip(fixed) {
                    for (&cell, &is_fixed) in row_cells.iter().zip(row_fixed) {
                        assert_eq!(is_fixed, cell != 0);
                    }
                }
            }
            other => panic!("expected init, got {}", other.kind()),
        }
    }
}
