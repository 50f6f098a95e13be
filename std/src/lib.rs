//! Zoetrope Std - Standard Library of Runners
//!
//! One module per algorithm family. Each module defines the family's input
//! struct, its tagged payload vocabulary, and the runner(s) that record a
//! trace in that vocabulary. Exact algorithm semantics are the classic
//! textbook ones; every observable decision point becomes its own step.
//!
//! Runners are pure and deterministic. The [`inputs`] module is where
//! randomness lives: it builds randomized inputs *before* any runner sees
//! them.

pub mod inputs;
pub mod runners;

pub mod prelude;

pub use runners::backtracking::NQueensRunner;
pub use runners::bellman_ford::BellmanFordRunner;
pub use runners::dynamic::FibonacciRunner;
pub use runners::graph::{BfsRunner, DfsRunner};
pub use runners::knapsack::Knapsack01Runner;
pub use runners::knight::KnightTourRunner;
pub use runners::lcs::LcsRunner;
pub use runners::maze::RatMazeRunner;
pub use runners::searching::{BinarySearchRunner, LinearSearchRunner};
pub use runners::sorting::{
    BubbleSortRunner, InsertionSortRunner, MergeSortRunner, QuickSortRunner, SelectionSortRunner,
};
pub use runners::sudoku::SudokuRunner;
