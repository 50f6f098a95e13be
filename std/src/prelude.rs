pub use crate::inputs::{
    ArrayShape, battle_array, nearly_sorted_array, random_array, reverse_array, sorted_array,
};
pub use crate::runners::backtracking::{NQueensInput, NQueensRunner, QueensPayload};
pub use crate::runners::bellman_ford::{BellmanFordInput, BellmanFordPayload, BellmanFordRunner, WeightedEdge};
pub use crate::runners::dynamic::{FibPayload, FibonacciInput, FibonacciRunner};
pub use crate::runners::graph::{BfsPayload, BfsRunner, DfsPayload, DfsRunner, GraphInput};
pub use crate::runners::knapsack::{Knapsack01Input, Knapsack01Runner, KnapsackPayload};
pub use crate::runners::knight::{KnightInput, KnightPayload, KnightTourRunner};
pub use crate::runners::lcs::{LcsInput, LcsPayload, LcsRunner};
pub use crate::runners::maze::{MazeInput, MazePayload, RatMazeRunner};
pub use crate::runners::searching::{
    BinarySearchRunner, LinearSearchRunner, SearchPayload, SearchingInput,
};
pub use crate::runners::sorting::{
    BubbleSortRunner, InsertionSortRunner, MergeSortRunner, QuickSortRunner, SelectionSortRunner,
    SortPayload, SortingInput,
};
pub use crate::runners::sudoku::{SudokuInput, SudokuPayload, SudokuRunner};
