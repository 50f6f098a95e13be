//! Sorting runners: bubble, selection, insertion, merge, quick.
//!
//! All five share one payload vocabulary over a flat `Vec<i64>` snapshot.
//! Quicksort is Lomuto partitioning with the last element as pivot; merge
//! sort records each split and every element placement during the merge.

use serde::{Deserialize, Serialize};
use zoetrope_core::{Runner, Step, StepPayload, Trace, TraceBuilder, Validation, ensure};

/// A flat array to sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortingInput {
    pub array: Vec<i64>,
}

/// Step vocabulary of the sorting family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SortPayload {
    Init {
        array: Vec<i64>,
    },
    /// One bubble pass begins.
    OuterLoop {
        i: usize,
        array: Vec<i64>,
    },
    Compare {
        indices: [usize; 2],
        array: Vec<i64>,
    },
    /// Snapshot taken before the exchange.
    Swap {
        indices: [usize; 2],
        array: Vec<i64>,
    },
    /// Snapshot taken after the exchange.
    AfterSwap {
        indices: [usize; 2],
        array: Vec<i64>,
    },
    /// The element at `index` reached its final position.
    Sorted {
        index: usize,
        array: Vec<i64>,
    },
    SelectMinStart {
        current_min: usize,
        array: Vec<i64>,
    },
    NewMin {
        old_min: usize,
        new_min: usize,
        array: Vec<i64>,
    },
    /// Insertion sort lifts the key out of the array.
    KeySelect {
        index: usize,
        key: i64,
        array: Vec<i64>,
    },
    /// Compare the held key against the element at `index`.
    KeyCompare {
        index: usize,
        key: i64,
        array: Vec<i64>,
    },
    /// One element moved one slot right to make room for the key.
    Shift {
        from: usize,
        to: usize,
        array: Vec<i64>,
    },
    /// The held key landed at `index`.
    Insert {
        index: usize,
        key: i64,
        array: Vec<i64>,
    },
    /// Merge sort divides `[low..=high]` at `mid`.
    Split {
        low: usize,
        mid: usize,
        high: usize,
        array: Vec<i64>,
    },
    /// One element written back during a merge.
    Place {
        index: usize,
        value: i64,
        array: Vec<i64>,
    },
    /// The range `[low..=high]` is merged and sorted.
    Merged {
        low: usize,
        high: usize,
        array: Vec<i64>,
    },
    PartitionStart {
        low: usize,
        high: usize,
        array: Vec<i64>,
    },
    PivotSelect {
        pivot_index: usize,
        pivot: i64,
        low: usize,
        high: usize,
        array: Vec<i64>,
    },
    /// Quicksort compares `array[index]` against the pivot. `boundary` is
    /// the last index of the <=-pivot region, `None` while it is empty.
    PivotCompare {
        index: usize,
        pivot_index: usize,
        pivot: i64,
        boundary: Option<usize>,
        array: Vec<i64>,
    },
    PivotPlaced {
        pivot_index: usize,
        array: Vec<i64>,
    },
    RecurseLeft {
        low: usize,
        high: usize,
        array: Vec<i64>,
    },
    RecurseRight {
        low: usize,
        high: usize,
        array: Vec<i64>,
    },
    Complete {
        array: Vec<i64>,
    },
}

impl StepPayload for SortPayload {
    fn kind(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::OuterLoop { .. } => "outer-loop",
            Self::Compare { .. } => "compare",
            Self::Swap { .. } => "swap",
            Self::AfterSwap { .. } => "after-swap",
            Self::Sorted { .. } => "sorted",
            Self::SelectMinStart { .. } => "select-min-start",
            Self::NewMin { .. } => "new-min",
            Self::KeySelect { .. } => "key-select",
            Self::KeyCompare { .. } => "key-compare",
            Self::Shift { .. } => "shift",
            Self::Insert { .. } => "insert",
            Self::Split { .. } => "split",
            Self::Place { .. } => "place",
            Self::Merged { .. } => "merged",
            Self::PartitionStart { .. } => "partition-start",
            Self::PivotSelect { .. } => "pivot-select",
            Self::PivotCompare { .. } => "pivot-compare",
            Self::PivotPlaced { .. } => "pivot-placed",
            Self::RecurseLeft { .. } => "recurse-left",
            Self::RecurseRight { .. } => "recurse-right",
            Self::Complete { .. } => "complete",
        }
    }
}

fn validate_array(input: &SortingInput) -> Validation {
    ensure(!input.array.is_empty(), "Please provide a non-empty array")
}

/// Degenerate input policy: an empty array yields a bare `complete` step.
fn degenerate(trace: &mut TraceBuilder<SortPayload>) {
    trace.push(
        Step::new(SortPayload::Complete { array: Vec::new() })
            .with_description("Nothing to sort"),
    );
}

fn push_init(trace: &mut TraceBuilder<SortPayload>, arr: &[i64]) {
    trace.push(
        Step::new(SortPayload::Init {
            array: arr.to_vec(),
        })
        .at_line(0)
        .with_description("Initialize the array"),
    );
}

fn push_complete(trace: &mut TraceBuilder<SortPayload>, arr: &[i64], line: u32) {
    trace.push(
        Step::new(SortPayload::Complete {
            array: arr.to_vec(),
        })
        .at_line(line)
        .with_description("Array is fully sorted!"),
    );
}

/// Bubble sort: repeatedly swap adjacent out-of-order pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct BubbleSortRunner;

impl Runner for BubbleSortRunner {
    type Input = SortingInput;
    type Payload = SortPayload;

    fn initial_input(&self) -> SortingInput {
        SortingInput {
            array: vec![64, 34, 25, 12, 22, 11, 90],
        }
    }

    fn validate(&self, input: &SortingInput) -> Validation {
        validate_array(input)
    }

    fn generate(&self, input: &SortingInput) -> Trace<SortPayload> {
        let mut trace = TraceBuilder::new();
        let mut arr = input.array.clone();
        let n = arr.len();
        if n == 0 {
            degenerate(&mut trace);
            return trace.finish();
        }

        push_init(&mut trace, &arr);

        for i in 0..n.saturating_sub(1) {
            trace.push(
                Step::new(SortPayload::OuterLoop {
                    i,
                    array: arr.clone(),
                })
                .at_line(3)
                .with_description(format!(
                    "Pass {}: Bubbling largest to position {}",
                    i + 1,
                    n - 1 - i
                )),
            );

            for j in 0..n - i - 1 {
                trace.push(
                    Step::new(SortPayload::Compare {
                        indices: [j, j + 1],
                        array: arr.clone(),
                    })
                    .at_line(6)
                    .with_description(format!(
                        "Compare arr[{j}]={} with arr[{}]={}",
                        arr[j],
                        j + 1,
                        arr[j + 1]
                    )),
                );

                if arr[j] > arr[j + 1] {
                    trace.push(
                        Step::new(SortPayload::Swap {
                            indices: [j, j + 1],
                            array: arr.clone(),
                        })
                        .at_line(8)
                        .with_description(format!("Swap {} and {}", arr[j], arr[j + 1])),
                    );
                    arr.swap(j, j + 1);
                    trace.push(
                        Step::new(SortPayload::AfterSwap {
                            indices: [j, j + 1],
                            array: arr.clone(),
                        })
                        .at_line(8)
                        .with_description(format!(
                            "After swap: arr[{j}]={}, arr[{}]={}",
                            arr[j],
                            j + 1,
                            arr[j + 1]
                        )),
                    );
                }
            }

            trace.push(
                Step::new(SortPayload::Sorted {
                    index: n - 1 - i,
                    array: arr.clone(),
                })
                .at_line(11)
                .with_description(format!("Element at position {} is now sorted", n - 1 - i)),
            );
        }

        push_complete(&mut trace, &arr, 13);
        trace.finish()
    }
}

/// Selection sort: grow a sorted prefix by repeatedly swapping in the
/// minimum of the unsorted suffix.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionSortRunner;

impl Runner for SelectionSortRunner {
    type Input = SortingInput;
    type Payload = SortPayload;

    fn initial_input(&self) -> SortingInput {
        SortingInput {
            array: vec![64, 25, 12, 22, 11],
        }
    }

    fn validate(&self, input: &SortingInput) -> Validation {
        validate_array(input)
    }

    fn generate(&self, input: &SortingInput) -> Trace<SortPayload> {
        let mut trace = TraceBuilder::new();
        let mut arr = input.array.clone();
        let n = arr.len();
        if n == 0 {
            degenerate(&mut trace);
            return trace.finish();
        }

        push_init(&mut trace, &arr);

        for i in 0..n.saturating_sub(1) {
            let mut min_idx = i;
            trace.push(
                Step::new(SortPayload::SelectMinStart {
                    current_min: i,
                    array: arr.clone(),
                })
                .at_line(4)
                .with_description(format!(
                    "Finding minimum in unsorted portion starting at index {i}"
                )),
            );

            for j in i + 1..n {
                trace.push(
                    Step::new(SortPayload::Compare {
                        indices: [min_idx, j],
                        array: arr.clone(),
                    })
                    .at_line(8)
                    .with_description(format!(
                        "Compare arr[{min_idx}]={} with arr[{j}]={}",
                        arr[min_idx], arr[j]
                    )),
                );

                if arr[j] < arr[min_idx] {
                    trace.push(
                        Step::new(SortPayload::NewMin {
                            old_min: min_idx,
                            new_min: j,
                            array: arr.clone(),
                        })
                        .at_line(9)
                        .with_description(format!(
                            "New minimum found: {} at index {j}",
                            arr[j]
                        )),
                    );
                    min_idx = j;
                }
            }

            if min_idx != i {
                trace.push(
                    Step::new(SortPayload::Swap {
                        indices: [i, min_idx],
                        array: arr.clone(),
                    })
                    .at_line(15)
                    .with_description(format!(
                        "Swap arr[{i}]={} with arr[{min_idx}]={}",
                        arr[i], arr[min_idx]
                    )),
                );
                arr.swap(i, min_idx);
                trace.push(
                    Step::new(SortPayload::AfterSwap {
                        indices: [i, min_idx],
                        array: arr.clone(),
                    })
                    .at_line(15)
                    .with_description("After swap"),
                );
            }

            trace.push(
                Step::new(SortPayload::Sorted {
                    index: i,
                    array: arr.clone(),
                })
                .at_line(17)
                .with_description(format!("Element at position {i} is now sorted")),
            );
        }

        push_complete(&mut trace, &arr, 19);
        trace.finish()
    }
}

/// Insertion sort: grow a sorted prefix by sinking each key into place.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertionSortRunner;

impl Runner for InsertionSortRunner {
    type Input = SortingInput;
    type Payload = SortPayload;

    fn initial_input(&self) -> SortingInput {
        SortingInput {
            array: vec![12, 11, 13, 5, 6],
        }
    }

    fn validate(&self, input: &SortingInput) -> Validation {
        validate_array(input)
    }

    fn generate(&self, input: &SortingInput) -> Trace<SortPayload> {
        let mut trace = TraceBuilder::new();
        let mut arr = input.array.clone();
        let n = arr.len();
        if n == 0 {
            degenerate(&mut trace);
            return trace.finish();
        }

        push_init(&mut trace, &arr);

        for i in 1..n {
            let key = arr[i];
            trace.push(
                Step::new(SortPayload::KeySelect {
                    index: i,
                    key,
                    array: arr.clone(),
                })
                .at_line(3)
                .with_description(format!("Select key arr[{i}]={key}")),
            );

            let mut j = i;
            while j > 0 {
                trace.push(
                    Step::new(SortPayload::KeyCompare {
                        index: j - 1,
                        key,
                        array: arr.clone(),
                    })
                    .at_line(6)
                    .with_description(format!(
                        "Compare key {key} with arr[{}]={}",
                        j - 1,
                        arr[j - 1]
                    )),
                );
                if arr[j - 1] <= key {
                    break;
                }
                arr[j] = arr[j - 1];
                trace.push(
                    Step::new(SortPayload::Shift {
                        from: j - 1,
                        to: j,
                        array: arr.clone(),
                    })
                    .at_line(8)
                    .with_description(format!(
                        "Shift {} right to index {j}",
                        arr[j]
                    )),
                );
                j -= 1;
            }

            arr[j] = key;
            trace.push(
                Step::new(SortPayload::Insert {
                    index: j,
                    key,
                    array: arr.clone(),
                })
                .at_line(11)
                .with_description(format!("Insert key {key} at index {j}")),
            );
        }

        push_complete(&mut trace, &arr, 13);
        trace.finish()
    }
}

/// Merge sort: divide, recurse, and record every element placement while
/// merging the halves back together.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeSortRunner;

impl MergeSortRunner {
    fn sort(trace: &mut TraceBuilder<SortPayload>, arr: &mut Vec<i64>, low: usize, high: usize) {
        if low >= high {
            return;
        }
        let mid = low + (high - low) / 2;
        trace.push(
            Step::new(SortPayload::Split {
                low,
                mid,
                high,
                array: arr.clone(),
            })
            .at_line(2)
            .with_description(format!("Split [{low}..{high}] at {mid}")),
        );

        Self::sort(trace, arr, low, mid);
        Self::sort(trace, arr, mid + 1, high);

        let left: Vec<i64> = arr[low..=mid].to_vec();
        let right: Vec<i64> = arr[mid + 1..=high].to_vec();
        let (mut i, mut j, mut k) = (0, 0, low);

        while i < left.len() && j < right.len() {
            let value = if left[i] <= right[j] {
                let v = left[i];
                i += 1;
                v
            } else {
                let v = right[j];
                j += 1;
                v
            };
            arr[k] = value;
            trace.push(
                Step::new(SortPayload::Place {
                    index: k,
                    value,
                    array: arr.clone(),
                })
                .at_line(8)
                .with_description(format!("Place {value} at index {k}")),
            );
            k += 1;
        }
        for &value in &left[i..] {
            arr[k] = value;
            trace.push(
                Step::new(SortPayload::Place {
                    index: k,
                    value,
                    array: arr.clone(),
                })
                .at_line(11)
                .with_description(format!("Place {value} at index {k}")),
            );
            k += 1;
        }
        for &value in &right[j..] {
            arr[k] = value;
            trace.push(
                Step::new(SortPayload::Place {
                    index: k,
                    value,
                    array: arr.clone(),
                })
                .at_line(13)
                .with_description(format!("Place {value} at index {k}")),
            );
            k += 1;
        }

        trace.push(
            Step::new(SortPayload::Merged {
                low,
                high,
                array: arr.clone(),
            })
            .at_line(15)
            .with_description(format!("Range [{low}..{high}] is merged")),
        );
    }
}

impl Runner for MergeSortRunner {
    type Input = SortingInput;
    type Payload = SortPayload;

    fn initial_input(&self) -> SortingInput {
        SortingInput {
            array: vec![38, 27, 43, 3, 9, 82, 10],
        }
    }

    fn validate(&self, input: &SortingInput) -> Validation {
        validate_array(input)
    }

    fn generate(&self, input: &SortingInput) -> Trace<SortPayload> {
        let mut trace = TraceBuilder::new();
        let mut arr = input.array.clone();
        if arr.is_empty() {
            degenerate(&mut trace);
            return trace.finish();
        }

        push_init(&mut trace, &arr);
        let high = arr.len() - 1;
        Self::sort(&mut trace, &mut arr, 0, high);
        push_complete(&mut trace, &arr, 17);
        trace.finish()
    }
}

/// Quicksort with Lomuto partitioning; the last element of each range is
/// the pivot.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuickSortRunner;

impl QuickSortRunner {
    fn partition(
        trace: &mut TraceBuilder<SortPayload>,
        arr: &mut Vec<i64>,
        low: usize,
        high: usize,
    ) -> usize {
        let pivot = arr[high];
        trace.push(
            Step::new(SortPayload::PivotSelect {
                pivot_index: high,
                pivot,
                low,
                high,
                array: arr.clone(),
            })
            .at_line(14)
            .with_description(format!("Select pivot: {pivot} at index {high}")),
        );

        // Last index of the <=-pivot region; None while it is empty.
        let mut boundary: Option<usize> = None;

        for j in low..high {
            trace.push(
                Step::new(SortPayload::PivotCompare {
                    index: j,
                    pivot_index: high,
                    pivot,
                    boundary,
                    array: arr.clone(),
                })
                .at_line(18)
                .with_description(format!(
                    "Compare arr[{j}]={} with pivot {pivot}",
                    arr[j]
                )),
            );

            if arr[j] <= pivot {
                let target = boundary.map_or(low, |b| b + 1);
                boundary = Some(target);
                if target != j {
                    trace.push(
                        Step::new(SortPayload::Swap {
                            indices: [target, j],
                            array: arr.clone(),
                        })
                        .at_line(20)
                        .with_description(format!(
                            "Swap arr[{target}]={} with arr[{j}]={}",
                            arr[target], arr[j]
                        )),
                    );
                    arr.swap(target, j);
                    trace.push(
                        Step::new(SortPayload::AfterSwap {
                            indices: [target, j],
                            array: arr.clone(),
                        })
                        .at_line(20)
                        .with_description("After swap"),
                    );
                }
            }
        }

        let pivot_target = boundary.map_or(low, |b| b + 1);
        trace.push(
            Step::new(SortPayload::Swap {
                indices: [pivot_target, high],
                array: arr.clone(),
            })
            .at_line(24)
            .with_description(format!(
                "Place pivot at correct position: swap arr[{pivot_target}]={} with pivot {}",
                arr[pivot_target], arr[high]
            )),
        );
        arr.swap(pivot_target, high);
        trace.push(
            Step::new(SortPayload::PivotPlaced {
                pivot_index: pivot_target,
                array: arr.clone(),
            })
            .at_line(24)
            .with_description(format!(
                "Pivot {pivot} is now at its final position {pivot_target}"
            )),
        );

        pivot_target
    }

    fn sort(trace: &mut TraceBuilder<SortPayload>, arr: &mut Vec<i64>, low: usize, high: usize) {
        if low >= high {
            return;
        }
        trace.push(
            Step::new(SortPayload::PartitionStart {
                low,
                high,
                array: arr.clone(),
            })
            .at_line(2)
            .with_description(format!("Partitioning subarray [{low}...{high}]")),
        );

        let pivot_idx = Self::partition(trace, arr, low, high);

        if pivot_idx > low {
            trace.push(
                Step::new(SortPayload::RecurseLeft {
                    low,
                    high: pivot_idx - 1,
                    array: arr.clone(),
                })
                .at_line(5)
                .with_description(format!(
                    "Recursing on left partition [{low}...{}]",
                    pivot_idx - 1
                )),
            );
            Self::sort(trace, arr, low, pivot_idx - 1);
        }
        if pivot_idx < high {
            trace.push(
                Step::new(SortPayload::RecurseRight {
                    low: pivot_idx + 1,
                    high,
                    array: arr.clone(),
                })
                .at_line(8)
                .with_description(format!(
                    "Recursing on right partition [{}...{high}]",
                    pivot_idx + 1
                )),
            );
            Self::sort(trace, arr, pivot_idx + 1, high);
        }
    }
}

impl Runner for QuickSortRunner {
    type Input = SortingInput;
    type Payload = SortPayload;

    fn initial_input(&self) -> SortingInput {
        SortingInput {
            array: vec![38, 27, 43, 3, 9, 82, 10],
        }
    }

    fn validate(&self, input: &SortingInput) -> Validation {
        validate_array(input)
    }

    fn generate(&self, input: &SortingInput) -> Trace<SortPayload> {
        let mut trace = TraceBuilder::new();
        let mut arr = input.array.clone();
        if arr.is_empty() {
            degenerate(&mut trace);
            return trace.finish();
        }

        push_init(&mut trace, &arr);
        let high = arr.len() - 1;
        Self::sort(&mut trace, &mut arr, 0, high);
        push_complete(&mut trace, &arr, 10);
        trace.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn final_array(trace: &Trace<SortPayload>) -> Vec<i64> {
        match &trace.last().unwrap().payload {
            SortPayload::Complete { array } => array.clone(),
            other => panic!("expected complete, got {}", other.kind()),
        }
    }

    fn assert_sorts(runner: &dyn Runner<Input = SortingInput, Payload = SortPayload>) {
        let input = runner.initial_input();
        assert!(runner.validate(&input).is_ok());
        let trace = runner.generate(&input);
        assert!(trace.is_well_formed());

        let mut expected = input.array.clone();
        expected.sort_unstable();
        assert_eq!(final_array(&trace), expected);
    }

    #[test]
    fn test_each_runner_sorts_its_canonical_input() {
        assert_sorts(&BubbleSortRunner);
        assert_sorts(&SelectionSortRunner);
        assert_sorts(&InsertionSortRunner);
        assert_sorts(&MergeSortRunner);
        assert_sorts(&QuickSortRunner);
    }

    #[test]
    fn test_bubble_small_scenario() {
        let trace = BubbleSortRunner.generate(&SortingInput {
            array: vec![3, 1, 2],
        });
        assert_eq!(final_array(&trace), vec![1, 2, 3]);
        assert!(trace.kinds().any(|k| k == "swap"));
        assert_eq!(trace.first().unwrap().kind(), "init");
    }

    #[test]
    fn test_bubble_is_deterministic() {
        let input = SortingInput {
            array: vec![5, 3, 8, 1],
        };
        assert_eq!(
            BubbleSortRunner.generate(&input),
            BubbleSortRunner.generate(&input)
        );
    }

    #[test]
    fn test_snapshots_are_record_time_copies() {
        // [2, 1]: the swap step must still show the pre-swap array while
        // the after-swap step shows the exchanged one.
        let trace = BubbleSortRunner.generate(&SortingInput { array: vec![2, 1] });
        let swap = trace
            .iter()
            .find_map(|s| match &s.payload {
                SortPayload::Swap { array, .. } => Some(array.clone()),
                _ => None,
            })
            .unwrap();
        let after = trace
            .iter()
            .find_map(|s| match &s.payload {
                SortPayload::AfterSwap { array, .. } => Some(array.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(swap, vec![2, 1]);
        assert_eq!(after, vec![1, 2]);
    }

    #[test]
    fn test_quick_records_pivot_lifecycle() {
        let trace = QuickSortRunner.generate(&QuickSortRunner.initial_input());
        assert!(trace.kinds().any(|k| k == "pivot-select"));
        assert!(trace.kinds().any(|k| k == "pivot-compare"));
        assert!(trace.kinds().any(|k| k == "pivot-placed"));
    }

    #[test]
    fn test_merge_records_splits_and_placements() {
        let trace = MergeSortRunner.generate(&MergeSortRunner.initial_input());
        let splits = trace.kinds().filter(|k| *k == "split").count();
        let places = trace.kinds().filter(|k| *k == "place").count();
        // 7 elements: 6 splits; every merge writes each element of its range.
        assert_eq!(splits, 6);
        assert!(places >= 7);
    }

    #[test]
    fn test_insertion_shifts_and_inserts() {
        let trace = InsertionSortRunner.generate(&SortingInput {
            array: vec![3, 1, 2],
        });
        assert!(trace.kinds().any(|k| k == "key-select"));
        assert!(trace.kinds().any(|k| k == "shift"));
        assert_eq!(final_array(&trace), vec![1, 2, 3]);
    }

    #[test]
    fn test_single_element_arrays() {
        for trace in [
            BubbleSortRunner.generate(&SortingInput { array: vec![7] }),
            QuickSortRunner.generate(&SortingInput { array: vec![7] }),
            MergeSortRunner.generate(&SortingInput { array: vec![7] }),
        ] {
            assert!(trace.is_well_formed());
            assert_eq!(final_array(&trace), vec![7]);
        }
    }

    #[test]
    fn test_empty_array_rejected_but_tolerated() {
        let empty = SortingInput { array: Vec::new() };
        assert!(BubbleSortRunner.validate(&empty).is_err());
        // Defensive path: a degenerate trace, not a panic.
        let trace = BubbleSortRunner.generate(&empty);
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.last().unwrap().kind(), "complete");
    }

    #[test]
    fn test_serialized_step_shape() {
        let trace = BubbleSortRunner.generate(&SortingInput { array: vec![2, 1] });
        let json = serde_json::to_value(trace.get(2).unwrap()).unwrap();
        assert_eq!(json["kind"], "compare");
        assert_eq!(json["indices"], serde_json::json!([0, 1]));
        assert_eq!(json["array"], serde_json::json!([2, 1]));
    }
}
