//! Searching runners: binary search over a pre-sorted array, and linear
//! search as the family's baseline.
//!
//! Binary search bounds are `i64` because the classic loop drives `right`
//! to `-1` when the target is smaller than every element.

use serde::{Deserialize, Serialize};
use zoetrope_core::{Runner, Step, StepPayload, Trace, TraceBuilder, Validation, ensure};

/// An array and the value to look for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchingInput {
    pub array: Vec<i64>,
    pub target: i64,
}

/// Step vocabulary of the searching family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SearchPayload {
    Init {
        array: Vec<i64>,
        target: i64,
    },
    SetBounds {
        left: i64,
        right: i64,
        array: Vec<i64>,
    },
    CalculateMid {
        left: i64,
        right: i64,
        mid: usize,
        array: Vec<i64>,
    },
    /// `array[index]` is checked against the target.
    Compare {
        index: usize,
        value: i64,
        target: i64,
        array: Vec<i64>,
    },
    SearchRight {
        old_left: i64,
        new_left: i64,
        right: i64,
        array: Vec<i64>,
    },
    SearchLeft {
        left: i64,
        old_right: i64,
        new_right: i64,
        array: Vec<i64>,
    },
    UpdateBounds {
        left: i64,
        right: i64,
        array: Vec<i64>,
    },
    Found {
        index: usize,
        value: i64,
        array: Vec<i64>,
    },
    NotFound {
        target: i64,
        array: Vec<i64>,
    },
    Complete {
        array: Vec<i64>,
        target: i64,
        found: bool,
        index: Option<usize>,
    },
}

impl StepPayload for SearchPayload {
    fn kind(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::SetBounds { .. } => "set-bounds",
            Self::CalculateMid { .. } => "calculate-mid",
            Self::Compare { .. } => "compare",
            Self::SearchRight { .. } => "search-right",
            Self::SearchLeft { .. } => "search-left",
            Self::UpdateBounds { .. } => "update-bounds",
            Self::Found { .. } => "found",
            Self::NotFound { .. } => "not-found",
            Self::Complete { .. } => "complete",
        }
    }
}

fn push_complete(
    trace: &mut TraceBuilder<SearchPayload>,
    arr: &[i64],
    target: i64,
    index: Option<usize>,
    line: u32,
) {
    let description = match index {
        Some(i) => format!("Search complete: {target} is at index {i}"),
        None => format!("Search complete: {target} is not in the array"),
    };
    trace.push(
        Step::new(SearchPayload::Complete {
            array: arr.to_vec(),
            target,
            found: index.is_some(),
            index,
        })
        .at_line(line)
        .with_description(description),
    );
}

/// Binary search. Requires the input array to be sorted ascending; records
/// the live `left`/`right`/`mid` bounds at every iteration.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinarySearchRunner;

impl Runner for BinarySearchRunner {
    type Input = SearchingInput;
    type Payload = SearchPayload;

    fn initial_input(&self) -> SearchingInput {
        SearchingInput {
            array: vec![2, 5, 8, 12, 16, 23, 38, 56, 72, 91],
            target: 23,
        }
    }

    fn validate(&self, input: &SearchingInput) -> Validation {
        ensure(!input.array.is_empty(), "Please provide a non-empty array")?;
        ensure(
            input.array.windows(2).all(|w| w[0] <= w[1]),
            "Array must be sorted for binary search",
        )
    }

    fn generate(&self, input: &SearchingInput) -> Trace<SearchPayload> {
        let mut trace = TraceBuilder::new();
        let arr = input.array.clone();
        let target = input.target;
        if arr.is_empty() {
            push_complete(&mut trace, &arr, target, None, 17);
            return trace.finish();
        }

        let mut left: i64 = 0;
        let mut right: i64 = arr.len() as i64 - 1;

        trace.push(
            Step::new(SearchPayload::Init {
                array: arr.clone(),
                target,
            })
            .at_line(0)
            .with_description(format!("Searching for {target} in sorted array")),
        );
        trace.push(
            Step::new(SearchPayload::SetBounds {
                left,
                right,
                array: arr.clone(),
            })
            .at_line(2)
            .with_description(format!("Set left={left}, right={right}")),
        );

        let mut outcome = None;
        while left <= right {
            let mid = ((left + right) / 2) as usize;

            trace.push(
                Step::new(SearchPayload::CalculateMid {
                    left,
                    right,
                    mid,
                    array: arr.clone(),
                })
                .at_line(5)
                .with_description(format!(
                    "Calculate mid = floor(({left} + {right}) / 2) = {mid}"
                )),
            );
            trace.push(
                Step::new(SearchPayload::Compare {
                    index: mid,
                    value: arr[mid],
                    target,
                    array: arr.clone(),
                })
                .at_line(7)
                .with_description(format!(
                    "Compare arr[{mid}]={} with target {target}",
                    arr[mid]
                )),
            );

            if arr[mid] == target {
                trace.push(
                    Step::new(SearchPayload::Found {
                        index: mid,
                        value: arr[mid],
                        array: arr.clone(),
                    })
                    .at_line(8)
                    .with_description(format!("Found {target} at index {mid}!")),
                );
                outcome = Some(mid);
                break;
            }

            if arr[mid] < target {
                trace.push(
                    Step::new(SearchPayload::SearchRight {
                        old_left: left,
                        new_left: mid as i64 + 1,
                        right,
                        array: arr.clone(),
                    })
                    .at_line(12)
                    .with_description(format!(
                        "{} < {target}, search right half: left = {}",
                        arr[mid],
                        mid as i64 + 1
                    )),
                );
                left = mid as i64 + 1;
            } else {
                trace.push(
                    Step::new(SearchPayload::SearchLeft {
                        left,
                        old_right: right,
                        new_right: mid as i64 - 1,
                        array: arr.clone(),
                    })
                    .at_line(14)
                    .with_description(format!(
                        "{} > {target}, search left half: right = {}",
                        arr[mid],
                        mid as i64 - 1
                    )),
                );
                right = mid as i64 - 1;
            }

            trace.push(
                Step::new(SearchPayload::UpdateBounds {
                    left,
                    right,
                    array: arr.clone(),
                })
                .at_line(if left > right { 17 } else { 4 })
                .with_description(format!("Bounds updated: left={left}, right={right}")),
            );
        }

        if outcome.is_none() {
            trace.push(
                Step::new(SearchPayload::NotFound {
                    target,
                    array: arr.clone(),
                })
                .at_line(17)
                .with_description(format!("{target} not found in array")),
            );
        }
        push_complete(&mut trace, &arr, target, outcome, 19);
        trace.finish()
    }
}

/// Linear search: scan left to right until the target shows up.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearSearchRunner;

impl Runner for LinearSearchRunner {
    type Input = SearchingInput;
    type Payload = SearchPayload;

    fn initial_input(&self) -> SearchingInput {
        SearchingInput {
            array: vec![10, 50, 30, 70, 80, 20, 90, 40],
            target: 20,
        }
    }

    fn validate(&self, input: &SearchingInput) -> Validation {
        ensure(!input.array.is_empty(), "Please provide a non-empty array")
    }

    fn generate(&self, input: &SearchingInput) -> Trace<SearchPayload> {
        let mut trace = TraceBuilder::new();
        let arr = input.array.clone();
        let target = input.target;
        if arr.is_empty() {
            push_complete(&mut trace, &arr, target, None, 8);
            return trace.finish();
        }

        trace.push(
            Step::new(SearchPayload::Init {
                array: arr.clone(),
                target,
            })
            .at_line(0)
            .with_description(format!("Searching for {target} from the left")),
        );

        let mut outcome = None;
        for (index, &value) in arr.iter().enumerate() {
            trace.push(
                Step::new(SearchPayload::Compare {
                    index,
                    value,
                    target,
                    array: arr.clone(),
                })
                .at_line(2)
                .with_description(format!("Compare arr[{index}]={value} with target {target}")),
            );

            if value == target {
                trace.push(
                    Step::new(SearchPayload::Found {
                        index,
                        value,
                        array: arr.clone(),
                    })
                    .at_line(3)
                    .with_description(format!("Found {target} at index {index}!")),
                );
                outcome = Some(index);
                break;
            }
        }

        if outcome.is_none() {
            trace.push(
                Step::new(SearchPayload::NotFound {
                    target,
                    array: arr.clone(),
                })
                .at_line(6)
                .with_description(format!("{target} not found in array")),
            );
        }
        push_complete(&mut trace, &arr, target, outcome, 8);
        trace.finish()
    }
}
