//! 0/1 Knapsack by bottom-up tabulation, then a recorded backward
//! reconstruction pass naming each taken or skipped item.

use serde::{Deserialize, Serialize};
use zoetrope_core::{Runner, Step, StepPayload, Trace, TraceBuilder, Validation, ensure};

/// Items (parallel weight/value lists) and the knapsack capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Knapsack01Input {
    pub weights: Vec<usize>,
    pub values: Vec<u64>,
    pub capacity: usize,
}

/// One item as a renderer-friendly record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnapsackItem {
    pub weight: usize,
    pub value: u64,
    pub index: usize,
}

/// Which branch the recurrence picked for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnapsackChoice {
    Include,
    Exclude,
}

/// Step vocabulary of the 0/1 Knapsack runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum KnapsackPayload {
    Init {
        dp: Vec<Vec<u64>>,
        weights: Vec<usize>,
        values: Vec<u64>,
        capacity: usize,
        n: usize,
        items: Vec<KnapsackItem>,
    },
    /// Cell (i, w) is about to be filled from item `i - 1`.
    Compare {
        dp: Vec<Vec<u64>>,
        i: usize,
        w: usize,
        item_weight: usize,
        item_value: u64,
        weights: Vec<usize>,
        values: Vec<u64>,
        capacity: usize,
    },
    Update {
        dp: Vec<Vec<u64>>,
        i: usize,
        w: usize,
        include: u64,
        exclude: u64,
        chosen: KnapsackChoice,
        weights: Vec<usize>,
        values: Vec<u64>,
        capacity: usize,
    },
    /// The item does not fit at this capacity; the cell copies from above.
    Skip {
        dp: Vec<Vec<u64>>,
        i: usize,
        w: usize,
        weights: Vec<usize>,
        values: Vec<u64>,
        capacity: usize,
    },
    /// One reconstruction decision walking back from dp[n][capacity].
    TraceBack {
        i: usize,
        w: usize,
        taken: bool,
        selected: Vec<usize>,
        dp: Vec<Vec<u64>>,
        weights: Vec<usize>,
        values: Vec<u64>,
        capacity: usize,
    },
    Complete {
        dp: Vec<Vec<u64>>,
        max_value: u64,
        selected_items: Vec<usize>,
        weights: Vec<usize>,
        values: Vec<u64>,
        capacity: usize,
    },
}

impl StepPayload for KnapsackPayload {
    fn kind(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::Compare { .. } => "compare",
            Self::Update { .. } => "update",
            Self::Skip { .. } => "skip",
            Self::TraceBack { .. } => "trace-back",
            Self::Complete { .. } => "complete",
        }
    }
}

/// 0/1 Knapsack runner over a (n + 1) x (capacity + 1) table.
#[derive(Debug, Clone, Copy, Default)]
pub struct Knapsack01Runner;

impl Runner for Knapsack01Runner {
    type Input = Knapsack01Input;
    type Payload = KnapsackPayload;

    fn initial_input(&self) -> Knapsack01Input {
        Knapsack01Input {
            weights: vec![2, 3, 4, 5],
            values: vec![3, 4, 5, 6],
            capacity: 5,
        }
    }

    fn validate(&self, input: &Knapsack01Input) -> Validation {
        ensure(
            input.weights.len() == input.values.len(),
            "Weights and values must have same length",
        )?;
        ensure(
            (1..=8).contains(&input.weights.len()),
            "Number of items must be between 1 and 8",
        )?;
        ensure(
            (1..=20).contains(&input.capacity),
            "Capacity must be between 1 and 20",
        )
    }

    fn generate(&self, input: &Knapsack01Input) -> Trace<KnapsackPayload> {
        let mut trace = TraceBuilder::new();
        let n = input.weights.len().min(input.values.len());
        let weights: Vec<usize> = input.weights[..n].to_vec();
        let values: Vec<u64> = input.values[..n].to_vec();
        let capacity = input.capacity;

        let mut dp: Vec<Vec<u64>> = vec![vec![0; capacity + 1]; n + 1];

        trace.push(
            Step::new(KnapsackPayload::Init {
                dp: dp.clone(),
                weights: weights.clone(),
                values: values.clone(),
                capacity,
                n,
                items: weights
                    .iter()
                    .zip(&values)
                    .enumerate()
                    .map(|(index, (&weight, &value))| KnapsackItem {
                        weight,
                        value,
                        index,
                    })
                    .collect(),
            })
            .at_line(0)
            .with_description(format!(
                "Initialize DP table for {n} items with capacity {capacity}"
            )),
        );

        for i in 1..=n {
            let (item_weight, item_value) = (weights[i - 1], values[i - 1]);
            for w in 0..=capacity {
                trace.push(
                    Step::new(KnapsackPayload::Compare {
                        dp: dp.clone(),
                        i,
                        w,
                        item_weight,
                        item_value,
                        weights: weights.clone(),
                        values: values.clone(),
                        capacity,
                    })
                    .at_line(7)
                    .with_description(format!(
                        "Item {i}: weight={item_weight}, value={item_value}. Capacity w={w}"
                    )),
                );

                if item_weight <= w {
                    let include = dp[i - 1][w - item_weight] + item_value;
                    let exclude = dp[i - 1][w];
                    dp[i][w] = include.max(exclude);
                    let chosen = if include > exclude {
                        KnapsackChoice::Include
                    } else {
                        KnapsackChoice::Exclude
                    };

                    trace.push(
                        Step::new(KnapsackPayload::Update {
                            dp: dp.clone(),
                            i,
                            w,
                            include,
                            exclude,
                            chosen,
                            weights: weights.clone(),
                            values: values.clone(),
                            capacity,
                        })
                        .at_line(if include > exclude { 10 } else { 9 })
                        .with_description(format!(
                            "Include: {include}, Exclude: {exclude}. Choose {} -> dp[{i}][{w}] = {}",
                            match chosen {
                                KnapsackChoice::Include => "include",
                                KnapsackChoice::Exclude => "exclude",
                            },
                            dp[i][w]
                        )),
                    );
                } else {
                    dp[i][w] = dp[i - 1][w];
                    trace.push(
                        Step::new(KnapsackPayload::Skip {
                            dp: dp.clone(),
                            i,
                            w,
                            weights: weights.clone(),
                            values: values.clone(),
                            capacity,
                        })
                        .at_line(13)
                        .with_description(format!(
                            "Item {i} too heavy ({item_weight} > {w}). dp[{i}][{w}] = {}",
                            dp[i][w]
                        )),
                    );
                }
            }
        }

        // Reconstruction: walk back from dp[n][capacity], one recorded
        // decision per item row.
        let mut selected: Vec<usize> = Vec::new();
        let mut w = capacity;
        for i in (1..=n).rev() {
            let taken = dp[i][w] != dp[i - 1][w];
            if taken {
                selected.push(i - 1);
                w -= weights[i - 1];
            }
            trace.push(
                Step::new(KnapsackPayload::TraceBack {
                    i,
                    w,
                    taken,
                    selected: selected.clone(),
                    dp: dp.clone(),
                    weights: weights.clone(),
                    values: values.clone(),
                    capacity,
                })
                .at_line(17)
                .with_description(if taken {
                    format!("Item {i} was taken; remaining capacity {w}")
                } else {
                    format!("Item {i} was skipped")
                }),
            );
        }
        selected.reverse();

        let max_value = dp[n][capacity];
        let listed = if selected.is_empty() {
            "none".to_string()
        } else {
            selected
                .iter()
                .map(|i| (i + 1).to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        trace.push(
            Step::new(KnapsackPayload::Complete {
                dp,
                max_value,
                selected_items: selected,
                weights,
                values,
                capacity,
            })
            .at_line(18)
            .with_description(format!(
                "Maximum value: {max_value}. Selected items: {listed}"
            )),
        );
        trace.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminal(trace: &Trace<KnapsackPayload>) -> (u64, Vec<usize>) {
        match &trace.last().unwrap().payload {
            KnapsackPayload::Complete {
                max_value,
                selected_items,
                ..
            } => (*max_value, selected_items.clone()),
            other => panic!("expected complete, got {}", other.kind()),
        }
    }

    #[test]
    fn test_canonical_input_packs_value_7() {
        // weights [2,3,4,5], values [3,4,5,6], capacity 5: take items 0+1.
        let runner = Knapsack01Runner;
        let trace = runner.generate(&runner.initial_input());
        assert!(trace.is_well_formed());

        let (max_value, selected) = terminal(&trace);
        assert_eq!(max_value, 7);
        assert_eq!(selected, vec![0, 1]);
    }

    #[test]
    fn test_every_cell_is_recorded() {
        let runner = Knapsack01Runner;
        let input = runner.initial_input();
        let trace = runner.generate(&input);
        let cells = input.weights.len() * (input.capacity + 1);
        assert_eq!(trace.kinds().filter(|k| *k == "compare").count(), cells);
        // Each compare resolves to exactly one update or skip.
        let resolutions = trace
            .kinds()
            .filter(|k| *k == "update" || *k == "skip")
            .count();
        assert_eq!(resolutions, cells);
    }

    #[test]
    fn test_reconstruction_is_stepped() {
        let runner = Knapsack01Runner;
        let trace = runner.generate(&runner.initial_input());
        // One trace-back decision per item row.
        assert_eq!(trace.kinds().filter(|k| *k == "trace-back").count(), 4);
    }

    #[test]
    fn test_too_heavy_items_leave_empty_selection() {
        let trace = Knapsack01Runner.generate(&Knapsack01Input {
            weights: vec![9, 10],
            values: vec![100, 200],
            capacity: 5,
        });
        let (max_value, selected) = terminal(&trace);
        assert_eq!(max_value, 0);
        assert!(selected.is_empty());
        assert!(trace.kinds().any(|k| k == "skip"));
    }

    #[test]
    fn test_validation_bounds() {
        let runner = Knapsack01Runner;
        assert!(
            runner
                .validate(&Knapsack01Input {
                    weights: vec![1, 2],
                    values: vec![1],
                    capacity: 5,
                })
                .is_err()
        );
        assert!(
            runner
                .validate(&Knapsack01Input {
                    weights: vec![1],
                    values: vec![1],
                    capacity: 21,
                })
                .is_err()
        );
    }

    #[test]
    fn test_determinism() {
        let input = Knapsack01Runner.initial_input();
        assert_eq!(
            Knapsack01Runner.generate(&input),
            Knapsack01Runner.generate(&input)
        );
    }
}
