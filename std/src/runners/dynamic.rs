//! Fibonacci by bottom-up tabulation: every table write is its own step.

use serde::{Deserialize, Serialize};
use zoetrope_core::{Runner, Step, StepPayload, Trace, TraceBuilder, Validation, ensure};

/// Which Fibonacci number to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FibonacciInput {
    pub n: u32,
}

/// Step vocabulary of the Fibonacci runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FibPayload {
    Init {
        n: u32,
        dp: Vec<u64>,
    },
    BaseCase {
        n: u32,
        result: u64,
        dp: Vec<u64>,
    },
    InitDp {
        dp: Vec<u64>,
        n: u32,
    },
    Compute {
        i: usize,
        prev1: u64,
        prev2: u64,
        dp: Vec<u64>,
        n: u32,
    },
    Store {
        i: usize,
        value: u64,
        dp: Vec<u64>,
        n: u32,
    },
    Complete {
        n: u32,
        result: u64,
        dp: Vec<u64>,
    },
}

impl StepPayload for FibPayload {
    fn kind(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::BaseCase { .. } => "base-case",
            Self::InitDp { .. } => "init-dp",
            Self::Compute { .. } => "compute",
            Self::Store { .. } => "store",
            Self::Complete { .. } => "complete",
        }
    }
}

/// Bottom-up Fibonacci over a one-dimensional table.
#[derive(Debug, Clone, Copy, Default)]
pub struct FibonacciRunner;

impl Runner for FibonacciRunner {
    type Input = FibonacciInput;
    type Payload = FibPayload;

    fn initial_input(&self) -> FibonacciInput {
        FibonacciInput { n: 10 }
    }

    fn validate(&self, input: &FibonacciInput) -> Validation {
        ensure(input.n <= 40, "N must be an integer between 0 and 40")
    }

    fn generate(&self, input: &FibonacciInput) -> Trace<FibPayload> {
        let mut trace = TraceBuilder::new();
        // Defensive clamp against table blowup past the validated cap.
        let n = input.n.min(40);

        trace.push(
            Step::new(FibPayload::Init { n, dp: Vec::new() })
                .at_line(0)
                .with_description(format!(
                    "Computing Fibonacci({n}) using dynamic programming"
                )),
        );

        if n <= 1 {
            let result = u64::from(n);
            trace.push(
                Step::new(FibPayload::BaseCase {
                    n,
                    result,
                    dp: vec![result],
                })
                .at_line(2)
                .with_description(format!("Base case: Fibonacci({n}) = {result}")),
            );
            trace.push(
                Step::new(FibPayload::Complete {
                    n,
                    result,
                    dp: vec![result],
                })
                .at_line(15)
                .with_description(format!("Result: Fibonacci({n}) = {result}")),
            );
            return trace.finish();
        }

        let mut dp: Vec<u64> = vec![0; n as usize + 1];
        dp[1] = 1;

        trace.push(
            Step::new(FibPayload::InitDp { dp: dp.clone(), n })
                .at_line(6)
                .with_description("Initialize DP table: dp[0] = 0, dp[1] = 1"),
        );

        for i in 2..=n as usize {
            trace.push(
                Step::new(FibPayload::Compute {
                    i,
                    prev1: dp[i - 1],
                    prev2: dp[i - 2],
                    dp: dp.clone(),
                    n,
                })
                .at_line(10)
                .with_description(format!(
                    "Computing dp[{i}] = dp[{}] + dp[{}] = {} + {}",
                    i - 1,
                    i - 2,
                    dp[i - 1],
                    dp[i - 2]
                )),
            );

            dp[i] = dp[i - 1] + dp[i - 2];

            trace.push(
                Step::new(FibPayload::Store {
                    i,
                    value: dp[i],
                    dp: dp.clone(),
                    n,
                })
                .at_line(11)
                .with_description(format!("Store dp[{i}] = {}", dp[i])),
            );
        }

        let result = dp[n as usize];
        trace.push(
            Step::new(FibPayload::Complete { n, result, dp })
                .at_line(14)
                .with_description(format!("Result: Fibonacci({n}) = {result}")),
        );
        trace.finish()
    }
}
