//! Longest Common Subsequence by bottom-up tabulation, then a recorded
//! backward reconstruction walk through the table.

use serde::{Deserialize, Serialize};
use zoetrope_core::{Runner, Step, StepPayload, Trace, TraceBuilder, Validation, ensure};

/// The two strings to compare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LcsInput {
    pub str1: String,
    pub str2: String,
}

/// Direction of one reconstruction move through the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LcsMove {
    Diagonal,
    Up,
    Left,
}

/// One visited cell of the reconstruction path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LcsPathCell {
    pub i: usize,
    pub j: usize,
    pub matched: bool,
}

/// Step vocabulary of the LCS runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LcsPayload {
    Init {
        dp: Vec<Vec<usize>>,
        str1: String,
        str2: String,
        m: usize,
        n: usize,
    },
    Compare {
        dp: Vec<Vec<usize>>,
        i: usize,
        j: usize,
        char1: char,
        char2: char,
        str1: String,
        str2: String,
    },
    Match {
        dp: Vec<Vec<usize>>,
        i: usize,
        j: usize,
        char1: char,
        char2: char,
        str1: String,
        str2: String,
    },
    NoMatch {
        dp: Vec<Vec<usize>>,
        i: usize,
        j: usize,
        char1: char,
        char2: char,
        from_top: usize,
        from_left: usize,
        str1: String,
        str2: String,
    },
    /// One reconstruction move from cell (i, j).
    TraceBack {
        i: usize,
        j: usize,
        matched: bool,
        direction: LcsMove,
        lcs: String,
        dp: Vec<Vec<usize>>,
        str1: String,
        str2: String,
    },
    Complete {
        dp: Vec<Vec<usize>>,
        str1: String,
        str2: String,
        lcs: String,
        lcs_length: usize,
        path: Vec<LcsPathCell>,
    },
}

impl StepPayload for LcsPayload {
    fn kind(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::Compare { .. } => "compare",
            Self::Match { .. } => "match",
            Self::NoMatch { .. } => "no-match",
            Self::TraceBack { .. } => "trace-back",
            Self::Complete { .. } => "complete",
        }
    }
}

/// LCS runner over an (m + 1) x (n + 1) table.
#[derive(Debug, Clone, Copy, Default)]
pub struct LcsRunner;

impl Runner for LcsRunner {
    type Input = LcsInput;
    type Payload = LcsPayload;

    fn initial_input(&self) -> LcsInput {
        LcsInput {
            str1: "ABCDGH".to_string(),
            str2: "AEDFHR".to_string(),
        }
    }

    fn validate(&self, input: &LcsInput) -> Validation {
        ensure(
            (1..=10).contains(&input.str1.chars().count()),
            "String 1 must be 1-10 characters",
        )?;
        ensure(
            (1..=10).contains(&input.str2.chars().count()),
            "String 2 must be 1-10 characters",
        )
    }

    fn generate(&self, input: &LcsInput) -> Trace<LcsPayload> {
        let mut trace = TraceBuilder::new();
        let a: Vec<char> = input.str1.chars().collect();
        let b: Vec<char> = input.str2.chars().collect();
        let (m, n) = (a.len(), b.len());

        let mut dp: Vec<Vec<usize>> = vec![vec![0; n + 1]; m + 1];

        trace.push(
            Step::new(LcsPayload::Init {
                dp: dp.clone(),
                str1: input.str1.clone(),
                str2: input.str2.clone(),
                m,
                n,
            })
            .at_line(0)
            .with_description(format!(
                "Initialize DP table for \"{}\" and \"{}\"",
                input.str1, input.str2
            )),
        );

        for i in 1..=m {
            for j in 1..=n {
                let (char1, char2) = (a[i - 1], b[j - 1]);
                trace.push(
                    Step::new(LcsPayload::Compare {
                        dp: dp.clone(),
                        i,
                        j,
                        char1,
                        char2,
                        str1: input.str1.clone(),
                        str2: input.str2.clone(),
                    })
                    .at_line(7)
                    .with_description(format!(
                        "Compare str1[{}]='{char1}' with str2[{}]='{char2}'",
                        i - 1,
                        j - 1
                    )),
                );

                if char1 == char2 {
                    dp[i][j] = dp[i - 1][j - 1] + 1;
                    trace.push(
                        Step::new(LcsPayload::Match {
                            dp: dp.clone(),
                            i,
                            j,
                            char1,
                            char2,
                            str1: input.str1.clone(),
                            str2: input.str2.clone(),
                        })
                        .at_line(8)
                        .with_description(format!(
                            "Match! '{char1}' = '{char2}' -> dp[{i}][{j}] = dp[{}][{}] + 1 = {}",
                            i - 1,
                            j - 1,
                            dp[i][j]
                        )),
                    );
                } else {
                    let (from_top, from_left) = (dp[i - 1][j], dp[i][j - 1]);
                    dp[i][j] = from_top.max(from_left);
                    trace.push(
                        Step::new(LcsPayload::NoMatch {
                            dp: dp.clone(),
                            i,
                            j,
                            char1,
                            char2,
                            from_top,
                            from_left,
                            str1: input.str1.clone(),
                            str2: input.str2.clone(),
                        })
                        .at_line(10)
                        .with_description(format!(
                            "No match. max(dp[{}][{j}]={from_top}, dp[{i}][{}]={from_left}) -> dp[{i}][{j}] = {}",
                            i - 1,
                            j - 1,
                            dp[i][j]
                        )),
                    );
                }
            }
        }

        // Reconstruction: walk back from (m, n), one recorded move per cell.
        let mut lcs_chars: Vec<char> = Vec::new();
        let mut path: Vec<LcsPathCell> = Vec::new();
        let (mut i, mut j) = (m, n);
        while i > 0 && j > 0 {
            let matched = a[i - 1] == b[j - 1];
            let direction = if matched {
                lcs_chars.push(a[i - 1]);
                LcsMove::Diagonal
            } else if dp[i - 1][j] > dp[i][j - 1] {
                LcsMove::Up
            } else {
                LcsMove::Left
            };
            path.push(LcsPathCell { i, j, matched });

            let partial: String = lcs_chars.iter().rev().collect();
            trace.push(
                Step::new(LcsPayload::TraceBack {
                    i,
                    j,
                    matched,
                    direction,
                    lcs: partial,
                    dp: dp.clone(),
                    str1: input.str1.clone(),
                    str2: input.str2.clone(),
                })
                .at_line(18)
                .with_description(match direction {
                    LcsMove::Diagonal => format!(
                        "Cell ({i}, {j}): '{}' is part of the LCS, move diagonally",
                        a[i - 1]
                    ),
                    LcsMove::Up => format!("Cell ({i}, {j}): move up"),
                    LcsMove::Left => format!("Cell ({i}, {j}): move left"),
                }),
            );

            match direction {
                LcsMove::Diagonal => {
                    i -= 1;
                    j -= 1;
                }
                LcsMove::Up => i -= 1,
                LcsMove::Left => j -= 1,
            }
        }
        path.reverse();
        let lcs: String = lcs_chars.iter().rev().collect();

        trace.push(
            Step::new(LcsPayload::Complete {
                dp: dp.clone(),
                str1: input.str1.clone(),
                str2: input.str2.clone(),
                lcs: lcs.clone(),
                lcs_length: dp[m][n],
                path,
            })
            .at_line(29)
            .with_description(format!("LCS: \"{lcs}\" with length {}", dp[m][n])),
        );
        trace.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminal(trace: &Trace<LcsPayload>) -> (String, usize) {
        match &trace.last().unwrap().payload {
            LcsPayload::Complete {
                lcs, lcs_length, ..
            } => (lcs.clone(), *lcs_length),
            other => panic!("expected complete, got {}", other.kind()),
        }
    }

    #[test]
    fn test_canonical_strings_share_adh() {
        let runner = LcsRunner;
        let trace = runner.generate(&runner.initial_input());
        assert!(trace.is_well_formed());
        assert_eq!(terminal(&trace), ("ADH".to_string(), 3));
    }

    #[test]
    fn test_every_cell_compared() {
        let runner = LcsRunner;
        let trace = runner.generate(&runner.initial_input());
        assert_eq!(trace.kinds().filter(|k| *k == "compare").count(), 36);
        let resolved = trace
            .kinds()
            .filter(|k| *k == "match" || *k == "no-match")
            .count();
        assert_eq!(resolved, 36);
    }

    #[test]
    fn test_reconstruction_moves_are_recorded() {
        let runner = LcsRunner;
        let trace = runner.generate(&runner.initial_input());
        assert!(trace.kinds().filter(|k| *k == "trace-back").count() >= 3);
        // The path in the terminal step matches the recorded walk.
        match &trace.last().unwrap().payload {
            LcsPayload::Complete { path, .. } => {
                assert_eq!(path.iter().filter(|c| c.matched).count(), 3);
            }
            other => panic!("expected complete, got {}", other.kind()),
        }
    }

    #[test]
    fn test_disjoint_strings_have_empty_lcs() {
        let trace = LcsRunner.generate(&LcsInput {
            str1: "ABC".to_string(),
            str2: "XYZ".to_string(),
        });
        assert_eq!(terminal(&trace), (String::new(), 0));
    }

    #[test]
    fn test_identical_strings_match_fully() {
        let trace = LcsRunner.generate(&LcsInput {
            str1: "RUST".to_string(),
            str2: "RUST".to_string(),
        });
        assert_eq!(terminal(&trace), ("RUST".to_string(), 4));
    }

    #[test]
    fn test_validation_bounds() {
        assert!(
            LcsRunner
                .validate(&LcsInput {
                    str1: String::new(),
                    str2: "A".to_string(),
                })
                .is_err()
        );
        assert!(
            LcsRunner
                .validate(&LcsInput {
                    str1: "ABCDEFGHIJK".to_string(),
                    str2: "A".to_string(),
                })
                .is_err()
        );
    }

    #[test]
    fn test_determinism() {
        let input = LcsRunner.initial_input();
        assert_eq!(LcsRunner.generate(&input), LcsRunner.generate(&input));
    }
}
