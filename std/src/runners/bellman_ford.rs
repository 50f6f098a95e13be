//! Bellman-Ford single-source shortest paths: |V| - 1 relaxation rounds
//! recording every edge check, early exit when a round changes nothing, and
//! one extra pass afterwards to detect a negative cycle.
//!
//! Distances are `Option<i64>`: `None` is "not yet reachable".

use serde::{Deserialize, Serialize};
use zoetrope_core::{Runner, Step, StepPayload, Trace, TraceBuilder, Validation, ensure};

/// One directed, weighted edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedEdge {
    pub u: usize,
    pub v: usize,
    pub weight: i64,
}

/// A directed weighted graph and the source vertex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BellmanFordInput {
    pub vertices: usize,
    pub edges: Vec<WeightedEdge>,
    pub source: usize,
}

/// Step vocabulary of the Bellman-Ford runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BellmanFordPayload {
    Init {
        dist: Vec<Option<i64>>,
        vertices: usize,
        edges: Vec<WeightedEdge>,
        source: usize,
    },
    IterationStart {
        dist: Vec<Option<i64>>,
        iteration: usize,
        vertices: usize,
        edges: Vec<WeightedEdge>,
    },
    CheckEdge {
        dist: Vec<Option<i64>>,
        u: usize,
        v: usize,
        weight: i64,
        edge_index: usize,
        can_relax: bool,
        vertices: usize,
        edges: Vec<WeightedEdge>,
    },
    Relax {
        dist: Vec<Option<i64>>,
        u: usize,
        v: usize,
        weight: i64,
        old_dist: Option<i64>,
        new_dist: i64,
        edge_index: usize,
        vertices: usize,
        edges: Vec<WeightedEdge>,
    },
    EarlyExit {
        dist: Vec<Option<i64>>,
        iteration: usize,
        vertices: usize,
        edges: Vec<WeightedEdge>,
    },
    NegativeCycle {
        dist: Vec<Option<i64>>,
        u: usize,
        v: usize,
        weight: i64,
        vertices: usize,
        edges: Vec<WeightedEdge>,
    },
    Complete {
        dist: Vec<Option<i64>>,
        vertices: usize,
        edges: Vec<WeightedEdge>,
        source: usize,
        has_negative_cycle: bool,
    },
}

impl StepPayload for BellmanFordPayload {
    fn kind(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::IterationStart { .. } => "iteration-start",
            Self::CheckEdge { .. } => "check-edge",
            Self::Relax { .. } => "relax",
            Self::EarlyExit { .. } => "early-exit",
            Self::NegativeCycle { .. } => "negative-cycle",
            Self::Complete { .. } => "complete",
        }
    }
}

fn fmt_dist(d: Option<i64>) -> String {
    d.map_or_else(|| "inf".to_string(), |v| v.to_string())
}

/// Bellman-Ford runner with early exit and negative-cycle detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct BellmanFordRunner;

impl BellmanFordRunner {
    fn relaxed(dist: &[Option<i64>], edge: &WeightedEdge) -> Option<i64> {
        let through = dist[edge.u]? + edge.weight;
        match dist[edge.v] {
            Some(current) if through >= current => None,
            _ => Some(through),
        }
    }
}

impl Runner for BellmanFordRunner {
    type Input = BellmanFordInput;
    type Payload = BellmanFordPayload;

    fn initial_input(&self) -> BellmanFordInput {
        BellmanFordInput {
            vertices: 5,
            edges: vec![
                WeightedEdge { u: 0, v: 1, weight: -1 },
                WeightedEdge { u: 0, v: 2, weight: 4 },
                WeightedEdge { u: 1, v: 2, weight: 3 },
                WeightedEdge { u: 1, v: 3, weight: 2 },
                WeightedEdge { u: 1, v: 4, weight: 2 },
                WeightedEdge { u: 3, v: 2, weight: 5 },
                WeightedEdge { u: 3, v: 1, weight: 1 },
                WeightedEdge { u: 4, v: 3, weight: -3 },
            ],
            source: 0,
        }
    }

    fn validate(&self, input: &BellmanFordInput) -> Validation {
        ensure(
            (2..=8).contains(&input.vertices),
            "Number of vertices must be between 2 and 8",
        )?;
        ensure(
            input.source < input.vertices,
            "Source must be a valid vertex",
        )?;
        ensure(!input.edges.is_empty(), "Graph must have at least one edge")?;
        ensure(
            input
                .edges
                .iter()
                .all(|e| e.u < input.vertices && e.v < input.vertices),
            "Edge endpoints must be valid vertices",
        )
    }

    fn generate(&self, input: &BellmanFordInput) -> Trace<BellmanFordPayload> {
        let mut trace = TraceBuilder::new();
        let vertices = input.vertices;
        // Edges referencing unknown vertices are dropped rather than
        // crashing the pass; `validate` rejects them up front.
        let edges: Vec<WeightedEdge> = input
            .edges
            .iter()
            .copied()
            .filter(|e| e.u < vertices && e.v < vertices)
            .collect();

        if vertices == 0 || input.source >= vertices {
            trace.push(
                Step::new(BellmanFordPayload::Complete {
                    dist: Vec::new(),
                    vertices,
                    edges,
                    source: input.source,
                    has_negative_cycle: false,
                })
                .with_description("Nothing to relax"),
            );
            return trace.finish();
        }

        let mut dist: Vec<Option<i64>> = vec![None; vertices];
        dist[input.source] = Some(0);

        trace.push(
            Step::new(BellmanFordPayload::Init {
                dist: dist.clone(),
                vertices,
                edges: edges.clone(),
                source: input.source,
            })
            .at_line(0)
            .with_description(format!(
                "Initialize distances. Source node {} = 0, all others = inf",
                input.source
            )),
        );

        for iteration in 1..vertices {
            let mut updated = false;

            trace.push(
                Step::new(BellmanFordPayload::IterationStart {
                    dist: dist.clone(),
                    iteration,
                    vertices,
                    edges: edges.clone(),
                })
                .at_line(5)
                .with_description(format!(
                    "Iteration {iteration} of {}: Relax all edges",
                    vertices - 1
                )),
            );

            for (edge_index, edge) in edges.iter().enumerate() {
                let improved = Self::relaxed(&dist, edge);
                trace.push(
                    Step::new(BellmanFordPayload::CheckEdge {
                        dist: dist.clone(),
                        u: edge.u,
                        v: edge.v,
                        weight: edge.weight,
                        edge_index,
                        can_relax: improved.is_some(),
                        vertices,
                        edges: edges.clone(),
                    })
                    .at_line(7)
                    .with_description(format!(
                        "Check edge ({}->{}, w={}): dist[{}]={}, dist[{}]={}",
                        edge.u,
                        edge.v,
                        edge.weight,
                        edge.u,
                        fmt_dist(dist[edge.u]),
                        edge.v,
                        fmt_dist(dist[edge.v])
                    )),
                );

                if let Some(new_dist) = improved {
                    let old_dist = dist[edge.v];
                    dist[edge.v] = Some(new_dist);
                    updated = true;

                    trace.push(
                        Step::new(BellmanFordPayload::Relax {
                            dist: dist.clone(),
                            u: edge.u,
                            v: edge.v,
                            weight: edge.weight,
                            old_dist,
                            new_dist,
                            edge_index,
                            vertices,
                            edges: edges.clone(),
                        })
                        .at_line(9)
                        .with_description(format!(
                            "Relax! dist[{}] = {} -> {new_dist}",
                            edge.v,
                            fmt_dist(old_dist)
                        )),
                    );
                }
            }

            if !updated {
                trace.push(
                    Step::new(BellmanFordPayload::EarlyExit {
                        dist: dist.clone(),
                        iteration,
                        vertices,
                        edges: edges.clone(),
                    })
                    .at_line(12)
                    .with_description(format!(
                        "No updates in iteration {iteration}. Converged early!"
                    )),
                );
                break;
            }
        }

        // One extra pass: any edge that still relaxes sits on a negative
        // cycle.
        let mut has_negative_cycle = false;
        for edge in &edges {
            if Self::relaxed(&dist, edge).is_some() {
                has_negative_cycle = true;
                trace.push(
                    Step::new(BellmanFordPayload::NegativeCycle {
                        dist: dist.clone(),
                        u: edge.u,
                        v: edge.v,
                        weight: edge.weight,
                        vertices,
                        edges: edges.clone(),
                    })
                    .at_line(17)
                    .with_description(format!(
                        "Negative cycle detected! Edge ({}->{}) can still be relaxed.",
                        edge.u, edge.v
                    )),
                );
                break;
            }
        }

        let summary = if has_negative_cycle {
            "Negative cycle detected! Shortest paths undefined.".to_string()
        } else {
            format!(
                "Shortest distances from node {}: [{}]",
                input.source,
                dist.iter()
                    .map(|&d| fmt_dist(d))
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        };
        trace.push(
            Step::new(BellmanFordPayload::Complete {
                dist,
                vertices,
                edges,
                source: input.source,
                has_negative_cycle,
            })
            .at_line(22)
            .with_description(summary),
        );
        trace.finish()
    }
}
