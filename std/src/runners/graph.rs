//! Graph traversal runners: BFS over a FIFO queue and DFS by explicit
//! recursion, both on an undirected adjacency built from an edge list.
//!
//! Neighbor order is edge-insertion order, so traces are deterministic.
//! Visited sets are snapshotted in visit order.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use zoetrope_core::{Runner, Step, StepPayload, Trace, TraceBuilder, Validation, ensure};

/// An undirected graph and a traversal start node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphInput {
    pub nodes: Vec<u32>,
    pub edges: Vec<(u32, u32)>,
    pub start: u32,
}

impl GraphInput {
    fn default_graph() -> Self {
        Self {
            nodes: vec![0, 1, 2, 3, 4, 5],
            edges: vec![(0, 1), (0, 2), (1, 3), (1, 4), (2, 4), (3, 5), (4, 5)],
            start: 0,
        }
    }
}

/// Adjacency lists in node order, neighbors in edge order.
fn adjacency(input: &GraphInput) -> Vec<(u32, Vec<u32>)> {
    let mut adj: Vec<(u32, Vec<u32>)> = input.nodes.iter().map(|&n| (n, Vec::new())).collect();
    let index: ahash::AHashMap<u32, usize> = input
        .nodes
        .iter()
        .enumerate()
        .map(|(i, &n)| (n, i))
        .collect();
    for &(a, b) in &input.edges {
        if let (Some(&ia), Some(&ib)) = (index.get(&a), index.get(&b)) {
            adj[ia].1.push(b);
            adj[ib].1.push(a);
        }
    }
    adj
}

fn validate_graph(input: &GraphInput) -> Validation {
    ensure(!input.nodes.is_empty(), "Please provide at least one node")?;
    ensure(
        input.nodes.contains(&input.start),
        "Start node must be in the nodes list",
    )
}

/// Step vocabulary of breadth-first traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BfsPayload {
    Init {
        nodes: Vec<u32>,
        edges: Vec<(u32, u32)>,
        adjacency: Vec<(u32, Vec<u32>)>,
        start: u32,
    },
    Enqueue {
        node: u32,
        parent: Option<u32>,
        queue: Vec<u32>,
        visited: Vec<u32>,
        nodes: Vec<u32>,
        edges: Vec<(u32, u32)>,
    },
    Dequeue {
        node: u32,
        queue: Vec<u32>,
        visited: Vec<u32>,
        nodes: Vec<u32>,
        edges: Vec<(u32, u32)>,
    },
    Visit {
        node: u32,
        queue: Vec<u32>,
        visited: Vec<u32>,
        nodes: Vec<u32>,
        edges: Vec<(u32, u32)>,
    },
    CheckNeighbor {
        node: u32,
        neighbor: u32,
        queue: Vec<u32>,
        visited: Vec<u32>,
        nodes: Vec<u32>,
        edges: Vec<(u32, u32)>,
    },
    AlreadyVisited {
        neighbor: u32,
        queue: Vec<u32>,
        visited: Vec<u32>,
        nodes: Vec<u32>,
        edges: Vec<(u32, u32)>,
    },
    Complete {
        visited: Vec<u32>,
        nodes: Vec<u32>,
        edges: Vec<(u32, u32)>,
    },
}

impl StepPayload for BfsPayload {
    fn kind(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::Enqueue { .. } => "enqueue",
            Self::Dequeue { .. } => "dequeue",
            Self::Visit { .. } => "visit",
            Self::CheckNeighbor { .. } => "check-neighbor",
            Self::AlreadyVisited { .. } => "already-visited",
            Self::Complete { .. } => "complete",
        }
    }
}

/// Breadth-first traversal from the start node.
#[derive(Debug, Clone, Copy, Default)]
pub struct BfsRunner;

impl Runner for BfsRunner {
    type Input = GraphInput;
    type Payload = BfsPayload;

    fn initial_input(&self) -> GraphInput {
        GraphInput::default_graph()
    }

    fn validate(&self, input: &GraphInput) -> Validation {
        validate_graph(input)
    }

    fn generate(&self, input: &GraphInput) -> Trace<BfsPayload> {
        let mut trace = TraceBuilder::new();
        let nodes = input.nodes.clone();
        let edges = input.edges.clone();
        if nodes.is_empty() || !nodes.contains(&input.start) {
            trace.push(
                Step::new(BfsPayload::Complete {
                    visited: Vec::new(),
                    nodes,
                    edges,
                })
                .with_description("Nothing to traverse"),
            );
            return trace.finish();
        }

        let adj = adjacency(input);
        let neighbors_of = |node: u32| -> Vec<u32> {
            adj.iter()
                .find(|(n, _)| *n == node)
                .map(|(_, ns)| ns.clone())
                .unwrap_or_default()
        };

        trace.push(
            Step::new(BfsPayload::Init {
                nodes: nodes.clone(),
                edges: edges.clone(),
                adjacency: adj.clone(),
                start: input.start,
            })
            .at_line(0)
            .with_description(format!("Starting BFS from node {}", input.start)),
        );

        let mut seen: AHashSet<u32> = AHashSet::new();
        let mut visited: Vec<u32> = Vec::new();
        let mut queue: VecDeque<u32> = VecDeque::new();

        seen.insert(input.start);
        visited.push(input.start);
        queue.push_back(input.start);

        trace.push(
            Step::new(BfsPayload::Enqueue {
                node: input.start,
                parent: None,
                queue: queue.iter().copied().collect(),
                visited: visited.clone(),
                nodes: nodes.clone(),
                edges: edges.clone(),
            })
            .at_line(5)
            .with_description(format!(
                "Add start node {} to queue and mark visited",
                input.start
            )),
        );

        while let Some(node) = queue.pop_front() {
            trace.push(
                Step::new(BfsPayload::Dequeue {
                    node,
                    queue: queue.iter().copied().collect(),
                    visited: visited.clone(),
                    nodes: nodes.clone(),
                    edges: edges.clone(),
                })
                .at_line(8)
                .with_description(format!("Dequeue node {node} and process it")),
            );
            trace.push(
                Step::new(BfsPayload::Visit {
                    node,
                    queue: queue.iter().copied().collect(),
                    visited: visited.clone(),
                    nodes: nodes.clone(),
                    edges: edges.clone(),
                })
                .at_line(9)
                .with_description(format!("Visit node {node}")),
            );

            for neighbor in neighbors_of(node) {
                trace.push(
                    Step::new(BfsPayload::CheckNeighbor {
                        node,
                        neighbor,
                        queue: queue.iter().copied().collect(),
                        visited: visited.clone(),
                        nodes: nodes.clone(),
                        edges: edges.clone(),
                    })
                    .at_line(12)
                    .with_description(format!("Check neighbor {neighbor} of node {node}")),
                );

                if seen.insert(neighbor) {
                    visited.push(neighbor);
                    queue.push_back(neighbor);
                    trace.push(
                        Step::new(BfsPayload::Enqueue {
                            node: neighbor,
                            parent: Some(node),
                            queue: queue.iter().copied().collect(),
                            visited: visited.clone(),
                            nodes: nodes.clone(),
                            edges: edges.clone(),
                        })
                        .at_line(15)
                        .with_description(format!(
                            "Add neighbor {neighbor} to queue and mark visited"
                        )),
                    );
                } else {
                    trace.push(
                        Step::new(BfsPayload::AlreadyVisited {
                            neighbor,
                            queue: queue.iter().copied().collect(),
                            visited: visited.clone(),
                            nodes: nodes.clone(),
                            edges: edges.clone(),
                        })
                        .at_line(13)
                        .with_description(format!("Neighbor {neighbor} already visited, skip")),
                    );
                }
            }
        }

        let order = visited
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        trace.push(
            Step::new(BfsPayload::Complete {
                visited,
                nodes,
                edges,
            })
            .at_line(20)
            .with_description(format!("BFS complete! Visited nodes: {order}")),
        );
        trace.finish()
    }
}

/// Step vocabulary of depth-first traversal. `stack` snapshots the open
/// recursive calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DfsPayload {
    Init {
        nodes: Vec<u32>,
        edges: Vec<(u32, u32)>,
        adjacency: Vec<(u32, Vec<u32>)>,
        start: u32,
    },
    Visit {
        node: u32,
        stack: Vec<u32>,
        visited: Vec<u32>,
        nodes: Vec<u32>,
        edges: Vec<(u32, u32)>,
    },
    CheckNeighbor {
        node: u32,
        neighbor: u32,
        stack: Vec<u32>,
        visited: Vec<u32>,
        nodes: Vec<u32>,
        edges: Vec<(u32, u32)>,
    },
    Recurse {
        from: u32,
        to: u32,
        stack: Vec<u32>,
        visited: Vec<u32>,
        nodes: Vec<u32>,
        edges: Vec<(u32, u32)>,
    },
    AlreadyVisited {
        neighbor: u32,
        stack: Vec<u32>,
        visited: Vec<u32>,
        nodes: Vec<u32>,
        edges: Vec<(u32, u32)>,
    },
    Backtrack {
        node: u32,
        stack: Vec<u32>,
        visited: Vec<u32>,
        nodes: Vec<u32>,
        edges: Vec<(u32, u32)>,
    },
    Complete {
        visited: Vec<u32>,
        nodes: Vec<u32>,
        edges: Vec<(u32, u32)>,
    },
}

impl StepPayload for DfsPayload {
    fn kind(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::Visit { .. } => "visit",
            Self::CheckNeighbor { .. } => "check-neighbor",
            Self::Recurse { .. } => "recurse",
            Self::AlreadyVisited { .. } => "already-visited",
            Self::Backtrack { .. } => "backtrack",
            Self::Complete { .. } => "complete",
        }
    }
}

struct DfsState {
    adj: Vec<(u32, Vec<u32>)>,
    seen: AHashSet<u32>,
    visited: Vec<u32>,
    stack: Vec<u32>,
    nodes: Vec<u32>,
    edges: Vec<(u32, u32)>,
}

impl DfsState {
    fn neighbors_of(&self, node: u32) -> Vec<u32> {
        self.adj
            .iter()
            .find(|(n, _)| *n == node)
            .map(|(_, ns)| ns.clone())
            .unwrap_or_default()
    }

    fn walk(&mut self, trace: &mut TraceBuilder<DfsPayload>, node: u32) {
        self.seen.insert(node);
        self.visited.push(node);
        self.stack.push(node);

        trace.push(
            Step::new(DfsPayload::Visit {
                node,
                stack: self.stack.clone(),
                visited: self.visited.clone(),
                nodes: self.nodes.clone(),
                edges: self.edges.clone(),
            })
            .at_line(5)
            .with_description(format!("Visit node {node}")),
        );

        for neighbor in self.neighbors_of(node) {
            trace.push(
                Step::new(DfsPayload::CheckNeighbor {
                    node,
                    neighbor,
                    stack: self.stack.clone(),
                    visited: self.visited.clone(),
                    nodes: self.nodes.clone(),
                    edges: self.edges.clone(),
                })
                .at_line(9)
                .with_description(format!("Check neighbor {neighbor} of node {node}")),
            );

            if !self.seen.contains(&neighbor) {
                trace.push(
                    Step::new(DfsPayload::Recurse {
                        from: node,
                        to: neighbor,
                        stack: self.stack.clone(),
                        visited: self.visited.clone(),
                        nodes: self.nodes.clone(),
                        edges: self.edges.clone(),
                    })
                    .at_line(11)
                    .with_description(format!("Recurse into neighbor {neighbor}")),
                );
                self.walk(trace, neighbor);
            } else {
                trace.push(
                    Step::new(DfsPayload::AlreadyVisited {
                        neighbor,
                        stack: self.stack.clone(),
                        visited: self.visited.clone(),
                        nodes: self.nodes.clone(),
                        edges: self.edges.clone(),
                    })
                    .at_line(10)
                    .with_description(format!("Neighbor {neighbor} already visited, skip")),
                );
            }
        }

        self.stack.pop();
        trace.push(
            Step::new(DfsPayload::Backtrack {
                node,
                stack: self.stack.clone(),
                visited: self.visited.clone(),
                nodes: self.nodes.clone(),
                edges: self.edges.clone(),
            })
            .at_line(14)
            .with_description(format!("Backtrack from node {node}")),
        );
    }
}

/// Depth-first traversal by explicit recursion from the start node.
#[derive(Debug, Clone, Copy, Default)]
pub struct DfsRunner;

impl Runner for DfsRunner {
    type Input = GraphInput;
    type Payload = DfsPayload;

    fn initial_input(&self) -> GraphInput {
        GraphInput::default_graph()
    }

    fn validate(&self, input: &GraphInput) -> Validation {
        validate_graph(input)
    }

    fn generate(&self, input: &GraphInput) -> Trace<DfsPayload> {
        let mut trace = TraceBuilder::new();
        let nodes = input.nodes.clone();
        let edges = input.edges.clone();
        if nodes.is_empty() || !nodes.contains(&input.start) {
            trace.push(
                Step::new(DfsPayload::Complete {
                    visited: Vec::new(),
                    nodes,
                    edges,
                })
                .with_description("Nothing to traverse"),
            );
            return trace.finish();
        }

        let adj = adjacency(input);
        trace.push(
            Step::new(DfsPayload::Init {
                nodes: nodes.clone(),
                edges: edges.clone(),
                adjacency: adj.clone(),
                start: input.start,
            })
            .at_line(0)
            .with_description(format!("Starting DFS from node {}", input.start)),
        );

        let mut state = DfsState {
            adj,
            seen: AHashSet::new(),
            visited: Vec::new(),
            stack: Vec::new(),
            nodes: nodes.clone(),
            edges: edges.clone(),
        };
        state.walk(&mut trace, input.start);

        let order = state
            .visited
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        trace.push(
            Step::new(DfsPayload::Complete {
                visited: state.visited,
                nodes,
                edges,
            })
            .at_line(17)
            .with_description(format!("DFS complete! Visited nodes: {order}")),
        );
        trace.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bfs_visits_reachable_set_in_breadth_order() {
        let runner = BfsRunner;
        let trace = runner.generate(&runner.initial_input());
        assert!(trace.is_well_formed());

        match &trace.last().unwrap().payload {
            BfsPayload::Complete { visited, .. } => {
                assert_eq!(visited, &vec![0, 1, 2, 3, 4, 5]);
            }
            other => panic!("expected complete, got {}", other.kind()),
        }
    }

    #[test]
    fn test_bfs_skips_visited_neighbors() {
        let runner = BfsRunner;
        let trace = runner.generate(&runner.initial_input());
        assert!(trace.kinds().any(|k| k == "already-visited"));
        // Every enqueue pairs with exactly one later dequeue.
        let enqueues = trace.kinds().filter(|k| *k == "enqueue").count();
        let dequeues = trace.kinds().filter(|k| *k == "dequeue").count();
        assert_eq!(enqueues, dequeues);
    }

    #[test]
    fn test_bfs_ignores_unreachable_component() {
        let trace = BfsRunner.generate(&GraphInput {
            nodes: vec![0, 1, 2, 3],
            edges: vec![(0, 1), (2, 3)],
            start: 0,
        });
        match &trace.last().unwrap().payload {
            BfsPayload::Complete { visited, .. } => assert_eq!(visited, &vec![0, 1]),
            other => panic!("expected complete, got {}", other.kind()),
        }
    }

    #[test]
    fn test_dfs_goes_deep_and_backtracks() {
        let runner = DfsRunner;
        let trace = runner.generate(&runner.initial_input());
        assert!(trace.is_well_formed());

        // Depth-first on the default graph: 0 -> 1 -> 3 -> 5 -> 4 -> 2.
        match &trace.last().unwrap().payload {
            DfsPayload::Complete { visited, .. } => {
                assert_eq!(visited, &vec![0, 1, 3, 5, 4, 2]);
            }
            other => panic!("expected complete, got {}", other.kind()),
        }
        // One backtrack per visited node.
        assert_eq!(trace.kinds().filter(|k| *k == "backtrack").count(), 6);
    }

    #[test]
    fn test_dfs_stack_snapshots_open_calls() {
        let runner = DfsRunner;
        let trace = runner.generate(&runner.initial_input());
        let deepest = trace
            .iter()
            .filter_map(|s| match &s.payload {
                DfsPayload::Visit { stack, .. } => Some(stack.clone()),
                _ => None,
            })
            .max_by_key(Vec::len)
            .unwrap();
        assert_eq!(deepest, vec![0, 1, 3, 5, 4, 2]);
    }

    #[test]
    fn test_validation_rejects_foreign_start() {
        let err = BfsRunner
            .validate(&GraphInput {
                nodes: vec![0, 1],
                edges: vec![(0, 1)],
                start: 7,
            })
            .unwrap_err();
        assert_eq!(err.message, "Start node must be in the nodes list");
    }

    #[test]
    fn test_determinism() {
        let input = BfsRunner.initial_input();
        assert_eq!(BfsRunner.generate(&input), BfsRunner.generate(&input));
        assert_eq!(DfsRunner.generate(&input), DfsRunner.generate(&input));
    }
}
