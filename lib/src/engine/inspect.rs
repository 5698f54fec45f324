// lib/src/engine/inspect.rs

use chrono::{DateTime, Utc};
use hashbrown::HashSet;
use serde::Serialize;
use models::{GraphError, GraphResult, Identifier};

use crate::engine::graph::ConnectionGraph;

/// A node and its neighbors, sorted by identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSnapshot {
    pub id: Identifier,
    pub neighbors: Vec<(Identifier, DateTime<Utc>)>,
}

impl NodeSnapshot {
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }
}

impl ConnectionGraph {
    /// Every live node ordered by identity.
    pub fn snapshot(&self) -> Vec<NodeSnapshot> {
        let mut nodes: Vec<NodeSnapshot> = self
            .live_nodes()
            .map(|node| {
                let mut neighbors: Vec<(Identifier, DateTime<Utc>)> =
                    node.neighbors.iter().map(|(id, t)| (*id, *t)).collect();
                neighbors.sort();
                NodeSnapshot { id: node.id, neighbors }
            })
            .collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        nodes
    }

    /// `(degree, identity)` pairs in rank order, as the index holds them.
    pub fn ranked_degrees(&self) -> Vec<(usize, Identifier)> {
        self.rank
            .entries()
            .into_iter()
            .filter_map(|entry| {
                self.nodes
                    .get(entry.handle)
                    .and_then(Option::as_ref)
                    .map(|node| (entry.degree, node.id))
            })
            .collect()
    }

    /// Verifies symmetry, the absence of empty nodes, and that the rank index
    /// mirrors the node set one entry per node with the right degree.
    pub fn check_invariants(&self) -> GraphResult<()> {
        for node in self.live_nodes() {
            if node.neighbors.is_empty() {
                return Err(violation(format!("node {} has no neighbors", node.id)));
            }
            for (neighbor, t) in &node.neighbors {
                match self.edge_time(neighbor, &node.id) {
                    Some(back) if back == *t => {}
                    Some(back) => {
                        return Err(violation(format!(
                            "edge {} -> {} at {} but reverse at {}",
                            node.id, neighbor, t, back
                        )));
                    }
                    None => {
                        return Err(violation(format!(
                            "edge {} -> {} has no reverse",
                            node.id, neighbor
                        )));
                    }
                }
            }
        }

        let entries = self.rank.entries();
        if entries.len() != self.node_count() {
            return Err(violation(format!(
                "rank index holds {} entries for {} nodes",
                entries.len(),
                self.node_count()
            )));
        }
        let mut seen = HashSet::new();
        for entry in entries {
            if !seen.insert(entry.handle) {
                return Err(violation(format!("handle {} indexed twice", entry.handle)));
            }
            let Some(node) = self.nodes.get(entry.handle).and_then(Option::as_ref) else {
                return Err(violation(format!("handle {} indexed but not live", entry.handle)));
            };
            if self.by_id.get(&node.id) != Some(&entry.handle) {
                return Err(violation(format!("node {} not reachable by identity", node.id)));
            }
            if node.degree() != entry.degree {
                return Err(violation(format!(
                    "node {} indexed at degree {} but has {} neighbors",
                    node.id,
                    entry.degree,
                    node.degree()
                )));
            }
        }
        Ok(())
    }
}

fn violation(reason: String) -> GraphError {
    GraphError::InvariantViolation(reason)
}
