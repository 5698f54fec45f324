// lib/src/engine/graph.rs

use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use log::trace;
use models::{GraphError, GraphResult, Identifier};

use crate::engine::rank_index::{DegreeRankIndex, NodeHandle, RankEntry};

/// A live participant and the neighbors it is currently connected to, each
/// tagged with the time of the freshest event that linked them.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) id: Identifier,
    pub(crate) neighbors: HashMap<Identifier, DateTime<Utc>>,
}

impl Node {
    pub(crate) fn degree(&self) -> usize {
        self.neighbors.len()
    }
}

/// What an upsert did to the actor's side of the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeUpsert {
    NodeCreated,
    NeighborAdded,
    Refreshed,
    Unchanged,
}

/// What a timestamp-matched removal did to the actor's side of the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRemoval {
    Removed,
    NodeRemoved,
    /// The edge was refreshed by a later event and stays.
    Superseded,
    /// The actor has no such neighbor any more.
    Absent,
}

/// Undirected adjacency over interned identities.
///
/// Nodes live in an arena and are addressed by `NodeHandle` from both the
/// identity map and the degree rank index. Every degree change goes through
/// this type, which keeps the rank index an exact mirror of the node set.
/// Symmetry is the caller's job: each edge is applied once per direction.
#[derive(Debug, Default)]
pub struct ConnectionGraph {
    pub(crate) nodes: Vec<Option<Node>>,
    free: Vec<NodeHandle>,
    pub(crate) by_id: HashMap<Identifier, NodeHandle>,
    pub(crate) rank: DegreeRankIndex,
}

impl ConnectionGraph {
    pub fn new() -> Self {
        ConnectionGraph {
            nodes: Vec::new(),
            free: Vec::new(),
            by_id: HashMap::new(),
            rank: DegreeRankIndex::new(),
        }
    }

    /// Adds `b` as a neighbor of `a` at time `t`, creating `a` if needed. An
    /// existing neighbor only moves forward in time; a stale or equal `t`
    /// leaves the graph untouched.
    pub fn upsert_edge(&mut self, a: Identifier, b: Identifier, t: DateTime<Utc>) -> GraphResult<EdgeUpsert> {
        let Some(&handle) = self.by_id.get(&a) else {
            let mut neighbors = HashMap::new();
            neighbors.insert(b, t);
            let handle = self.alloc(Node { id: a, neighbors });
            self.by_id.insert(a, handle);
            self.rank.insert(RankEntry::new(1, handle));
            trace!("created node {} with neighbor {}", a, b);
            return Ok(EdgeUpsert::NodeCreated);
        };

        let old_degree = {
            let node = self.node_mut(handle, a, b)?;
            if let Some(seen) = node.neighbors.get_mut(&b) {
                if *seen >= t {
                    return Ok(EdgeUpsert::Unchanged);
                }
                *seen = t;
                return Ok(EdgeUpsert::Refreshed);
            }
            node.neighbors.insert(b, t);
            node.degree() - 1
        };

        if !self.rank.reposition(handle, old_degree, old_degree + 1) {
            return Err(index_out_of_sync(a, b, old_degree));
        }
        Ok(EdgeUpsert::NeighborAdded)
    }

    /// Drops `b` from `a`'s neighbors, but only if the stored timestamp is
    /// exactly `t`. A missing actor means the ledger and the graph have
    /// diverged and is reported as `GraphError::Consistency`.
    pub fn remove_edge_if_timestamp_matches(
        &mut self,
        a: Identifier,
        b: Identifier,
        t: DateTime<Utc>,
    ) -> GraphResult<EdgeRemoval> {
        let Some(&handle) = self.by_id.get(&a) else {
            return Err(GraphError::Consistency {
                actor: a,
                target: b,
                reason: "evicted event references an actor missing from the graph".to_string(),
            });
        };

        let (old_degree, now_empty) = {
            let node = self.node_mut(handle, a, b)?;
            match node.neighbors.get(&b) {
                None => return Ok(EdgeRemoval::Absent),
                Some(seen) if *seen != t => return Ok(EdgeRemoval::Superseded),
                Some(_) => {}
            }
            node.neighbors.remove(&b);
            (node.degree() + 1, node.neighbors.is_empty())
        };

        if now_empty {
            if !self.rank.remove(RankEntry::new(old_degree, handle)) {
                return Err(index_out_of_sync(a, b, old_degree));
            }
            self.release(handle, a);
            trace!("removed node {} after losing its last neighbor {}", a, b);
            return Ok(EdgeRemoval::NodeRemoved);
        }

        if !self.rank.reposition(handle, old_degree, old_degree - 1) {
            return Err(index_out_of_sync(a, b, old_degree));
        }
        Ok(EdgeRemoval::Removed)
    }

    pub fn contains(&self, id: &Identifier) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn degree(&self, id: &Identifier) -> Option<usize> {
        self.node(id).map(Node::degree)
    }

    /// The timestamp currently keeping the `a` -> `b` side of an edge alive.
    pub fn edge_time(&self, a: &Identifier, b: &Identifier) -> Option<DateTime<Utc>> {
        self.node(a).and_then(|node| node.neighbors.get(b).copied())
    }

    pub fn node_count(&self) -> usize {
        self.by_id.len()
    }

    /// Number of undirected edges. A self-loop adds one to its node's degree
    /// and counts as one edge.
    pub fn edge_count(&self) -> usize {
        let (degrees, loops) = self.live_nodes().fold((0, 0), |(degrees, loops), node| {
            (degrees + node.degree(), loops + usize::from(node.neighbors.contains_key(&node.id)))
        });
        (degrees + loops) / 2
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn rank_index(&self) -> &DegreeRankIndex {
        &self.rank
    }

    /// Current degree of every live node, in no particular order.
    pub fn degrees(&self) -> impl Iterator<Item = usize> + '_ {
        self.live_nodes().map(Node::degree)
    }

    pub(crate) fn live_nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().flatten()
    }

    pub(crate) fn node(&self, id: &Identifier) -> Option<&Node> {
        let handle = *self.by_id.get(id)?;
        self.nodes.get(handle).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, handle: NodeHandle, a: Identifier, b: Identifier) -> GraphResult<&mut Node> {
        self.nodes
            .get_mut(handle)
            .and_then(Option::as_mut)
            .ok_or_else(|| GraphError::Consistency {
                actor: a,
                target: b,
                reason: format!("identity map points at empty slot {}", handle),
            })
    }

    fn alloc(&mut self, node: Node) -> NodeHandle {
        match self.free.pop() {
            Some(handle) => {
                self.nodes[handle] = Some(node);
                handle
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, handle: NodeHandle, id: Identifier) {
        self.nodes[handle] = None;
        self.by_id.remove(&id);
        self.free.push(handle);
    }
}

fn index_out_of_sync(a: Identifier, b: Identifier, degree: usize) -> GraphError {
    GraphError::Consistency {
        actor: a,
        target: b,
        reason: format!("rank index has no entry for {} at degree {}", a, degree),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn id(name: &str) -> Identifier {
        Identifier::new(name).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 4, 7, 3, 33, 19).unwrap() + chrono::Duration::seconds(secs)
    }

    fn connect(graph: &mut ConnectionGraph, a: &str, b: &str, t: DateTime<Utc>) {
        graph.upsert_edge(id(a), id(b), t).unwrap();
        graph.upsert_edge(id(b), id(a), t).unwrap();
    }

    #[test]
    fn should_create_nodes_lazily_and_index_them() {
        let mut graph = ConnectionGraph::new();
        assert_eq!(graph.upsert_edge(id("a"), id("b"), at(0)).unwrap(), EdgeUpsert::NodeCreated);
        assert_eq!(graph.upsert_edge(id("b"), id("a"), at(0)).unwrap(), EdgeUpsert::NodeCreated);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.rank_index().len(), 2);
        assert_eq!(graph.degree(&id("a")), Some(1));
    }

    #[test]
    fn should_reposition_node_when_neighbor_added() {
        let mut graph = ConnectionGraph::new();
        connect(&mut graph, "a", "b", at(0));
        assert_eq!(graph.upsert_edge(id("b"), id("c"), at(1)).unwrap(), EdgeUpsert::NeighborAdded);
        graph.upsert_edge(id("c"), id("b"), at(1)).unwrap();
        assert_eq!(graph.degree(&id("b")), Some(2));
        let degrees: Vec<usize> = graph.rank_index().entries().iter().map(|e| e.degree).collect();
        assert_eq!(degrees, vec![1, 1, 2]);
    }

    #[test]
    fn should_ignore_stale_or_equal_upserts() {
        let mut graph = ConnectionGraph::new();
        connect(&mut graph, "a", "b", at(10));
        let before = graph.rank_index().entries();
        assert_eq!(graph.upsert_edge(id("a"), id("b"), at(10)).unwrap(), EdgeUpsert::Unchanged);
        assert_eq!(graph.upsert_edge(id("a"), id("b"), at(3)).unwrap(), EdgeUpsert::Unchanged);
        assert_eq!(graph.edge_time(&id("a"), &id("b")), Some(at(10)));
        assert_eq!(graph.rank_index().entries(), before);
    }

    #[test]
    fn should_refresh_edge_to_newer_timestamp() {
        let mut graph = ConnectionGraph::new();
        connect(&mut graph, "a", "b", at(0));
        assert_eq!(graph.upsert_edge(id("a"), id("b"), at(30)).unwrap(), EdgeUpsert::Refreshed);
        assert_eq!(graph.edge_time(&id("a"), &id("b")), Some(at(30)));
        assert_eq!(graph.degree(&id("a")), Some(1));
    }

    #[test]
    fn should_remove_edge_only_on_exact_timestamp() {
        let mut graph = ConnectionGraph::new();
        connect(&mut graph, "a", "b", at(0));
        connect(&mut graph, "a", "b", at(20));
        assert_eq!(
            graph.remove_edge_if_timestamp_matches(id("a"), id("b"), at(0)).unwrap(),
            EdgeRemoval::Superseded
        );
        assert_eq!(graph.degree(&id("a")), Some(1));
        assert_eq!(
            graph.remove_edge_if_timestamp_matches(id("a"), id("b"), at(20)).unwrap(),
            EdgeRemoval::NodeRemoved
        );
        assert!(!graph.contains(&id("a")));
        assert_eq!(graph.rank_index().len(), 1);
    }

    #[test]
    fn should_lower_degree_when_one_of_many_edges_removed() {
        let mut graph = ConnectionGraph::new();
        connect(&mut graph, "a", "b", at(0));
        connect(&mut graph, "a", "c", at(1));
        assert_eq!(
            graph.remove_edge_if_timestamp_matches(id("a"), id("b"), at(0)).unwrap(),
            EdgeRemoval::Removed
        );
        assert_eq!(graph.degree(&id("a")), Some(1));
        assert_eq!(
            graph.remove_edge_if_timestamp_matches(id("a"), id("b"), at(0)).unwrap(),
            EdgeRemoval::Absent
        );
    }

    #[test]
    fn should_fail_removal_for_unknown_actor() {
        let mut graph = ConnectionGraph::new();
        let err = graph
            .remove_edge_if_timestamp_matches(id("ghost"), id("b"), at(0))
            .unwrap_err();
        assert!(matches!(err, GraphError::Consistency { .. }));
    }

    #[test]
    fn should_reuse_node_slots_after_removal() {
        let mut graph = ConnectionGraph::new();
        connect(&mut graph, "a", "b", at(0));
        graph.remove_edge_if_timestamp_matches(id("a"), id("b"), at(0)).unwrap();
        graph.remove_edge_if_timestamp_matches(id("b"), id("a"), at(0)).unwrap();
        assert!(graph.is_empty());
        assert!(graph.rank_index().is_empty());
        connect(&mut graph, "c", "d", at(5));
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.node_count(), 2);
    }
}
