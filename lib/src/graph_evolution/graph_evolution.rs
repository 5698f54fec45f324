// lib/src/graph_evolution/graph_evolution.rs

use chrono::{DateTime, Duration, Utc};
use hashbrown::HashSet;
use log::debug;
use models::{EventRecord, GraphError, GraphResult, Identifier};

use crate::config::EngineConfig;
use crate::engine::{median_degree, ConnectionGraph, EdgeRemoval};
use crate::graph_evolution::time_window::{Admission, WindowLedger};

/// Result of feeding one event to the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessOutcome {
    pub admitted: bool,
    /// Ledger entries that fell out of the window.
    pub evicted: usize,
    /// Graph edges actually dropped by those evictions.
    pub edges_removed: usize,
    /// Median degree after the event.
    pub median: f64,
}

/// Maintains the median degree of the graph formed by the events inside a
/// trailing time window.
///
/// The ledger, the graph and the graph's rank index are only ever touched
/// through `process`, which runs one event to completion.
#[derive(Debug)]
pub struct RollingMedianEngine {
    ledger: WindowLedger,
    graph: ConnectionGraph,
}

impl RollingMedianEngine {
    pub fn new(window: Duration) -> Self {
        RollingMedianEngine {
            ledger: WindowLedger::new(window),
            graph: ConnectionGraph::new(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> GraphResult<Self> {
        Ok(Self::new(config.window()?))
    }

    /// Admits the event (or not), applies evictions, upserts the edge in both
    /// directions and reports the median.
    ///
    /// A rejected event leaves all state untouched; the reported median is
    /// the current one. A `GraphError::Consistency` is fatal: the engine state
    /// must be discarded.
    pub fn process(&mut self, event: EventRecord) -> GraphResult<ProcessOutcome> {
        let (admitted, evicted, edges_removed) = match self.ledger.admit(event) {
            Admission::Rejected { newest } => {
                debug!("rejected {}: more than {}s behind {}", event, self.ledger.window().num_seconds(), newest);
                (false, 0, 0)
            }
            Admission::Admitted { evicted } => {
                let edges_removed = self.evict(&evicted)?;
                self.upsert(event)?;
                debug!("admitted {}; evicted {} ({} edges dropped)", event, evicted.len(), edges_removed);
                (true, evicted.len(), edges_removed)
            }
        };

        Ok(ProcessOutcome {
            admitted,
            evicted,
            edges_removed,
            median: self.median()?,
        })
    }

    /// Median degree of the current graph.
    pub fn median(&self) -> GraphResult<f64> {
        median_degree(self.graph.rank_index()).ok_or(GraphError::EmptyGraph)
    }

    pub fn graph(&self) -> &ConnectionGraph {
        &self.graph
    }

    pub fn ledger(&self) -> &WindowLedger {
        &self.ledger
    }

    /// Checks graph symmetry, the rank index mirror and the window bound.
    pub fn check_invariants(&self) -> GraphResult<()> {
        self.graph.check_invariants()?;
        self.ledger.check_window_bound()
    }

    // A self-loop is a single neighbor entry, so it is applied once.
    fn upsert(&mut self, event: EventRecord) -> GraphResult<()> {
        self.graph.upsert_edge(event.actor(), event.target(), event.time())?;
        if !event.is_self_loop() {
            let mirror = event.reversed();
            self.graph.upsert_edge(mirror.actor(), mirror.target(), mirror.time())?;
        }
        Ok(())
    }

    // Evicted entries arrive oldest first. Copies of one undirected edge at
    // one instant (duplicates, or a reply in the opposite direction) are all
    // evicted in the same batch; only the first may touch the graph, since
    // it can remove the nodes the later copies would name.
    fn evict(&mut self, evicted: &[EventRecord]) -> GraphResult<usize> {
        let mut handled: HashSet<(DateTime<Utc>, Identifier, Identifier)> = HashSet::new();
        let mut removed = 0;
        for old in evicted {
            let (lo, hi) = if old.actor() <= old.target() {
                (old.actor(), old.target())
            } else {
                (old.target(), old.actor())
            };
            if !handled.insert((old.time(), lo, hi)) {
                continue;
            }
            let forward = self
                .graph
                .remove_edge_if_timestamp_matches(old.actor(), old.target(), old.time())?;
            if !old.is_self_loop() {
                let mirror = old.reversed();
                self.graph
                    .remove_edge_if_timestamp_matches(mirror.actor(), mirror.target(), mirror.time())?;
            }
            if matches!(forward, EdgeRemoval::Removed | EdgeRemoval::NodeRemoved) {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
