// lib/src/lib.rs

//! Rolling median degree of a windowed relationship graph.
//!
//! Events flow through `ingest` (validation), into a `RollingMedianEngine`
//! (`graph_evolution`), which keeps a `WindowLedger`, a `ConnectionGraph`
//! and its `DegreeRankIndex` in step and answers the median in O(log n).

pub mod config;
pub mod engine;
pub mod graph_evolution;
pub mod ingest;
pub mod orchestrator;

pub use models::{EventRecord, GraphError, GraphResult, Identifier, ValidationError, ValidationResult};

// Explicit re-exports
pub use crate::config::EngineConfig;
pub use crate::engine::{format_median, median_degree, reference_median, ConnectionGraph, DegreeRankIndex};
pub use crate::graph_evolution::{Admission, ProcessOutcome, RollingMedianEngine, WindowLedger};
pub use crate::ingest::parse_record;
pub use crate::orchestrator::{StreamProcessor, StreamStats};
