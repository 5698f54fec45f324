// lib/src/graph_evolution/mod.rs

//! The windowed graph: a ledger of recent events and the engine that keeps
//! the connection graph in step with it.

pub mod graph_evolution;
pub mod time_window;

pub use graph_evolution::{ProcessOutcome, RollingMedianEngine};
pub use time_window::{Admission, WindowLedger};
