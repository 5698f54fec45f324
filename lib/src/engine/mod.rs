pub mod graph;
pub mod inspect;
pub mod median;
pub mod rank_index;

// Public re-exports
pub use graph::{ConnectionGraph, EdgeRemoval, EdgeUpsert};
pub use inspect::NodeSnapshot;
pub use median::{format_median, median_degree, reference_median};
pub use rank_index::{DegreeRankIndex, NodeHandle, RankEntry};
