// models/src/lib.rs
//! Shared data types for the rolling median degree workspace.

pub mod errors;
pub mod events;
pub mod identifiers;

pub use errors::{GraphError, GraphResult, ValidationError, ValidationResult};
pub use events::EventRecord;
pub use identifiers::Identifier;
