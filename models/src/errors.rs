// models/src/errors.rs

use std::io;
pub use thiserror::Error;

use crate::identifiers::Identifier;

#[derive(Debug, Error)]
pub enum GraphError {
    /// The window ledger and the connection graph disagree. Never recoverable.
    #[error("graph consistency violated for edge {actor} -> {target}: {reason}")]
    Consistency {
        actor: Identifier,
        target: Identifier,
        reason: String,
    },
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    #[error("median requested on an empty graph")]
    EmptyGraph,
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// Implement From for serde_json::Error to convert into GraphError variants.
impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        GraphError::Validation(ValidationError::MalformedRecord(err.to_string()))
    }
}

/// A validation error. Raised at the input boundary; records that fail
/// validation are skipped and never reach the engine.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// The line is not UTF-8 or not a JSON object.
    #[error("malformed record: {0}")]
    MalformedRecord(String),
    /// A required field is absent.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    /// A required field holds a value of the wrong JSON type.
    #[error("field '{0}' has an unsupported type")]
    InvalidFieldType(&'static str),
    /// An identity is empty after trimming whitespace.
    #[error("field '{0}' is empty")]
    EmptyIdentity(&'static str),
    /// The timestamp does not match `YYYY-MM-DDTHH:MM:SSZ`.
    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
}

/// A type alias for a `Result` that returns a `GraphError` on failure.
pub type GraphResult<T> = Result<T, GraphError>;

/// A type alias for a `Result` that returns a `ValidationError` on failure.
pub type ValidationResult<T> = Result<T, ValidationError>;
