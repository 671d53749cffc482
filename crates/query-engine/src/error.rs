//! Error types for the query engine.
//!
//! Every operation returns either a result or one of these typed failures;
//! nothing panics across the engine boundary. Partial and empty results
//! (fewer than k ranked items, missing sentiment categories) are successful
//! outputs, not errors; only the cases below are hard failures.

use thiserror::Error;

/// Typed failures surfaced by query operations
#[derive(Error, Debug)]
pub enum QueryError {
    /// The requested genre/year/user/item has no matching data
    #[error("No data found: {0}")]
    NotFound(String),

    /// A malformed parameter was rejected before aggregation began
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unexpected failure inside aggregation (degenerate input shapes)
    #[error("Computation failed: {0}")]
    Computation(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, QueryError>;
