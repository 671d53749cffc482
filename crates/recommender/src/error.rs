//! Error types for the recommender crate.

use data_loader::ItemId;
use thiserror::Error;

/// Typed failures surfaced by the similarity engines.
///
/// Partial results (fewer recommendations than requested) are not errors;
/// they are reported through the result types instead.
#[derive(Error, Debug)]
pub enum RecommendError {
    /// The user id was never seen during matrix construction
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    /// The item id does not appear anywhere in the dataset
    #[error("Unknown item: {0}")]
    UnknownItem(ItemId),

    /// Degenerate input shape (e.g. an empty user-item matrix)
    #[error("Computation failed: {0}")]
    Computation(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, RecommendError>;
