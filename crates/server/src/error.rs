//! Service-level error type and its HTTP status mapping.

use axum::http::StatusCode;
use query_engine::QueryError;
use recommender::RecommendError;
use std::time::Duration;
use thiserror::Error;

/// Everything a request can fail with once it reaches the service
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Recommend(#[from] RecommendError),

    /// The operation exceeded the request deadline. The underlying
    /// computation only reads shared state, so nothing is left corrupted.
    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    /// A worker task panicked or was cancelled
    #[error("worker task failed: {0}")]
    Worker(String),
}

impl ServiceError {
    /// Map the typed failure onto the client-visible status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Query(QueryError::NotFound(_)) => StatusCode::NOT_FOUND,
            ServiceError::Query(QueryError::InvalidInput(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Query(QueryError::Computation(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Recommend(RecommendError::UnknownUser(_)) => StatusCode::NOT_FOUND,
            ServiceError::Recommend(RecommendError::UnknownItem(_)) => StatusCode::NOT_FOUND,
            ServiceError::Recommend(RecommendError::Computation(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ServiceError::Timeout(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
