//! Server crate for the playlens analytics service.
//!
//! Wraps the query and similarity engines in an async service (blocking
//! pool dispatch + per-request timeout) and exposes them through a thin
//! axum route table.

pub mod error;
pub mod routes;
pub mod service;

pub use error::ServiceError;
pub use routes::router;
pub use service::AnalyticsService;
