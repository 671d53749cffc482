//! # Query Engine Crate
//!
//! Deterministic aggregation queries over the loaded dataset.
//!
//! ## Operations
//!
//! - **year_with_most_playtime(genre)**: release year with the most
//!   accumulated hours for a genre
//! - **top_user_for_genre(genre)**: top user by total hours plus the
//!   genre's hour totals per year
//! - **top_recommended_items(year, k)**: most recommended games for a
//!   review year
//! - **top_not_recommended_items(year, k)**: least recommended games for a
//!   review year
//! - **sentiment_breakdown(year)**: review counts per sentiment category
//!   for a release year
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DatasetStore;
//! use query_engine::QueryEngine;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let store = Arc::new(DatasetStore::load_from_csv(Path::new("data/interactions.csv"))?);
//! let engine = QueryEngine::new(store);
//!
//! let result = engine.year_with_most_playtime("Action")?;
//! println!("{}: {} ({:.0}h)", result.genre, result.year, result.total_hours);
//! ```
//!
//! Hard failures (`NotFound`, `InvalidInput`, `Computation`) are typed;
//! partial and empty results are ordinary successes; see each operation's
//! contract.

// Public modules
pub mod engine;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use engine::QueryEngine;
pub use error::{QueryError, Result};
pub use types::{
    GenreUserReport, GenreYearPlaytime, RankedItem, SentimentBreakdown, YearlyHours,
};
