//! # Data Loader Crate
//!
//! This crate handles loading and indexing the platform usage export.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (InteractionRecord, Sentiment, DatasetStore)
//! - **parser**: Parse the CSV export into records
//! - **store**: Build and validate the indexed in-memory store
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DatasetStore;
//! use std::path::Path;
//!
//! // Load the entire export
//! let store = DatasetStore::load_from_csv(Path::new("data/interactions.csv"))?;
//!
//! // Query data
//! let action_rows = store.genre_rows("Action");
//! let name = store.item_name(70);
//!
//! println!("{} rows carry the Action genre", action_rows.len());
//! ```
//!
//! The store is immutable after load and safe to share across threads via
//! `Arc`; every query operation reads, nothing writes.

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod store;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{
    // Type aliases
    UserId,
    ItemId,
    // Core types
    InteractionRecord,
    DatasetStore,
    // Enums
    Sentiment,
};
