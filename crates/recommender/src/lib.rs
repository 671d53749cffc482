//! # Recommender Crate
//!
//! This crate implements the two similarity-based recommenders.
//!
//! ## Components
//!
//! ### User Neighbor Recommender (collaborative)
//! Cosine similarity over the user-item playtime matrix:
//! - "Players whose libraries look like yours also played..."
//! - Returns an unordered, deduplicated set of game names
//!
//! ### Content Recommender (item text)
//! Tf-idf over name + genre profiles:
//! - "Games that read like this one"
//! - Returns a ranked list of distinct names, flagged partial on shortfall
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DatasetStore;
//! use recommender::{ContentRecommender, UserItemMatrix, UserNeighborRecommender};
//! use std::sync::Arc;
//!
//! let store = Arc::new(DatasetStore::load_from_csv("data/interactions.csv".as_ref())?);
//!
//! let matrix = Arc::new(UserItemMatrix::from_store(&store));
//! let neighbors = UserNeighborRecommender::new(matrix);
//! let games = neighbors.recommend("some-user")?;
//!
//! let content = ContentRecommender::new(store.clone());
//! let similar = content.recommend(70, 5)?;
//! ```
//!
//! Both engines are read-only over the shared store; derived structures
//! (matrix, tf-idf model) are built once and never invalidated short of a
//! process restart.

// Public modules
pub mod content;
pub mod error;
pub mod matrix;
pub mod neighbors;
pub mod tfidf;

// Re-export commonly used types
pub use content::{ContentRecommendations, ContentRecommender};
pub use error::{RecommendError, Result};
pub use matrix::UserItemMatrix;
pub use neighbors::UserNeighborRecommender;
pub use tfidf::TfIdfVectorizer;
