//! User-based collaborative filtering.
//!
//! "Players whose libraries look like yours also sank hours into these."
//!
//! ## Algorithm
//! 1. Resolve the user to their matrix row
//! 2. Cosine similarity against every other row
//! 3. Take the top `n_neighbors` most similar users
//! 4. Collect each neighbor's top `n_items_per_neighbor` games by playtime
//! 5. Union and deduplicate into a set of game names
//!
//! The result is deliberately an unordered set: deduplication across
//! neighbors discards per-item ranking, and no ordering is promised to
//! callers.

use crate::error::{RecommendError, Result};
use crate::matrix::UserItemMatrix;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Recommends games from the libraries of similar users
pub struct UserNeighborRecommender {
    matrix: Arc<UserItemMatrix>,

    /// How many similar users to draw from
    n_neighbors: usize,

    /// How many games to take from each neighbor's library
    n_items_per_neighbor: usize,
}

impl UserNeighborRecommender {
    /// Create a recommender over a built matrix
    pub fn new(matrix: Arc<UserItemMatrix>) -> Self {
        Self {
            matrix,
            n_neighbors: 5,
            n_items_per_neighbor: 5,
        }
    }

    /// Configure the neighbor count (default: 5)
    pub fn with_n_neighbors(mut self, n: usize) -> Self {
        self.n_neighbors = n;
        self
    }

    /// Configure games taken per neighbor (default: 5)
    pub fn with_items_per_neighbor(mut self, n: usize) -> Self {
        self.n_items_per_neighbor = n;
        self
    }

    /// Recommend games for `user_id` from their nearest neighbors.
    ///
    /// Fails with `UnknownUser` when the id was never seen during matrix
    /// construction.
    #[instrument(skip(self))]
    pub fn recommend(&self, user_id: &str) -> Result<HashSet<String>> {
        if self.matrix.n_users() == 0 {
            return Err(RecommendError::Computation(
                "user-item matrix is empty".to_string(),
            ));
        }

        let target = self
            .matrix
            .user_row(user_id)
            .ok_or_else(|| RecommendError::UnknownUser(user_id.to_string()))?;

        let similarities = self.matrix.similarities_to(target);

        // Rank every other user by similarity, ties by row order
        let mut order: Vec<usize> = (0..self.matrix.n_users())
            .filter(|&row| row != target)
            .collect();
        order.sort_by(|&a, &b| {
            similarities[b]
                .partial_cmp(&similarities[a])
                .unwrap_or(Ordering::Equal)
                .then(a.cmp(&b))
        });

        let mut recommendations: HashSet<String> = HashSet::new();
        for &neighbor in order.iter().take(self.n_neighbors) {
            for column in self.matrix.top_items_for(neighbor, self.n_items_per_neighbor) {
                recommendations.insert(self.matrix.item_name(column).to_string());
            }
        }

        debug!(
            "{} recommendations for user {} from {} neighbors",
            recommendations.len(),
            user_id,
            order.len().min(self.n_neighbors)
        );
        Ok(recommendations)
    }
}
