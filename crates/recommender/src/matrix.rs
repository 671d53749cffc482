//! The user-item playtime matrix.
//!
//! A dense pivot of the dataset: one row per distinct user, one column per
//! distinct game name, cell = summed playtime minutes, missing = 0. Built
//! once from the store and shared read-only; row L2 norms are precomputed
//! so cosine lookups only pay for dot products.
//!
//! Users and items keep first-seen (file) order, which makes row and
//! column indices stable tie-break ordinals.

use data_loader::{DatasetStore, UserId};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::info;

/// Dense user × item playtime matrix with precomputed row norms
#[derive(Debug)]
pub struct UserItemMatrix {
    users: Vec<UserId>,
    user_index: HashMap<UserId, usize>,
    items: Vec<String>,
    item_index: HashMap<String, usize>,
    /// rows[user][item] = summed playtime minutes
    rows: Vec<Vec<f64>>,
    row_norms: Vec<f64>,
}

impl UserItemMatrix {
    /// Build the pivot from every record in the store
    pub fn from_store(store: &DatasetStore) -> Self {
        let mut users: Vec<UserId> = Vec::new();
        let mut user_index: HashMap<UserId, usize> = HashMap::new();
        let mut items: Vec<String> = Vec::new();
        let mut item_index: HashMap<String, usize> = HashMap::new();

        // First pass: assign row/column indices in first-seen order
        for record in store.records() {
            if !user_index.contains_key(&record.user_id) {
                user_index.insert(record.user_id.clone(), users.len());
                users.push(record.user_id.clone());
            }
            if !item_index.contains_key(&record.item_name) {
                item_index.insert(record.item_name.clone(), items.len());
                items.push(record.item_name.clone());
            }
        }

        // Second pass: accumulate playtime
        let mut rows = vec![vec![0.0; items.len()]; users.len()];
        for record in store.records() {
            let u = user_index[&record.user_id];
            let i = item_index[&record.item_name];
            rows[u][i] += record.playtime_minutes;
        }

        let row_norms: Vec<f64> = rows
            .par_iter()
            .map(|row| row.iter().map(|v| v * v).sum::<f64>().sqrt())
            .collect();

        info!(
            "Built user-item matrix: {} users x {} games",
            users.len(),
            items.len()
        );

        Self {
            users,
            user_index,
            items,
            item_index,
            rows,
            row_norms,
        }
    }

    pub fn n_users(&self) -> usize {
        self.users.len()
    }

    pub fn n_items(&self) -> usize {
        self.items.len()
    }

    /// Row index for a user id, if the user was seen during construction
    pub fn user_row(&self, user_id: &str) -> Option<usize> {
        self.user_index.get(user_id).copied()
    }

    /// Column index for a game name
    pub fn item_column(&self, item_name: &str) -> Option<usize> {
        self.item_index.get(item_name).copied()
    }

    pub fn user_id(&self, row: usize) -> &str {
        &self.users[row]
    }

    pub fn item_name(&self, column: usize) -> &str {
        &self.items[column]
    }

    /// One user's playtime vector
    pub fn row(&self, row: usize) -> &[f64] {
        &self.rows[row]
    }

    /// Cosine similarity between two user rows.
    ///
    /// A zero-playtime row has no direction; its similarity to anything
    /// is 0 rather than NaN.
    pub fn cosine(&self, a: usize, b: usize) -> f64 {
        let norm = self.row_norms[a] * self.row_norms[b];
        if norm == 0.0 {
            return 0.0;
        }
        let dot: f64 = self.rows[a]
            .iter()
            .zip(&self.rows[b])
            .map(|(x, y)| x * y)
            .sum();
        dot / norm
    }

    /// Cosine similarity of `target` against every row (including itself)
    pub fn similarities_to(&self, target: usize) -> Vec<f64> {
        (0..self.n_users())
            .into_par_iter()
            .map(|row| self.cosine(target, row))
            .collect()
    }

    /// Column indices of a user's top `n` games by playtime, descending.
    ///
    /// Only positive cells count; a zero cell means the user never
    /// touched the game. Ties keep column (first-seen) order.
    pub fn top_items_for(&self, row: usize, n: usize) -> Vec<usize> {
        let mut played: Vec<(usize, f64)> = self.rows[row]
            .iter()
            .enumerate()
            .filter(|&(_, &minutes)| minutes > 0.0)
            .map(|(column, &minutes)| (column, minutes))
            .collect();
        played.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        played.truncate(n);
        played.into_iter().map(|(column, _)| column).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{InteractionRecord, Sentiment};

    fn record(user: &str, item: u32, name: &str, minutes: f64) -> InteractionRecord {
        InteractionRecord {
            user_id: user.to_string(),
            item_id: item,
            item_name: name.to_string(),
            genres: vec![],
            playtime_minutes: minutes,
            release_year: Some(2015),
            review_year: None,
            recommend: true,
            sentiment: Sentiment::Neutral,
        }
    }

    fn matrix_over(records: Vec<InteractionRecord>) -> UserItemMatrix {
        let mut store = DatasetStore::new();
        for r in records {
            store.push_record(r);
        }
        UserItemMatrix::from_store(&store)
    }

    #[test]
    fn test_dimensions_and_lookup() {
        let matrix = matrix_over(vec![
            record("u1", 1, "A", 10.0),
            record("u1", 2, "B", 20.0),
            record("u2", 1, "A", 30.0),
        ]);

        assert_eq!(matrix.n_users(), 2);
        assert_eq!(matrix.n_items(), 2);
        assert_eq!(matrix.user_row("u1"), Some(0));
        assert_eq!(matrix.user_row("u2"), Some(1));
        assert_eq!(matrix.user_row("nobody"), None);
        assert_eq!(matrix.item_column("A"), Some(0));
    }

    #[test]
    fn test_duplicate_interactions_sum() {
        let matrix = matrix_over(vec![
            record("u1", 1, "A", 10.0),
            record("u1", 1, "A", 15.0),
        ]);

        assert_eq!(matrix.row(0), &[25.0]);
    }

    #[test]
    fn test_cosine_identical_and_orthogonal() {
        let matrix = matrix_over(vec![
            record("u1", 1, "A", 10.0),
            record("u2", 1, "A", 20.0), // same direction as u1
            record("u3", 2, "B", 5.0),  // orthogonal to both
        ]);

        assert!((matrix.cosine(0, 1) - 1.0).abs() < 1e-9);
        assert!(matrix.cosine(0, 2).abs() < 1e-9);
        assert!((matrix.cosine(0, 0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_zero_row_is_zero_not_nan() {
        let matrix = matrix_over(vec![
            record("u1", 1, "A", 0.0),
            record("u2", 1, "A", 10.0),
        ]);

        assert_eq!(matrix.cosine(0, 1), 0.0);
    }

    #[test]
    fn test_top_items_skip_untouched_games() {
        let matrix = matrix_over(vec![
            record("u1", 1, "A", 5.0),
            record("u1", 2, "B", 50.0),
            record("u2", 3, "C", 1.0), // widens the matrix; u1's C cell is 0
        ]);

        let top = matrix.top_items_for(0, 5);
        // B (50) ranks above A (5); C never played, never suggested
        assert_eq!(top.len(), 2);
        assert_eq!(matrix.item_name(top[0]), "B");
        assert_eq!(matrix.item_name(top[1]), "A");
    }
}
