//! DatasetStore building and validation.
//!
//! Loading happens exactly once per process:
//! 1. Parse the CSV export into records
//! 2. Insert records in file order, building every secondary index
//! 3. Validate integrity
//!
//! After that the store is immutable; rebuilding requires a restart.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::path::Path;
use tracing::info;

impl DatasetStore {
    /// Load the dataset export from a CSV file.
    ///
    /// This is the main entry point for loading data.
    pub fn load_from_csv(path: &Path) -> Result<Self> {
        info!("Loading dataset from {}", path.display());

        let records = parser::parse_interactions(path)?;
        info!("Parsed {} rows", records.len());

        let mut store = DatasetStore::new();
        for record in records {
            store.push_record(record);
        }

        store.validate()?;

        let (rows, users, items) = store.counts();
        info!(
            "Dataset loaded: {} rows, {} users, {} games",
            rows, users, items
        );
        Ok(store)
    }

    /// Validate data integrity.
    ///
    /// The parser already enforces field-level constraints (sentiment range,
    /// non-negative playtime); this pass checks record-level invariants:
    /// - every row has a non-empty user id and item name
    /// - playtime is finite
    pub fn validate(&self) -> Result<()> {
        self.records
            .par_iter()
            .enumerate()
            .try_for_each(|(row, record)| {
                if record.user_id.trim().is_empty() {
                    return Err(DataLoadError::Validation(format!(
                        "row {}: empty user_id",
                        row + 1
                    )));
                }
                if record.item_name.trim().is_empty() {
                    return Err(DataLoadError::Validation(format!(
                        "row {}: empty item_name for game {}",
                        row + 1,
                        record.item_id
                    )));
                }
                if !record.playtime_minutes.is_finite() {
                    return Err(DataLoadError::Validation(format!(
                        "row {}: non-finite playtime",
                        row + 1
                    )));
                }
                Ok(())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user: &str, item: ItemId, name: &str) -> InteractionRecord {
        InteractionRecord {
            user_id: user.to_string(),
            item_id: item,
            item_name: name.to_string(),
            genres: vec!["Action".to_string()],
            playtime_minutes: 60.0,
            release_year: Some(2015),
            review_year: Some(2016),
            recommend: true,
            sentiment: Sentiment::Positive,
        }
    }

    #[test]
    fn test_validate_accepts_clean_store() {
        let mut store = DatasetStore::new();
        store.push_record(record("u1", 1, "Game One"));
        store.push_record(record("u2", 2, "Game Two"));
        assert!(store.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_user() {
        let mut store = DatasetStore::new();
        store.push_record(record("", 1, "Game One"));
        assert!(store.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_item_name() {
        let mut store = DatasetStore::new();
        store.push_record(record("u1", 1, "  "));
        assert!(store.validate().is_err());
    }
}
