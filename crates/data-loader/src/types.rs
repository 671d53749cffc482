//! Core domain types for the platform usage dataset.
//!
//! The dataset is a single denormalized export: each row links one user to
//! one game and carries both playtime and review information. The
//! `DatasetStore` owns all rows plus the secondary indices the query and
//! similarity engines need for fast filtering.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================

/// Opaque identifier for a platform user (alphanumeric handles and numeric
/// account ids both occur in the export)
pub type UserId = String;

/// Numeric identifier for a game
pub type ItemId = u32;

// =============================================================================
// Sentiment
// =============================================================================

/// Precomputed review-sentiment label.
///
/// The export encodes it as 0/1/2; anything else is rejected at load time.
/// Variant order matters: `Neutral-or-better` checks rely on `Ord`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    /// Numeric code as stored in the export
    pub fn code(self) -> u8 {
        match self {
            Sentiment::Negative => 0,
            Sentiment::Neutral => 1,
            Sentiment::Positive => 2,
        }
    }

    /// Human-readable category name, as reported by the breakdown endpoint
    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
            Sentiment::Positive => "Positive",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Interaction Record
// =============================================================================

/// One row of the export: a user's playtime and review observation for a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub item_name: String,
    /// Genre tokens for the game (pipe-separated in the file)
    pub genres: Vec<String>,
    /// Total minutes played; hours are derived (minutes / 60) at query time
    pub playtime_minutes: f64,
    /// Release year of the game; `None` when the export carries a
    /// non-numeric sentinel. Never coerced to 0.
    pub release_year: Option<u16>,
    /// Year the review was posted; independent of the release year
    pub review_year: Option<u16>,
    /// Did the reviewer recommend the game
    pub recommend: bool,
    pub sentiment: Sentiment,
}

// =============================================================================
// DatasetStore - The In-Memory Dataset
// =============================================================================

/// Owns the loaded dataset for the process lifetime.
///
/// Rows are kept in file order; the row index doubles as the explicit
/// tie-break ordinal for top-k rankings. All secondary indices store row
/// indices in ascending order. The store is never mutated after
/// `load_from_csv` returns; share it via `Arc`.
#[derive(Debug)]
pub struct DatasetStore {
    /// All rows, in file order
    pub(crate) records: Vec<InteractionRecord>,

    // Secondary indices for specialized queries
    /// Genre token -> rows whose game carries that token
    pub(crate) genre_index: HashMap<String, Vec<usize>>,
    /// Release year -> rows (sorted by year)
    pub(crate) release_year_index: BTreeMap<u16, Vec<usize>>,
    /// Review year -> rows (sorted by year)
    pub(crate) review_year_index: BTreeMap<u16, Vec<usize>>,
    /// User -> rows for that user
    pub(crate) user_rows: HashMap<UserId, Vec<usize>>,
    /// Game id -> display name (first-seen name wins)
    pub(crate) item_names: HashMap<ItemId, String>,
}

impl DatasetStore {
    /// Creates a new, empty store
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            genre_index: HashMap::new(),
            release_year_index: BTreeMap::new(),
            review_year_index: BTreeMap::new(),
            user_rows: HashMap::new(),
            item_names: HashMap::new(),
        }
    }

    // Getters - all return borrowed views into the store

    /// All rows in file order
    pub fn records(&self) -> &[InteractionRecord] {
        &self.records
    }

    /// A single row by index
    pub fn record(&self, row: usize) -> &InteractionRecord {
        &self.records[row]
    }

    /// Rows whose game carries the given genre token (exact match,
    /// case as given). Empty slice when the genre was never seen.
    pub fn genre_rows(&self, genre: &str) -> &[usize] {
        self.genre_index
            .get(genre)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Rows whose game was released in the given year
    pub fn release_year_rows(&self, year: u16) -> &[usize] {
        self.release_year_index
            .get(&year)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Rows whose review was posted in the given year
    pub fn review_year_rows(&self, year: u16) -> &[usize] {
        self.review_year_index
            .get(&year)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Rows belonging to the given user
    pub fn rows_for_user(&self, user_id: &str) -> &[usize] {
        self.user_rows
            .get(user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Display name for a game id
    pub fn item_name(&self, item_id: ItemId) -> Option<&str> {
        self.item_names.get(&item_id).map(|s| s.as_str())
    }

    /// True if the game id appears anywhere in the dataset
    pub fn contains_item(&self, item_id: ItemId) -> bool {
        self.item_names.contains_key(&item_id)
    }

    /// All distinct genre tokens (unordered)
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.genre_index.keys().map(|s| s.as_str())
    }

    // Mutators - used only during load

    /// Append a record and update every secondary index
    pub fn push_record(&mut self, record: InteractionRecord) {
        let row = self.records.len();

        for genre in &record.genres {
            self.genre_index
                .entry(genre.clone())
                .or_insert_with(Vec::new)
                .push(row);
        }

        if let Some(year) = record.release_year {
            self.release_year_index
                .entry(year)
                .or_insert_with(Vec::new)
                .push(row);
        }

        if let Some(year) = record.review_year {
            self.review_year_index
                .entry(year)
                .or_insert_with(Vec::new)
                .push(row);
        }

        self.user_rows
            .entry(record.user_id.clone())
            .or_insert_with(Vec::new)
            .push(row);

        self.item_names
            .entry(record.item_id)
            .or_insert_with(|| record.item_name.clone());

        self.records.push(record);
    }

    /// Get counts for logging/validation: (rows, distinct users, distinct games)
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.records.len(),
            self.user_rows.len(),
            self.item_names.len(),
        )
    }
}

impl Default for DatasetStore {
    fn default() -> Self {
        Self::new()
    }
}
