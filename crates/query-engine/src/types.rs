//! Response types for the query operations.
//!
//! All of these serialize directly to the JSON shapes the HTTP layer and
//! CLI report; none of them borrow from the store.

use data_loader::{Sentiment, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The release year with the most accumulated playtime for a genre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreYearPlaytime {
    pub genre: String,
    pub year: u16,
    /// Summed playtime for that year, in hours
    pub total_hours: f64,
}

/// Hours accumulated in one release year, across all users of a genre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyHours {
    pub year: u16,
    pub hours: f64,
}

/// The top user for a genre plus the genre's year-by-year hour totals.
///
/// `hours_by_year` aggregates over all users of the genre, not just the
/// top user, and is ordered by year ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreUserReport {
    pub genre: String,
    pub user_id: UserId,
    /// The top user's hours summed across all years
    pub total_hours: f64,
    pub hours_by_year: Vec<YearlyHours>,
}

/// One entry of a top-k item ranking. Positions start at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedItem {
    pub rank: usize,
    pub item_name: String,
    /// Number of reviews that matched the ranking criteria
    pub review_count: usize,
}

/// Review counts per sentiment category for one release year.
///
/// Only categories that actually occur are present; a year with no
/// negative reviews has no `Negative` key at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub year: u16,
    pub counts: BTreeMap<Sentiment, usize>,
}
