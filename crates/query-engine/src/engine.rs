//! The aggregation query engine.
//!
//! Five read operations over the immutable `DatasetStore`:
//! 1. Year with the most playtime for a genre
//! 2. Top user for a genre, plus the genre's yearly hour totals
//! 3. Top-k most recommended games for a review year
//! 4. Top-k least recommended games for a review year
//! 5. Sentiment breakdown for a release year
//!
//! Each operation is a pure function of the store and its parameters; the
//! engine keeps no cross-request state and can be shared freely across
//! threads. Playtime is stored in minutes and converted to hours at the
//! point of aggregation.

use crate::error::{QueryError, Result};
use crate::types::*;
use data_loader::{DatasetStore, InteractionRecord, Sentiment, UserId};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Release years below this are placeholder sentinels, not real years
const MIN_PLAUSIBLE_YEAR: u16 = 100;

/// Read-only query engine over the shared dataset store
#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<DatasetStore>,
}

impl QueryEngine {
    /// Create a new engine over a loaded store
    pub fn new(store: Arc<DatasetStore>) -> Self {
        Self { store }
    }

    /// The store this engine reads from
    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    /// Year with the most accumulated playtime for `genre`.
    ///
    /// Fails with `NotFound` when no record carries the genre, and with
    /// `Computation` when matching records exist but none has a usable
    /// release year. On exact float ties the earliest year wins.
    #[instrument(skip(self))]
    pub fn year_with_most_playtime(&self, genre: &str) -> Result<GenreYearPlaytime> {
        let genre = validate_genre(genre)?;
        let rows = self.store.genre_rows(genre);
        if rows.is_empty() {
            return Err(QueryError::NotFound(format!(
                "no records for genre {genre}"
            )));
        }
        debug!("{} rows match genre {}", rows.len(), genre);

        // Sum hours per release year; rows without a year are excluded,
        // never coerced to year 0.
        let hours_by_year: HashMap<u16, f64> = rows
            .par_iter()
            .fold(HashMap::new, |mut acc, &row| {
                let record = self.store.record(row);
                if let Some(year) = record.release_year {
                    *acc.entry(year).or_insert(0.0) += record.playtime_minutes / 60.0;
                }
                acc
            })
            .reduce(HashMap::new, |mut acc, local| {
                for (year, hours) in local {
                    *acc.entry(year).or_insert(0.0) += hours;
                }
                acc
            });

        // Iterate years in ascending order and keep the first strict maximum
        let ordered: BTreeMap<u16, f64> = hours_by_year.into_iter().collect();
        let mut best: Option<(u16, f64)> = None;
        for (year, hours) in ordered {
            let replace = match best {
                Some((_, best_hours)) => hours > best_hours,
                None => true,
            };
            if replace {
                best = Some((year, hours));
            }
        }

        match best {
            Some((year, total_hours)) => Ok(GenreYearPlaytime {
                genre: genre.to_string(),
                year,
                total_hours,
            }),
            None => Err(QueryError::Computation(format!(
                "genre {genre} has records but no usable release years"
            ))),
        }
    }

    /// Top user by total hours for `genre`, plus the genre's hour totals
    /// per release year aggregated over all users.
    ///
    /// Rows with a missing or implausibly small release year are dropped
    /// before grouping. Returns `Ok(None)` when nothing qualifies: a soft
    /// empty, deliberately distinct from the hard `NotFound` above.
    #[instrument(skip(self))]
    pub fn top_user_for_genre(&self, genre: &str) -> Result<Option<GenreUserReport>> {
        let genre = validate_genre(genre)?;
        let rows = self.store.genre_rows(genre);

        let mut user_totals: HashMap<UserId, f64> = HashMap::new();
        let mut hours_by_year: BTreeMap<u16, f64> = BTreeMap::new();

        for &row in rows {
            let record = self.store.record(row);
            let Some(year) = record.release_year else {
                continue;
            };
            if year < MIN_PLAUSIBLE_YEAR {
                continue;
            }
            let hours = record.playtime_minutes / 60.0;
            *user_totals.entry(record.user_id.clone()).or_insert(0.0) += hours;
            *hours_by_year.entry(year).or_insert(0.0) += hours;
        }

        // Highest total wins; exact ties go to the smaller user id
        let top = user_totals.into_iter().max_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.0.cmp(&a.0))
        });
        let Some((user_id, total_hours)) = top else {
            debug!("no qualifying rows for genre {}", genre);
            return Ok(None);
        };

        Ok(Some(GenreUserReport {
            genre: genre.to_string(),
            user_id,
            total_hours,
            hours_by_year: hours_by_year
                .into_iter()
                .map(|(year, hours)| YearlyHours { year, hours })
                .collect(),
        }))
    }

    /// Top `k` games by count of recommended, neutral-or-positive reviews
    /// posted in `year`. Shortfall returns fewer entries, never an error.
    #[instrument(skip(self))]
    pub fn top_recommended_items(&self, year: i32, k: usize) -> Result<Vec<RankedItem>> {
        let year = validate_year(year)?;
        let rows = self.store.review_year_rows(year);
        Ok(self.ranked_items(rows, k, |r| {
            r.recommend && r.sentiment >= Sentiment::Neutral
        }))
    }

    /// Mirror ranking: games with the most not-recommended, strictly
    /// negative reviews posted in `year`.
    #[instrument(skip(self))]
    pub fn top_not_recommended_items(&self, year: i32, k: usize) -> Result<Vec<RankedItem>> {
        let year = validate_year(year)?;
        let rows = self.store.review_year_rows(year);
        Ok(self.ranked_items(rows, k, |r| {
            !r.recommend && r.sentiment == Sentiment::Negative
        }))
    }

    /// Review counts per sentiment category for games released in `year`.
    ///
    /// Categories with zero matching rows are absent from the result; an
    /// entirely empty breakdown is still a success.
    #[instrument(skip(self))]
    pub fn sentiment_breakdown(&self, year: i32) -> Result<SentimentBreakdown> {
        let year = validate_year(year)?;
        let rows = self.store.release_year_rows(year);

        let mut counts: BTreeMap<Sentiment, usize> = BTreeMap::new();
        for &row in rows {
            *counts.entry(self.store.record(row).sentiment).or_insert(0) += 1;
        }

        Ok(SentimentBreakdown { year, counts })
    }

    /// Count matching reviews per game and rank them.
    ///
    /// Ordering is explicit: count descending, then first-seen row index
    /// ascending, so exact ties resolve by file order.
    fn ranked_items<F>(&self, rows: &[usize], k: usize, matches: F) -> Vec<RankedItem>
    where
        F: Fn(&InteractionRecord) -> bool,
    {
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        for &row in rows {
            let record = self.store.record(row);
            if matches(record) {
                let entry = counts.entry(record.item_name.as_str()).or_insert((0, row));
                entry.0 += 1;
            }
        }

        let mut ranked: Vec<(&str, usize, usize)> = counts
            .into_iter()
            .map(|(name, (count, first_row))| (name, count, first_row))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        ranked.truncate(k);

        ranked
            .into_iter()
            .enumerate()
            .map(|(i, (name, count, _))| RankedItem {
                rank: i + 1,
                item_name: name.to_string(),
                review_count: count,
            })
            .collect()
    }
}

/// Reject empty genre parameters before touching the store
fn validate_genre(genre: &str) -> Result<&str> {
    let trimmed = genre.trim();
    if trimmed.is_empty() {
        return Err(QueryError::InvalidInput("genre must not be empty".into()));
    }
    Ok(trimmed)
}

/// Reject years that cannot index the store before aggregation begins
fn validate_year(year: i32) -> Result<u16> {
    if !(0..=9999).contains(&year) {
        return Err(QueryError::InvalidInput(format!(
            "year out of range: {year}"
        )));
    }
    Ok(year as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::InteractionRecord;

    #[allow(clippy::too_many_arguments)]
    fn record(
        user: &str,
        item: u32,
        name: &str,
        genres: &[&str],
        minutes: f64,
        release_year: Option<u16>,
        review_year: Option<u16>,
        recommend: bool,
        sentiment: Sentiment,
    ) -> InteractionRecord {
        InteractionRecord {
            user_id: user.to_string(),
            item_id: item,
            item_name: name.to_string(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            playtime_minutes: minutes,
            release_year,
            review_year,
            recommend,
            sentiment,
        }
    }

    fn engine_over(records: Vec<InteractionRecord>) -> QueryEngine {
        let mut store = DatasetStore::new();
        for r in records {
            store.push_record(r);
        }
        QueryEngine::new(Arc::new(store))
    }

    #[test]
    fn test_year_with_most_playtime_picks_max() {
        // 120 min in 2015 vs 6000 min in 2016 -> 2016
        let engine = engine_over(vec![
            record("u1", 1, "A", &["Action"], 120.0, Some(2015), None, true, Sentiment::Neutral),
            record("u2", 2, "B", &["Action"], 6000.0, Some(2016), None, true, Sentiment::Neutral),
        ]);

        let result = engine.year_with_most_playtime("Action").unwrap();
        assert_eq!(result.year, 2016);
        assert!((result.total_hours - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_year_with_most_playtime_sums_within_year() {
        let engine = engine_over(vec![
            record("u1", 1, "A", &["Indie"], 3000.0, Some(2015), None, true, Sentiment::Neutral),
            record("u2", 1, "A", &["Indie"], 3600.0, Some(2015), None, true, Sentiment::Neutral),
            record("u3", 2, "B", &["Indie"], 6000.0, Some(2016), None, true, Sentiment::Neutral),
        ]);

        // 2015: 110h, 2016: 100h
        let result = engine.year_with_most_playtime("Indie").unwrap();
        assert_eq!(result.year, 2015);
    }

    #[test]
    fn test_year_with_most_playtime_tie_goes_to_earliest() {
        let engine = engine_over(vec![
            record("u1", 1, "A", &["RPG"], 600.0, Some(2016), None, true, Sentiment::Neutral),
            record("u2", 2, "B", &["RPG"], 600.0, Some(2012), None, true, Sentiment::Neutral),
        ]);

        let result = engine.year_with_most_playtime("RPG").unwrap();
        assert_eq!(result.year, 2012);
    }

    #[test]
    fn test_year_with_most_playtime_unknown_genre_is_not_found() {
        let engine = engine_over(vec![record(
            "u1", 1, "A", &["Action"], 60.0, Some(2015), None, true, Sentiment::Neutral,
        )]);

        assert!(matches!(
            engine.year_with_most_playtime("Sports"),
            Err(QueryError::NotFound(_))
        ));
    }

    #[test]
    fn test_year_with_most_playtime_empty_genre_is_invalid() {
        let engine = engine_over(vec![]);
        assert!(matches!(
            engine.year_with_most_playtime("  "),
            Err(QueryError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_year_with_most_playtime_no_years_is_computation_error() {
        let engine = engine_over(vec![record(
            "u1", 1, "A", &["Action"], 60.0, None, None, true, Sentiment::Neutral,
        )]);

        assert!(matches!(
            engine.year_with_most_playtime("Action"),
            Err(QueryError::Computation(_))
        ));
    }

    #[test]
    fn test_top_user_for_genre_basic() {
        let engine = engine_over(vec![
            record("alice", 1, "A", &["Action"], 600.0, Some(2014), None, true, Sentiment::Neutral),
            record("alice", 2, "B", &["Action"], 600.0, Some(2015), None, true, Sentiment::Neutral),
            record("bob", 1, "A", &["Action"], 900.0, Some(2014), None, true, Sentiment::Neutral),
        ]);

        let report = engine.top_user_for_genre("Action").unwrap().unwrap();
        // alice: 20h total, bob: 15h
        assert_eq!(report.user_id, "alice");
        assert!((report.total_hours - 20.0).abs() < 1e-9);

        // hours_by_year covers ALL users, ordered by year:
        // 2014 = 10 + 15 = 25h, 2015 = 10h
        assert_eq!(report.hours_by_year.len(), 2);
        assert_eq!(report.hours_by_year[0].year, 2014);
        assert!((report.hours_by_year[0].hours - 25.0).abs() < 1e-9);
        assert_eq!(report.hours_by_year[1].year, 2015);
        assert!((report.hours_by_year[1].hours - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_user_for_genre_drops_sentinel_years() {
        let engine = engine_over(vec![
            record("u1", 1, "A", &["Action"], 6000.0, Some(1), None, true, Sentiment::Neutral),
            record("u2", 2, "B", &["Action"], 60.0, Some(2015), None, true, Sentiment::Neutral),
        ]);

        let report = engine.top_user_for_genre("Action").unwrap().unwrap();
        // u1's 100 hours sit on sentinel year 1 and are dropped entirely
        assert_eq!(report.user_id, "u2");
        assert_eq!(report.hours_by_year.len(), 1);
        assert_eq!(report.hours_by_year[0].year, 2015);
    }

    #[test]
    fn test_top_user_for_genre_soft_empty() {
        // Genre exists but no row has a plausible release year
        let engine = engine_over(vec![record(
            "u1", 1, "A", &["Action"], 60.0, None, None, true, Sentiment::Neutral,
        )]);
        assert!(engine.top_user_for_genre("Action").unwrap().is_none());

        // Genre entirely absent is also a soft empty, not NotFound
        assert!(engine.top_user_for_genre("Sports").unwrap().is_none());
    }

    #[test]
    fn test_top_recommended_ranks_by_count() {
        let mut records = Vec::new();
        for _ in 0..5 {
            records.push(record(
                "u", 1, "Foo", &[], 0.0, None, Some(2014), true, Sentiment::Positive,
            ));
        }
        for _ in 0..3 {
            records.push(record(
                "u", 2, "Bar", &[], 0.0, None, Some(2014), true, Sentiment::Positive,
            ));
        }
        let engine = engine_over(records);

        let top = engine.top_recommended_items(2014, 3).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].rank, 1);
        assert_eq!(top[0].item_name, "Foo");
        assert_eq!(top[0].review_count, 5);
        assert_eq!(top[1].item_name, "Bar");
    }

    #[test]
    fn test_top_recommended_filters_sentiment_and_flag() {
        let engine = engine_over(vec![
            // Qualifies: recommended + neutral
            record("u1", 1, "Good", &[], 0.0, None, Some(2014), true, Sentiment::Neutral),
            // Wrong year
            record("u2", 1, "Good", &[], 0.0, None, Some(2013), true, Sentiment::Positive),
            // Negative sentiment
            record("u3", 2, "Meh", &[], 0.0, None, Some(2014), true, Sentiment::Negative),
            // Not recommended
            record("u4", 3, "Bad", &[], 0.0, None, Some(2014), false, Sentiment::Positive),
        ]);

        let top = engine.top_recommended_items(2014, 3).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].item_name, "Good");
        assert_eq!(top[0].review_count, 1);
    }

    #[test]
    fn test_top_recommended_ties_break_by_file_order() {
        let engine = engine_over(vec![
            record("u1", 2, "Second", &[], 0.0, None, Some(2014), true, Sentiment::Positive),
            record("u2", 1, "First", &[], 0.0, None, Some(2014), true, Sentiment::Positive),
        ]);

        let top = engine.top_recommended_items(2014, 3).unwrap();
        // Equal counts: the item seen earlier in the file ranks first
        assert_eq!(top[0].item_name, "Second");
        assert_eq!(top[1].item_name, "First");
    }

    #[test]
    fn test_top_not_recommended_requires_strictly_negative() {
        let engine = engine_over(vec![
            record("u1", 1, "Panned", &[], 0.0, None, Some(2014), false, Sentiment::Negative),
            // Neutral does not count, even when not recommended
            record("u2", 2, "Mixed", &[], 0.0, None, Some(2014), false, Sentiment::Neutral),
        ]);

        let bottom = engine.top_not_recommended_items(2014, 3).unwrap();
        assert_eq!(bottom.len(), 1);
        assert_eq!(bottom[0].item_name, "Panned");
    }

    #[test]
    fn test_recommend_and_not_recommend_are_disjoint() {
        let mut records = Vec::new();
        for i in 0..4u32 {
            records.push(record(
                "u", i, &format!("Game {i}"), &[], 0.0, None, Some(2014),
                i % 2 == 0,
                if i % 2 == 0 { Sentiment::Positive } else { Sentiment::Negative },
            ));
        }
        let engine = engine_over(records);

        let top = engine.top_recommended_items(2014, 10).unwrap();
        let bottom = engine.top_not_recommended_items(2014, 10).unwrap();
        for item in &top {
            assert!(bottom.iter().all(|b| b.item_name != item.item_name));
        }
    }

    #[test]
    fn test_ranking_rejects_out_of_range_year() {
        let engine = engine_over(vec![]);
        assert!(matches!(
            engine.top_recommended_items(-3, 3),
            Err(QueryError::InvalidInput(_))
        ));
        assert!(matches!(
            engine.top_not_recommended_items(100_000, 3),
            Err(QueryError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_sentiment_breakdown_counts_sum_to_year_rows() {
        let engine = engine_over(vec![
            record("u1", 1, "A", &[], 0.0, Some(2015), None, true, Sentiment::Positive),
            record("u2", 1, "A", &[], 0.0, Some(2015), None, true, Sentiment::Positive),
            record("u3", 2, "B", &[], 0.0, Some(2015), None, false, Sentiment::Negative),
            record("u4", 3, "C", &[], 0.0, Some(2016), None, true, Sentiment::Neutral),
        ]);

        let breakdown = engine.sentiment_breakdown(2015).unwrap();
        let total: usize = breakdown.counts.values().sum();
        assert_eq!(total, engine.store().release_year_rows(2015).len());
        assert_eq!(breakdown.counts[&Sentiment::Positive], 2);
        assert_eq!(breakdown.counts[&Sentiment::Negative], 1);
    }

    #[test]
    fn test_sentiment_breakdown_omits_absent_categories() {
        let engine = engine_over(vec![record(
            "u1", 1, "A", &[], 0.0, Some(2015), None, true, Sentiment::Positive,
        )]);

        let breakdown = engine.sentiment_breakdown(2015).unwrap();
        assert_eq!(breakdown.counts.len(), 1);
        assert!(!breakdown.counts.contains_key(&Sentiment::Negative));
        assert!(!breakdown.counts.contains_key(&Sentiment::Neutral));
    }

    #[test]
    fn test_sentiment_breakdown_empty_year_is_success() {
        let engine = engine_over(vec![]);
        let breakdown = engine.sentiment_breakdown(2015).unwrap();
        assert!(breakdown.counts.is_empty());
    }

    #[test]
    fn test_sentiment_labels_serialize_as_category_names() {
        let engine = engine_over(vec![record(
            "u1", 1, "A", &[], 0.0, Some(2015), None, true, Sentiment::Positive,
        )]);

        let breakdown = engine.sentiment_breakdown(2015).unwrap();
        let json = serde_json::to_value(&breakdown).unwrap();
        assert_eq!(json["counts"]["Positive"], 1);
    }
}
