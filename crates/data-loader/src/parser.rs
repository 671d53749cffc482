//! Parser for the dataset export.
//!
//! The export is a single CSV file with one row per user/game observation:
//!
//! `user_id,item_id,item_name,genres,playtime_forever,release_anio,reviews_anio,reviews_recommend,sentiment_analysis`
//!
//! Rows are read loosely typed first (everything the exporter is sloppy
//! about stays a string), then converted field by field so that a bad value
//! reports its row and field instead of a generic deserialize error.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::Deserialize;
use std::path::Path;

/// One CSV row as written by the exporter, before semantic conversion.
///
/// Year columns stay `String` because the exporter writes sentinels like
/// "unavailable" (and occasionally float-formatted years) into them.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRecord {
    pub user_id: String,
    pub item_id: ItemId,
    pub item_name: String,
    pub genres: String,
    pub playtime_forever: f64,
    pub release_anio: String,
    pub reviews_anio: String,
    pub reviews_recommend: String,
    pub sentiment_analysis: String,
}

/// Parse a year column value.
///
/// Numeric values (including float-formatted ones like "2015.0") become
/// `Some(year)`; empty strings and non-numeric sentinels become `None`
/// rather than an error; missing years are excluded from aggregation,
/// never coerced to 0.
fn parse_year(s: &str) -> Option<u16> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(year) = trimmed.parse::<u16>() {
        return Some(year);
    }
    // Float-formatted years from the exporter: "2015.0"
    if let Ok(value) = trimmed.parse::<f64>() {
        if value.fract() == 0.0 && value >= 0.0 && value <= u16::MAX as f64 {
            return Some(value as u16);
        }
    }
    None
}

/// Parse the recommend flag. The exporter writes Python-style booleans.
fn parse_recommend(s: &str) -> Result<bool> {
    match s.trim() {
        "true" | "True" | "1" => Ok(true),
        "false" | "False" | "0" => Ok(false),
        other => Err(DataLoadError::InvalidValue {
            field: "reviews_recommend".to_string(),
            value: other.to_string(),
        }),
    }
}

/// Parse the sentiment label. Only 0/1/2 are permitted.
fn parse_sentiment(s: &str) -> Result<Sentiment> {
    match s.trim() {
        "0" => Ok(Sentiment::Negative),
        "1" => Ok(Sentiment::Neutral),
        "2" => Ok(Sentiment::Positive),
        other => Err(DataLoadError::InvalidValue {
            field: "sentiment_analysis".to_string(),
            value: other.to_string(),
        }),
    }
}

/// Parse pipe-separated genre tokens.
///
/// Example: "Action|Indie" -> vec!["Action", "Indie"]
/// Empty tokens are dropped; an entirely empty column yields no tokens.
fn parse_genres(s: &str) -> Vec<String> {
    s.split('|')
        .map(|token| token.trim())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
        .collect()
}

/// Convert a raw CSV row into an `InteractionRecord`.
///
/// `row` is the 1-based data row number, used for error context.
pub(crate) fn record_from_raw(raw: RawRecord, row: usize) -> Result<InteractionRecord> {
    if raw.playtime_forever < 0.0 {
        return Err(DataLoadError::ParseError {
            row,
            reason: format!("negative playtime: {}", raw.playtime_forever),
        });
    }

    Ok(InteractionRecord {
        user_id: raw.user_id,
        item_id: raw.item_id,
        item_name: raw.item_name,
        genres: parse_genres(&raw.genres),
        playtime_minutes: raw.playtime_forever,
        release_year: parse_year(&raw.release_anio),
        review_year: parse_year(&raw.reviews_anio),
        recommend: parse_recommend(&raw.reviews_recommend).map_err(|e| match e {
            DataLoadError::InvalidValue { field, value } => DataLoadError::ParseError {
                row,
                reason: format!("invalid {}: {}", field, value),
            },
            other => other,
        })?,
        sentiment: parse_sentiment(&raw.sentiment_analysis).map_err(|e| match e {
            DataLoadError::InvalidValue { field, value } => DataLoadError::ParseError {
                row,
                reason: format!("invalid {}: {}", field, value),
            },
            other => other,
        })?,
    })
}

/// Parse the whole export into records, preserving file order.
pub fn parse_interactions(path: &Path) -> Result<Vec<InteractionRecord>> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();

    for (idx, result) in reader.deserialize::<RawRecord>().enumerate() {
        let raw = result?;
        records.push(record_from_raw(raw, idx + 1)?);
    }

    Ok(records)
}
