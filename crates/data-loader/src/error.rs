//! Error types for the data-loader crate.

use thiserror::Error;

/// Errors that can occur while loading and validating the dataset export.
///
/// Every variant carries enough context to point at the offending file,
/// row, or field without re-reading the input.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open dataset file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading the file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV-level error (malformed row, wrong field count, bad UTF-8)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row couldn't be converted into an interaction record
    #[error("Parse error at row {row}: {reason}")]
    ParseError { row: usize, reason: String },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Data validation failed after load
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
