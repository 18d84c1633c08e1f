//! Data ingestion, caching, fingerprinting and synthetic series.

pub mod cache;
pub mod fingerprint;
pub mod ingest;
pub mod synthetic;

pub use cache::SeriesCache;
pub use fingerprint::dataset_hash;
pub use ingest::{load_csv, read_csv, CsvOptions};
pub use synthetic::synthetic_series;

use crate::domain::SeriesError;
use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Structured error types for data loading.
///
/// Row numbers are 1-based data rows (the header is not counted).
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("row {row}: malformed record: {message}")]
    Malformed { row: usize, message: String },

    #[error("row {row}: unparseable date '{value}'")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: volume must be a non-negative integer, got {value}")]
    InvalidVolume { row: usize, value: f64 },

    #[error("row {row}: bar on {date} failed OHLC sanity check")]
    InsaneBar { row: usize, date: NaiveDate },

    #[error("duplicate date {date} at rows {first} and {second}")]
    DuplicateDate {
        date: NaiveDate,
        first: usize,
        second: usize,
    },

    #[error("no data rows in {0}")]
    Empty(String),

    #[error("series error: {0}")]
    Series(#[from] SeriesError),
}
