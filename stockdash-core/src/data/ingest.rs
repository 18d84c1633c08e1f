//! CSV ingestion: Date, Open, High, Low, Close, Volume.
//!
//! Rows are validated one by one; failures carry the 1-based data row.
//! Columns beyond the six above are ignored.

use super::DataError;
use crate::domain::{PriceBar, PriceSeries};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Raw CSV row; header names are matched case-insensitively for the common spellings.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date", alias = "DATE", alias = "Timestamp", alias = "timestamp")]
    date: String,
    #[serde(alias = "Open", alias = "OPEN")]
    open: f64,
    #[serde(alias = "High", alias = "HIGH")]
    high: f64,
    #[serde(alias = "Low", alias = "LOW")]
    low: f64,
    #[serde(alias = "Close", alias = "CLOSE")]
    close: f64,
    #[serde(alias = "Volume", alias = "VOLUME")]
    volume: f64,
}

/// CSV reader options.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Explicit date format tried before the built-in list.
    pub date_format: Option<String>,
    pub delimiter: u8,
    /// Skip rows that fail to parse or validate instead of failing the load.
    pub skip_invalid: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            date_format: None,
            delimiter: b',',
            skip_invalid: false,
        }
    }
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.fZ",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a date, keeping only the calendar day of datetime values.
pub fn parse_date(s: &str, format: Option<&str>) -> Option<NaiveDate> {
    if let Some(fmt) = format {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Load a price series from a CSV file.
pub fn load_csv(path: impl AsRef<Path>, options: &CsvOptions) -> Result<PriceSeries, DataError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let series = read_csv(file, options).map_err(|e| match e {
        DataError::Empty(_) => DataError::Empty(path.display().to_string()),
        other => other,
    })?;

    if let Some((first, last)) = series.date_bounds() {
        info!(
            path = %path.display(),
            bars = series.len(),
            %first,
            %last,
            "loaded price series"
        );
    }
    Ok(series)
}

/// Read a price series from any CSV source.
pub fn read_csv<R: Read>(reader: R, options: &CsvOptions) -> Result<PriceSeries, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    // (row number, bar)
    let mut rows: Vec<(usize, PriceBar)> = Vec::new();
    let mut skipped = 0usize;

    for (idx, record) in reader.deserialize::<CsvRow>().enumerate() {
        let row = idx + 1;
        let parsed = record
            .map_err(|e| DataError::Malformed {
                row,
                message: e.to_string(),
            })
            .and_then(|raw| to_bar(row, raw, options));

        match parsed {
            Ok(bar) => rows.push((row, bar)),
            Err(e) if options.skip_invalid => {
                debug!(error = %e, "skipping row");
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    if skipped > 0 {
        warn!(skipped, "skipped invalid rows");
    }
    if rows.is_empty() {
        return Err(DataError::Empty("input".into()));
    }

    rows.sort_by_key(|(_, bar)| bar.date);
    if let Some(pair) = rows.windows(2).find(|w| w[0].1.date == w[1].1.date) {
        let (first, second) = (pair[0].0.min(pair[1].0), pair[0].0.max(pair[1].0));
        return Err(DataError::DuplicateDate {
            date: pair[0].1.date,
            first,
            second,
        });
    }

    let bars = rows.into_iter().map(|(_, bar)| bar).collect();
    Ok(PriceSeries::new(bars)?)
}

fn to_bar(row: usize, raw: CsvRow, options: &CsvOptions) -> Result<PriceBar, DataError> {
    let date = parse_date(&raw.date, options.date_format.as_deref())
        .ok_or_else(|| DataError::InvalidDate {
            row,
            value: raw.date.clone(),
        })?;

    if !raw.volume.is_finite() || raw.volume < 0.0 || raw.volume.fract() != 0.0 {
        return Err(DataError::InvalidVolume {
            row,
            value: raw.volume,
        });
    }

    let bar = PriceBar {
        date,
        open: raw.open,
        high: raw.high,
        low: raw.low,
        close: raw.close,
        volume: raw.volume as u64,
    };
    if !bar.is_sane() {
        return Err(DataError::InsaneBar { row, date });
    }
    Ok(bar)
}
