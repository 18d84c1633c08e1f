//! PriceSeries: a date-ascending sequence of bars with unique dates.

use super::bar::PriceBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("duplicate date {0} in price series")]
    DuplicateDate(NaiveDate),

    #[error("bar on {date} failed OHLC sanity check")]
    InsaneBar { date: NaiveDate },

    #[error("date range start {start} is after end {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

/// Inclusive date range. A missing bound is open on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, SeriesError> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    /// Unbounded range (keeps every bar).
    pub fn all() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), SeriesError> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start > end => {
                Err(SeriesError::InvertedRange { start, end })
            }
            _ => Ok(()),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

/// Bars sorted ascending by date, no duplicate dates, every bar sane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Sort bars by date and validate them.
    pub fn new(mut bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        bars.sort_by_key(|b| b.date);

        for bar in &bars {
            if !bar.is_sane() {
                return Err(SeriesError::InsaneBar { date: bar.date });
            }
        }
        if let Some(pair) = bars.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(SeriesError::DuplicateDate(pair[1].date));
        }

        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// First and last date, if any bars.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.first()?.date, self.last()?.date))
    }

    /// Bars whose date falls within `range`. Order and validity carry over.
    pub fn filter(&self, range: &DateRange) -> PriceSeries {
        PriceSeries {
            bars: self
                .bars
                .iter()
                .filter(|b| range.contains(b.date))
                .cloned()
                .collect(),
        }
    }

    /// The last `n` bars (or all of them if fewer).
    pub fn tail(&self, n: usize) -> &[PriceBar] {
        let start = self.bars.len().saturating_sub(n);
        &self.bars[start..]
    }
}
