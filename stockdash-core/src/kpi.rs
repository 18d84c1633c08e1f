//! Headline KPI values shown above the charts.

use crate::domain::PriceSeries;
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum KpiError {
    #[error("KPIs need at least {required} bars, got {actual}")]
    InsufficientBars { required: usize, actual: usize },

    #[error("total volume overflows u64")]
    VolumeOverflow,
}

/// KPI card values for a (filtered) price series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub as_of: NaiveDate,
    pub current_price: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_pct: f64,
    pub highest_price: f64,
    pub lowest_price: f64,
    pub total_volume: u64,
}

impl Kpis {
    /// Minimum bars needed: the delta compares the last two closes.
    pub const MIN_BARS: usize = 2;

    pub fn from_series(series: &PriceSeries) -> Result<Self, KpiError> {
        let bars = series.bars();
        let [.., prev, last] = bars else {
            return Err(KpiError::InsufficientBars {
                required: Self::MIN_BARS,
                actual: bars.len(),
            });
        };

        let change = last.close - prev.close;
        let highest_price = bars.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let lowest_price = bars.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        let total_volume = bars
            .iter()
            .try_fold(0u64, |acc, b| acc.checked_add(b.volume))
            .ok_or(KpiError::VolumeOverflow)?;

        Ok(Self {
            as_of: last.date,
            current_price: last.close,
            previous_close: prev.close,
            change,
            change_pct: change / prev.close * 100.0,
            highest_price,
            lowest_price,
            total_volume,
        })
    }
}
