//! Indicator pipeline: price series in, augmented frame out.
//!
//! A single pass over a date-sorted series that computes every derived
//! column. The pipeline holds no state between runs; changing the date
//! filter means running it again on the filtered series.

use crate::domain::{PriceBar, PriceSeries};
use crate::indicators::{Bollinger, HighLowRange, Indicator, Returns, RollingStd, Rsi, Sma};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("invalid indicator parameters: {0}")]
    InvalidParams(String),
}

/// Window lengths and band multiplier for the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    pub sma_fast: usize,
    pub sma_slow: usize,
    pub band_period: usize,
    pub band_multiplier: f64,
    pub volatility_period: usize,
    pub rsi_period: usize,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            sma_fast: 20,
            sma_slow: 50,
            band_period: 20,
            band_multiplier: 2.0,
            volatility_period: 10,
            rsi_period: 14,
        }
    }
}

impl PipelineParams {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.sma_fast == 0 || self.sma_slow == 0 {
            return Err(PipelineError::InvalidParams(
                "SMA periods must be >= 1".into(),
            ));
        }
        if self.rsi_period == 0 {
            return Err(PipelineError::InvalidParams(
                "RSI period must be >= 1".into(),
            ));
        }
        if self.band_period < 2 || self.volatility_period < 2 {
            return Err(PipelineError::InvalidParams(
                "standard deviation periods must be >= 2".into(),
            ));
        }
        if !self.band_multiplier.is_finite() || self.band_multiplier < 0.0 {
            return Err(PipelineError::InvalidParams(format!(
                "band multiplier must be finite and >= 0, got {}",
                self.band_multiplier
            )));
        }
        Ok(())
    }
}

/// Derived columns produced by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Returns,
    Range,
    SmaFast,
    SmaSlow,
    Std,
    Upper,
    Lower,
    Volatility,
    Rsi,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::Returns,
        Column::Range,
        Column::SmaFast,
        Column::SmaSlow,
        Column::Std,
        Column::Upper,
        Column::Lower,
        Column::Volatility,
        Column::Rsi,
    ];

    /// Header label, with the configured period where it applies (e.g. "SMA20").
    pub fn label(&self, params: &PipelineParams) -> String {
        match self {
            Column::Returns => "Returns".into(),
            Column::Range => "Range".into(),
            Column::SmaFast => format!("SMA{}", params.sma_fast),
            Column::SmaSlow => format!("SMA{}", params.sma_slow),
            Column::Std => "STD".into(),
            Column::Upper => "Upper".into(),
            Column::Lower => "Lower".into(),
            Column::Volatility => "Volatility".into(),
            Column::Rsi => "RSI".into(),
        }
    }
}

/// The pipeline itself: validated params plus the indicator instances.
pub struct IndicatorPipeline {
    params: PipelineParams,
    returns: Returns,
    range: HighLowRange,
    sma_fast: Sma,
    sma_slow: Sma,
    std: RollingStd,
    upper: Bollinger,
    lower: Bollinger,
    volatility: RollingStd,
    rsi: Rsi,
}

impl IndicatorPipeline {
    pub fn new(params: PipelineParams) -> Result<Self, PipelineError> {
        params.validate()?;
        Ok(Self {
            returns: Returns::new(),
            range: HighLowRange::new(),
            sma_fast: Sma::new(params.sma_fast),
            sma_slow: Sma::new(params.sma_slow),
            std: RollingStd::new(params.band_period),
            upper: Bollinger::upper(params.band_period, params.band_multiplier),
            lower: Bollinger::lower(params.band_period, params.band_multiplier),
            volatility: RollingStd::new(params.volatility_period),
            rsi: Rsi::new(params.rsi_period),
            params,
        })
    }

    /// Longest warmup across all columns.
    pub fn warmup(&self) -> usize {
        self.indicators()
            .iter()
            .map(|i| i.lookback())
            .max()
            .unwrap_or(0)
    }

    fn indicators(&self) -> [&dyn Indicator; 9] {
        [
            &self.returns,
            &self.range,
            &self.sma_fast,
            &self.sma_slow,
            &self.std,
            &self.upper,
            &self.lower,
            &self.volatility,
            &self.rsi,
        ]
    }

    /// Compute every derived column over `series`.
    pub fn run(&self, series: &PriceSeries) -> IndicatorFrame {
        let bars = series.bars();
        let [returns, range, sma_fast, sma_slow, std, upper, lower, volatility, rsi] =
            self.indicators().map(|indicator| {
                let values = indicator.compute(bars);
                debug_assert_eq!(
                    values.len(),
                    bars.len(),
                    "indicator '{}' produced {} values for {} bars",
                    indicator.name(),
                    values.len(),
                    bars.len()
                );
                values
            });

        debug!(
            bars = bars.len(),
            warmup = self.warmup(),
            "indicator pipeline complete"
        );

        IndicatorFrame {
            series: series.clone(),
            params: self.params.clone(),
            returns,
            range,
            sma_fast,
            sma_slow,
            std,
            upper,
            lower,
            volatility,
            rsi,
        }
    }
}

/// A price series plus its derived columns, all the same length.
///
/// Column slices use `f64::NAN` for undefined positions; row views and
/// serialized output use `None`.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    series: PriceSeries,
    params: PipelineParams,
    returns: Vec<f64>,
    range: Vec<f64>,
    sma_fast: Vec<f64>,
    sma_slow: Vec<f64>,
    std: Vec<f64>,
    upper: Vec<f64>,
    lower: Vec<f64>,
    volatility: Vec<f64>,
    rsi: Vec<f64>,
}

impl IndicatorFrame {
    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn column(&self, column: Column) -> &[f64] {
        match column {
            Column::Returns => &self.returns,
            Column::Range => &self.range,
            Column::SmaFast => &self.sma_fast,
            Column::SmaSlow => &self.sma_slow,
            Column::Std => &self.std,
            Column::Upper => &self.upper,
            Column::Lower => &self.lower,
            Column::Volatility => &self.volatility,
            Column::Rsi => &self.rsi,
        }
    }

    /// Same values as the range column.
    pub fn spread(&self) -> &[f64] {
        &self.range
    }

    /// Column value at `index`, `None` when undefined or out of bounds.
    pub fn value(&self, column: Column, index: usize) -> Option<f64> {
        self.column(column).get(index).copied().and_then(defined)
    }

    pub fn row(&self, index: usize) -> Option<IndicatorRow> {
        let bar = self.series.bars().get(index)?;
        Some(IndicatorRow {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            returns: self.value(Column::Returns, index),
            range: self.value(Column::Range, index),
            sma_fast: self.value(Column::SmaFast, index),
            sma_slow: self.value(Column::SmaSlow, index),
            std: self.value(Column::Std, index),
            upper: self.value(Column::Upper, index),
            lower: self.value(Column::Lower, index),
            volatility: self.value(Column::Volatility, index),
            rsi: self.value(Column::Rsi, index),
        })
    }

    pub fn rows(&self) -> Vec<IndicatorRow> {
        (0..self.len()).filter_map(|i| self.row(i)).collect()
    }

    /// Rows for the last `n` bars.
    pub fn tail_rows(&self, n: usize) -> Vec<IndicatorRow> {
        let start = self.len().saturating_sub(n);
        (start..self.len()).filter_map(|i| self.row(i)).collect()
    }

    /// Index of the first of the last `n` bars.
    pub(crate) fn tail_start(&self, n: usize) -> usize {
        self.len().saturating_sub(n)
    }

    pub(crate) fn bars(&self) -> &[PriceBar] {
        self.series.bars()
    }
}

/// One bar with every derived value, as handed to table views and exports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub returns: Option<f64>,
    pub range: Option<f64>,
    pub sma_fast: Option<f64>,
    pub sma_slow: Option<f64>,
    pub std: Option<f64>,
    pub upper: Option<f64>,
    pub lower: Option<f64>,
    pub volatility: Option<f64>,
    pub rsi: Option<f64>,
}

impl IndicatorRow {
    pub fn get(&self, column: Column) -> Option<f64> {
        match column {
            Column::Returns => self.returns,
            Column::Range => self.range,
            Column::SmaFast => self.sma_fast,
            Column::SmaSlow => self.sma_slow,
            Column::Std => self.std,
            Column::Upper => self.upper,
            Column::Lower => self.lower,
            Column::Volatility => self.volatility,
            Column::Rsi => self.rsi,
        }
    }
}

pub(crate) fn defined(v: f64) -> Option<f64> {
    if v.is_nan() {
        None
    } else {
        Some(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::new(make_bars(closes)).unwrap()
    }

    fn trending(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn default_params_validate() {
        assert!(PipelineParams::default().validate().is_ok());
    }

    #[test]
    fn invalid_params_rejected() {
        let params = PipelineParams {
            band_period: 1,
            ..Default::default()
        };
        assert!(matches!(
            IndicatorPipeline::new(params),
            Err(PipelineError::InvalidParams(_))
        ));

        let params = PipelineParams {
            band_multiplier: f64::NAN,
            ..Default::default()
        };
        assert!(IndicatorPipeline::new(params).is_err());

        let params = PipelineParams {
            sma_slow: 0,
            ..Default::default()
        };
        assert!(IndicatorPipeline::new(params).is_err());
    }

    #[test]
    fn warmup_is_longest_lookback() {
        let pipeline = IndicatorPipeline::new(PipelineParams::default()).unwrap();
        assert_eq!(pipeline.warmup(), 49);
    }

    #[test]
    fn columns_match_series_length() {
        let pipeline = IndicatorPipeline::new(PipelineParams::default()).unwrap();
        let frame = pipeline.run(&series(&trending(80)));
        assert_eq!(frame.params(), &PipelineParams::default());
        for column in Column::ALL {
            assert_eq!(frame.column(column).len(), 80, "{column:?}");
        }
    }

    #[test]
    fn undefined_prefixes() {
        let pipeline = IndicatorPipeline::new(PipelineParams::default()).unwrap();
        let frame = pipeline.run(&series(&trending(80)));

        assert_eq!(frame.value(Column::Returns, 0), None);
        assert!(frame.value(Column::Returns, 1).is_some());
        assert!(frame.value(Column::Range, 0).is_some());
        assert_eq!(frame.value(Column::SmaFast, 18), None);
        assert!(frame.value(Column::SmaFast, 19).is_some());
        assert_eq!(frame.value(Column::SmaSlow, 48), None);
        assert!(frame.value(Column::SmaSlow, 49).is_some());
        assert_eq!(frame.value(Column::Volatility, 8), None);
        assert!(frame.value(Column::Volatility, 9).is_some());
        assert_eq!(frame.value(Column::Rsi, 12), None);
        assert!(frame.value(Column::Rsi, 13).is_some());
    }

    #[test]
    fn bands_derive_from_sma_and_std() {
        let pipeline = IndicatorPipeline::new(PipelineParams::default()).unwrap();
        let frame = pipeline.run(&series(&trending(60)));

        for i in 19..60 {
            let sma = frame.column(Column::SmaFast)[i];
            let std = frame.column(Column::Std)[i];
            assert_eq!(frame.column(Column::Upper)[i], sma + 2.0 * std);
            assert_eq!(frame.column(Column::Lower)[i], sma - 2.0 * std);
        }
    }

    #[test]
    fn flat_series_has_no_rsi() {
        let pipeline = IndicatorPipeline::new(PipelineParams::default()).unwrap();
        let frame = pipeline.run(&series(&[100.0; 20]));
        for i in 0..20 {
            assert_eq!(frame.value(Column::Rsi, i), None, "rsi[{i}]");
        }
        assert_eq!(frame.value(Column::Returns, 19), Some(0.0));
    }

    #[test]
    fn rsi_first_value_uses_period_bars() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + (i % 3) as f64).collect();
        let pipeline = IndicatorPipeline::new(PipelineParams::default()).unwrap();
        let frame = pipeline.run(&series(&closes));

        assert_eq!(frame.value(Column::Rsi, 12), None);
        // bars 0..=13: zero first change, then +1 +1 -2 repeating
        // gains = 9 * 1, losses = 4 * 2
        let expected = 100.0 - 100.0 / (1.0 + 9.0 / 8.0);
        assert_approx(frame.value(Column::Rsi, 13).unwrap(), expected, DEFAULT_EPSILON);
    }

    #[test]
    fn spread_equals_range() {
        let pipeline = IndicatorPipeline::new(PipelineParams::default()).unwrap();
        let frame = pipeline.run(&series(&[10.0, 12.0, 11.0]));
        assert_eq!(frame.spread(), frame.column(Column::Range));
    }

    #[test]
    fn rows_carry_bar_fields() {
        let pipeline = IndicatorPipeline::new(PipelineParams::default()).unwrap();
        let frame = pipeline.run(&series(&[100.0, 110.0, 99.0]));
        let rows = frame.rows();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].returns, None);
        assert_approx(rows[1].returns.unwrap(), 0.10, DEFAULT_EPSILON);
        assert_approx(rows[2].returns.unwrap(), -0.10, DEFAULT_EPSILON);
        assert_eq!(rows[2].close, 99.0);
        assert_eq!(rows[2].sma_fast, None);
        assert_eq!(rows[2].get(Column::Rsi), None);
        assert!(frame.row(3).is_none());
    }

    #[test]
    fn tail_rows_are_the_latest() {
        let pipeline = IndicatorPipeline::new(PipelineParams::default()).unwrap();
        let frame = pipeline.run(&series(&trending(30)));
        let tail = frame.tail_rows(5);
        assert_eq!(tail.len(), 5);
        assert_eq!(tail[4].date, frame.series().last().unwrap().date);
        assert_eq!(frame.tail_rows(100).len(), 30);
    }

    #[test]
    fn empty_series_runs() {
        let pipeline = IndicatorPipeline::new(PipelineParams::default()).unwrap();
        let frame = pipeline.run(&series(&[]));
        assert!(frame.is_empty());
        assert!(frame.rows().is_empty());
    }

    #[test]
    fn column_labels_follow_params() {
        let params = PipelineParams {
            sma_fast: 10,
            ..Default::default()
        };
        assert_eq!(Column::SmaFast.label(&params), "SMA10");
        assert_eq!(Column::SmaSlow.label(&params), "SMA50");
        assert_eq!(Column::Rsi.label(&params), "RSI");
    }
}
