//! Dashboard view model.
//!
//! Everything a UI needs to draw the dashboard: KPI cards, the mini-chart
//! rows, the main candle chart with optional overlays, the RSI panel and
//! the raw data table. Built fresh for every date-range or toggle change.

use crate::config::{ConfigError, DashboardConfig};
use crate::data::dataset_hash;
use crate::domain::{DateRange, PriceSeries};
use crate::indicators::rsi::{OVERBOUGHT, OVERSOLD};
use crate::kpi::{KpiError, Kpis};
use crate::pipeline::{
    defined, Column, IndicatorFrame, IndicatorPipeline, IndicatorRow, PipelineError,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Kpi(#[from] KpiError),

    #[error("no bars between {start} and {end}")]
    EmptyRange { start: String, end: String },
}

/// Which optional overlays and panels are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayToggles {
    pub show_sma_fast: bool,
    pub show_sma_slow: bool,
    pub show_rsi: bool,
    pub show_bollinger: bool,
}

impl Default for DisplayToggles {
    fn default() -> Self {
        Self {
            show_sma_fast: true,
            show_sma_slow: true,
            show_rsi: true,
            show_bollinger: true,
        }
    }
}

impl DisplayToggles {
    /// Derived columns to show in tables and exports, in pipeline order.
    pub fn visible_columns(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|c| match c {
                Column::SmaFast => self.show_sma_fast,
                Column::SmaSlow => self.show_sma_slow,
                Column::Std | Column::Upper | Column::Lower => self.show_bollinger,
                Column::Rsi => self.show_rsi,
                Column::Returns | Column::Range | Column::Volatility => true,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumePoint {
    pub date: NaiveDate,
    pub volume: u64,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// The two rows of small charts, over the trailing window only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MiniCharts {
    pub close: Vec<LinePoint>,
    pub volume: Vec<VolumePoint>,
    pub returns: Vec<LinePoint>,
    pub range: Vec<LinePoint>,
    pub sma_fast: Vec<LinePoint>,
    pub sma_slow: Vec<LinePoint>,
    pub spread: Vec<LinePoint>,
    pub volatility: Vec<LinePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MainChart {
    pub candles: Vec<Candle>,
    pub sma_fast: Option<Vec<LinePoint>>,
    pub sma_slow: Option<Vec<LinePoint>>,
    pub upper_band: Option<Vec<LinePoint>>,
    pub lower_band: Option<Vec<LinePoint>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RsiPanel {
    pub points: Vec<LinePoint>,
    pub overbought: f64,
    pub oversold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub dataset_hash: String,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub bar_count: usize,
    pub toggles: DisplayToggles,
    pub kpis: Kpis,
    pub mini_charts: MiniCharts,
    pub main_chart: MainChart,
    pub rsi: Option<RsiPanel>,
    pub table: Vec<IndicatorRow>,
}

impl DashboardView {
    /// Filter `series` to the configured range, run the pipeline and lay out every panel.
    pub fn build(series: &PriceSeries, config: &DashboardConfig) -> Result<Self, ViewError> {
        config.validate()?;

        let filtered = series.filter(&config.range);
        let Some((first_date, last_date)) = filtered.date_bounds() else {
            return Err(empty_range(&config.range));
        };

        let pipeline = IndicatorPipeline::new(config.indicators.clone())?;
        if filtered.len() <= pipeline.warmup() {
            warn!(
                bars = filtered.len(),
                warmup = pipeline.warmup(),
                "date range shorter than indicator warmup, some columns stay undefined"
            );
        }
        let frame = pipeline.run(&filtered);
        let kpis = Kpis::from_series(&filtered)?;
        let toggles = config.display;

        let mini_charts = mini_charts(&frame, config.layout.mini_chart_bars);
        let main_chart = MainChart {
            candles: frame
                .bars()
                .iter()
                .map(|b| Candle {
                    date: b.date,
                    open: b.open,
                    high: b.high,
                    low: b.low,
                    close: b.close,
                })
                .collect(),
            sma_fast: toggles
                .show_sma_fast
                .then(|| line(&frame, frame.column(Column::SmaFast), 0)),
            sma_slow: toggles
                .show_sma_slow
                .then(|| line(&frame, frame.column(Column::SmaSlow), 0)),
            upper_band: toggles
                .show_bollinger
                .then(|| line(&frame, frame.column(Column::Upper), 0)),
            lower_band: toggles
                .show_bollinger
                .then(|| line(&frame, frame.column(Column::Lower), 0)),
        };
        let rsi = toggles.show_rsi.then(|| RsiPanel {
            points: line(&frame, frame.column(Column::Rsi), 0),
            overbought: OVERBOUGHT,
            oversold: OVERSOLD,
        });

        debug!(bars = frame.len(), "dashboard view built");

        Ok(Self {
            dataset_hash: dataset_hash(&filtered),
            first_date,
            last_date,
            bar_count: frame.len(),
            toggles,
            kpis,
            mini_charts,
            main_chart,
            rsi,
            table: frame.tail_rows(config.layout.table_rows),
        })
    }
}

fn mini_charts(frame: &IndicatorFrame, window: usize) -> MiniCharts {
    let start = frame.tail_start(window);
    let column = |c: Column| line(frame, frame.column(c), start);
    let recent = frame.series().tail(window);

    MiniCharts {
        close: recent
            .iter()
            .map(|b| LinePoint {
                date: b.date,
                value: Some(b.close),
            })
            .collect(),
        volume: recent
            .iter()
            .map(|b| VolumePoint {
                date: b.date,
                volume: b.volume,
                direction: if b.is_up() {
                    Direction::Up
                } else {
                    Direction::Down
                },
            })
            .collect(),
        returns: column(Column::Returns),
        range: column(Column::Range),
        sma_fast: column(Column::SmaFast),
        sma_slow: column(Column::SmaSlow),
        spread: line(frame, frame.spread(), start),
        volatility: column(Column::Volatility),
    }
}

/// Pair each value from `start` onwards with its bar date.
fn line(frame: &IndicatorFrame, values: &[f64], start: usize) -> Vec<LinePoint> {
    frame.bars()[start..]
        .iter()
        .zip(&values[start..])
        .map(|(b, &v)| LinePoint {
            date: b.date,
            value: defined(v),
        })
        .collect()
}

fn empty_range(range: &DateRange) -> ViewError {
    let show = |d: Option<NaiveDate>| d.map_or_else(|| "open".to_string(), |d| d.to_string());
    ViewError::EmptyRange {
        start: show(range.start),
        end: show(range.end),
    }
}
