//! StockDash Core: price series, indicator pipeline, KPIs and dashboard view model.
//!
//! - Domain types (bars, date-sorted series, date ranges)
//! - CSV ingestion with row-level validation and a process-lifetime cache
//! - Rolling indicators behind a single `Indicator` trait
//! - Indicator pipeline producing an augmented frame
//! - KPI cards and the serializable dashboard view model
//! - TOML configuration and CSV/JSON export

pub mod config;
pub mod data;
pub mod domain;
pub mod export;
pub mod indicators;
pub mod kpi;
pub mod pipeline;
pub mod view;

pub use config::{ConfigError, DashboardConfig};
pub use data::{DataError, SeriesCache};
pub use domain::{DateRange, PriceBar, PriceSeries};
pub use kpi::{KpiError, Kpis};
pub use pipeline::{Column, IndicatorFrame, IndicatorPipeline, IndicatorRow, PipelineParams};
pub use view::{DashboardView, DisplayToggles, ViewError};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: shared types are Send + Sync so a UI thread can hold them.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<PriceBar>();
        require_sync::<PriceBar>();
        require_send::<PriceSeries>();
        require_sync::<PriceSeries>();
        require_send::<IndicatorFrame>();
        require_sync::<IndicatorFrame>();
        require_send::<IndicatorPipeline>();
        require_sync::<IndicatorPipeline>();
        require_send::<DashboardView>();
        require_sync::<DashboardView>();
        require_send::<SeriesCache>();
        require_sync::<SeriesCache>();
    }
}
