//! Domain types: bars, date-sorted series, date ranges.

pub mod bar;
pub mod series;

pub use bar::PriceBar;
pub use series::{DateRange, PriceSeries, SeriesError};
