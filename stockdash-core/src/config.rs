//! Dashboard configuration (TOML).
//!
//! Every table is optional and falls back to the defaults:
//!
//! ```toml
//! [data]
//! csv = "prices.csv"
//!
//! [range]
//! start = "2023-01-01"
//! end = "2023-12-31"
//!
//! [display]
//! show_sma_fast = true
//! show_sma_slow = true
//! show_rsi = true
//! show_bollinger = true
//!
//! [indicators]
//! sma_fast = 20
//! sma_slow = 50
//! band_period = 20
//! band_multiplier = 2.0
//! volatility_period = 10
//! rsi_period = 14
//!
//! [layout]
//! mini_chart_bars = 60
//! table_rows = 200
//! ```

use crate::data::CsvOptions;
use crate::domain::{DateRange, SeriesError};
use crate::pipeline::{PipelineError, PipelineParams};
use crate::view::DisplayToggles;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid date range: {0}")]
    Range(#[from] SeriesError),

    #[error(transparent)]
    Params(#[from] PipelineError),

    #[error("invalid layout: {0}")]
    Layout(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data: DataConfig,
    pub range: DateRange,
    pub display: DisplayToggles,
    pub indicators: PipelineParams,
    pub layout: LayoutConfig,
}

/// Where the price CSV lives and how to read it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub csv: Option<PathBuf>,
    pub date_format: Option<String>,
    pub skip_invalid: bool,
}

impl DataConfig {
    pub fn csv_options(&self) -> CsvOptions {
        CsvOptions {
            date_format: self.date_format.clone(),
            skip_invalid: self.skip_invalid,
            ..CsvOptions::default()
        }
    }
}

/// How many trailing bars the mini charts and raw table show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub mini_chart_bars: usize,
    pub table_rows: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mini_chart_bars: 60,
            table_rows: 200,
        }
    }
}

impl DashboardConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;

        // relative CSV paths are relative to the config file
        if let (Some(csv), Some(dir)) = (config.data.csv.as_ref(), path.parent()) {
            if csv.is_relative() {
                config.data.csv = Some(dir.join(csv));
            }
        }
        Ok(config)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.range.validate()?;
        self.indicators.validate()?;
        if self.layout.mini_chart_bars == 0 {
            return Err(ConfigError::Layout("mini_chart_bars must be >= 1".into()));
        }
        if self.layout.table_rows == 0 {
            return Err(ConfigError::Layout("table_rows must be >= 1".into()));
        }
        Ok(())
    }
}
