//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! Two bands (separate Indicator instances) around SMA(close, period):
//! - Upper: sma + mult * stddev(close, period)
//! - Lower: sma - mult * stddev(close, period)
//!
//! Uses sample stddev (divide by N - 1), the same helpers as `Sma` and
//! `RollingStd`, so the bands agree bit-for-bit with those columns.
//! Lookback: period - 1.

use super::{closes, rolling_mean, rolling_sample_std, Indicator};
use crate::domain::PriceBar;

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    fn with_band(period: usize, multiplier: f64, band: BollingerBand) -> Self {
        assert!(period >= 2, "Bollinger period must be >= 2");
        let label = match band {
            BollingerBand::Upper => "upper",
            BollingerBand::Lower => "lower",
        };
        Self {
            period,
            multiplier,
            band,
            name: format!("bollinger_{label}_{period}_{multiplier}"),
        }
    }

    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::with_band(period, multiplier, BollingerBand::Upper)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::with_band(period, multiplier, BollingerBand::Lower)
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let closes = closes(bars);
        let mean = rolling_mean(&closes, self.period);
        let stddev = rolling_sample_std(&closes, self.period);
        mean.iter()
            .zip(&stddev)
            .map(|(&m, &s)| match self.band {
                BollingerBand::Upper => m + self.multiplier * s,
                BollingerBand::Lower => m - self.multiplier * s,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, RollingStd, Sma, DEFAULT_EPSILON};

    #[test]
    fn bollinger_warmup() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let result = Bollinger::lower(3, 2.0).compute(&bars);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        // window 10, 11, 12: sample std 1
        assert_approx(result[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_bands_symmetric_around_sma() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let upper = Bollinger::upper(3, 2.0).compute(&bars);
        let middle = Sma::new(3).compute(&bars);
        let lower = Bollinger::lower(3, 2.0).compute(&bars);

        for i in 2..5 {
            let half_width = upper[i] - middle[i];
            assert_approx(middle[i] - lower[i], half_width, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn bollinger_width_is_four_std() {
        let bars = make_bars(&[10.0, 12.0, 9.0, 15.0, 11.0, 13.0]);
        let upper = Bollinger::upper(4, 2.0).compute(&bars);
        let lower = Bollinger::lower(4, 2.0).compute(&bars);
        let std = RollingStd::new(4).compute(&bars);

        for i in 3..6 {
            assert_approx(upper[i] - lower[i], 4.0 * std[i], 1e-9);
        }
    }

    #[test]
    fn bollinger_constant_price_zero_width() {
        let bars = make_bars(&[100.0, 100.0, 100.0, 100.0]);
        let upper = Bollinger::upper(3, 2.0).compute(&bars);
        let lower = Bollinger::lower(3, 2.0).compute(&bars);

        assert_approx(upper[2], 100.0, DEFAULT_EPSILON);
        assert_approx(lower[2], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_nan_propagation() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0, 13.0]);
        bars[2].close = f64::NAN;
        let result = Bollinger::upper(3, 2.0).compute(&bars);
        assert!(result[2].is_nan());
        assert!(result[3].is_nan());
    }

    #[test]
    fn bollinger_lookback() {
        assert_eq!(Bollinger::upper(20, 2.0).lookback(), 19);
        assert_eq!(Bollinger::upper(20, 2.0).name(), "bollinger_upper_20_2");
    }
}
