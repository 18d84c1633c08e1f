//! Relative Strength Index (RSI).
//!
//! Simple (unsmoothed) variant: over the trailing `period` bars, average
//! close-to-close gains and losses independently. The first bar has no
//! prior close and contributes a zero change.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period - 1 (first valid value at index period-1).
//! Edge cases: avg_loss == 0 → 100; avg_gain == 0 → 0; both zero → NaN.

use super::Indicator;
use crate::domain::PriceBar;

/// Overbought guide level.
pub const OVERBOUGHT: f64 = 70.0;
/// Oversold guide level.
pub const OVERSOLD: f64 = 30.0;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        // changes[i] = close[i] - close[i-1]; changes[0] = 0
        let changes: Vec<f64> = std::iter::once(0.0)
            .chain(bars.windows(2).map(|w| w[1].close - w[0].close))
            .collect();

        for (k, window) in changes.windows(self.period).enumerate() {
            if window.iter().any(|c| c.is_nan()) {
                continue;
            }
            let mut gains = 0.0;
            let mut losses = 0.0;
            for &ch in window {
                if ch > 0.0 {
                    gains += ch;
                } else if ch < 0.0 {
                    losses -= ch;
                }
            }
            let avg_gain = gains / self.period as f64;
            let avg_loss = losses / self.period as f64;
            // window k covers bars k..k+period
            result[k + self.period - 1] = rsi_from_averages(avg_gain, avg_loss);
        }

        result
    }
}

/// RSI from average gain and loss with the divide-by-zero cases pinned.
///
/// A window with no movement at all has no defined RSI and yields NaN.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        f64::NAN
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    #[test]
    fn rsi_all_gains() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let result = Rsi::new(3).compute(&bars);
        assert!(result[1].is_nan());
        assert_approx(result[2], 100.0, 1e-6);
        assert_approx(result[5], 100.0, 1e-6);
    }

    #[test]
    fn rsi_all_losses() {
        let bars = make_bars(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0]);
        let result = Rsi::new(3).compute(&bars);
        assert_approx(result[2], 0.0, 1e-6);
        assert_approx(result[3], 0.0, 1e-6);
    }

    #[test]
    fn rsi_flat_is_undefined() {
        let bars = make_bars(&[100.0; 6]);
        let result = Rsi::new(3).compute(&bars);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn rsi_flat_then_move() {
        // changes: 0 (first bar), 0, 0, +2
        let bars = make_bars(&[100.0, 100.0, 100.0, 102.0]);
        let result = Rsi::new(3).compute(&bars);
        assert!(result[2].is_nan());
        assert_approx(result[3], 100.0, 1e-6);
    }

    #[test]
    fn rsi_mixed() {
        // Changes: 0 (first bar), +0.34, -0.25, -0.48, +0.72
        let bars = make_bars(&[44.0, 44.34, 44.09, 43.61, 44.33]);
        let result = Rsi::new(3).compute(&bars);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        // RSI[2] window: 0, +0.34, -0.25
        assert_approx(result[2], 100.0 - 100.0 / (1.0 + 0.34 / 0.25), 1e-9);
        // RSI[3] window: +0.34, -0.25, -0.48
        assert_approx(result[3], 100.0 - 100.0 / (1.0 + 0.34 / 0.73), 1e-9);
        // RSI[4] window: -0.25, -0.48, +0.72
        assert_approx(result[4], 100.0 - 100.0 / (1.0 + 0.72 / 0.73), 1e-9);
    }

    #[test]
    fn rsi_bounds() {
        let bars = make_bars(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0]);
        let result = Rsi::new(3).compute(&bars);
        for (i, &v) in result.iter().enumerate() {
            if !v.is_nan() {
                assert!(
                    (0.0..=100.0).contains(&v),
                    "RSI out of bounds at bar {i}: {v}"
                );
            }
        }
    }

    #[test]
    fn rsi_nan_propagation() {
        let mut bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0, 106.0, 107.0]);
        bars[2].close = f64::NAN;
        let result = Rsi::new(3).compute(&bars);
        // changes 2 and 3 are NaN; windows ending at bars 2..=5 include them
        assert!(result[2].is_nan());
        assert!(result[5].is_nan());
        assert_approx(result[6], 100.0, 1e-6);
    }

    #[test]
    fn rsi_lookback() {
        assert_eq!(Rsi::new(14).lookback(), 13);
        assert_eq!(Rsi::new(1).lookback(), 0);
    }

    #[test]
    fn rsi_from_averages_cases() {
        assert!(rsi_from_averages(0.0, 0.0).is_nan());
        assert_eq!(rsi_from_averages(1.0, 0.0), 100.0);
        assert_eq!(rsi_from_averages(0.0, 1.0), 0.0);
        assert_approx(rsi_from_averages(1.0, 1.0), 50.0, 1e-12);
    }
}
