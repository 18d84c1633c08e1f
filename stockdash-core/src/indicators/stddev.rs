//! Rolling sample standard deviation of close.
//!
//! Backs both the Bollinger band width (period 20) and the volatility
//! column (period 10). Uses the n - 1 denominator.
//! Lookback: period - 1.

use super::{closes, rolling_sample_std, Indicator};
use crate::domain::PriceBar;

#[derive(Debug, Clone)]
pub struct RollingStd {
    period: usize,
    name: String,
}

impl RollingStd {
    pub fn new(period: usize) -> Self {
        assert!(period >= 2, "sample stddev period must be >= 2");
        Self {
            period,
            name: format!("std_{period}"),
        }
    }
}

impl Indicator for RollingStd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        rolling_sample_std(&closes(bars), self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn std_3_basic() {
        let bars = make_bars(&[10.0, 12.0, 14.0, 14.0]);
        let result = RollingStd::new(3).compute(&bars);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        // [10,12,14]: mean 12, squared diffs 4+0+4=8, /2 → 4, sqrt → 2
        assert_approx(result[2], 2.0, DEFAULT_EPSILON);
        // [12,14,14]: mean 13.333.., squared diffs sum 2.6667, /2 → 1.3333
        assert_approx(result[3], (4.0_f64 / 3.0).sqrt(), DEFAULT_EPSILON);
    }

    #[test]
    fn std_constant_is_zero() {
        let bars = make_bars(&[50.0; 12]);
        let result = RollingStd::new(10).compute(&bars);
        assert_approx(result[9], 0.0, DEFAULT_EPSILON);
        assert_approx(result[11], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn std_nan_propagation() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        bars[1].close = f64::NAN;
        let result = RollingStd::new(2).compute(&bars);
        assert!(result[1].is_nan());
        assert!(result[2].is_nan());
        assert!(!result[3].is_nan());
    }

    #[test]
    #[should_panic(expected = "period must be >= 2")]
    fn std_rejects_period_one() {
        RollingStd::new(1);
    }
}
