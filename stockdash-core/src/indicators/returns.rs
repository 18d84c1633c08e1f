//! Simple returns: close[i] / close[i-1] - 1.
//! Lookback: 1.

use super::Indicator;
use crate::domain::PriceBar;

#[derive(Debug, Clone, Default)]
pub struct Returns;

impl Returns {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for Returns {
    fn name(&self) -> &str {
        "returns"
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let mut result = vec![f64::NAN; bars.len()];
        for (i, w) in bars.windows(2).enumerate() {
            result[i + 1] = w[1].close / w[0].close - 1.0;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn returns_first_is_undefined() {
        let result = Returns::new().compute(&make_bars(&[100.0, 110.0, 99.0]));
        assert!(result[0].is_nan());
        assert_approx(result[1], 0.10, DEFAULT_EPSILON);
        assert_approx(result[2], -0.10, DEFAULT_EPSILON);
    }

    #[test]
    fn returns_empty_and_single() {
        assert!(Returns::new().compute(&[]).is_empty());
        let single = Returns::new().compute(&make_bars(&[42.0]));
        assert_eq!(single.len(), 1);
        assert!(single[0].is_nan());
    }
}
