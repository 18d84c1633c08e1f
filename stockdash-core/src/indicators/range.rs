//! Daily high-low range (shown as both "Range" and "Spread").
//! Lookback: 0.

use super::Indicator;
use crate::domain::PriceBar;

#[derive(Debug, Clone, Default)]
pub struct HighLowRange;

impl HighLowRange {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for HighLowRange {
    fn name(&self) -> &str {
        "range"
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        bars.iter().map(PriceBar::range).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn range_is_high_minus_low() {
        // make_bars: high = max(open, close) + 1, low = min(open, close) - 1
        let result = HighLowRange::new().compute(&make_bars(&[10.0, 13.0]));
        assert_eq!(result, vec![2.0, 5.0]);
    }
}
