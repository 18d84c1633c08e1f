//! Deterministic synthetic price series.
//!
//! A random walk from 100.0, seeded from the BLAKE3 hash of a label, so the
//! same label always yields the same bars. Weekends are skipped.

use crate::domain::{PriceBar, PriceSeries, SeriesError};
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate `bars` weekday bars starting at (or after) `start`.
pub fn synthetic_series(
    label: &str,
    start: NaiveDate,
    bars: usize,
) -> Result<PriceSeries, SeriesError> {
    let seed: [u8; 32] = *blake3::hash(label.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut out = Vec::with_capacity(bars);
    let mut price = 100.0_f64;
    let mut current = start;

    while out.len() < bars {
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64);

        out.push(PriceBar {
            date: current,
            open,
            high,
            low,
            close,
            volume,
        });

        price = close;
        current += chrono::Duration::days(1);
    }

    PriceSeries::new(out)
}
