//! Deterministic synthetic bars for tests, benchmarks and demos.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::Bar;

/// Generate `n` daily bars following a seeded random walk.
///
/// The same seed always produces the same series. Prices are rounded to
/// cents and every bar satisfies `Bar::is_sane`.
pub fn synthetic_bars(n: usize, seed: u64) -> Vec<Bar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = NaiveDate::from_ymd_opt(2006, 1, 2)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    let mut close: f64 = 3600.0;
    let mut bars = Vec::with_capacity(n);

    for i in 0..n {
        let open = close;
        let change: f64 = rng.gen_range(-0.015..0.015) * open;
        close = round_cents((open + change).max(1.0));
        let high = round_cents(open.max(close) + rng.gen_range(0.0..0.006) * open);
        let low = round_cents((open.min(close) - rng.gen_range(0.0..0.006) * open).max(0.5));
        let volume = rng.gen_range(1_000.0..50_000.0_f64).round();
        bars.push(Bar::new(
            start + Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume,
        ));
    }

    bars
}

fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_series() {
        let a = synthetic_bars(50, 7);
        let b = synthetic_bars(50, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seed_different_series() {
        let a = synthetic_bars(50, 7);
        let b = synthetic_bars(50, 8);
        assert_ne!(a, b);
    }

    #[test]
    fn bars_are_sane_and_chronological() {
        let bars = synthetic_bars(255, 42);
        assert_eq!(bars.len(), 255);
        assert!(bars.iter().all(Bar::is_sane));
        assert!(bars.windows(2).all(|w| w[0].datetime < w[1].datetime));
    }
}
