//! Synthetic bar generator.
//!
//! Deterministic random walk used when no live provider can serve a ticker.
//! The walk is seeded from the ticker name, so the same ticker always yields
//! the same history and different tickers diverge. Reports built on synthetic
//! bars are for exercising the pipeline, not for trading.

use super::provider::{History, HistorySource};
use crate::domain::PriceBar;
use crate::rng::ticker_seed;
use chrono::{Duration as ChronoDuration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const BASE_PRICE: f64 = 100.0;
const MAX_DAILY_MOVE: f64 = 0.03;
const MAX_WICK: f64 = 0.01;

/// Generate `days` consecutive daily bars ending today.
pub fn synthesize_history(ticker: &str, days: usize) -> History {
    assert!(days > 0, "days must be positive");

    let mut rng = StdRng::seed_from_u64(ticker_seed(ticker));
    let today = Utc::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc();

    let mut close = BASE_PRICE;
    let mut bars = Vec::with_capacity(days);
    for day in 0..days {
        let open = close;
        close = open * (1.0 + rng.gen_range(-MAX_DAILY_MOVE..MAX_DAILY_MOVE));
        let body_high = open.max(close);
        let body_low = open.min(close);
        let high = body_high * (1.0 + rng.gen_range(0.0..MAX_WICK));
        let low = body_low * (1.0 - rng.gen_range(0.0..MAX_WICK));
        let volume = rng.gen_range(500_000.0..5_000_000.0);

        let offset = (days - 1 - day) as i64;
        bars.push(PriceBar {
            timestamp: today - ChronoDuration::days(offset),
            open: Some(open),
            high,
            low,
            close,
            volume,
        });
    }

    History {
        ticker: ticker.to_string(),
        bars,
        source: HistorySource::Synthetic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::is_ascending;

    #[test]
    fn same_ticker_same_walk() {
        let a = synthesize_history("BTC", 100);
        let b = synthesize_history("BTC", 100);
        for (x, y) in a.bars.iter().zip(&b.bars) {
            assert_eq!(x.close, y.close);
            assert_eq!(x.volume, y.volume);
        }
    }

    #[test]
    fn different_tickers_diverge() {
        let a = synthesize_history("BTC", 50);
        let b = synthesize_history("ETH", 50);
        let same = a
            .bars
            .iter()
            .zip(&b.bars)
            .filter(|(x, y)| x.close == y.close)
            .count();
        assert!(same < 5, "walks should not track each other: {same} equal closes");
    }

    #[test]
    fn bars_are_sane_and_ascending() {
        let history = synthesize_history("SOL", 365);
        assert_eq!(history.bars.len(), 365);
        assert_eq!(history.source, HistorySource::Synthetic);
        assert!(is_ascending(&history.bars));
        for bar in &history.bars {
            assert!(bar.is_sane(), "bad bar: {bar:?}");
            assert!(bar.high >= bar.open.unwrap());
            assert!(bar.low <= bar.open.unwrap());
            assert!(bar.volume >= 500_000.0);
        }
    }

    #[test]
    fn walk_stays_positive() {
        let history = synthesize_history("DOGE", 2000);
        for bar in &history.bars {
            assert!(bar.close > 0.0);
            assert!(bar.low > 0.0);
        }
    }

    #[test]
    fn last_bar_is_today() {
        let history = synthesize_history("BTC", 10);
        let last = history.bars.last().unwrap();
        assert_eq!(last.timestamp.date_naive(), Utc::now().date_naive());
    }
}
