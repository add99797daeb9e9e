//! Stateless technical-indicator library.
//!
//! One module per indicator. Series forms take slices and return full-length
//! vectors with `f64::NAN` during warmup; latest forms return a [`Reading`]
//! that substitutes the documented neutral default when history is too short.
//! Nothing in here holds state or performs I/O, so identical input always
//! produces identical output.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod snapshot;
pub mod stochastic;

pub use adx::{directional_series, latest_directional, DirectionalReading, DirectionalSeries};
pub use atr::{atr_series, latest_atr, true_range, wilder_smooth};
pub use bollinger::{bollinger_series, BollingerSeries};
pub use ema::ema_series;
pub use macd::{latest_macd, macd_series, MacdPoint, MacdSeries};
pub use rsi::{latest_rsi, rsi_series};
pub use snapshot::{snapshot_series, IndicatorSnapshot, SNAPSHOT_LOOKBACK};
pub use stochastic::{latest_stochastic, stochastic_series, StochasticSeries};

use serde::{Deserialize, Serialize};

/// A scalar indicator value plus its provenance.
///
/// Latest-form indicator functions never error on short history; they return
/// the neutral default with `is_fallback = true` so callers can surface the
/// degradation instead of mistaking the default for a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub value: f64,
    pub is_fallback: bool,
}

impl Reading {
    pub fn exact(value: f64) -> Self {
        Self {
            value,
            is_fallback: false,
        }
    }

    pub fn fallback(value: f64) -> Self {
        Self {
            value,
            is_fallback: true,
        }
    }
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::PriceBar> {
    use crate::domain::PriceBar;
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceBar {
                timestamp: base + chrono::Duration::days(i as i64),
                open: Some(open),
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Create bars with explicit (high, low, close) tuples for testing.
#[cfg(test)]
pub fn make_hlc_bars(data: &[(f64, f64, f64)]) -> Vec<crate::domain::PriceBar> {
    use crate::domain::PriceBar;
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(high, low, close))| PriceBar {
            timestamp: base + chrono::Duration::days(i as i64),
            open: Some(close),
            high,
            low,
            close,
            volume: 1000.0,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
