//! PriceBar: the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV bar for a single instrument on a single day.
///
/// Bars arrive ordered ascending by timestamp and are never mutated after
/// fetch. `open` is optional because some chart endpoints omit it for the
/// most recent partial day; nothing downstream depends on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: Option<f64>,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    /// Returns true if any required field is NaN.
    pub fn is_void(&self) -> bool {
        self.high.is_nan() || self.low.is_nan() || self.close.is_nan() || self.volume.is_nan()
    }

    /// Basic OHLC sanity check: high >= low, close inside the range, positive prices.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.close
            && self.low <= self.close
            && self.close > 0.0
    }
}

/// Extract the close series from a bar slice.
pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Returns true if timestamps are strictly ascending.
pub fn is_ascending(bars: &[PriceBar]) -> bool {
    bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp)
}
