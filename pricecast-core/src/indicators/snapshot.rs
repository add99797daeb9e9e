//! Per-bar indicator snapshots for the dashboard indicator API.
//!
//! One snapshot per bar index past [`SNAPSHOT_LOOKBACK`], assembled from the
//! individual series so every field is a real (non-NaN) measurement. Shorter
//! histories yield an empty sequence, never an error.

use crate::domain::PriceBar;
use crate::indicators::adx::directional_series;
use crate::indicators::atr::atr_series;
use crate::indicators::bollinger::bollinger_series;
use crate::indicators::ema::ema_series;
use crate::indicators::macd::macd_series;
use crate::indicators::rsi::rsi_series;
use crate::indicators::stochastic::stochastic_series;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const RSI_PERIOD: usize = 14;
pub const ATR_PERIOD: usize = 14;
pub const ADX_PERIOD: usize = 14;
pub const STOCH_PERIOD: usize = 14;
pub const BB_PERIOD: usize = 20;
pub const BB_MULTIPLIER: f64 = 2.0;
pub const EMA_PERIODS: [usize; 3] = [20, 50, 200];

/// Bars consumed before the first snapshot.
///
/// The gate is the slowest warmup in the set: Wilder ADX needs one smoothing
/// pass for DI and a second for ADX itself, 2 * ADX_PERIOD bars.
pub const SNAPSHOT_LOOKBACK: usize = 2 * ADX_PERIOD;

/// Full indicator state at one bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub ema20: f64,
    pub ema50: f64,
    pub ema200: f64,
    pub rsi: f64,
    pub rsi_prev: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub atr: f64,
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
    pub bb_upper: f64,
    pub bb_middle: f64,
    pub bb_lower: f64,
    pub stoch_k: f64,
    pub stoch_d: f64,
    pub volume: f64,
}

/// Compute one snapshot per bar index >= SNAPSHOT_LOOKBACK.
pub fn snapshot_series(bars: &[PriceBar]) -> Vec<IndicatorSnapshot> {
    let n = bars.len();
    if n <= SNAPSHOT_LOOKBACK {
        return Vec::new();
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema20 = ema_series(&closes, EMA_PERIODS[0]);
    let ema50 = ema_series(&closes, EMA_PERIODS[1]);
    let ema200 = ema_series(&closes, EMA_PERIODS[2]);
    let rsi = rsi_series(&closes, RSI_PERIOD);
    let macd = macd_series(&closes);
    let atr = atr_series(bars, ATR_PERIOD);
    let directional = directional_series(bars, ADX_PERIOD);
    let bb = bollinger_series(&closes, BB_PERIOD, BB_MULTIPLIER);
    let stoch = stochastic_series(bars, STOCH_PERIOD);

    let mut snapshots = Vec::with_capacity(n - SNAPSHOT_LOOKBACK);
    for i in SNAPSHOT_LOOKBACK..n {
        let fields = [
            ema20[i],
            ema50[i],
            ema200[i],
            rsi[i],
            rsi[i - 1],
            macd.line[i],
            macd.signal[i],
            macd.histogram[i],
            atr[i],
            directional.adx[i],
            directional.plus_di[i],
            directional.minus_di[i],
            bb.upper[i],
            bb.middle[i],
            bb.lower[i],
            stoch.k[i],
            stoch.d[i],
        ];
        // A NaN here means the input data itself was dirty; skip the bar
        // rather than leak NaN into the dashboard payload.
        if fields.iter().any(|v| v.is_nan()) || bars[i].close.is_nan() {
            continue;
        }

        snapshots.push(IndicatorSnapshot {
            timestamp: bars[i].timestamp,
            close: bars[i].close,
            ema20: ema20[i],
            ema50: ema50[i],
            ema200: ema200[i],
            rsi: rsi[i],
            rsi_prev: rsi[i - 1],
            macd: macd.line[i],
            macd_signal: macd.signal[i],
            macd_hist: macd.histogram[i],
            atr: atr[i],
            adx: directional.adx[i],
            plus_di: directional.plus_di[i],
            minus_di: directional.minus_di[i],
            bb_upper: bb.upper[i],
            bb_middle: bb.middle[i],
            bb_lower: bb.lower[i],
            stoch_k: stoch.k[i],
            stoch_d: stoch.d[i],
            volume: bars[i].volume,
        });
    }

    snapshots
}
