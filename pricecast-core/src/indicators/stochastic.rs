//! Stochastic oscillator (%K / %D).
//!
//! %K = 100 * (close - lowest_low) / (highest_high - lowest_low) over the
//! trailing `period` bars, 50 when the window range is zero.
//! %D = SMA(3) of %K. One definition for both the series and latest forms.
//! Lookback: period - 1 for %K, period + 1 for %D.

use crate::domain::PriceBar;
use crate::indicators::Reading;

pub const STOCH_D_PERIOD: usize = 3;

/// %K and %D series, index-aligned with the input bars.
#[derive(Debug, Clone)]
pub struct StochasticSeries {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

/// Compute %K and %D over bars.
pub fn stochastic_series(bars: &[PriceBar], period: usize) -> StochasticSeries {
    assert!(period >= 1, "Stochastic period must be >= 1");
    let n = bars.len();
    let mut k = vec![f64::NAN; n];

    for i in (period.saturating_sub(1))..n {
        let window = &bars[i + 1 - period..=i];
        let mut high = f64::NEG_INFINITY;
        let mut low = f64::INFINITY;
        let mut has_nan = false;
        for bar in window {
            if bar.high.is_nan() || bar.low.is_nan() {
                has_nan = true;
                break;
            }
            high = high.max(bar.high);
            low = low.min(bar.low);
        }
        if has_nan || bars[i].close.is_nan() {
            continue;
        }

        let range = high - low;
        k[i] = if range == 0.0 {
            50.0 // flat window, no meaningful position
        } else {
            100.0 * (bars[i].close - low) / range
        };
    }

    // %D = SMA(3) of %K
    let mut d = vec![f64::NAN; n];
    for i in (STOCH_D_PERIOD - 1)..n {
        let window = &k[i + 1 - STOCH_D_PERIOD..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        d[i] = window.iter().sum::<f64>() / STOCH_D_PERIOD as f64;
    }

    StochasticSeries { k, d }
}

/// Latest %K and %D. Both degrade to the neutral 50 on insufficient history.
pub fn latest_stochastic(bars: &[PriceBar], period: usize) -> (Reading, Reading) {
    let series = stochastic_series(bars, period);
    let pick = |values: &[f64]| match values.last() {
        Some(&v) if !v.is_nan() => Reading::exact(v),
        _ => Reading::fallback(50.0),
    };
    (pick(&series.k), pick(&series.d))
}
