//! Daily volatility estimation from recent closes.

use crate::indicators::Reading;

/// Trailing returns used for the estimate.
pub const VOLATILITY_WINDOW: usize = 30;

/// Substitute when history is too short to measure spread.
pub const FALLBACK_VOLATILITY: f64 = 0.02;

/// Population stddev of simple daily returns over the trailing
/// [`VOLATILITY_WINDOW`] returns. Needs at least two returns (three closes);
/// anything less degrades to [`FALLBACK_VOLATILITY`] with the flag set, as
/// does dirty input (NaN or non-positive closes).
pub fn daily_volatility(closes: &[f64]) -> Reading {
    if closes.len() < 3 {
        return Reading::fallback(FALLBACK_VOLATILITY);
    }

    let start = closes.len().saturating_sub(VOLATILITY_WINDOW + 1);
    let tail = &closes[start..];

    let mut returns = Vec::with_capacity(tail.len() - 1);
    for pair in tail.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        if prev.is_nan() || curr.is_nan() || prev <= 0.0 {
            return Reading::fallback(FALLBACK_VOLATILITY);
        }
        returns.push(curr / prev - 1.0);
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / n;
    Reading::exact(variance.sqrt())
}
