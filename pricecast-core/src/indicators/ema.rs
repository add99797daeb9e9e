//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = k * value[t] + (1 - k) * EMA[t-1], k = 2 / (period + 1).
//! Seed: EMA[0] = value[0], so the series is defined from the first sample.
//! Short histories therefore still produce a value at every index; the early
//! values simply carry less smoothing.

/// Compute the EMA series over a raw f64 slice.
///
/// Also used by composed indicators (MACD line and signal) that need the EMA
/// of an arbitrary series.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    assert!(period >= 1, "EMA period must be >= 1");
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n == 0 || values[0].is_nan() {
        return result;
    }

    let k = 2.0 / (period as f64 + 1.0);
    result[0] = values[0];

    let mut prev = values[0];
    for i in 1..n {
        if values[i].is_nan() {
            // NaN propagates: once we see NaN, subsequent values are tainted
            for val in result.iter_mut().skip(i) {
                *val = f64::NAN;
            }
            return result;
        }
        let ema = k * values[i] + (1.0 - k) * prev;
        result[i] = ema;
        prev = ema;
    }

    result
}
