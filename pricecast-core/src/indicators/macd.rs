//! MACD: Moving Average Convergence/Divergence.
//!
//! Line: EMA(close, 12) - EMA(close, 26)
//! Signal: EMA(line, 9)
//! Histogram: line - signal
//!
//! The signal is the EMA of the line in both the series and the latest forms;
//! there is exactly one definition. With first-sample EMA seeding every
//! component is defined from index 0.

use crate::indicators::ema::ema_series;
use serde::{Deserialize, Serialize};

pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

/// Full MACD series, index-aligned with the input closes.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// MACD at a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacdPoint {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Compute the MACD triple over a close series.
pub fn macd_series(closes: &[f64]) -> MacdSeries {
    let fast = ema_series(closes, MACD_FAST);
    let slow = ema_series(closes, MACD_SLOW);

    let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal = ema_series(&line, MACD_SIGNAL);
    let histogram: Vec<f64> = line.iter().zip(&signal).map(|(l, s)| l - s).collect();

    MacdSeries {
        line,
        signal,
        histogram,
    }
}

/// MACD at the last bar. `None` only for an empty series.
pub fn latest_macd(closes: &[f64]) -> Option<MacdPoint> {
    if closes.is_empty() {
        return None;
    }
    let series = macd_series(closes);
    let i = closes.len() - 1;
    Some(MacdPoint {
        macd: series.line[i],
        signal: series.signal[i],
        histogram: series.histogram[i],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn macd_flat_series_is_zero() {
        let series = macd_series(&[100.0; 40]);
        for i in 0..40 {
            assert_approx(series.line[i], 0.0, DEFAULT_EPSILON);
            assert_approx(series.signal[i], 0.0, DEFAULT_EPSILON);
            assert_approx(series.histogram[i], 0.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn macd_positive_in_uptrend() {
        // Steady uptrend: fast EMA sits above slow EMA
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let series = macd_series(&closes);
        let last = closes.len() - 1;
        assert!(series.line[last] > 0.0);
        assert!(series.histogram[last].is_finite());
    }

    #[test]
    fn macd_histogram_is_line_minus_signal() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0).collect();
        let series = macd_series(&closes);
        for i in 0..closes.len() {
            assert_approx(
                series.histogram[i],
                series.line[i] - series.signal[i],
                DEFAULT_EPSILON,
            );
        }
    }

    #[test]
    fn macd_defined_from_index_0() {
        let series = macd_series(&[100.0, 101.0, 102.0]);
        assert!(!series.line[0].is_nan());
        assert!(!series.signal[0].is_nan());
        assert!(!series.histogram[0].is_nan());
    }

    #[test]
    fn latest_macd_matches_series_tail() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + (i as f64 * 0.2).cos() * 3.0).collect();
        let series = macd_series(&closes);
        let point = latest_macd(&closes).unwrap();
        let last = closes.len() - 1;
        assert_approx(point.macd, series.line[last], DEFAULT_EPSILON);
        assert_approx(point.signal, series.signal[last], DEFAULT_EPSILON);
        assert_approx(point.histogram, series.histogram[last], DEFAULT_EPSILON);
    }

    #[test]
    fn latest_macd_empty_input() {
        assert!(latest_macd(&[]).is_none());
    }
}
