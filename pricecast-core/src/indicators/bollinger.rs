//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev(close, period)
//! - Lower: middle - mult * stddev(close, period)
//!
//! Uses population stddev (divide by N), so upper >= middle >= lower for any
//! non-negative multiplier, with equality on a constant window.
//! Lookback: period - 1.

/// Upper/middle/lower band series, index-aligned with the input closes.
#[derive(Debug, Clone)]
pub struct BollingerSeries {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Compute all three bands over a close series.
pub fn bollinger_series(closes: &[f64], period: usize, multiplier: f64) -> BollingerSeries {
    assert!(period >= 1, "Bollinger period must be >= 1");
    let n = closes.len();
    let mut series = BollingerSeries {
        upper: vec![f64::NAN; n],
        middle: vec![f64::NAN; n],
        lower: vec![f64::NAN; n],
    };

    if n < period {
        return series;
    }

    for i in (period - 1)..n {
        let window = &closes[i + 1 - period..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }

        let mean = window.iter().sum::<f64>() / period as f64;
        let variance = window
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        let stddev = variance.sqrt();

        series.middle[i] = mean;
        series.upper[i] = mean + multiplier * stddev;
        series.lower[i] = mean - multiplier * stddev;
    }

    series
}
