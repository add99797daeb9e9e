//! ADX: Average Directional Index (Wilder), with +DI and -DI.
//!
//! Steps:
//! 1. Compute +DM and -DM from consecutive bars
//! 2. Wilder-smooth +DM, -DM, and TR (alpha = 1/period)
//! 3. +DI = 100 * smoothed(+DM) / smoothed(TR), 0 when smoothed TR is 0
//! 4. -DI likewise
//! 5. DX = 100 * |+DI - -DI| / (+DI + -DI), 0 when the denominator is 0
//! 6. ADX = Wilder-smoothed DX
//!
//! Lookback: 2 * period (period for DI smoothing, then period for ADX).
//! A flat or zero-range series produces ADX = 0, never NaN past warmup.

use crate::domain::PriceBar;
use crate::indicators::atr::{true_range, wilder_smooth};
use crate::indicators::Reading;

/// ADX, +DI and -DI series, index-aligned with the input bars.
#[derive(Debug, Clone)]
pub struct DirectionalSeries {
    pub adx: Vec<f64>,
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
}

/// Latest ADX/+DI/-DI with fallback provenance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalReading {
    pub adx: Reading,
    pub plus_di: Reading,
    pub minus_di: Reading,
}

/// Compute the full directional system over bars.
pub fn directional_series(bars: &[PriceBar], period: usize) -> DirectionalSeries {
    assert!(period >= 1, "ADX period must be >= 1");
    let n = bars.len();
    let mut series = DirectionalSeries {
        adx: vec![f64::NAN; n],
        plus_di: vec![f64::NAN; n],
        minus_di: vec![f64::NAN; n],
    };

    if n < 2 {
        return series;
    }

    // Step 1: +DM and -DM
    let mut plus_dm = vec![f64::NAN; n];
    let mut minus_dm = vec![f64::NAN; n];

    for i in 1..n {
        if bars[i].high.is_nan()
            || bars[i].low.is_nan()
            || bars[i - 1].high.is_nan()
            || bars[i - 1].low.is_nan()
        {
            continue;
        }

        let high_diff = bars[i].high - bars[i - 1].high;
        let low_diff = bars[i - 1].low - bars[i].low;

        plus_dm[i] = if high_diff > low_diff && high_diff > 0.0 {
            high_diff
        } else {
            0.0
        };
        minus_dm[i] = if low_diff > high_diff && low_diff > 0.0 {
            low_diff
        } else {
            0.0
        };
    }

    // Step 2: Wilder smooth +DM, -DM, and TR
    let tr = true_range(bars);
    let smooth_tr = wilder_smooth(&tr, period);
    let smooth_plus_dm = wilder_smooth(&plus_dm, period);
    let smooth_minus_dm = wilder_smooth(&minus_dm, period);

    // Steps 3-5: DI and DX, with zero-range guards
    let mut dx = vec![f64::NAN; n];
    for i in 0..n {
        if smooth_tr[i].is_nan() || smooth_plus_dm[i].is_nan() || smooth_minus_dm[i].is_nan() {
            continue;
        }

        let (plus_di, minus_di) = if smooth_tr[i] == 0.0 {
            (0.0, 0.0)
        } else {
            (
                100.0 * smooth_plus_dm[i] / smooth_tr[i],
                100.0 * smooth_minus_dm[i] / smooth_tr[i],
            )
        };
        series.plus_di[i] = plus_di;
        series.minus_di[i] = minus_di;

        let di_sum = plus_di + minus_di;
        dx[i] = if di_sum == 0.0 {
            0.0
        } else {
            100.0 * (plus_di - minus_di).abs() / di_sum
        };
    }

    // Step 6: Wilder smooth DX → ADX
    series.adx = wilder_smooth(&dx, period);

    series
}

/// Latest ADX/+DI/-DI. Each component degrades to 0.0 on insufficient history.
pub fn latest_directional(bars: &[PriceBar], period: usize) -> DirectionalReading {
    let series = directional_series(bars, period);
    let pick = |values: &[f64]| match values.last() {
        Some(&v) if !v.is_nan() => Reading::exact(v),
        _ => Reading::fallback(0.0),
    };
    DirectionalReading {
        adx: pick(&series.adx),
        plus_di: pick(&series.plus_di),
        minus_di: pick(&series.minus_di),
    }
}
