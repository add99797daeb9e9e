//! Fibonacci retracement and extension ladder.
//!
//! Anchored on the high/low of the trailing [`FIB_WINDOW`] bars. Retracement
//! ratios are measured down from the high; the two extension ratios continue
//! the same formula past the low.

use crate::domain::PriceBar;
use serde::{Deserialize, Serialize};

/// Trailing bars used to anchor the ladder.
pub const FIB_WINDOW: usize = 60;

const RATIOS: [f64; 9] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0, 1.272, 1.618];

/// One rung of the ladder: a percentage label and its price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FibLevel {
    pub label: String,
    pub price: f64,
}

/// Compute the ladder over the trailing `window` bars.
///
/// `price = high - ratio * (high - low)`, so 0% sits at the window high,
/// 100% at the window low, and the extensions below it. An empty history
/// yields an empty ladder; one bar collapses every rung onto that bar.
pub fn fibonacci_levels(bars: &[PriceBar], window: usize) -> Vec<FibLevel> {
    if bars.is_empty() || window == 0 {
        return Vec::new();
    }

    let start = bars.len().saturating_sub(window);
    let tail = &bars[start..];

    let mut high = f64::NEG_INFINITY;
    let mut low = f64::INFINITY;
    for bar in tail {
        if bar.high.is_nan() || bar.low.is_nan() {
            continue;
        }
        high = high.max(bar.high);
        low = low.min(bar.low);
    }
    if !high.is_finite() || !low.is_finite() {
        return Vec::new();
    }

    let range = high - low;
    RATIOS
        .iter()
        .map(|&ratio| FibLevel {
            label: format!("{:.1}%", ratio * 100.0),
            price: high - ratio * range,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, make_hlc_bars, DEFAULT_EPSILON};

    #[test]
    fn ladder_endpoints_are_window_extremes() {
        let bars = make_hlc_bars(&[(120.0, 100.0, 110.0), (118.0, 102.0, 111.0)]);
        let levels = fibonacci_levels(&bars, 60);
        assert_eq!(levels.len(), 9);
        // 0% at the high, 100% at the low
        assert_eq!(levels[0].label, "0.0%");
        assert_approx(levels[0].price, 120.0, DEFAULT_EPSILON);
        assert_eq!(levels[6].label, "100.0%");
        assert_approx(levels[6].price, 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn golden_ratio_level() {
        // High 120, low 100: 61.8% = 120 - 0.618 * 20 = 107.64
        let bars = make_hlc_bars(&[(120.0, 100.0, 110.0)]);
        let levels = fibonacci_levels(&bars, 60);
        let golden = levels.iter().find(|l| l.label == "61.8%").unwrap();
        assert_approx(golden.price, 107.64, 1e-9);
    }

    #[test]
    fn extensions_sit_below_the_low() {
        let bars = make_hlc_bars(&[(120.0, 100.0, 110.0)]);
        let levels = fibonacci_levels(&bars, 60);
        let ext_1272 = levels.iter().find(|l| l.label == "127.2%").unwrap();
        let ext_1618 = levels.iter().find(|l| l.label == "161.8%").unwrap();
        // 120 - 1.272 * 20 = 94.56; 120 - 1.618 * 20 = 87.64
        assert_approx(ext_1272.price, 94.56, 1e-9);
        assert_approx(ext_1618.price, 87.64, 1e-9);
        assert!(ext_1272.price < 100.0);
        assert!(ext_1618.price < ext_1272.price);
    }

    #[test]
    fn window_limits_the_anchor() {
        // Old spike outside the trailing window must not anchor the ladder.
        let mut closes = vec![100.0; 80];
        closes[5] = 500.0;
        let bars = make_bars(&closes);
        let levels = fibonacci_levels(&bars, 60);
        // Window covers indices 20..80 where closes are flat at 100.
        assert!(levels[0].price < 200.0);
    }

    #[test]
    fn ladder_is_monotonic_descending() {
        let closes: Vec<f64> = (0..70).map(|i| 100.0 + (i as f64 * 0.5).sin() * 9.0).collect();
        let bars = make_bars(&closes);
        let levels = fibonacci_levels(&bars, 60);
        for pair in levels.windows(2) {
            assert!(pair[0].price >= pair[1].price);
        }
    }

    #[test]
    fn empty_history_yields_empty_ladder() {
        assert!(fibonacci_levels(&[], 60).is_empty());
    }
}
