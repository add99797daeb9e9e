//! Classic floor-trader pivot levels.
//!
//! Over the trailing [`PIVOT_WINDOW`] bars with high H, low L and last
//! close C:
//!   pivot = (H + L + C) / 3
//!   R1 = 2*pivot - L    S1 = 2*pivot - H
//!   R2 = pivot + (H-L)  S2 = pivot - (H-L)
//!   R3 = H + 2*(pivot - L)
//!   S3 = L - 2*(H - pivot)

use crate::domain::PriceBar;
use serde::{Deserialize, Serialize};

/// Trailing bars used for the pivot range.
pub const PIVOT_WINDOW: usize = 20;

/// One named pivot level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotLevel {
    pub name: String,
    pub price: f64,
}

/// Compute the seven floor pivots over the trailing `window` bars.
/// Empty history yields an empty vector.
pub fn floor_pivots(bars: &[PriceBar], window: usize) -> Vec<PivotLevel> {
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
    let close = match tail.last() {
        Some(bar) if !bar.close.is_nan() => bar.close,
        _ => return Vec::new(),
    };
    if !high.is_finite() || !low.is_finite() {
        return Vec::new();
    }

    let pivot = (high + low + close) / 3.0;
    let range = high - low;

    vec![
        PivotLevel { name: "pivot".into(), price: pivot },
        PivotLevel { name: "r1".into(), price: 2.0 * pivot - low },
        PivotLevel { name: "s1".into(), price: 2.0 * pivot - high },
        PivotLevel { name: "r2".into(), price: pivot + range },
        PivotLevel { name: "s2".into(), price: pivot - range },
        PivotLevel { name: "r3".into(), price: high + 2.0 * (pivot - low) },
        PivotLevel { name: "s3".into(), price: low - 2.0 * (high - pivot) },
    ]
}
