//! Historical price-level detection: swing points, Fibonacci ladder, floor pivots.
//!
//! Levels are computed once per analysis call from fixed trailing windows of
//! the bar history. The detector itself is price-agnostic apart from the
//! support/resistance split, which orders levels by proximity to the last
//! close.

pub mod fibonacci;
pub mod pivots;
pub mod swing;

pub use fibonacci::{fibonacci_levels, FibLevel, FIB_WINDOW};
pub use pivots::{floor_pivots, PivotLevel, PIVOT_WINDOW};
pub use swing::{split_by_price, swing_points, SwingPoints, MAX_LEVELS, SWING_MARGIN};

use crate::domain::PriceBar;
use serde::{Deserialize, Serialize};

/// All detected levels for one instrument.
///
/// `supports` and `resistances` are ordered nearest-to-price first and capped
/// at [`MAX_LEVELS`] each. Empty vectors mean the history was too short or
/// one-sided; the decision engine substitutes percentage fallbacks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalLevels {
    pub supports: Vec<f64>,
    pub resistances: Vec<f64>,
    pub fibonacci: Vec<FibLevel>,
    pub pivots: Vec<PivotLevel>,
}

/// Detect all levels from a bar history, split around the last close.
pub fn detect_levels(bars: &[PriceBar]) -> TechnicalLevels {
    let price = match bars.last() {
        Some(bar) => bar.close,
        None => return TechnicalLevels::default(),
    };

    let swings = swing_points(bars);
    let (supports, resistances) = split_by_price(&swings, price);

    TechnicalLevels {
        supports,
        resistances,
        fibonacci: fibonacci_levels(bars, FIB_WINDOW),
        pivots: floor_pivots(bars, PIVOT_WINDOW),
    }
}
