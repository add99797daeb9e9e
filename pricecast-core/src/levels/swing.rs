//! Swing high/low detection over a centered window.
//!
//! An interior bar is a swing high when its high equals the maximum of the
//! 11-bar window centered on it (5 bars of margin each side); swing lows
//! mirror with lows and minima. Window extremes come from a monotonic-deque
//! sliding scan, so the whole pass is O(n) instead of rescanning each window.

use crate::domain::PriceBar;
use std::cmp::Ordering;
use std::collections::VecDeque;

/// Bars of margin required on each side of a swing point.
pub const SWING_MARGIN: usize = 5;

/// Supports/resistances kept per side after the proximity sort.
pub const MAX_LEVELS: usize = 3;

const WINDOW: usize = 2 * SWING_MARGIN + 1;

/// Deduplicated swing values over the full history.
#[derive(Debug, Clone, Default)]
pub struct SwingPoints {
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
}

/// Sliding-window extreme via a monotonic deque of indices.
///
/// Returns one value per full window; entry `w` is the extreme of
/// `values[w..w + WINDOW]`. For `max = true` the deque holds a decreasing run,
/// for minima an increasing one.
fn sliding_extreme(values: &[f64], max: bool) -> Vec<f64> {
    let n = values.len();
    if n < WINDOW {
        return Vec::new();
    }

    let mut deque: VecDeque<usize> = VecDeque::new();
    let mut out = Vec::with_capacity(n + 1 - WINDOW);

    for i in 0..n {
        while let Some(&back) = deque.back() {
            let evict = if max {
                values[back] <= values[i]
            } else {
                values[back] >= values[i]
            };
            if evict {
                deque.pop_back();
            } else {
                break;
            }
        }
        deque.push_back(i);

        if let Some(&front) = deque.front() {
            if front + WINDOW <= i {
                deque.pop_front();
            }
        }

        if i + 1 >= WINDOW {
            if let Some(&front) = deque.front() {
                out.push(values[front]);
            }
        }
    }

    out
}

/// Scan the history for swing highs and lows. Equal swing values are
/// deduplicated. Fewer than 11 bars yields no swing points.
pub fn swing_points(bars: &[PriceBar]) -> SwingPoints {
    let n = bars.len();
    if n < WINDOW {
        return SwingPoints::default();
    }

    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let window_max = sliding_extreme(&highs, true);
    let window_min = sliding_extreme(&lows, false);

    let mut swing_highs = Vec::new();
    let mut swing_lows = Vec::new();

    for center in SWING_MARGIN..n - SWING_MARGIN {
        // Window starting at center - SWING_MARGIN is centered on this bar.
        let w = center - SWING_MARGIN;
        if !highs[center].is_nan() && highs[center] == window_max[w] {
            swing_highs.push(highs[center]);
        }
        if !lows[center].is_nan() && lows[center] == window_min[w] {
            swing_lows.push(lows[center]);
        }
    }

    dedup_sorted(&mut swing_highs);
    dedup_sorted(&mut swing_lows);

    SwingPoints {
        highs: swing_highs,
        lows: swing_lows,
    }
}

fn dedup_sorted(values: &mut Vec<f64>) {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    values.dedup();
}

/// Split swings around the current price: supports are swing lows strictly
/// below, resistances swing highs strictly above, each ordered nearest-first
/// and capped at [`MAX_LEVELS`].
pub fn split_by_price(swings: &SwingPoints, price: f64) -> (Vec<f64>, Vec<f64>) {
    let mut supports: Vec<f64> = swings.lows.iter().copied().filter(|&v| v < price).collect();
    // Below the price, nearest-first means descending by value.
    supports.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    supports.truncate(MAX_LEVELS);

    let mut resistances: Vec<f64> = swings.highs.iter().copied().filter(|&v| v > price).collect();
    resistances.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    resistances.truncate(MAX_LEVELS);

    (supports, resistances)
}
