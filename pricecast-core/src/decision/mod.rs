//! Decision engine: fuse price, levels and simulation into a trade signal.
//!
//! `decide` is a pure function of its three inputs. It owns the zone
//! thresholds and the ordered signal rules; it never inspects indicator
//! history, so confirmation conditions that need history ship as advisory
//! text on the plan instead of being evaluated here.

use crate::levels::TechnicalLevels;
use crate::projection::SimulationResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Price is in the buy zone within this factor above the nearest support.
const BUY_ZONE_FACTOR: f64 = 1.01;
/// Price is in the sell/take-profit zone within this factor below resistance.
const SELL_ZONE_FACTOR: f64 = 0.99;

/// Percentage fallbacks when the level detector found nothing on a side.
const FALLBACK_S1: f64 = 0.95;
const FALLBACK_S2: f64 = 0.90;
const FALLBACK_R1: f64 = 1.05;

/// Stop placement below the second support.
const STOP_FACTOR: f64 = 0.97;
/// Target steps from the primary entry toward the nearest resistance.
const TARGET_STEPS: [f64; 3] = [0.5, 0.75, 1.0];

/// Bearish-skew gate: probabilities in percent.
const SKEW_DOWN_MIN: f64 = 35.0;
const SKEW_UP_MAX: f64 = 25.0;
/// Buy-zone gate: at most this share of paths may end 5% lower.
const GO_DOWN_MAX: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    #[serde(rename = "GO")]
    Go,
    #[serde(rename = "WATCH")]
    Watch,
    #[serde(rename = "NO-GO")]
    NoGo,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Go => write!(f, "GO"),
            Signal::Watch => write!(f, "WATCH"),
            Signal::NoGo => write!(f, "NO-GO"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Zone {
    #[serde(rename = "BUY ZONE")]
    Buy,
    #[serde(rename = "SELL/TP ZONE")]
    SellTp,
    #[serde(rename = "NO-TRADE ZONE")]
    NoTrade,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Buy => write!(f, "BUY ZONE"),
            Zone::SellTp => write!(f, "SELL/TP ZONE"),
            Zone::NoTrade => write!(f, "NO-TRADE ZONE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanAction {
    /// Enter now, staged across the listed entries.
    Buy,
    /// Stage in only after the confirmation note is satisfied.
    StagedBuy,
    /// No position; alerts at the listed prices.
    Alert,
}

/// Concrete plan attached to a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradePlan {
    pub action: PlanAction,
    pub entries: Vec<f64>,
    pub stop: Option<f64>,
    pub tp1: Option<f64>,
    pub tp2: Option<f64>,
    pub tp3: Option<f64>,
    pub confirmation_note: Option<String>,
}

/// Simulation-derived probabilities, in percent. Always present on a
/// decision, trade plan or not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Probabilities {
    pub prob_down5: f64,
    pub prob_up5: f64,
    pub prob_at_resistance: f64,
    pub median_change_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub signal: Signal,
    pub zone: Zone,
    pub reason: String,
    pub trade_plan: Option<TradePlan>,
    pub probabilities: Probabilities,
}

/// Reference levels after fallback substitution.
struct KeyLevels {
    s1: f64,
    s2: f64,
    r1: f64,
}

fn key_levels(price: f64, levels: &TechnicalLevels) -> KeyLevels {
    KeyLevels {
        s1: levels.supports.first().copied().unwrap_or(price * FALLBACK_S1),
        s2: levels.supports.get(1).copied().unwrap_or(price * FALLBACK_S2),
        r1: levels
            .resistances
            .first()
            .copied()
            .unwrap_or(price * FALLBACK_R1),
    }
}

/// Classify the price against the key levels. Total: every (price, levels)
/// pair lands in exactly one zone.
fn classify_zone(price: f64, key: &KeyLevels) -> Zone {
    if price <= key.s1 * BUY_ZONE_FACTOR {
        Zone::Buy
    } else if price >= key.r1 * SELL_ZONE_FACTOR {
        Zone::SellTp
    } else {
        Zone::NoTrade
    }
}

fn probabilities(price: f64, levels: &TechnicalLevels, simulation: &SimulationResult) -> Probabilities {
    let finals = &simulation.final_prices;
    if finals.is_empty() {
        return Probabilities {
            prob_down5: 0.0,
            prob_up5: 0.0,
            prob_at_resistance: 0.0,
            median_change_pct: 0.0,
        };
    }

    let n = finals.len() as f64;
    let down = finals.iter().filter(|&&p| p < price * 0.95).count() as f64;
    let up = finals.iter().filter(|&&p| p > price * 1.05).count() as f64;
    let at_resistance = match levels.resistances.first() {
        Some(&r1) => finals.iter().filter(|&&p| p >= r1).count() as f64 / n * 100.0,
        None => 0.0,
    };

    Probabilities {
        prob_down5: down / n * 100.0,
        prob_up5: up / n * 100.0,
        prob_at_resistance: at_resistance,
        median_change_pct: (simulation.percentiles.p50 - price) / price * 100.0,
    }
}

fn staged_entries(key: &KeyLevels) -> Vec<f64> {
    vec![key.s1, (key.s1 + key.s2) / 2.0, key.s2]
}

fn targets_toward(entry: f64, r1: f64) -> (f64, f64, f64) {
    let step = |frac: f64| entry + frac * (r1 - entry);
    (step(TARGET_STEPS[0]), step(TARGET_STEPS[1]), step(TARGET_STEPS[2]))
}

const CONFIRMATION_NOTE: &str =
    "Stage in only after 2 of 3 confirmations: RSI exits oversold, close above EMA20, double bottom at support";

/// Fuse price, levels and simulation into a decision.
pub fn decide(price: f64, levels: &TechnicalLevels, simulation: &SimulationResult) -> Decision {
    let key = key_levels(price, levels);
    let zone = classify_zone(price, &key);
    let probs = probabilities(price, levels, simulation);

    let bearish_skew = probs.prob_down5 >= SKEW_DOWN_MIN && probs.prob_up5 <= SKEW_UP_MAX;

    let (signal, reason, trade_plan) = if bearish_skew {
        if zone == Zone::Buy {
            let (tp1, tp2, tp3) = targets_toward(key.s1, key.r1);
            let plan = TradePlan {
                action: PlanAction::StagedBuy,
                entries: staged_entries(&key),
                stop: Some(key.s2 * STOP_FACTOR),
                tp1: Some(tp1),
                tp2: Some(tp2),
                tp3: Some(tp3),
                confirmation_note: Some(CONFIRMATION_NOTE.to_string()),
            };
            (
                Signal::Watch,
                format!(
                    "In the buy zone but simulations skew bearish: {:.0}% end 5% lower vs {:.0}% ending 5% higher; wait for confirmation",
                    probs.prob_down5, probs.prob_up5
                ),
                Some(plan),
            )
        } else {
            (
                Signal::NoGo,
                format!(
                    "Bearish skew: {:.0}% of simulations end 5% lower vs {:.0}% ending 5% higher",
                    probs.prob_down5, probs.prob_up5
                ),
                None,
            )
        }
    } else if zone == Zone::Buy && probs.prob_down5 < GO_DOWN_MAX {
        let (tp1, tp2, tp3) = targets_toward(key.s1, key.r1);
        let plan = TradePlan {
            action: PlanAction::Buy,
            entries: staged_entries(&key),
            stop: Some(key.s2 * STOP_FACTOR),
            tp1: Some(tp1),
            tp2: Some(tp2),
            tp3: Some(tp3),
            confirmation_note: None,
        };
        (
            Signal::Go,
            format!(
                "Buy zone: price {:.2} sits at support {:.2} with only {:.0}% of simulations ending 5% lower",
                price, key.s1, probs.prob_down5
            ),
            Some(plan),
        )
    } else if zone == Zone::NoTrade {
        let plan = TradePlan {
            action: PlanAction::Alert,
            entries: vec![key.s1],
            stop: None,
            tp1: Some(key.r1),
            tp2: None,
            tp3: None,
            confirmation_note: None,
        };
        (
            Signal::Watch,
            format!(
                "No-trade zone: price {:.2} is between support {:.2} and resistance {:.2}; alerts set at both",
                price, key.s1, key.r1
            ),
            Some(plan),
        )
    } else if zone == Zone::SellTp {
        (
            Signal::Watch,
            format!(
                "Price {:.2} is at resistance {:.2}; manage existing longs, no fresh entries",
                price, key.r1
            ),
            None,
        )
    } else {
        (
            Signal::Watch,
            "Mixed conditions; waiting for a cleaner setup".to_string(),
            None,
        )
    };

    Decision {
        signal,
        zone,
        reason,
        trade_plan,
        probabilities: probs,
    }
}
