//! Monte Carlo price-projection engine.
//!
//! Simulates `simulations` independent price paths over `horizon_days`:
//!   price[day] = price[day-1] * (1 + drift + sigma * U * sqrt(1/252))
//! with U drawn per day from the configured variate distribution.
//!
//! The engine never reads ambient entropy: a master seed comes in via
//! [`ProjectionConfig`] and every path derives its own sub-seed from it, so
//! a given (price, sigma, config) triple is bit-identical regardless of
//! rayon's thread count or scheduling. Callers wanting fresh results seed
//! from entropy at their own boundary.

pub mod volatility;

pub use volatility::{daily_volatility, FALLBACK_VOLATILITY, VOLATILITY_WINDOW};

use crate::rng::SeedSequence;
use rand::rngs::StdRng;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Annualization base for the daily volatility step.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Default per-day drift applied to every path.
pub const DAILY_DRIFT: f64 = 0.0005;

/// Buckets in the terminal-price histogram.
pub const DISTRIBUTION_BUCKETS: usize = 50;

/// Variate distribution for the daily shock U.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Variate {
    /// U uniform in [-1, 1).
    Uniform,
    /// U standard normal (Box-Muller over the same seeded stream).
    Gaussian,
}

/// Projection parameters. All fields have serde defaults, so a config file
/// can specify any subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectionConfig {
    pub horizon_days: usize,
    pub simulations: usize,
    pub drift: f64,
    pub variate: Variate,
    pub seed: u64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            simulations: 1000,
            drift: DAILY_DRIFT,
            variate: Variate::Uniform,
            seed: 42,
        }
    }
}

/// Terminal-price percentiles at 5/25/50/75/95.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
}

/// One histogram bucket of terminal prices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionBucket {
    pub bucket_center: f64,
    pub count: u32,
}

/// The five percentiles of one projected day, across all paths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBand {
    pub day: usize,
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
}

/// Full projection output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// `[simulation][day]`; every path starts at the current price.
    pub paths: Vec<Vec<f64>>,
    pub percentiles: Percentiles,
    /// Terminal prices sorted ascending.
    pub final_prices: Vec<f64>,
    pub distribution: Vec<DistributionBucket>,
    /// One band per projected day, recomputed independently per day.
    pub daily_bands: Vec<DailyBand>,
}

/// Run the projection. `current_price` must be positive and finite;
/// `daily_volatility` of zero is accepted and yields drift-only paths.
/// Horizon and simulation counts are clamped to at least 1.
pub fn run_projection(
    current_price: f64,
    daily_volatility: f64,
    config: &ProjectionConfig,
) -> SimulationResult {
    assert!(
        current_price.is_finite() && current_price > 0.0,
        "projection requires a positive current price"
    );

    let horizon = config.horizon_days.max(1);
    let sims = config.simulations.max(1);
    let sqrt_step = (1.0 / TRADING_DAYS_PER_YEAR).sqrt();
    let seq = SeedSequence::new(config.seed);
    let variate = config.variate;
    let drift = config.drift;

    let paths: Vec<Vec<f64>> = (0..sims as u64)
        .into_par_iter()
        .map(|path_index| {
            let mut rng = seq.rng_for("path", path_index);
            let mut path = Vec::with_capacity(horizon);
            let mut price = current_price;
            path.push(price);
            for _ in 1..horizon {
                let shock = draw(&mut rng, variate);
                price *= 1.0 + drift + daily_volatility * shock * sqrt_step;
                path.push(price);
            }
            path
        })
        .collect();

    let mut final_prices: Vec<f64> = paths.iter().map(|p| p[horizon - 1]).collect();
    final_prices.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let percentiles = Percentiles {
        p5: percentile_of(&final_prices, 0.05),
        p25: percentile_of(&final_prices, 0.25),
        p50: percentile_of(&final_prices, 0.50),
        p75: percentile_of(&final_prices, 0.75),
        p95: percentile_of(&final_prices, 0.95),
    };

    let distribution = distribution_of(&final_prices);
    let daily_bands = daily_bands_of(&paths, horizon);

    SimulationResult {
        paths,
        percentiles,
        final_prices,
        distribution,
        daily_bands,
    }
}

fn draw(rng: &mut StdRng, variate: Variate) -> f64 {
    match variate {
        Variate::Uniform => rng.gen_range(-1.0..1.0),
        Variate::Gaussian => {
            // Box-Muller from two uniform draws
            let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
            let u2: f64 = rng.gen();
            (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
        }
    }
}

/// Percentile of a sorted slice at index floor(len * q), clamped to the end.
pub(crate) fn percentile_of(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let idx = ((sorted.len() as f64 * q).floor() as usize).min(sorted.len() - 1);
    sorted[idx]
}

fn distribution_of(sorted_finals: &[f64]) -> Vec<DistributionBucket> {
    let min = sorted_finals[0];
    let max = sorted_finals[sorted_finals.len() - 1];
    let span = max - min;

    let mut counts = vec![0u32; DISTRIBUTION_BUCKETS];
    if span == 0.0 {
        // Degenerate range: every path landed on the same price.
        counts[0] = sorted_finals.len() as u32;
    } else {
        for &price in sorted_finals {
            let idx = (((price - min) / span) * DISTRIBUTION_BUCKETS as f64) as usize;
            counts[idx.min(DISTRIBUTION_BUCKETS - 1)] += 1;
        }
    }

    let width = span / DISTRIBUTION_BUCKETS as f64;
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| DistributionBucket {
            bucket_center: min + (i as f64 + 0.5) * width,
            count,
        })
        .collect()
}

fn daily_bands_of(paths: &[Vec<f64>], horizon: usize) -> Vec<DailyBand> {
    let mut bands = Vec::with_capacity(horizon);
    let mut day_prices = vec![0.0; paths.len()];
    for day in 0..horizon {
        for (slot, path) in day_prices.iter_mut().zip(paths) {
            *slot = path[day];
        }
        day_prices.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        bands.push(DailyBand {
            day,
            p5: percentile_of(&day_prices, 0.05),
            p25: percentile_of(&day_prices, 0.25),
            p50: percentile_of(&day_prices, 0.50),
            p75: percentile_of(&day_prices, 0.75),
            p95: percentile_of(&day_prices, 0.95),
        });
    }
    bands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    fn small_config(seed: u64) -> ProjectionConfig {
        ProjectionConfig {
            horizon_days: 10,
            simulations: 200,
            seed,
            ..ProjectionConfig::default()
        }
    }

    #[test]
    fn paths_have_expected_shape() {
        let result = run_projection(100.0, 0.02, &small_config(7));
        assert_eq!(result.paths.len(), 200);
        for path in &result.paths {
            assert_eq!(path.len(), 10);
            assert_approx(path[0], 100.0, DEFAULT_EPSILON);
        }
        assert_eq!(result.final_prices.len(), 200);
        assert_eq!(result.daily_bands.len(), 10);
        assert_eq!(result.distribution.len(), DISTRIBUTION_BUCKETS);
    }

    #[test]
    fn identical_seeds_identical_results() {
        let a = run_projection(100.0, 0.02, &small_config(99));
        let b = run_projection(100.0, 0.02, &small_config(99));
        assert_eq!(a.paths, b.paths);
        assert_eq!(a.percentiles, b.percentiles);
        assert_eq!(a.final_prices, b.final_prices);
    }

    #[test]
    fn different_seeds_different_results() {
        let a = run_projection(100.0, 0.02, &small_config(1));
        let b = run_projection(100.0, 0.02, &small_config(2));
        assert_ne!(a.paths, b.paths);
    }

    #[test]
    fn percentiles_are_ordered() {
        let result = run_projection(250.0, 0.035, &small_config(5));
        let p = result.percentiles;
        assert!(p.p5 <= p.p25);
        assert!(p.p25 <= p.p50);
        assert!(p.p50 <= p.p75);
        assert!(p.p75 <= p.p95);
    }

    #[test]
    fn percentile_index_convention() {
        // floor(len * q) on an already-sorted 0..100 series
        let sorted: Vec<f64> = (0..100).map(|i| i as f64).collect();
        assert_approx(percentile_of(&sorted, 0.05), 5.0, DEFAULT_EPSILON);
        assert_approx(percentile_of(&sorted, 0.50), 50.0, DEFAULT_EPSILON);
        assert_approx(percentile_of(&sorted, 0.95), 95.0, DEFAULT_EPSILON);
        // q = 1.0 clamps to the last element
        assert_approx(percentile_of(&sorted, 1.0), 99.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bucket_counts_sum_to_simulations() {
        let result = run_projection(100.0, 0.05, &small_config(11));
        let total: u32 = result.distribution.iter().map(|b| b.count).sum();
        assert_eq!(total, 200);
    }

    #[test]
    fn zero_volatility_collapses_to_drift() {
        let config = small_config(3);
        let result = run_projection(100.0, 0.0, &config);
        // All shocks are multiplied by zero: every path is the drift curve.
        let expected = 100.0 * (1.0 + config.drift).powi(9);
        for path in &result.paths {
            assert_approx(path[9], expected, 1e-9);
        }
        // Degenerate span: all mass in the first bucket.
        assert_eq!(result.distribution[0].count, 200);
        assert!(result.distribution[1..].iter().all(|b| b.count == 0));
        assert_approx(result.percentiles.p5, result.percentiles.p95, 1e-12);
    }

    #[test]
    fn daily_bands_start_at_current_price() {
        let result = run_projection(100.0, 0.02, &small_config(13));
        let day0 = &result.daily_bands[0];
        assert_eq!(day0.day, 0);
        assert_approx(day0.p5, 100.0, DEFAULT_EPSILON);
        assert_approx(day0.p95, 100.0, DEFAULT_EPSILON);
        for band in &result.daily_bands {
            assert!(band.p5 <= band.p50);
            assert!(band.p50 <= band.p95);
        }
    }

    #[test]
    fn gaussian_variate_is_deterministic_too() {
        let config = ProjectionConfig {
            variate: Variate::Gaussian,
            ..small_config(21)
        };
        let a = run_projection(100.0, 0.02, &config);
        let b = run_projection(100.0, 0.02, &config);
        assert_eq!(a.final_prices, b.final_prices);
        assert!(a.percentiles.p5 <= a.percentiles.p95);
    }

    #[test]
    fn degenerate_counts_are_clamped() {
        let config = ProjectionConfig {
            horizon_days: 0,
            simulations: 0,
            ..ProjectionConfig::default()
        };
        let result = run_projection(50.0, 0.02, &config);
        assert_eq!(result.paths.len(), 1);
        assert_eq!(result.paths[0].len(), 1);
        assert_approx(result.final_prices[0], 50.0, DEFAULT_EPSILON);
    }

    #[test]
    fn config_serde_defaults() {
        let config: ProjectionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.horizon_days, 30);
        assert_eq!(config.simulations, 1000);
        assert_eq!(config.variate, Variate::Uniform);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"UNIFORM\""));
        assert!(json.contains("\"horizonDays\""));
    }
}
