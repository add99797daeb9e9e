//! Analysis pipeline: wires together data, indicators, levels, projection,
//! and the decision engine.
//!
//! Two entry points:
//! - `analyze()`: fetches history from a provider, falling back to a synthetic
//!   series when the fetch fails. Used by the CLI. Never fails.
//! - `analyze_history()`: takes pre-loaded bars, no I/O. Used by anything
//!   that already has a history in hand.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{synthesize_history, BarProvider, History};
use crate::decision::{decide, Decision};
use crate::domain::{closes, PriceBar};
use crate::indicators::{snapshot_series, IndicatorSnapshot};
use crate::levels::{detect_levels, TechnicalLevels};
use crate::projection::{daily_volatility, run_projection, ProjectionConfig, SimulationResult};

/// History length generated when the live fetch fails.
const SYNTHETIC_FALLBACK_DAYS: usize = 365;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("history for '{0}' has no usable closing price")]
    UnusableHistory(String),
}

/// Knobs exposed to callers. Out-of-range values are clamped, not rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisOptions {
    pub horizon_days: usize,
    pub simulations: usize,
    /// Master seed for the projection. `None` keeps the built-in default, so
    /// repeated runs over the same history agree.
    pub seed: Option<u64>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            simulations: 1000,
            seed: None,
        }
    }
}

/// Everything the dashboard needs for one instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub ticker: String,
    /// Last close of the analyzed history.
    pub price: f64,
    pub bars: Vec<PriceBar>,
    pub snapshots: Vec<IndicatorSnapshot>,
    pub levels: TechnicalLevels,
    pub simulation: SimulationResult,
    pub decision: Decision,
    /// Source tag, annotated with the fetch error when synthetic bars stand in.
    pub origin: String,
    /// Daily volatility fed to the projection.
    pub volatility: f64,
    /// True when the volatility estimate is the flat fallback, not measured.
    pub sigma_fallback: bool,
}

/// Fetch and analyze. Fetch failures and unusable histories degrade to a
/// synthetic series; the substitution is recorded in `origin`.
pub fn analyze(provider: &dyn BarProvider, ticker: &str, opts: &AnalysisOptions) -> AnalysisReport {
    match provider.fetch(ticker) {
        Ok(history) => match analyze_history(&history, opts) {
            Ok(report) => report,
            Err(e) => {
                log::warn!("{ticker}: {e}, substituting synthetic history");
                synthetic_report(ticker, opts, &e.to_string())
            }
        },
        Err(e) => {
            log::warn!("{ticker}: fetch failed ({e}), substituting synthetic history");
            synthetic_report(ticker, opts, &e.to_string())
        }
    }
}

/// Analyze pre-loaded bars, no I/O.
///
/// Fails only when the history carries no finite positive last close;
/// everything downstream of that degrades to documented neutral values
/// instead of erroring.
pub fn analyze_history(
    history: &History,
    opts: &AnalysisOptions,
) -> Result<AnalysisReport, AnalysisError> {
    let bars = &history.bars;
    let price = bars.last().map(|b| b.close).unwrap_or(f64::NAN);
    if !price.is_finite() || price <= 0.0 {
        return Err(AnalysisError::UnusableHistory(history.ticker.clone()));
    }

    let sigma = daily_volatility(&closes(bars));
    let config = ProjectionConfig {
        horizon_days: opts.horizon_days.max(1),
        simulations: opts.simulations.max(1),
        seed: opts.seed.unwrap_or_else(|| ProjectionConfig::default().seed),
        ..ProjectionConfig::default()
    };

    log::debug!(
        "{}: analyzing {} bars, sigma {:.4}, horizon {}d x{}",
        history.ticker,
        bars.len(),
        sigma.value,
        config.horizon_days,
        config.simulations
    );

    // Independent stages; join keeps the call synchronous.
    let (snapshots, (levels, simulation)) = rayon::join(
        || snapshot_series(bars),
        || {
            rayon::join(
                || detect_levels(bars),
                || run_projection(price, sigma.value, &config),
            )
        },
    );

    let decision = decide(price, &levels, &simulation);

    Ok(AnalysisReport {
        ticker: history.ticker.clone(),
        price,
        bars: bars.clone(),
        snapshots,
        levels,
        simulation,
        decision,
        origin: history.source.label().to_string(),
        volatility: sigma.value,
        sigma_fallback: sigma.is_fallback,
    })
}

fn synthetic_report(ticker: &str, opts: &AnalysisOptions, cause: &str) -> AnalysisReport {
    let history = synthesize_history(ticker, SYNTHETIC_FALLBACK_DAYS);
    let mut report =
        analyze_history(&history, opts).expect("synthetic walk always has a usable close");
    report.origin = format!("{} ({cause})", history.source.label());
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{HistoryError, HistorySource};

    struct FailingProvider;

    impl BarProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn fetch(&self, _ticker: &str) -> Result<History, HistoryError> {
            Err(HistoryError::NetworkUnreachable("socket closed".into()))
        }
    }

    struct FixedProvider(History);

    impl BarProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        fn fetch(&self, _ticker: &str) -> Result<History, HistoryError> {
            Ok(self.0.clone())
        }
    }

    fn live_history(ticker: &str, days: usize) -> History {
        let mut history = synthesize_history(ticker, days);
        history.source = HistorySource::CryptoOhlc;
        history
    }

    fn small_opts() -> AnalysisOptions {
        AnalysisOptions {
            horizon_days: 10,
            simulations: 50,
            seed: Some(7),
        }
    }

    #[test]
    fn full_history_produces_full_report() {
        let history = live_history("BTC", 365);
        let report = analyze_history(&history, &small_opts()).unwrap();

        assert_eq!(report.ticker, "BTC");
        assert_eq!(report.price, history.bars.last().unwrap().close);
        assert_eq!(report.bars.len(), 365);
        assert!(!report.snapshots.is_empty());
        assert_eq!(report.simulation.paths.len(), 50);
        assert_eq!(report.origin, "CRYPTO_OHLC");
        assert!(report.volatility > 0.0);
        assert!(!report.sigma_fallback);
    }

    #[test]
    fn tiny_history_degrades_without_error() {
        let history = live_history("BTC", 1);
        let report = analyze_history(&history, &small_opts()).unwrap();

        assert!(report.snapshots.is_empty());
        assert!(report.sigma_fallback);
        assert_eq!(report.simulation.paths.len(), 50);
        // Levels still carry fib and pivots from the single bar.
        assert!(!report.levels.pivots.is_empty());
    }

    #[test]
    fn empty_history_is_unusable() {
        let history = History {
            ticker: "BTC".into(),
            bars: Vec::new(),
            source: HistorySource::CryptoOhlc,
        };
        let err = analyze_history(&history, &small_opts()).unwrap_err();
        assert!(err.to_string().contains("BTC"));
    }

    #[test]
    fn nan_close_is_unusable() {
        let mut history = live_history("BTC", 10);
        history.bars.last_mut().unwrap().close = f64::NAN;
        assert!(analyze_history(&history, &small_opts()).is_err());
    }

    #[test]
    fn fetch_failure_falls_back_to_synthetic() {
        let report = analyze(&FailingProvider, "BTC", &small_opts());
        assert!(report.origin.starts_with("SYNTHETIC ("));
        assert!(report.origin.contains("socket closed"));
        assert_eq!(report.bars.len(), SYNTHETIC_FALLBACK_DAYS);
        assert!(!report.snapshots.is_empty());
    }

    #[test]
    fn live_fetch_keeps_source_label() {
        let provider = FixedProvider(live_history("ETH", 120));
        let report = analyze(&provider, "ETH", &small_opts());
        assert_eq!(report.origin, "CRYPTO_OHLC");
    }

    #[test]
    fn same_options_same_report() {
        let provider = FixedProvider(live_history("SOL", 200));
        let a = analyze(&provider, "SOL", &small_opts());
        let b = analyze(&provider, "SOL", &small_opts());

        assert_eq!(a.simulation.percentiles.p50, b.simulation.percentiles.p50);
        assert_eq!(a.simulation.final_prices, b.simulation.final_prices);
        assert_eq!(a.decision.signal, b.decision.signal);
        assert_eq!(a.decision.reason, b.decision.reason);
    }

    #[test]
    fn zero_options_are_clamped() {
        let history = live_history("BTC", 60);
        let opts = AnalysisOptions {
            horizon_days: 0,
            simulations: 0,
            seed: None,
        };
        let report = analyze_history(&history, &opts).unwrap();
        assert_eq!(report.simulation.paths.len(), 1);
        assert_eq!(report.simulation.paths[0].len(), 1);
    }

    #[test]
    fn report_serializes_camel_case() {
        let history = live_history("BTC", 40);
        let report = analyze_history(&history, &small_opts()).unwrap();
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("\"sigmaFallback\""));
        assert!(json.contains("\"origin\":\"CRYPTO_OHLC\""));
        assert!(json.contains("\"snapshots\""));
        assert!(json.contains("\"tradePlan\"") || json.contains("\"decision\""));
    }
}
