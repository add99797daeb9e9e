//! PriceCast CLI: analysis, indicator, and level commands.
//!
//! Commands:
//! - `analyze` prints the full report for one ticker (projection, levels,
//!   decision), as a summary or as JSON
//! - `indicators` prints the per-bar indicator snapshot sequence as JSON
//! - `levels` prints detected support/resistance, Fibonacci, and pivot levels

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use pricecast_core::analysis::{analyze, AnalysisOptions, AnalysisReport};
use pricecast_core::data::{BarProvider, CsvProvider, PairMap, RoutedProvider};
use pricecast_core::decision::PlanAction;

#[derive(Parser)]
#[command(
    name = "pricecast",
    about = "PriceCast CLI: price projection and trade-decision engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one ticker: indicators, levels, Monte Carlo projection, decision.
    Analyze {
        /// Ticker to analyze (e.g., BTC, SPY).
        ticker: String,

        /// Projection horizon in days.
        #[arg(long, default_value_t = 30)]
        horizon: usize,

        /// Number of Monte Carlo paths.
        #[arg(long, default_value_t = 1000)]
        simulations: usize,

        /// Master seed for reproducible projections.
        #[arg(long)]
        seed: Option<u64>,

        /// Read bars from a local CSV file instead of the network.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// TOML file mapping tickers to exchange pairs.
        #[arg(long)]
        pairs: Option<PathBuf>,

        /// Emit the full report as JSON instead of the summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the indicator snapshot sequence for one ticker as JSON.
    Indicators {
        /// Ticker to analyze (e.g., BTC, SPY).
        ticker: String,

        /// Read bars from a local CSV file instead of the network.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// TOML file mapping tickers to exchange pairs.
        #[arg(long)]
        pairs: Option<PathBuf>,
    },
    /// Print detected levels for one ticker as JSON.
    Levels {
        /// Ticker to analyze (e.g., BTC, SPY).
        ticker: String,

        /// Read bars from a local CSV file instead of the network.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// TOML file mapping tickers to exchange pairs.
        #[arg(long)]
        pairs: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            ticker,
            horizon,
            simulations,
            seed,
            csv,
            pairs,
            json,
        } => run_analyze(&ticker, horizon, simulations, seed, csv, pairs, json),
        Commands::Indicators { ticker, csv, pairs } => run_indicators(&ticker, csv, pairs),
        Commands::Levels { ticker, csv, pairs } => run_levels(&ticker, csv, pairs),
    }
}

/// CSV bypasses routing entirely, so --pairs would be silently ignored.
fn build_provider(csv: Option<PathBuf>, pairs: Option<PathBuf>) -> Result<Box<dyn BarProvider>> {
    if let Some(path) = csv {
        if pairs.is_some() {
            bail!("--pairs has no effect with --csv");
        }
        return Ok(Box::new(CsvProvider::new(path)));
    }

    let pair_map = match pairs {
        Some(path) => PairMap::from_file(&path).map_err(|e| anyhow!("loading pair map: {e}"))?,
        None => PairMap::default_usdt(),
    };
    Ok(Box::new(RoutedProvider::with_pairs(pair_map)?))
}

fn run_analyze(
    ticker: &str,
    horizon: usize,
    simulations: usize,
    seed: Option<u64>,
    csv: Option<PathBuf>,
    pairs: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let provider = build_provider(csv, pairs)?;
    let opts = AnalysisOptions {
        horizon_days: horizon,
        simulations,
        seed,
    };

    let report = analyze(provider.as_ref(), ticker, &opts);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn run_indicators(ticker: &str, csv: Option<PathBuf>, pairs: Option<PathBuf>) -> Result<()> {
    let provider = build_provider(csv, pairs)?;
    let report = analyze(provider.as_ref(), ticker, &AnalysisOptions::default());

    warn_if_synthetic(&report);
    println!("{}", serde_json::to_string_pretty(&report.snapshots)?);
    Ok(())
}

fn run_levels(ticker: &str, csv: Option<PathBuf>, pairs: Option<PathBuf>) -> Result<()> {
    let provider = build_provider(csv, pairs)?;
    let report = analyze(provider.as_ref(), ticker, &AnalysisOptions::default());

    warn_if_synthetic(&report);
    println!("{}", serde_json::to_string_pretty(&report.levels)?);
    Ok(())
}

fn warn_if_synthetic(report: &AnalysisReport) {
    if report.origin.starts_with("SYNTHETIC") {
        eprintln!("WARNING: output based on SYNTHETIC data ({})", report.origin);
    }
}

fn action_label(action: PlanAction) -> &'static str {
    match action {
        PlanAction::Buy => "BUY",
        PlanAction::StagedBuy => "STAGED BUY",
        PlanAction::Alert => "ALERT",
    }
}

fn join_prices(prices: &[f64]) -> String {
    prices
        .iter()
        .map(|p| format!("{p:.2}"))
        .collect::<Vec<_>>()
        .join(" / ")
}

fn print_summary(report: &AnalysisReport) {
    let price = report.price;
    let pct = |p: f64| (p / price - 1.0) * 100.0;

    println!();
    println!("=== PriceCast: {} ===", report.ticker);
    println!("Price:          {:.2}", price);
    println!("Source:         {}", report.origin);
    println!(
        "Bars:           {} ({} snapshots)",
        report.bars.len(),
        report.snapshots.len()
    );
    println!(
        "Volatility:     {:.2}% daily{}",
        report.volatility * 100.0,
        if report.sigma_fallback {
            " (fallback)"
        } else {
            ""
        }
    );
    println!();

    let sim = &report.simulation;
    println!(
        "--- Projection ({}d, {} paths) ---",
        sim.daily_bands.len(),
        sim.paths.len()
    );
    let p = sim.percentiles;
    println!("p5:             {:.2}  ({:+.1}%)", p.p5, pct(p.p5));
    println!("p25:            {:.2}  ({:+.1}%)", p.p25, pct(p.p25));
    println!("p50:            {:.2}  ({:+.1}%)", p.p50, pct(p.p50));
    println!("p75:            {:.2}  ({:+.1}%)", p.p75, pct(p.p75));
    println!("p95:            {:.2}  ({:+.1}%)", p.p95, pct(p.p95));
    println!();

    println!("--- Key Levels ---");
    if report.levels.resistances.is_empty() {
        println!("Resistances:    (none detected)");
    } else {
        println!("Resistances:    {}", join_prices(&report.levels.resistances));
    }
    if report.levels.supports.is_empty() {
        println!("Supports:       (none detected)");
    } else {
        println!("Supports:       {}", join_prices(&report.levels.supports));
    }
    let pivot_named = |name: &str| {
        report
            .levels
            .pivots
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.price)
    };
    if let (Some(pv), Some(r1), Some(s1)) =
        (pivot_named("pivot"), pivot_named("r1"), pivot_named("s1"))
    {
        println!("Pivot:          {pv:.2}  (r1 {r1:.2}, s1 {s1:.2})");
    }
    println!();

    let decision = &report.decision;
    println!("--- Decision ---");
    println!("Signal:         {}", decision.signal);
    println!("Zone:           {}", decision.zone);
    println!("Reason:         {}", decision.reason);
    if let Some(plan) = &decision.trade_plan {
        println!("Action:         {}", action_label(plan.action));
        if !plan.entries.is_empty() {
            println!("Entries:        {}", join_prices(&plan.entries));
        }
        if let Some(stop) = plan.stop {
            println!("Stop:           {stop:.2}");
        }
        if let (Some(tp1), Some(tp2), Some(tp3)) = (plan.tp1, plan.tp2, plan.tp3) {
            println!("Targets:        {tp1:.2} / {tp2:.2} / {tp3:.2}");
        }
        if let Some(note) = &plan.confirmation_note {
            println!("Confirm:        {note}");
        }
    }
    let probs = decision.probabilities;
    println!(
        "P(down >5%):    {:.0}%    P(up >5%): {:.0}%    P(at resistance): {:.0}%",
        probs.prob_down5, probs.prob_up5, probs.prob_at_resistance
    );
    println!("Median path:    {:+.1}%", probs.median_change_pct);

    if report.origin.starts_with("SYNTHETIC") {
        println!();
        println!("WARNING: Analysis based on SYNTHETIC data");
        println!("         ({})", report.origin);
    }
    println!();
}
