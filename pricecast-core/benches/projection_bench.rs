//! Criterion benchmarks for the analysis hot paths.
//!
//! Benchmarks:
//! 1. Monte Carlo projection across path counts and variates
//! 2. Indicator snapshot precompute across history lengths
//! 3. Level detection (sliding extremes + fib + pivots)

use chrono::TimeZone;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use pricecast_core::domain::PriceBar;
use pricecast_core::indicators::snapshot_series;
use pricecast_core::levels::detect_levels;
use pricecast_core::projection::{run_projection, ProjectionConfig, Variate};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize) -> Vec<PriceBar> {
    let base = chrono::Utc
        .with_ymd_and_hms(2020, 1, 2, 0, 0, 0)
        .unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            PriceBar {
                timestamp: base + chrono::Duration::days(i as i64),
                open: Some(close - 0.3),
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000.0,
            }
        })
        .collect()
}

// ── 1. Monte Carlo Projection ────────────────────────────────────────

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");

    for &sims in &[250, 1000, 4000] {
        let config = ProjectionConfig {
            horizon_days: 30,
            simulations: sims,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::new("uniform_30d", sims), &sims, |b, _| {
            b.iter(|| run_projection(black_box(100.0), black_box(0.02), &config));
        });
    }

    let gaussian = ProjectionConfig {
        horizon_days: 30,
        simulations: 1000,
        variate: Variate::Gaussian,
        ..Default::default()
    };
    group.bench_function("gaussian_30d_1000", |b| {
        b.iter(|| run_projection(black_box(100.0), black_box(0.02), &gaussian));
    });

    let long_horizon = ProjectionConfig {
        horizon_days: 252,
        simulations: 1000,
        ..Default::default()
    };
    group.bench_function("uniform_252d_1000", |b| {
        b.iter(|| run_projection(black_box(100.0), black_box(0.02), &long_horizon));
    });

    group.finish();
}

// ── 2. Indicator Snapshot Precompute ─────────────────────────────────

fn bench_snapshots(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_series");

    for &bar_count in &[252, 1260, 2520] {
        let bars = make_bars(bar_count);
        group.bench_with_input(
            BenchmarkId::new("full_stack", bar_count),
            &bar_count,
            |b, _| {
                b.iter(|| snapshot_series(black_box(&bars)));
            },
        );
    }

    group.finish();
}

// ── 3. Level Detection ───────────────────────────────────────────────

fn bench_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_levels");

    for &bar_count in &[252, 1260, 2520] {
        let bars = make_bars(bar_count);
        group.bench_with_input(
            BenchmarkId::new("swings_fib_pivots", bar_count),
            &bar_count,
            |b, _| {
                b.iter(|| detect_levels(black_box(&bars)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_projection, bench_snapshots, bench_levels);
criterion_main!(benches);
