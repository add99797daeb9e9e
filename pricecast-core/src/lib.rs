//! PriceCast Core: indicators, levels, Monte Carlo projection, decision engine.
//!
//! This crate contains the quantitative core behind the dashboard:
//! - Domain types (daily OHLCV bars)
//! - Stateless indicator library with per-bar snapshots
//! - Support/resistance, Fibonacci, and floor-pivot level detection
//! - Seeded Monte Carlo price projection with percentile bands
//! - Rule-based GO / WATCH / NO-GO decision engine
//! - Bar providers (crypto OHLC, equity chart, CSV) with synthetic fallback
//! - One-call analysis pipeline assembling the full report

pub mod analysis;
pub mod data;
pub mod decision;
pub mod domain;
pub mod indicators;
pub mod levels;
pub mod projection;
pub mod rng;
