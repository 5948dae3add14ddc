//! Stochastic and statistical routines for token economy modelling.
//!
//! This crate provides:
//! - Price path generators (normal and bounded-uniform random walks)
//! - Monte Carlo ensembles with per-period summary statistics
//! - Bear/base/bull market scenario runs
//! - Autoregressive return forecasting with confidence bands
//! - Descriptive statistics and correlation matrices

/// Prelude module for convenient imports.
pub mod prelude;

/// Immutable simulation configuration.
pub mod config;
/// Autoregressive forecasting.
pub mod forecast;
/// Monte Carlo ensembles.
pub mod monte_carlo;
/// Price path generators.
pub mod price_path;
/// Market scenarios.
pub mod scenario;
/// Descriptive statistics.
pub mod statistics;
