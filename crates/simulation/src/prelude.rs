//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use tokenomics_lab_simulation::prelude::*;
//! ```

// Configuration
pub use crate::config::{ForecastConfig, MAX_AR_ORDER, PricePathConfig};

// Forecasting
pub use crate::forecast::{
    ArModel, ForecastCache, ForecastPoint, ForecastResult, forecast_prices, forecast_series,
    z_score,
};

// Monte Carlo
pub use crate::monte_carlo::{
    EnsembleResult, MonteCarloRunner, PeriodStats, TerminalStats, simulate_price_ensemble,
};

// Price path generators
pub use crate::price_path::{
    BoundedUniformWalk, GeometricRandomWalk, PRICE_FLOOR, PricePathGenerator, path_floor, simulate_price_path,
};

// Scenarios
pub use crate::scenario::{
    MarketScenario, ScenarioResult, simulate_market_scenario, simulate_market_scenarios,
};

// Statistics
pub use crate::statistics::{
    annualized_volatility, correlation_matrix, log_returns, pearson, percentile,
};
