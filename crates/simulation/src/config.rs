//! Simulation configuration.
//!
//! Every simulation entry point takes one of these immutable structures
//! instead of reading shared state.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokenomics_lab_domain::error::{Result, TokenomicsError};

/// Highest autoregressive order supported by the forecaster.
pub const MAX_AR_ORDER: usize = 5;

/// Parameters for price path generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePathConfig {
    /// Starting price (P0).
    pub initial_price: Decimal,
    /// Expected return per period (mu), e.g. 0.01 for 1%.
    pub drift: f64,
    /// Standard deviation of the per-period return (sigma).
    pub volatility: f64,
    /// Number of periods to simulate.
    pub periods: usize,
    /// Seed for reproducible runs. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl PricePathConfig {
    /// Creates a new price path config with defaults.
    #[must_use]
    pub fn new(initial_price: Decimal) -> Self {
        Self {
            initial_price,
            drift: 0.0,
            volatility: 0.05,
            periods: 12,
            seed: None,
        }
    }

    /// Sets the per-period drift.
    #[must_use]
    pub fn with_drift(mut self, drift: f64) -> Self {
        self.drift = drift;
        self
    }

    /// Sets the per-period volatility.
    #[must_use]
    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = volatility;
        self
    }

    /// Sets the number of periods.
    #[must_use]
    pub fn with_periods(mut self, periods: usize) -> Self {
        self.periods = periods;
        self
    }

    /// Sets the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks the parameters.
    ///
    /// # Errors
    /// Returns [`TokenomicsError::InvalidInput`] for a non-positive initial
    /// price, a negative volatility or non-finite drift/volatility.
    pub fn validate(&self) -> Result<()> {
        if self.initial_price <= Decimal::ZERO {
            return Err(TokenomicsError::invalid(format!(
                "initial price must be positive, got {}",
                self.initial_price
            )));
        }
        if !self.drift.is_finite() {
            return Err(TokenomicsError::invalid("drift must be finite"));
        }
        if !self.volatility.is_finite() || self.volatility < 0.0 {
            return Err(TokenomicsError::invalid(format!(
                "volatility must be a non-negative number, got {}",
                self.volatility
            )));
        }
        Ok(())
    }

    /// Builds the random source for this run.
    #[must_use]
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// Parameters for autoregressive forecasting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Number of future periods to project.
    pub horizon: usize,
    /// Two-sided confidence level in percent, e.g. 95.
    pub confidence_pct: f64,
    /// Autoregressive order (1 to [`MAX_AR_ORDER`]).
    pub ar_order: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 12,
            confidence_pct: 95.0,
            ar_order: 1,
        }
    }
}

impl ForecastConfig {
    /// Creates a new forecast config.
    #[must_use]
    pub fn new(horizon: usize, confidence_pct: f64) -> Self {
        Self {
            horizon,
            confidence_pct,
            ..Self::default()
        }
    }

    /// Sets the autoregressive order.
    #[must_use]
    pub fn with_ar_order(mut self, order: usize) -> Self {
        self.ar_order = order;
        self
    }

    /// Minimum history length for the configured order.
    #[must_use]
    pub fn min_observations(&self) -> usize {
        self.ar_order + 2
    }

    /// Checks the parameters.
    ///
    /// # Errors
    /// Returns [`TokenomicsError::InvalidInput`] for a zero horizon, a
    /// confidence outside (0, 100) or an order outside 1..=5.
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(TokenomicsError::invalid("forecast horizon must be at least 1"));
        }
        if !(self.confidence_pct > 0.0 && self.confidence_pct < 100.0) {
            return Err(TokenomicsError::invalid(format!(
                "confidence must be strictly between 0 and 100, got {}",
                self.confidence_pct
            )));
        }
        if self.ar_order == 0 || self.ar_order > MAX_AR_ORDER {
            return Err(TokenomicsError::invalid(format!(
                "AR order must be within 1-{MAX_AR_ORDER}, got {}",
                self.ar_order
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_path_config_builder() {
        let config = PricePathConfig::new(dec!(0.25))
            .with_drift(0.02)
            .with_volatility(0.1)
            .with_periods(36)
            .with_seed(7);

        assert_eq!(config.initial_price, dec!(0.25));
        assert_eq!(config.periods, 36);
        assert_eq!(config.seed, Some(7));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_price_path_config_validation() {
        assert!(PricePathConfig::new(dec!(0)).validate().is_err());
        assert!(PricePathConfig::new(dec!(1)).with_volatility(-0.1).validate().is_err());
        assert!(PricePathConfig::new(dec!(1)).with_drift(f64::NAN).validate().is_err());
        assert!(PricePathConfig::new(dec!(1)).with_volatility(0.0).validate().is_ok());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = PricePathConfig::new(dec!(1)).with_seed(99);
        let a: u64 = config.rng().random();
        let b: u64 = config.rng().random();
        assert_eq!(a, b);
    }

    #[test]
    fn test_forecast_config_validation() {
        assert!(ForecastConfig::default().validate().is_ok());
        assert!(ForecastConfig::new(0, 95.0).validate().is_err());
        assert!(ForecastConfig::new(5, 100.0).validate().is_err());
        assert!(ForecastConfig::new(5, 0.0).validate().is_err());
        assert!(ForecastConfig::new(5, 95.0).with_ar_order(6).validate().is_err());
        assert!(ForecastConfig::new(5, 95.0).with_ar_order(0).validate().is_err());
        assert_eq!(ForecastConfig::default().with_ar_order(3).min_observations(), 5);
    }
}
