//! Bear, base and bull market scenarios.
//!
//! Scenario runs use [`BoundedUniformWalk`]: every period's return is the
//! scenario's growth bias plus a uniform shock over
//! `[-volatility, volatility + 0.05]`.

use crate::config::PricePathConfig;
use crate::monte_carlo::{EnsembleResult, MonteCarloRunner};
use crate::price_path::BoundedUniformWalk;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokenomics_lab_domain::error::Result;
use tracing::info;

/// Market growth assumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketScenario {
    Bear,
    Base,
    Bull,
}

impl MarketScenario {
    /// All scenarios in display order.
    pub const ALL: [MarketScenario; 3] = [Self::Bear, Self::Base, Self::Bull];

    /// Per-period return added on top of the uniform shock.
    #[must_use]
    pub fn growth_bias(&self) -> f64 {
        match self {
            Self::Bear => -0.03,
            Self::Base => 0.0,
            Self::Bull => 0.02,
        }
    }
}

impl fmt::Display for MarketScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bear => "bear",
            Self::Base => "base",
            Self::Bull => "bull",
        };
        f.write_str(name)
    }
}

/// Ensemble produced for one scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario: MarketScenario,
    pub ensemble: EnsembleResult,
}

/// Runs `num_paths` uniform-shock paths under one scenario.
///
/// `config.drift` is ignored; the scenario's growth bias takes its place.
pub fn simulate_market_scenario(
    config: &PricePathConfig,
    scenario: MarketScenario,
    num_paths: usize,
) -> Result<EnsembleResult> {
    config.validate()?;
    let walk = BoundedUniformWalk::new(config.initial_price, scenario.growth_bias(), config.volatility)?;
    let runner = MonteCarloRunner::new(walk, config.periods, num_paths)?;
    let mut rng = config.rng();
    Ok(runner.run(&mut rng))
}

/// Runs every scenario in [`MarketScenario::ALL`].
///
/// With a seed, scenario `i` uses `seed + i` so runs are reproducible and
/// scenarios do not share draws.
pub fn simulate_market_scenarios(config: &PricePathConfig, num_paths: usize) -> Result<Vec<ScenarioResult>> {
    config.validate()?;
    let mut results = Vec::with_capacity(MarketScenario::ALL.len());

    for (i, scenario) in MarketScenario::ALL.into_iter().enumerate() {
        let walk = BoundedUniformWalk::new(config.initial_price, scenario.growth_bias(), config.volatility)?;
        let runner = MonteCarloRunner::new(walk, config.periods, num_paths)?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(i as u64)),
            None => StdRng::from_os_rng(),
        };
        let ensemble = runner.run(&mut rng);

        info!(
            scenario = %scenario,
            terminal_mean = %ensemble.terminal.mean,
            terminal_p95 = %ensemble.terminal.p95,
            "Scenario simulated"
        );
        results.push(ScenarioResult { scenario, ensemble });
    }

    Ok(results)
}
