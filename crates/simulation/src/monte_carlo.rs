use crate::config::PricePathConfig;
use crate::price_path::{GeometricRandomWalk, PricePathGenerator};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokenomics_lab_domain::error::{Result, TokenomicsError};
use tokenomics_lab_domain::value_objects::price::Price;
use tracing::debug;

/// Runs many independent paths from one generator.
pub struct MonteCarloRunner<G: PricePathGenerator> {
    pub generator: G,
    pub steps: usize,
    pub iterations: usize,
}

/// Cross-sectional statistics of the ensemble at one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub period: usize,
    pub mean: Decimal,
    pub min: Decimal,
    pub max: Decimal,
    pub median: Decimal,
}

/// Distribution of final prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalStats {
    pub mean: Decimal,
    pub median: Decimal,
    pub p95: Decimal, // 95th percentile (nearest rank)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleResult {
    /// One row per path, `steps + 1` prices each.
    pub paths: Vec<Vec<Price>>,
    pub period_stats: Vec<PeriodStats>,
    pub terminal: TerminalStats,
}

impl EnsembleResult {
    pub fn iterations(&self) -> usize {
        self.paths.len()
    }

    pub fn periods(&self) -> usize {
        self.period_stats.len().saturating_sub(1)
    }
}

impl<G: PricePathGenerator> MonteCarloRunner<G> {
    pub fn new(generator: G, steps: usize, iterations: usize) -> Result<Self> {
        if iterations == 0 {
            return Err(TokenomicsError::invalid("Monte Carlo needs at least one path"));
        }
        Ok(Self {
            generator,
            steps,
            iterations,
        })
    }

    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> EnsembleResult {
        debug!(
            iterations = self.iterations,
            steps = self.steps,
            "Running Monte Carlo ensemble"
        );

        let paths: Vec<Vec<Price>> = (0..self.iterations)
            .map(|_| self.generator.generate(&mut *rng, self.steps))
            .collect();

        self.aggregate(paths)
    }

    fn aggregate(&self, paths: Vec<Vec<Price>>) -> EnsembleResult {
        let mut period_stats = Vec::with_capacity(self.steps + 1);
        let mut terminal_values = Vec::new();

        for period in 0..=self.steps {
            let mut values: Vec<Decimal> = paths.iter().map(|p| p[period].value).collect();
            values.sort();

            period_stats.push(PeriodStats {
                period,
                mean: mean(&values),
                min: values[0],
                max: values[values.len() - 1],
                median: median(&values),
            });

            if period == self.steps {
                terminal_values = values;
            }
        }

        let terminal = TerminalStats {
            mean: mean(&terminal_values),
            median: median(&terminal_values),
            p95: nearest_rank(&terminal_values, 95),
        };

        EnsembleResult {
            paths,
            period_stats,
            terminal,
        }
    }
}

/// Simulates `num_paths` independent normal random-walk paths.
///
/// All paths are drawn from one generator seeded by `config.seed`, so a seeded
/// ensemble is reproducible as a whole.
///
/// # Errors
/// Returns [`TokenomicsError::InvalidInput`] for an invalid config or a zero
/// path count.
pub fn simulate_price_ensemble(config: &PricePathConfig, num_paths: usize) -> Result<EnsembleResult> {
    let generator = GeometricRandomWalk::from_config(config)?;
    let runner = MonteCarloRunner::new(generator, config.periods, num_paths)?;
    let mut rng = config.rng();
    Ok(runner.run(&mut rng))
}

// Inputs below are sorted and non-empty.

/// Running mean. Never forms the full sum, so it stays within `Decimal`
/// range for any number of values.
fn mean(values: &[Decimal]) -> Decimal {
    values
        .iter()
        .enumerate()
        .fold(Decimal::ZERO, |acc, (i, value)| {
            acc + (*value - acc) / Decimal::from(i + 1)
        })
}

fn median(sorted: &[Decimal]) -> Decimal {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        let (low, high) = (sorted[mid - 1], sorted[mid]);
        low + (high - low) / Decimal::TWO
    } else {
        sorted[mid]
    }
}

fn nearest_rank(sorted: &[Decimal], percentile: usize) -> Decimal {
    let rank = (percentile * sorted.len()).div_ceil(100).max(1);
    sorted[rank.min(sorted.len()) - 1]
}
