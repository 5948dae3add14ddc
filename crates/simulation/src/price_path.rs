use crate::config::PricePathConfig;
use rand::Rng;
use rand::distr::Uniform;
use rand_distr::{Distribution, Normal};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use tokenomics_lab_domain::error::{Result, TokenomicsError};
use tokenomics_lab_domain::value_objects::price::Price;
use tracing::debug;

/// Floor for paths starting at or above 0.01; lower starts get a floor of
/// `initial_price * FLOOR_RATIO` instead.
pub const PRICE_FLOOR: f64 = 1e-8;
/// Path floor relative to the initial price.
pub const FLOOR_RATIO: f64 = 1e-6;
/// Smallest positive `Decimal` (scale 28).
pub const MIN_PRICE: f64 = 1e-28;
/// Largest price a path may reach; keeps every value representable as a `Decimal`.
pub const PRICE_CEILING: f64 = 1e24;
/// Extra headroom on the upper bound of uniform scenario returns.
pub const UNIFORM_UPSIDE: f64 = 0.05;

pub trait PricePathGenerator {
    /// Produces `steps + 1` prices starting at the initial price.
    fn generate<R: Rng + ?Sized>(&self, rng: &mut R, steps: usize) -> Vec<Price>;
}

/// Compounds per-period returns drawn from `Normal(drift, volatility)`.
///
/// price[i] = max(price[i-1] * (1 + r_i), floor)
#[derive(Debug, Clone)]
pub struct GeometricRandomWalk {
    pub initial_price: Decimal,
    pub drift: f64,      // per-period mean return (mu)
    pub volatility: f64, // per-period return deviation (sigma)
    returns: Normal<f64>,
}

impl GeometricRandomWalk {
    pub fn new(initial_price: Decimal, drift: f64, volatility: f64) -> Result<Self> {
        validate_initial_price(initial_price)?;
        let returns = Normal::new(drift, volatility).map_err(|e| {
            TokenomicsError::invalid(format!(
                "invalid return distribution (drift {drift}, volatility {volatility}): {e}"
            ))
        })?;
        Ok(Self {
            initial_price,
            drift,
            volatility,
            returns,
        })
    }

    pub fn from_config(config: &PricePathConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.initial_price, config.drift, config.volatility)
    }
}

impl PricePathGenerator for GeometricRandomWalk {
    fn generate<R: Rng + ?Sized>(&self, rng: &mut R, steps: usize) -> Vec<Price> {
        compound(self.initial_price, steps, || self.returns.sample(&mut *rng))
    }
}

/// Compounds `growth_bias + U(-volatility, volatility + 0.05)` returns.
///
/// Used for market scenario runs, where the bias encodes the scenario's
/// growth assumption.
#[derive(Debug, Clone)]
pub struct BoundedUniformWalk {
    pub initial_price: Decimal,
    pub growth_bias: f64,
    pub volatility: f64,
    shocks: Uniform<f64>,
}

impl BoundedUniformWalk {
    pub fn new(initial_price: Decimal, growth_bias: f64, volatility: f64) -> Result<Self> {
        validate_initial_price(initial_price)?;
        if !growth_bias.is_finite() {
            return Err(TokenomicsError::invalid("growth bias must be finite"));
        }
        if !volatility.is_finite() || volatility < 0.0 {
            return Err(TokenomicsError::invalid(format!(
                "volatility must be a non-negative number, got {volatility}"
            )));
        }
        let shocks = Uniform::new_inclusive(-volatility, volatility + UNIFORM_UPSIDE)
            .map_err(|e| TokenomicsError::invalid(format!("invalid shock range: {e}")))?;
        Ok(Self {
            initial_price,
            growth_bias,
            volatility,
            shocks,
        })
    }

    /// Mean per-period return: bias plus the midpoint of the shock range.
    #[must_use]
    pub fn expected_return(&self) -> f64 {
        self.growth_bias + UNIFORM_UPSIDE / 2.0
    }
}

impl PricePathGenerator for BoundedUniformWalk {
    fn generate<R: Rng + ?Sized>(&self, rng: &mut R, steps: usize) -> Vec<Price> {
        compound(self.initial_price, steps, || {
            self.growth_bias + self.shocks.sample(&mut *rng)
        })
    }
}

/// Generates one normal random-walk path of `config.periods` steps.
///
/// Two calls with the same seed and parameters return identical paths.
///
/// # Errors
/// Returns [`TokenomicsError::InvalidInput`] if the config is invalid.
pub fn simulate_price_path(config: &PricePathConfig) -> Result<Vec<Price>> {
    let generator = GeometricRandomWalk::from_config(config)?;
    let mut rng = config.rng();
    debug!(
        periods = config.periods,
        drift = config.drift,
        volatility = config.volatility,
        seeded = config.seed.is_some(),
        "Generating price path"
    );
    Ok(generator.generate(&mut rng, config.periods))
}

fn compound(initial_price: Decimal, steps: usize, mut next_return: impl FnMut() -> f64) -> Vec<Price> {
    let mut prices = Vec::with_capacity(steps + 1);
    prices.push(Price::new(initial_price));

    let start = initial_price.to_f64().unwrap_or(PRICE_FLOOR);
    let floor = path_floor(start);
    let mut current_price = clamp_price(start, floor);
    for _ in 0..steps {
        current_price = clamp_price(current_price * (1.0 + next_return()), floor);
        prices.push(to_price(current_price, floor));
    }

    prices
}

/// Lowest price a path starting at `initial_price` may reach.
pub fn path_floor(initial_price: f64) -> f64 {
    (initial_price * FLOOR_RATIO).clamp(MIN_PRICE, PRICE_FLOOR)
}

fn clamp_price(price: f64, floor: f64) -> f64 {
    if price.is_nan() {
        return floor;
    }
    price.clamp(floor, PRICE_CEILING)
}

fn to_price(price: f64, floor: f64) -> Price {
    // f64 is standard for the sampling loop; the domain object carries a Decimal.
    Price::from_f64(price)
        .ok()
        .filter(|p| p.value > Decimal::ZERO)
        .unwrap_or_else(|| Price::new(Decimal::from_f64(floor).unwrap_or(Decimal::new(1, 28))))
}

fn validate_initial_price(initial_price: Decimal) -> Result<()> {
    Price::try_new(initial_price).map(|_| ())
}
