//! Autoregressive forecasting of log-returns.
//!
//! An AR(p) model is fitted to the demeaned return series through the
//! Yule-Walker equations (solved with the Levinson-Durbin recursion). The
//! fitted recursion is iterated forward to obtain point returns, which are
//! accumulated from the last observed price. Confidence bands widen with
//! `z * sigma * sqrt(step)` in log space, so after exponentiation they are
//! asymmetric around the point price but always contain it.

use crate::config::ForecastConfig;
use crate::statistics::{log_returns, mean};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use tokenomics_lab_domain::error::{Result, TokenomicsError};
use tracing::{debug, trace};

/// Fitted AR(p) model: `r_t = mean + sum(phi_j * (r_{t-j} - mean)) + e_t`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArModel {
    /// Sample mean of the returns.
    pub mean: f64,
    /// `mean * (1 - sum(phi))`
    pub intercept: f64,
    /// phi_1 .. phi_p
    pub coefficients: Vec<f64>,
    /// Residual standard error.
    pub sigma: f64,
}

impl ArModel {
    /// Fits an AR model of the given order.
    ///
    /// # Errors
    /// Returns [`TokenomicsError::InsufficientData`] when the series holds
    /// fewer than `order + 2` observations.
    pub fn fit(returns: &[f64], order: usize) -> Result<Self> {
        let required = order + 2;
        if returns.len() < required {
            return Err(TokenomicsError::InsufficientData {
                required,
                actual: returns.len(),
            });
        }
        if returns.iter().any(|r| !r.is_finite()) {
            return Err(TokenomicsError::invalid("returns must be finite"));
        }

        let mu = mean(returns).unwrap_or(0.0);
        let autocov = autocovariances(returns, mu, order);
        let coefficients = levinson_durbin(&autocov, order);

        let mut sse = 0.0;
        for t in order..returns.len() {
            let predicted = predict(mu, &coefficients, &returns[..t]);
            sse += (returns[t] - predicted).powi(2);
        }
        let dof = returns.len() - order - 1;
        let sigma = (sse / dof as f64).sqrt();

        Ok(Self {
            mean: mu,
            intercept: mu * (1.0 - coefficients.iter().sum::<f64>()),
            coefficients,
            sigma,
        })
    }

    pub fn order(&self) -> usize {
        self.coefficients.len()
    }

    /// Iterates the recursion `horizon` steps past `history`.
    pub fn project(&self, history: &[f64], horizon: usize) -> Vec<f64> {
        let mut buffer = history.to_vec();
        for _ in 0..horizon {
            let next = predict(self.mean, &self.coefficients, &buffer);
            buffer.push(next);
        }
        buffer.split_off(history.len())
    }
}

/// One projected period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// 1-based step after the last observation.
    pub period: usize,
    /// Point forecast of the log-return for this period.
    pub log_return: f64,
    pub point: f64,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub points: Vec<ForecastPoint>,
    pub model: ArModel,
    /// Two-sided normal quantile used for the band.
    pub z: f64,
}

impl ForecastResult {
    pub fn point(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.point).collect()
    }

    pub fn lower(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.lower).collect()
    }

    pub fn upper(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.upper).collect()
    }
}

/// Forecasts prices from a log-return history ending at `last_price`.
///
/// # Errors
/// - [`TokenomicsError::InvalidInput`] for an invalid config or a
///   non-positive `last_price`.
/// - [`TokenomicsError::InsufficientData`] when `history` is shorter than
///   `ar_order + 2`.
pub fn forecast_series(history: &[f64], last_price: f64, config: &ForecastConfig) -> Result<ForecastResult> {
    config.validate()?;
    if !(last_price.is_finite() && last_price > 0.0) {
        return Err(TokenomicsError::invalid(format!(
            "last price must be positive, got {last_price}"
        )));
    }

    let model = ArModel::fit(history, config.ar_order)?;
    let z = z_score(config.confidence_pct)?;
    debug!(
        order = model.order(),
        observations = history.len(),
        sigma = model.sigma,
        z,
        "Fitted AR model"
    );

    let projected = model.project(history, config.horizon);
    let origin = last_price.ln();
    let mut cumulative = 0.0;
    let points = projected
        .into_iter()
        .enumerate()
        .map(|(i, log_return)| {
            let period = i + 1;
            cumulative += log_return;
            let level = origin + cumulative;
            let half_width = z * model.sigma * (period as f64).sqrt();
            ForecastPoint {
                period,
                log_return,
                point: level.exp(),
                lower: (level - half_width).exp(),
                upper: (level + half_width).exp(),
            }
        })
        .collect();

    Ok(ForecastResult { points, model, z })
}

/// Forecasts from a price history; log-returns are derived from it.
///
/// A history of `n` prices yields `n - 1` returns, so it must hold at least
/// `ar_order + 3` prices.
pub fn forecast_prices(prices: &[f64], config: &ForecastConfig) -> Result<ForecastResult> {
    let returns = log_returns(prices)?;
    let last_price = prices.last().copied().ok_or(TokenomicsError::InsufficientData {
        required: config.min_observations() + 1,
        actual: 0,
    })?;
    forecast_series(&returns, last_price, config).map_err(|e| match e {
        TokenomicsError::InsufficientData { required, actual } => TokenomicsError::InsufficientData {
            required: required + 1,
            actual: actual + 1,
        },
        other => other,
    })
}

/// Two-sided standard normal quantile for a confidence level in percent.
///
/// # Errors
/// Returns [`TokenomicsError::InvalidInput`] unless `0 < confidence_pct < 100`.
pub fn z_score(confidence_pct: f64) -> Result<f64> {
    if !(confidence_pct > 0.0 && confidence_pct < 100.0) {
        return Err(TokenomicsError::invalid(format!(
            "confidence must be strictly between 0 and 100, got {confidence_pct}"
        )));
    }
    let tail = (1.0 - confidence_pct / 100.0) / 2.0;
    Ok(inverse_normal_cdf(1.0 - tail))
}

/// Memoizes forecasts keyed on the exact inputs.
///
/// When full, the oldest inserted entry is evicted first.
#[derive(Debug, Default)]
pub struct ForecastCache {
    entries: HashMap<ForecastKey, ForecastResult>,
    insertion_order: VecDeque<ForecastKey>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ForecastKey {
    history: Vec<u64>,
    last_price: u64,
    horizon: usize,
    confidence: u64,
    ar_order: usize,
}

impl ForecastKey {
    fn new(history: &[f64], last_price: f64, config: &ForecastConfig) -> Self {
        Self {
            history: history.iter().map(|v| v.to_bits()).collect(),
            last_price: last_price.to_bits(),
            horizon: config.horizon,
            confidence: config.confidence_pct.to_bits(),
            ar_order: config.ar_order,
        }
    }
}

impl ForecastCache {
    /// Creates a cache holding at most `capacity` results (0 = unbounded).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Returns a cached forecast or computes and stores it. Errors are not cached.
    pub fn get_or_compute(
        &mut self,
        history: &[f64],
        last_price: f64,
        config: &ForecastConfig,
    ) -> Result<ForecastResult> {
        let key = ForecastKey::new(history, last_price, config);
        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            trace!(hits = self.hits, "Forecast cache hit");
            return Ok(hit.clone());
        }

        self.misses += 1;
        let result = forecast_series(history, last_price, config)?;
        if self.capacity > 0 && self.entries.len() >= self.capacity {
            if let Some(oldest) = self.insertion_order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.insertion_order.push_back(key.clone());
        self.entries.insert(key, result.clone());
        Ok(result)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

fn autocovariances(returns: &[f64], mu: f64, max_lag: usize) -> Vec<f64> {
    let n = returns.len() as f64;
    (0..=max_lag)
        .map(|lag| {
            returns[lag..]
                .iter()
                .zip(returns)
                .map(|(a, b)| (a - mu) * (b - mu))
                .sum::<f64>()
                / n
        })
        .collect()
}

/// Solves the Yule-Walker equations for AR coefficients.
///
/// A zero-variance series has no autocorrelation structure; all
/// coefficients are zero.
fn levinson_durbin(autocov: &[f64], order: usize) -> Vec<f64> {
    let mut phi = vec![0.0; order];
    let mut error = autocov[0];
    if error <= f64::EPSILON * f64::EPSILON {
        return phi;
    }

    for k in 1..=order {
        let mut acc = autocov[k];
        for j in 1..k {
            acc -= phi[j - 1] * autocov[k - j];
        }
        let reflection = acc / error;

        let previous = phi.clone();
        phi[k - 1] = reflection;
        for j in 1..k {
            phi[j - 1] = previous[j - 1] - reflection * previous[k - j - 1];
        }

        error *= 1.0 - reflection * reflection;
        if error <= 0.0 {
            break;
        }
    }

    phi
}

/// One-step prediction from the tail of `history`.
fn predict(mu: f64, coefficients: &[f64], history: &[f64]) -> f64 {
    let n = history.len();
    mu + coefficients
        .iter()
        .enumerate()
        .map(|(j, phi)| phi * (history[n - 1 - j] - mu))
        .sum::<f64>()
}

/// Acklam's rational approximation of the standard normal quantile.
/// Relative error below 1.2e-9 on (0, 1).
fn inverse_normal_cdf(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    let tail = |q: f64| {
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    };

    if p < P_LOW {
        tail((-2.0 * p.ln()).sqrt())
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        -tail((-2.0 * (1.0 - p).ln()).sqrt())
    }
}
