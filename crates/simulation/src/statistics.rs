//! Descriptive statistics over `f64` series.
//!
//! Empty or too-short inputs return `None` from the scalar helpers instead of
//! NaN. Zero-variance series are a degenerate case for correlation and
//! resolve to a correlation of 0.

use tokenomics_lab_domain::error::{Result, TokenomicsError};

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator). Needs two values.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sorted = sorted(values);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Nearest-rank percentile, `pct` in (0, 100].
pub fn percentile(values: &[f64], pct: f64) -> Option<f64> {
    if values.is_empty() || !(pct > 0.0 && pct <= 100.0) {
        return None;
    }
    let sorted = sorted(values);
    let rank = ((pct / 100.0) * sorted.len() as f64).ceil() as usize;
    Some(sorted[rank.clamp(1, sorted.len()) - 1])
}

/// ln(p[i] / p[i-1]) for consecutive prices.
///
/// # Errors
/// Returns [`TokenomicsError::InvalidInput`] if any price is not a positive
/// finite number.
pub fn log_returns(prices: &[f64]) -> Result<Vec<f64>> {
    if let Some(bad) = prices.iter().find(|p| !(p.is_finite() && **p > 0.0)) {
        return Err(TokenomicsError::invalid(format!(
            "prices must be positive and finite, got {bad}"
        )));
    }
    Ok(prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect())
}

/// Sample volatility of `returns` scaled by `sqrt(periods_per_year)`.
pub fn annualized_volatility(returns: &[f64], periods_per_year: f64) -> Option<f64> {
    std_dev(returns).map(|sd| sd * periods_per_year.sqrt())
}

/// Pearson correlation coefficient.
///
/// # Errors
/// Returns [`TokenomicsError::InvalidInput`] if the series differ in length,
/// and [`TokenomicsError::InsufficientData`] if they hold fewer than two points.
pub fn pearson(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(TokenomicsError::invalid(format!(
            "series lengths differ: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    if a.len() < 2 {
        return Err(TokenomicsError::InsufficientData {
            required: 2,
            actual: a.len(),
        });
    }

    let (ma, mb) = (a.iter().sum::<f64>() / a.len() as f64, b.iter().sum::<f64>() / b.len() as f64);
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        cov += (x - ma) * (y - mb);
        var_a += (x - ma).powi(2);
        var_b += (y - mb).powi(2);
    }

    let denom = (var_a * var_b).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return Ok(0.0);
    }
    Ok((cov / denom).clamp(-1.0, 1.0))
}

/// Pairwise Pearson correlations; the diagonal is always 1.
pub fn correlation_matrix(series: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    let n = series.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pearson(&series[i], &series[j])?;
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    Ok(matrix)
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    v
}
