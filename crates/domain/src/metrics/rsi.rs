use crate::error::{Result, TokenomicsError};
use rust_decimal::Decimal;

/// Value returned when neither gains nor losses occurred.
pub const NEUTRAL_RSI: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Calculates the Relative Strength Index using Wilder smoothing.
///
/// The first `period` price changes seed simple averages of gains and losses;
/// every later change is folded in as `avg = (avg * (period - 1) + x) / period`.
///
/// A zero average loss would make RS undefined. In that case the function
/// returns [`NEUTRAL_RSI`] when the average gain is also zero and 100 otherwise.
///
/// # Errors
/// Returns [`TokenomicsError::InvalidInput`] for a zero period and
/// [`TokenomicsError::InsufficientData`] when fewer than `period + 1` prices
/// are supplied.
pub fn relative_strength_index(prices: &[Decimal], period: usize) -> Result<Decimal> {
    if period == 0 {
        return Err(TokenomicsError::invalid("RSI period must be at least 1"));
    }
    if prices.len() < period + 1 {
        return Err(TokenomicsError::InsufficientData {
            required: period + 1,
            actual: prices.len(),
        });
    }

    let n = Decimal::from(period);
    let changes: Vec<Decimal> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let (seed, rest) = changes.split_at(period);

    let mut avg_gain: Decimal = seed.iter().filter(|c| c.is_sign_positive()).sum::<Decimal>() / n;
    let mut avg_loss: Decimal = -seed.iter().filter(|c| c.is_sign_negative()).sum::<Decimal>() / n;

    for change in rest {
        let gain = (*change).max(Decimal::ZERO);
        let loss = (-*change).max(Decimal::ZERO);
        avg_gain = (avg_gain * (n - Decimal::ONE) + gain) / n;
        avg_loss = (avg_loss * (n - Decimal::ONE) + loss) / n;
    }

    if avg_loss.is_zero() {
        return Ok(if avg_gain.is_zero() {
            NEUTRAL_RSI
        } else {
            Decimal::ONE_HUNDRED
        });
    }

    let rs = avg_gain / avg_loss;
    Ok(Decimal::ONE_HUNDRED - Decimal::ONE_HUNDRED / (Decimal::ONE + rs))
}
