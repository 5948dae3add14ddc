use crate::error::{Result, TokenomicsError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of selling tokens into a constant-product pool (x * y = k).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeQuote {
    /// Pool invariant before and after the trade.
    pub k: Decimal,
    pub new_token_reserve: Decimal,
    pub new_paired_reserve: Decimal,
    /// Paired asset paid out by the pool.
    pub tokens_received: Decimal,
    /// Spot price before the trade: paired_reserve / token_reserve.
    pub no_slippage_price: Decimal,
    /// Effective price: tokens_received / delta.
    pub actual_price: Decimal,
    /// (1 - actual_price / no_slippage_price) * 100, computed as delta / (x + delta) * 100
    pub slippage_percent: Decimal,
}

/// Quotes a sale of `delta` tokens into a pool without fees.
///
/// formula: received = y * delta / (x + delta), y' = y - received
///
/// Equivalent to `y' = k / (x + delta)`. Slippage reduces to
/// `delta / (x + delta) * 100`, so it is strictly positive for every
/// positive trade and never depends on a rounded spot price.
///
/// # Errors
/// Returns [`TokenomicsError::InvalidInput`] if either reserve or the trade
/// size is zero or negative, or if an intermediate value leaves the
/// `Decimal` range.
pub fn constant_product_trade(
    token_reserve: Decimal,
    paired_reserve: Decimal,
    delta: Decimal,
) -> Result<TradeQuote> {
    if token_reserve <= Decimal::ZERO || paired_reserve <= Decimal::ZERO {
        return Err(TokenomicsError::invalid(format!(
            "reserves must be positive, got {token_reserve} and {paired_reserve}"
        )));
    }
    if delta <= Decimal::ZERO {
        return Err(TokenomicsError::invalid(format!(
            "trade size must be positive, got {delta}"
        )));
    }

    let k = token_reserve
        .checked_mul(paired_reserve)
        .ok_or_else(|| TokenomicsError::invalid("reserve product overflows"))?;
    let new_token_reserve = token_reserve
        .checked_add(delta)
        .ok_or_else(|| TokenomicsError::invalid("token reserve overflows"))?;

    let tokens_received = paired_reserve
        .checked_mul(delta)
        .and_then(|v| v.checked_div(new_token_reserve))
        .or_else(|| {
            delta
                .checked_div(new_token_reserve)
                .and_then(|share| share.checked_mul(paired_reserve))
        })
        .ok_or_else(|| TokenomicsError::invalid("trade output is out of range"))?;
    let new_paired_reserve = paired_reserve - tokens_received;

    let no_slippage_price = paired_reserve
        .checked_div(token_reserve)
        .ok_or_else(|| TokenomicsError::invalid("spot price is out of range"))?;
    // received / delta == y / (x + delta)
    let actual_price = paired_reserve
        .checked_div(new_token_reserve)
        .ok_or_else(|| TokenomicsError::invalid("execution price is out of range"))?;
    let slippage_percent = delta
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|v| v.checked_div(new_token_reserve))
        .ok_or_else(|| TokenomicsError::invalid("slippage is out of range"))?;

    Ok(TradeQuote {
        k,
        new_token_reserve,
        new_paired_reserve,
        tokens_received,
        no_slippage_price,
        actual_price,
        slippage_percent,
    })
}

/// Calculates the constant product K
pub fn calculate_k(token_reserve: Decimal, paired_reserve: Decimal) -> Decimal {
    token_reserve.saturating_mul(paired_reserve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_reference_trade() {
        // 100,000 tokens vs 50 paired, sell 10,000 tokens
        let quote = constant_product_trade(dec!(100000), dec!(50), dec!(10000)).unwrap();

        assert_eq!(quote.k, dec!(5000000));
        assert_eq!(quote.new_token_reserve, dec!(110000));
        assert_close(quote.new_paired_reserve, dec!(45.4545), dec!(0.0001));
        assert_close(quote.tokens_received, dec!(4.5455), dec!(0.0001));
        assert_eq!(quote.no_slippage_price, dec!(0.0005));
        assert_close(quote.actual_price, dec!(0.00045455), dec!(0.00000001));
        assert_close(quote.slippage_percent, dec!(9.0909), dec!(0.0001));
    }

    #[test]
    fn test_invariant_is_preserved() {
        for (x, y, delta) in [
            (dec!(100000), dec!(50), dec!(10000)),
            (dec!(1), dec!(1), dec!(0.5)),
            (dec!(123456.789), dec!(987.65), dec!(3.21)),
            (dec!(5000), dec!(250000), dec!(40000)),
        ] {
            let quote = constant_product_trade(x, y, delta).unwrap();
            let product = (x + delta) * quote.new_paired_reserve;
            assert_close(product, x * y, dec!(0.000000001));
            assert!(quote.slippage_percent > Decimal::ZERO);
        }
    }

    #[test]
    fn test_small_trade_has_negligible_slippage() {
        let quote = constant_product_trade(dec!(100000), dec!(50), dec!(0.0001)).unwrap();
        assert!(quote.slippage_percent > Decimal::ZERO);
        assert!(quote.slippage_percent < dec!(0.000001));
        assert_close(quote.actual_price, quote.no_slippage_price, dec!(0.0000000001));
    }

    #[test]
    fn test_tiny_trades_keep_positive_slippage() {
        for (delta, expected) in [
            (dec!(0.000000000000000001), dec!(0.000000000000000000001)),
            (dec!(0.00000000000000000001), dec!(0.00000000000000000000001)),
        ] {
            let quote = constant_product_trade(dec!(100000), dec!(50), delta).unwrap();
            assert!(quote.slippage_percent > Decimal::ZERO, "delta {delta}");
            assert_close(quote.slippage_percent, expected, expected / dec!(1000));
            assert!(quote.tokens_received > Decimal::ZERO);
            assert!(quote.new_paired_reserve < dec!(50));
            assert!(quote.actual_price <= quote.no_slippage_price);
        }
    }

    #[test]
    fn test_dust_paired_reserve_does_not_panic() {
        // Spot price 1e-30 rounds to zero at Decimal scale.
        let quote = constant_product_trade(
            dec!(10000000000),
            dec!(0.00000000000000000001),
            dec!(1),
        )
        .unwrap();
        assert_eq!(quote.no_slippage_price, Decimal::ZERO);
        assert!(quote.slippage_percent > Decimal::ZERO);
        assert!(quote.slippage_percent < dec!(0.0000001));
        assert!(quote.new_paired_reserve <= dec!(0.00000000000000000001));
    }

    #[test]
    fn test_out_of_range_spot_price_is_an_error() {
        let result = constant_product_trade(dec!(0.0000000000000000000000000001), Decimal::MAX, dec!(1));
        assert!(matches!(result, Err(TokenomicsError::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(constant_product_trade(dec!(0), dec!(50), dec!(1)).is_err());
        assert!(constant_product_trade(dec!(100), dec!(-5), dec!(1)).is_err());
        assert!(constant_product_trade(dec!(100), dec!(50), dec!(0)).is_err());
        assert!(constant_product_trade(dec!(100), dec!(50), dec!(-1)).is_err());
    }

    #[test]
    fn test_calculate_k() {
        assert_eq!(calculate_k(dec!(2000), dec!(1000)), dec!(2000000));
    }
}
