use crate::error::{Result, TokenomicsError};
use crate::math::constant_product::{TradeQuote, calculate_k, constant_product_trade};
use crate::value_objects::price::Price;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Two-asset constant-product pool without fees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityPool {
    pub token_reserve: Decimal,
    pub paired_reserve: Decimal,
}

impl LiquidityPool {
    /// Creates a pool, rejecting empty or negative reserves.
    pub fn new(token_reserve: Decimal, paired_reserve: Decimal) -> Result<Self> {
        if token_reserve <= Decimal::ZERO || paired_reserve <= Decimal::ZERO {
            return Err(TokenomicsError::invalid(format!(
                "reserves must be positive, got {token_reserve} and {paired_reserve}"
            )));
        }
        Ok(Self {
            token_reserve,
            paired_reserve,
        })
    }

    pub fn k(&self) -> Decimal {
        calculate_k(self.token_reserve, self.paired_reserve)
    }

    /// Price of one token in the paired asset.
    pub fn spot_price(&self) -> Result<Price> {
        self.paired_reserve
            .checked_div(self.token_reserve)
            .map(Price::new)
            .ok_or_else(|| TokenomicsError::invalid("spot price is out of range"))
    }

    /// Quotes selling `delta` tokens into the pool.
    pub fn quote_sell(&self, delta: Decimal) -> Result<TradeQuote> {
        constant_product_trade(self.token_reserve, self.paired_reserve, delta)
    }

    /// Returns the pool state after selling `delta` tokens.
    pub fn after_sell(&self, delta: Decimal) -> Result<Self> {
        let quote = self.quote_sell(delta)?;
        Ok(Self {
            token_reserve: quote.new_token_reserve,
            paired_reserve: quote.new_paired_reserve,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_spot_price() {
        let pool = LiquidityPool::new(dec!(2000), dec!(1000)).unwrap();
        assert_eq!(pool.spot_price().unwrap().value, dec!(0.5));

        let skewed = LiquidityPool::new(dec!(0.0000000000000000000000000001), Decimal::MAX).unwrap();
        assert!(skewed.spot_price().is_err());
    }

    #[test]
    fn test_sequential_sells_push_price_down() {
        let mut pool = LiquidityPool::new(dec!(100000), dec!(50)).unwrap();
        let k = pool.k();
        let mut last_price = pool.spot_price().unwrap();

        for _ in 0..5 {
            pool = pool.after_sell(dec!(5000)).unwrap();
            let price = pool.spot_price().unwrap();
            assert!(price < last_price);
            assert!((pool.k() - k).abs() < dec!(0.000001));
            last_price = price;
        }
    }

    #[test]
    fn test_rejects_empty_reserve() {
        assert!(LiquidityPool::new(dec!(0), dec!(10)).is_err());
        assert!(LiquidityPool::new(dec!(10), dec!(-10)).is_err());
    }
}
