use crate::error::{Result, TokenomicsError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Total, serviceable and obtainable market sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketFunnel {
    pub tam: Decimal,
    pub sam: Decimal,
    pub som: Decimal,
}

impl MarketFunnel {
    /// Narrows a total addressable market by two percentages (0-100).
    ///
    /// sam = tam * sam_percent / 100, som = sam * som_percent / 100
    pub fn new(tam: Decimal, sam_percent: Decimal, som_percent: Decimal) -> Result<Self> {
        if tam < Decimal::ZERO {
            return Err(TokenomicsError::invalid(format!(
                "TAM must not be negative, got {tam}"
            )));
        }
        for (name, percent) in [("SAM", sam_percent), ("SOM", som_percent)] {
            if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
                return Err(TokenomicsError::invalid(format!(
                    "{name} percent must be within 0-100, got {percent}"
                )));
            }
        }

        let sam = tam * sam_percent / Decimal::ONE_HUNDRED;
        let som = sam * som_percent / Decimal::ONE_HUNDRED;
        Ok(Self { tam, sam, som })
    }

    /// SOM as a percentage of TAM.
    pub fn obtainable_share(&self) -> Decimal {
        if self.tam.is_zero() {
            return Decimal::ZERO;
        }
        self.som / self.tam * Decimal::ONE_HUNDRED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_funnel() {
        let funnel = MarketFunnel::new(dec!(10000000000), dec!(20), dec!(5)).unwrap();
        assert_eq!(funnel.sam, dec!(2000000000));
        assert_eq!(funnel.som, dec!(100000000));
        assert_eq!(funnel.obtainable_share(), dec!(1));
    }

    #[test]
    fn test_funnel_rejects_bad_percent() {
        assert!(MarketFunnel::new(dec!(100), dec!(101), dec!(5)).is_err());
        assert!(MarketFunnel::new(dec!(100), dec!(10), dec!(-5)).is_err());
        assert!(MarketFunnel::new(dec!(-1), dec!(10), dec!(5)).is_err());
    }

    #[test]
    fn test_empty_market() {
        let funnel = MarketFunnel::new(Decimal::ZERO, dec!(50), dec!(50)).unwrap();
        assert_eq!(funnel.obtainable_share(), Decimal::ZERO);
    }
}
