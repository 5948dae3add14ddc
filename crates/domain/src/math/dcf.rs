//! Discounted cash flow valuation.
//!
//! Projects are valued on a fixed five-year horizon: each year's cash flow is
//! discounted at `(1 + r)^year` and the final year's cash flow, scaled by a
//! terminal multiple, stands in for everything after the horizon.

use crate::error::{Result, TokenomicsError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of projected years.
pub const PROJECTION_YEARS: usize = 5;

/// Five-year cash flow projection with its valuation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowSchedule {
    /// Projected cash flows for years 1 through 5.
    pub cash_flows: [Decimal; PROJECTION_YEARS],
    /// Discount rate as a decimal (0.20 = 20%).
    pub discount_rate: Decimal,
    /// Multiple applied to the year-5 cash flow.
    pub terminal_multiple: Decimal,
}

/// Breakdown of a DCF valuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DcfValuation {
    /// Sum of discounted yearly cash flows.
    pub npv: Decimal,
    /// Undiscounted terminal value.
    pub terminal_value: Decimal,
    /// Terminal value discounted from year 5.
    pub discounted_terminal: Decimal,
    /// npv + discounted_terminal
    pub total: Decimal,
}

impl CashFlowSchedule {
    /// Creates a schedule from a slice that must hold exactly five cash flows.
    ///
    /// # Errors
    /// Returns [`TokenomicsError::InvalidInput`] for the wrong number of cash
    /// flows or a discount rate at or below -1.
    pub fn new(cash_flows: &[Decimal], discount_rate: Decimal, terminal_multiple: Decimal) -> Result<Self> {
        let cash_flows: [Decimal; PROJECTION_YEARS] = cash_flows.try_into().map_err(|_| {
            TokenomicsError::invalid(format!(
                "expected {PROJECTION_YEARS} cash flows, got {}",
                cash_flows.len()
            ))
        })?;
        validate_rate(discount_rate)?;
        Ok(Self {
            cash_flows,
            discount_rate,
            terminal_multiple,
        })
    }

    /// Values the schedule.
    ///
    /// # Errors
    /// Returns [`TokenomicsError::InvalidInput`] if the discount rate is at
    /// or below -1, or if a discount factor or discounted value leaves the
    /// `Decimal` range (rates very close to -1 make factors vanish).
    pub fn valuate(&self) -> Result<DcfValuation> {
        validate_rate(self.discount_rate)?;

        let growth = Decimal::ONE + self.discount_rate;
        let mut factor = Decimal::ONE;
        let mut npv = Decimal::ZERO;
        for (year, cash_flow) in self.cash_flows.iter().enumerate() {
            factor = factor
                .checked_mul(growth)
                .filter(|f| !f.is_zero())
                .ok_or_else(|| out_of_range(format!("discount factor for year {}", year + 1)))?;
            npv = cash_flow
                .checked_div(factor)
                .and_then(|discounted| npv.checked_add(discounted))
                .ok_or_else(|| out_of_range(format!("discounted cash flow for year {}", year + 1)))?;
        }

        let terminal_value = self.cash_flows[PROJECTION_YEARS - 1]
            .checked_mul(self.terminal_multiple)
            .ok_or_else(|| out_of_range("terminal value".to_string()))?;
        let discounted_terminal = terminal_value
            .checked_div(factor)
            .ok_or_else(|| out_of_range("discounted terminal value".to_string()))?;
        let total = npv
            .checked_add(discounted_terminal)
            .ok_or_else(|| out_of_range("total valuation".to_string()))?;

        Ok(DcfValuation {
            npv,
            terminal_value,
            discounted_terminal,
            total,
        })
    }
}

/// Values five cash flows discounted at `discount_rate` plus a terminal multiple.
///
/// # Errors
/// Returns [`TokenomicsError::InvalidInput`] if `cash_flows` does not hold
/// five entries or `discount_rate <= -1`.
pub fn dcf_value(
    cash_flows: &[Decimal],
    discount_rate: Decimal,
    terminal_multiple: Decimal,
) -> Result<DcfValuation> {
    CashFlowSchedule::new(cash_flows, discount_rate, terminal_multiple)?.valuate()
}

fn out_of_range(what: String) -> TokenomicsError {
    TokenomicsError::invalid(format!("{what} is out of range"))
}

fn validate_rate(rate: Decimal) -> Result<()> {
    if rate <= Decimal::NEGATIVE_ONE {
        return Err(TokenomicsError::invalid(format!(
            "discount rate must be greater than -1, got {rate}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_terminal_only_projection() {
        let cfs = [dec!(0), dec!(0), dec!(0), dec!(0), dec!(100000)];
        let valuation = dcf_value(&cfs, dec!(0.20), dec!(10)).unwrap();

        assert_eq!(valuation.terminal_value, dec!(1000000));
        assert!((valuation.npv - dec!(40187.76)).abs() < dec!(0.01));
        assert!((valuation.discounted_terminal - dec!(401877.57)).abs() < dec!(0.01));
        assert!((valuation.total - dec!(442065.33)).abs() < dec!(0.01));
    }

    #[test]
    fn test_zero_rate_is_plain_sum() {
        let cfs = [dec!(1200), dec!(-300), dec!(4500.5), dec!(0), dec!(7000)];
        let valuation = dcf_value(&cfs, Decimal::ZERO, dec!(8)).unwrap();

        let sum: Decimal = cfs.iter().copied().sum();
        assert_eq!(valuation.npv, sum);
        assert_eq!(valuation.total, sum + dec!(7000) * dec!(8));
    }

    #[test]
    fn test_higher_rate_lowers_value() {
        let cfs = [dec!(10000), dec!(20000), dec!(0), dec!(35000), dec!(50000)];
        let rates = [dec!(-0.5), dec!(0), dec!(0.05), dec!(0.10), dec!(0.20), dec!(0.50), dec!(3)];

        let values: Vec<Decimal> = rates
            .iter()
            .map(|r| dcf_value(&cfs, *r, dec!(5)).unwrap().total)
            .collect();
        for pair in values.windows(2) {
            assert!(pair[1] < pair[0], "{} should be below {}", pair[1], pair[0]);
        }
    }

    #[test]
    fn test_rejects_rate_at_or_below_minus_one() {
        let cfs = [dec!(1); 5];
        assert!(matches!(
            dcf_value(&cfs, dec!(-1), dec!(10)),
            Err(TokenomicsError::InvalidInput(_))
        ));
        assert!(dcf_value(&cfs, dec!(-2.5), dec!(10)).is_err());
        assert!(dcf_value(&cfs, dec!(-0.99), dec!(10)).is_ok());
    }

    #[test]
    fn test_rate_near_minus_one() {
        let cfs = [dec!(1); 5];
        // (1 - 0.999999)^5 = 1e-30 vanishes at Decimal scale
        assert!(matches!(
            dcf_value(&cfs, dec!(-0.999999), dec!(10)),
            Err(TokenomicsError::InvalidInput(_))
        ));

        // Factors stay representable but the discounted values overflow
        let large = [dec!(1000000000000000000); 5];
        assert!(matches!(
            dcf_value(&large, dec!(-0.9999), dec!(10)),
            Err(TokenomicsError::InvalidInput(_))
        ));

        let valuation = dcf_value(&cfs, dec!(-0.9), dec!(10)).unwrap();
        assert_eq!(valuation.discounted_terminal, dec!(1000000));
        assert_eq!(valuation.npv, dec!(111110));
    }

    #[test]
    fn test_terminal_value_overflow_is_an_error() {
        let cfs = [dec!(0), dec!(0), dec!(0), dec!(0), Decimal::MAX];
        assert!(matches!(
            dcf_value(&cfs, dec!(0.1), dec!(2)),
            Err(TokenomicsError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_requires_five_cash_flows() {
        assert!(dcf_value(&[dec!(1), dec!(2)], dec!(0.1), dec!(1)).is_err());
        assert!(dcf_value(&[dec!(1); 6], dec!(0.1), dec!(1)).is_err());
    }
}
