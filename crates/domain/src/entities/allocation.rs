//! Token supply distribution across allocation categories.

use crate::entities::vesting::VestingSchedule;
use crate::error::{Result, TokenomicsError};
use crate::math::vesting::{category_allocation, released_tokens};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Share of total supply assigned to one category, with its release schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAllocation {
    /// Category name (e.g. "Team", "Investors").
    pub category: String,
    /// Share of total supply, 0-100.
    pub percent: Decimal,
    /// Release schedule for this category.
    #[serde(default)]
    pub schedule: VestingSchedule,
}

impl TokenAllocation {
    /// Creates a new allocation.
    pub fn new(category: impl Into<String>, percent: Decimal, schedule: VestingSchedule) -> Self {
        Self {
            category: category.into(),
            percent,
            schedule,
        }
    }
}

/// Tokens released for one category at a given month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRelease {
    pub category: String,
    pub tokens: Decimal,
}

/// Circulating supply snapshot at a given month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleasePoint {
    pub month: u32,
    pub releases: Vec<CategoryRelease>,
    pub total_released: Decimal,
    /// total_released as a percentage of total supply.
    pub circulating_percent: Decimal,
}

#[derive(Deserialize)]
struct RawTokenomics {
    total_supply: Decimal,
    allocations: Vec<TokenAllocation>,
}

/// Full token distribution model.
///
/// Category percentages that do not sum to 100 are accepted and logged; the
/// model never rescales them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTokenomics")]
pub struct Tokenomics {
    total_supply: Decimal,
    allocations: Vec<TokenAllocation>,
}

impl Tokenomics {
    /// Creates a distribution model.
    ///
    /// # Errors
    /// Returns [`TokenomicsError::InvalidInput`] for a non-positive supply, a
    /// category percent outside 0-100 or a duplicated category name.
    pub fn new(total_supply: Decimal, allocations: Vec<TokenAllocation>) -> Result<Self> {
        if total_supply <= Decimal::ZERO {
            return Err(TokenomicsError::invalid(format!(
                "total supply must be positive, got {total_supply}"
            )));
        }

        let mut seen = HashSet::new();
        for allocation in &allocations {
            if allocation.percent < Decimal::ZERO || allocation.percent > Decimal::ONE_HUNDRED {
                return Err(TokenomicsError::invalid(format!(
                    "allocation '{}' percent must be within 0-100, got {}",
                    allocation.category, allocation.percent
                )));
            }
            if !seen.insert(allocation.category.as_str()) {
                return Err(TokenomicsError::invalid(format!(
                    "duplicate allocation category '{}'",
                    allocation.category
                )));
            }
            if !allocation.schedule.is_fully_allocated() {
                debug!(
                    category = %allocation.category,
                    vested = %allocation.schedule.total_percent(),
                    "Vesting schedule does not release the full allocation"
                );
            }
        }

        let distributed: Decimal = allocations.iter().map(|a| a.percent).sum();
        if distributed != Decimal::ONE_HUNDRED {
            warn!(distributed = %distributed, "Token distribution does not sum to 100%");
        }

        Ok(Self {
            total_supply,
            allocations,
        })
    }

    pub fn total_supply(&self) -> Decimal {
        self.total_supply
    }

    pub fn allocations(&self) -> &[TokenAllocation] {
        &self.allocations
    }

    /// Sum of category percentages.
    pub fn distributed_percent(&self) -> Decimal {
        self.allocations.iter().map(|a| a.percent).sum()
    }

    /// Looks up an allocation by category name.
    pub fn allocation(&self, category: &str) -> Option<&TokenAllocation> {
        self.allocations.iter().find(|a| a.category == category)
    }

    /// Tokens assigned to `category`.
    pub fn allocated_tokens(&self, category: &str) -> Result<Decimal> {
        let allocation = self.require(category)?;
        category_allocation(self.total_supply, allocation.percent)
    }

    /// Tokens released from `category` by `month`.
    pub fn released_tokens(&self, category: &str, month: u32) -> Result<Decimal> {
        let allocation = self.require(category)?;
        self.released_for(allocation, month)
    }

    /// Tokens released across all categories by `month`.
    pub fn circulating_supply(&self, month: u32) -> Result<Decimal> {
        self.allocations.iter().try_fold(Decimal::ZERO, |total, a| {
            checked_sum(total, self.released_for(a, month)?)
        })
    }

    /// Month-by-month release snapshots for months `0..=horizon_months`.
    ///
    /// # Errors
    /// Returns [`TokenomicsError::InvalidInput`] if a released amount leaves
    /// the `Decimal` range.
    pub fn release_timeline(&self, horizon_months: u32) -> Result<Vec<ReleasePoint>> {
        (0..=horizon_months)
            .map(|month| -> Result<ReleasePoint> {
                let releases = self
                    .allocations
                    .iter()
                    .map(|a| -> Result<CategoryRelease> {
                        Ok(CategoryRelease {
                            category: a.category.clone(),
                            tokens: self.released_for(a, month)?,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                let total_released = releases
                    .iter()
                    .try_fold(Decimal::ZERO, |total, r| checked_sum(total, r.tokens))?;
                let circulating_percent = total_released
                    .checked_div(self.total_supply)
                    .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
                    .ok_or_else(|| TokenomicsError::invalid("circulating percent is out of range"))?;
                Ok(ReleasePoint {
                    month,
                    releases,
                    total_released,
                    circulating_percent,
                })
            })
            .collect()
    }

    fn released_for(&self, allocation: &TokenAllocation, month: u32) -> Result<Decimal> {
        let tokens = category_allocation(self.total_supply, allocation.percent)?;
        released_tokens(allocation.schedule.entries(), month, tokens)
    }

    fn require(&self, category: &str) -> Result<&TokenAllocation> {
        self.allocation(category)
            .ok_or_else(|| TokenomicsError::invalid(format!("unknown allocation category '{category}'")))
    }
}

fn checked_sum(total: Decimal, tokens: Decimal) -> Result<Decimal> {
    total
        .checked_add(tokens)
        .ok_or_else(|| TokenomicsError::invalid("released token total is out of range"))
}

impl TryFrom<RawTokenomics> for Tokenomics {
    type Error = TokenomicsError;

    fn try_from(raw: RawTokenomics) -> Result<Self> {
        Self::new(raw.total_supply, raw.allocations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::vesting::VestingEntry;
    use rust_decimal_macros::dec;

    fn sample() -> Tokenomics {
        Tokenomics::new(
            dec!(1000000000),
            vec![
                TokenAllocation::new(
                    "Team",
                    dec!(20),
                    VestingSchedule::cliff_linear(dec!(0), 12, 24).unwrap(),
                ),
                TokenAllocation::new(
                    "Investors",
                    dec!(15),
                    VestingSchedule::new(vec![
                        VestingEntry::new(0, dec!(10)),
                        VestingEntry::new(6, dec!(20)),
                        VestingEntry::new(12, dec!(30)),
                        VestingEntry::new(18, dec!(20)),
                        VestingEntry::new(24, dec!(20)),
                    ])
                    .unwrap(),
                ),
                TokenAllocation::new(
                    "Liquidity",
                    dec!(65),
                    VestingSchedule::new(vec![VestingEntry::new(0, dec!(100))]).unwrap(),
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_released_tokens_per_category() {
        let model = sample();

        assert_eq!(model.allocated_tokens("Investors").unwrap(), dec!(150000000));
        assert_eq!(model.released_tokens("Investors", 12).unwrap(), dec!(90000000));
        assert_eq!(model.released_tokens("Team", 12).unwrap(), Decimal::ZERO);
        assert_eq!(model.released_tokens("Liquidity", 0).unwrap(), dec!(650000000));
    }

    #[test]
    fn test_unknown_category() {
        let model = sample();
        assert!(matches!(
            model.released_tokens("Advisors", 3),
            Err(TokenomicsError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_release_timeline() {
        let model = sample();
        let timeline = model.release_timeline(36).unwrap();

        assert_eq!(timeline.len(), 37);
        assert_eq!(timeline[0].month, 0);
        assert_eq!(timeline[0].releases.len(), 3);
        assert_eq!(timeline[0].total_released, dec!(665000000));
        assert_eq!(timeline[36].circulating_percent, dec!(100));
        assert_eq!(timeline[36].total_released, model.circulating_supply(36).unwrap());

        for pair in timeline.windows(2) {
            assert!(pair[1].total_released >= pair[0].total_released);
        }
    }

    #[test]
    fn test_under_distribution_is_accepted() {
        let model = Tokenomics::new(
            dec!(1000),
            vec![TokenAllocation::new("Team", dec!(40), VestingSchedule::default())],
        )
        .unwrap();

        assert_eq!(model.distributed_percent(), dec!(40));
        assert_eq!(model.circulating_supply(100).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_rejects_invalid_models() {
        assert!(Tokenomics::new(dec!(0), vec![]).is_err());
        assert!(
            Tokenomics::new(
                dec!(100),
                vec![TokenAllocation::new("Team", dec!(150), VestingSchedule::default())]
            )
            .is_err()
        );
        assert!(
            Tokenomics::new(
                dec!(100),
                vec![
                    TokenAllocation::new("Team", dec!(10), VestingSchedule::default()),
                    TokenAllocation::new("Team", dec!(20), VestingSchedule::default()),
                ]
            )
            .is_err()
        );
    }

    #[test]
    fn test_deserialize_from_json() {
        let json = r#"{
            "total_supply": 1000000,
            "allocations": [
                {"category": "Public", "percent": 60, "schedule": [{"month": 0, "percent": 100}]},
                {"category": "Treasury", "percent": 40}
            ]
        }"#;
        let model: Tokenomics = serde_json::from_str(json).unwrap();

        assert_eq!(model.allocations().len(), 2);
        assert_eq!(model.circulating_supply(0).unwrap(), dec!(600000));
    }

    #[test]
    fn test_large_supply_release_timeline() {
        let supply = dec!(70000000000000000000000000000);
        let model = Tokenomics::new(
            supply,
            vec![
                TokenAllocation::new(
                    "Public",
                    dec!(50),
                    VestingSchedule::new(vec![VestingEntry::new(0, dec!(100))]).unwrap(),
                ),
                TokenAllocation::new(
                    "Treasury",
                    dec!(50),
                    VestingSchedule::cliff_linear(dec!(0), 0, 2).unwrap(),
                ),
            ],
        )
        .unwrap();

        let timeline = model.release_timeline(2).unwrap();
        assert_eq!(timeline[0].total_released, supply / dec!(2));
        assert_eq!(timeline[2].total_released, supply);
        assert_eq!(timeline[2].circulating_percent, dec!(100));
        assert_eq!(model.circulating_supply(2).unwrap(), supply);
    }

    #[test]
    fn test_over_allocated_schedule_overflow_is_an_error() {
        let model = Tokenomics::new(
            Decimal::MAX,
            vec![TokenAllocation::new(
                "Team",
                dec!(100),
                VestingSchedule::new(vec![VestingEntry::new(0, dec!(100)), VestingEntry::new(1, dec!(100))])
                    .unwrap(),
            )],
        )
        .unwrap();

        assert!(model.release_timeline(0).is_ok());
        assert!(matches!(model.release_timeline(1), Err(TokenomicsError::InvalidInput(_))));
        assert!(model.circulating_supply(1).is_err());
    }
}
