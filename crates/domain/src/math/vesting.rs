use crate::entities::vesting::VestingEntry;
use crate::error::{Result, TokenomicsError};
use rust_decimal::Decimal;

/// Returns the cumulative percent released at `month`.
///
/// Sums `percent` over every entry whose month is at or before `month`.
/// Entry order does not matter. An empty schedule always returns zero.
pub fn accumulate_vesting(entries: &[VestingEntry], month: u32) -> Decimal {
    entries
        .iter()
        .filter(|e| e.month <= month)
        .map(|e| e.percent)
        .sum()
}

/// Tokens assigned to a category: `total_supply * category_percent / 100`.
///
/// # Errors
/// Returns [`TokenomicsError::InvalidInput`] if the result exceeds the
/// `Decimal` range.
pub fn category_allocation(total_supply: Decimal, category_percent: Decimal) -> Result<Decimal> {
    percent_of(total_supply, category_percent)
        .ok_or_else(|| TokenomicsError::invalid(format!(
            "{category_percent}% of supply {total_supply} is out of range"
        )))
}

/// Tokens released from an allocation of `allocation_tokens` at `month`.
///
/// # Errors
/// Returns [`TokenomicsError::InvalidInput`] if the result exceeds the
/// `Decimal` range, which only an over-allocated schedule can cause.
pub fn released_tokens(entries: &[VestingEntry], month: u32, allocation_tokens: Decimal) -> Result<Decimal> {
    let vested = accumulate_vesting(entries, month);
    percent_of(allocation_tokens, vested).ok_or_else(|| {
        TokenomicsError::invalid(format!(
            "{vested}% of allocation {allocation_tokens} is out of range"
        ))
    })
}

// Scales by the fraction first when the raw product would overflow.
fn percent_of(amount: Decimal, percent: Decimal) -> Option<Decimal> {
    amount
        .checked_mul(percent)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .or_else(|| {
            percent
                .checked_div(Decimal::ONE_HUNDRED)
                .and_then(|fraction| fraction.checked_mul(amount))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn standard_schedule() -> Vec<VestingEntry> {
        vec![
            VestingEntry::new(0, dec!(10)),
            VestingEntry::new(6, dec!(20)),
            VestingEntry::new(12, dec!(30)),
            VestingEntry::new(18, dec!(20)),
            VestingEntry::new(24, dec!(20)),
        ]
    }

    #[test]
    fn test_accumulate_at_month_twelve() {
        assert_eq!(accumulate_vesting(&standard_schedule(), 12), dec!(60));
    }

    #[test]
    fn test_accumulate_between_entries() {
        let schedule = standard_schedule();
        assert_eq!(accumulate_vesting(&schedule, 5), dec!(10));
        assert_eq!(accumulate_vesting(&schedule, 23), dec!(80));
        assert_eq!(accumulate_vesting(&schedule, 240), dec!(100));
    }

    #[test]
    fn test_empty_schedule_is_zero() {
        for month in [0, 1, 12, 1000] {
            assert_eq!(accumulate_vesting(&[], month), Decimal::ZERO);
        }
    }

    #[test]
    fn test_full_unlock_at_tge() {
        let schedule = [VestingEntry::new(0, dec!(100))];
        for month in [0, 1, 36, u32::MAX] {
            assert_eq!(accumulate_vesting(&schedule, month), dec!(100));
        }
    }

    #[test]
    fn test_before_first_entry_is_zero() {
        let schedule = [VestingEntry::new(12, dec!(50)), VestingEntry::new(24, dec!(50))];
        assert_eq!(accumulate_vesting(&schedule, 11), Decimal::ZERO);
    }

    #[test]
    fn test_incomplete_schedule_caps_below_hundred() {
        let schedule = [VestingEntry::new(0, dec!(25)), VestingEntry::new(6, dec!(25))];
        assert_eq!(accumulate_vesting(&schedule, 600), dec!(50));
    }

    #[test]
    fn test_monotonic_in_month() {
        let schedule = [
            VestingEntry::new(24, dec!(15)),
            VestingEntry::new(3, dec!(5)),
            VestingEntry::new(9, dec!(30)),
            VestingEntry::new(9, dec!(10)),
            VestingEntry::new(48, dec!(40)),
        ];
        let mut previous = Decimal::ZERO;
        for month in 0..60 {
            let current = accumulate_vesting(&schedule, month);
            assert!(current >= previous, "month {month}: {current} < {previous}");
            previous = current;
        }
    }

    #[test]
    fn test_released_tokens() {
        let supply = dec!(1000000000);
        let allocation = category_allocation(supply, dec!(15)).unwrap();
        assert_eq!(allocation, dec!(150000000));

        let released = released_tokens(&standard_schedule(), 12, allocation).unwrap();
        assert_eq!(released, dec!(90000000));
    }

    #[test]
    fn test_supply_near_decimal_limit() {
        // supply * 100 alone would overflow
        let supply = dec!(5000000000000000000000000000);
        let allocation = category_allocation(supply, dec!(100)).unwrap();
        assert_eq!(allocation, supply);
        assert_eq!(category_allocation(supply, dec!(20)).unwrap(), dec!(1000000000000000000000000000));

        let released = released_tokens(&standard_schedule(), 12, allocation).unwrap();
        assert_eq!(released, dec!(3000000000000000000000000000));
    }

    #[test]
    fn test_over_allocated_release_out_of_range() {
        let schedule = [VestingEntry::new(0, dec!(100)), VestingEntry::new(1, dec!(100))];
        assert!(released_tokens(&schedule, 0, Decimal::MAX).is_ok());
        assert!(matches!(
            released_tokens(&schedule, 1, Decimal::MAX),
            Err(TokenomicsError::InvalidInput(_))
        ));
    }
}
