//! Vesting schedules.
//!
//! A schedule is a typed list of `(month, percent)` release entries for one
//! allocation category. Percent values are expressed on a 0-100 scale.

use crate::error::{Result, TokenomicsError};
use crate::math::vesting::accumulate_vesting;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// A single release: `percent` of the category unlocks at `month`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingEntry {
    /// Months after token generation.
    pub month: u32,
    /// Share of the category released, 0-100.
    pub percent: Decimal,
}

impl VestingEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(month: u32, percent: Decimal) -> Self {
        Self { month, percent }
    }
}

/// Release schedule for one allocation category.
///
/// Entries are kept sorted by month. A schedule whose percentages sum to more
/// than 100 is accepted and reported with a warning; an incomplete schedule
/// (sum below 100) is valid and simply never fully releases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<VestingEntry>", into = "Vec<VestingEntry>")]
pub struct VestingSchedule {
    entries: Vec<VestingEntry>,
}

impl VestingSchedule {
    /// Creates a schedule from release entries.
    ///
    /// # Errors
    /// Returns [`TokenomicsError::InvalidInput`] if any percent is outside 0-100.
    pub fn new(mut entries: Vec<VestingEntry>) -> Result<Self> {
        for entry in &entries {
            if entry.percent < Decimal::ZERO || entry.percent > HUNDRED {
                return Err(TokenomicsError::invalid(format!(
                    "vesting percent at month {} must be within 0-100, got {}",
                    entry.month, entry.percent
                )));
            }
        }
        entries.sort_by_key(|e| e.month);

        let schedule = Self { entries };
        let total = schedule.total_percent();
        if total > HUNDRED {
            warn!(total = %total, "Vesting schedule releases more than 100%");
        }
        Ok(schedule)
    }

    /// Builds a TGE unlock followed by a cliff and equal monthly releases.
    ///
    /// `tge_percent` unlocks at month 0. The remainder is split evenly across
    /// months `cliff_months + 1 ..= cliff_months + vesting_months`; the last
    /// release absorbs rounding so the schedule sums to exactly 100. With
    /// `vesting_months == 0` the remainder unlocks at the cliff.
    ///
    /// # Errors
    /// Returns [`TokenomicsError::InvalidInput`] if `tge_percent` is outside 0-100.
    pub fn cliff_linear(tge_percent: Decimal, cliff_months: u32, vesting_months: u32) -> Result<Self> {
        if tge_percent < Decimal::ZERO || tge_percent > HUNDRED {
            return Err(TokenomicsError::invalid(format!(
                "TGE percent must be within 0-100, got {tge_percent}"
            )));
        }

        let mut entries = Vec::with_capacity(vesting_months as usize + 1);
        if tge_percent > Decimal::ZERO {
            entries.push(VestingEntry::new(0, tge_percent));
        }

        let remaining = HUNDRED - tge_percent;
        if remaining > Decimal::ZERO {
            if vesting_months == 0 {
                entries.push(VestingEntry::new(cliff_months, remaining));
            } else {
                let per_month = remaining / Decimal::from(vesting_months);
                let mut released = Decimal::ZERO;
                for i in 1..=vesting_months {
                    let percent = if i == vesting_months {
                        remaining - released
                    } else {
                        per_month
                    };
                    released += percent;
                    entries.push(VestingEntry::new(cliff_months + i, percent));
                }
            }
        }

        Self::new(entries)
    }

    /// Returns the entries sorted by month.
    #[must_use]
    pub fn entries(&self) -> &[VestingEntry] {
        &self.entries
    }

    /// Returns true if the schedule has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all release percentages.
    #[must_use]
    pub fn total_percent(&self) -> Decimal {
        self.entries.iter().map(|e| e.percent).sum()
    }

    /// Returns true if the schedule releases exactly 100%.
    #[must_use]
    pub fn is_fully_allocated(&self) -> bool {
        self.total_percent() == HUNDRED
    }

    /// Month of the final release, if any.
    #[must_use]
    pub fn last_month(&self) -> Option<u32> {
        self.entries.last().map(|e| e.month)
    }

    /// Cumulative percent released at `month`.
    #[must_use]
    pub fn cumulative_percent(&self, month: u32) -> Decimal {
        accumulate_vesting(&self.entries, month)
    }
}

impl TryFrom<Vec<VestingEntry>> for VestingSchedule {
    type Error = TokenomicsError;

    fn try_from(entries: Vec<VestingEntry>) -> Result<Self> {
        Self::new(entries)
    }
}

impl From<VestingSchedule> for Vec<VestingEntry> {
    fn from(schedule: VestingSchedule) -> Self {
        schedule.entries
    }
}
