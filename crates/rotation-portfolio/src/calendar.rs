//! Quarterly rebalance calendar.
//!
//! Pure date arithmetic: the portfolio rebalances on the first day of January,
//! April, July and October.

use chrono::Datelike;
use rotation_traits::{Date, Result, RotationError};
use serde::{Deserialize, Serialize};

/// Months on whose first day the portfolio rebalances.
pub const REBALANCE_MONTHS: [u32; 4] = [1, 4, 7, 10];

fn first_of(year: i32, month: u32) -> Result<Date> {
    Date::from_ymd_opt(year, month, 1)
        .ok_or_else(|| RotationError::InvalidDate(format!("{year}-{month:02}-01 is out of range")))
}

/// The rebalance interval containing a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RebalancePeriod {
    /// Most recent rebalance on or before the day.
    pub last: Date,
    /// First rebalance strictly after `last`.
    pub next: Date,
}

impl RebalancePeriod {
    /// Derive the rebalance period from `today`.
    ///
    /// A day that is itself a rebalance date starts a new period.
    ///
    /// # Errors
    ///
    /// Returns [`RotationError::InvalidDate`] only when the next boundary falls
    /// outside the representable date range.
    ///
    /// # Example
    ///
    /// ```
    /// use rotation_portfolio::RebalancePeriod;
    /// use rotation_traits::Date;
    ///
    /// let p = RebalancePeriod::containing(Date::from_ymd_opt(2024, 12, 31).unwrap()).unwrap();
    /// assert_eq!(p.last, Date::from_ymd_opt(2024, 10, 1).unwrap());
    /// assert_eq!(p.next, Date::from_ymd_opt(2025, 1, 1).unwrap());
    /// ```
    pub fn containing(today: Date) -> Result<Self> {
        let year = today.year();
        let month = REBALANCE_MONTHS
            .iter()
            .rev()
            .copied()
            .find(|m| *m <= today.month())
            .unwrap_or(REBALANCE_MONTHS[0]);
        let last = first_of(year, month)?;

        let next = match REBALANCE_MONTHS.iter().copied().find(|m| *m > month) {
            Some(m) => first_of(year, m)?,
            None => first_of(year + 1, REBALANCE_MONTHS[0])?,
        };

        Ok(Self { last, next })
    }

    /// Whether `date` falls inside `[last, next)`.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.last <= date && date < self.next
    }

    /// Calendar days from `today` until the next rebalance.
    #[must_use]
    pub fn days_until_next(&self, today: Date) -> i64 {
        (self.next - today).num_days()
    }
}

impl std::fmt::Display for RebalancePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} .. {}", self.last, self.next)
    }
}
