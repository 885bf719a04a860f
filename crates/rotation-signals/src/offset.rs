//! Selection anchor: which row of the matrix stands for "now".
//!
//! The newest row of a monthly history can trail the calendar because
//! providers publish the latest month late. Selection therefore anchors at a
//! lookback offset derived from the position of the current month inside its
//! quarter: first month 1, second month 2, third month 3.
//!
//! This is a coarse proxy for "the row of the most recently completed quarter"
//! and breaks if a provider's publication lag differs from that assumption.

use chrono::Datelike;
use rotation_traits::Date;

/// Lookback offset used for selection and the regime filter on `today`.
///
/// # Example
///
/// ```
/// use rotation_signals::offset::selection_offset;
/// use rotation_traits::Date;
///
/// assert_eq!(selection_offset(Date::from_ymd_opt(2024, 4, 15).unwrap()), 1);
/// assert_eq!(selection_offset(Date::from_ymd_opt(2024, 6, 30).unwrap()), 3);
/// ```
#[must_use]
pub fn selection_offset(today: Date) -> usize {
    month_in_quarter(today.month())
}

/// Position (1–3) of a 1-based month inside its calendar quarter.
#[must_use]
pub const fn month_in_quarter(month: u32) -> usize {
    (month.saturating_sub(1) % 3) as usize + 1
}
