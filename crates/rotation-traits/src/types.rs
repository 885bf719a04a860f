//! Common types used throughout the rotation engine.
//!
//! This module defines price points, per-instrument price series and the
//! sampling interval those series are recorded at.

use chrono::{Datelike, Days};
use serde::{Deserialize, Serialize};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A market symbol identifier.
///
/// Typically a ticker such as "AAPL", or an index such as "^NDX".
pub type Symbol = String;

/// Sampling interval of a price history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    /// One point per trading day.
    Daily,
    /// One point per week, labeled by its Monday.
    Weekly,
    /// One point per calendar month, labeled by the first of the month.
    #[default]
    Monthly,
}

impl Interval {
    /// Get the chart API parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::Weekly => "1wk",
            Self::Monthly => "1mo",
        }
    }

    /// Map a date onto the label of the period that contains it.
    ///
    /// # Example
    ///
    /// ```
    /// use rotation_traits::{Date, Interval};
    ///
    /// let d = Date::from_ymd_opt(2024, 5, 17).unwrap();
    /// assert_eq!(Interval::Monthly.period_start(d), Date::from_ymd_opt(2024, 5, 1).unwrap());
    /// ```
    #[must_use]
    pub fn period_start(&self, date: Date) -> Date {
        match self {
            Self::Daily => date,
            Self::Weekly => {
                let back = u64::from(date.weekday().num_days_from_monday());
                date.checked_sub_days(Days::new(back)).unwrap_or(date)
            }
            Self::Monthly => date.with_day(1).unwrap_or(date),
        }
    }
}

impl std::str::FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" | "1d" => Ok(Self::Daily),
            "weekly" | "1wk" => Ok(Self::Weekly),
            "monthly" | "1mo" => Ok(Self::Monthly),
            _ => Err(format!("Unknown interval: {s}")),
        }
    }
}

/// A single closing price observation.
///
/// The close is `None` when the source reported the period without a price.
/// Absent is a distinct state; it is never encoded as a magic number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Period label.
    pub date: Date,
    /// Closing price, if observed.
    pub close: Option<f64>,
}

impl PricePoint {
    /// Create an observed price point.
    #[must_use]
    pub const fn new(date: Date, close: f64) -> Self {
        Self {
            date,
            close: Some(close),
        }
    }

    /// Create a point with no observed price.
    #[must_use]
    pub const fn absent(date: Date) -> Self {
        Self { date, close: None }
    }

    /// Whether a price was observed.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.close.is_some()
    }
}

/// Ordered closing-price history for one instrument.
///
/// Points are kept ascending by date with at most one point per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: Symbol,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Creates a series, sorting points by date.
    ///
    /// When a date appears more than once the last point supplied for it
    /// wins, which lets a source append a live quote after the period row.
    pub fn new(symbol: impl Into<Symbol>, mut points: Vec<PricePoint>) -> Self {
        points.reverse();
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    /// The instrument ticker.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The ordered points.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the series has at least one observed close.
    pub fn has_prices(&self) -> bool {
        self.points.iter().any(PricePoint::is_present)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_interval_period_start() {
        let d = date(2024, 5, 17);
        assert_eq!(Interval::Daily.period_start(d), d);
        assert_eq!(Interval::Weekly.period_start(d), date(2024, 5, 13));
        assert_eq!(Interval::Monthly.period_start(d), date(2024, 5, 1));
    }

    #[test]
    fn test_interval_from_str() {
        assert_eq!("monthly".parse::<Interval>().unwrap(), Interval::Monthly);
        assert_eq!("1wk".parse::<Interval>().unwrap(), Interval::Weekly);
        assert!("hourly".parse::<Interval>().is_err());
    }

    #[test]
    fn test_price_point_absent() {
        let p = PricePoint::absent(date(2024, 1, 1));
        assert!(!p.is_present());
        assert!(PricePoint::new(date(2024, 1, 1), 0.0).is_present());
    }

    #[test]
    fn test_series_sorted_and_deduplicated() {
        let series = PriceSeries::new(
            "AAPL",
            vec![
                PricePoint::new(date(2024, 3, 1), 30.0),
                PricePoint::new(date(2024, 1, 1), 10.0),
                PricePoint::new(date(2024, 3, 1), 31.0),
                PricePoint::absent(date(2024, 2, 1)),
            ],
        );

        assert_eq!(series.symbol(), "AAPL");
        assert_eq!(series.len(), 3);
        let dates: Vec<_> = series.points().iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1)]);
        assert_eq!(series.points()[2].close, Some(31.0));
    }

    #[test]
    fn test_series_without_prices() {
        let series = PriceSeries::new("X", vec![PricePoint::absent(date(2024, 1, 1))]);
        assert!(!series.is_empty());
        assert!(!series.has_prices());
    }
}
