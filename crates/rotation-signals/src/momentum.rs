//! Trailing-window momentum over aligned price columns.

use rotation_traits::{PriceMatrix, Result, Symbol};
use serde::{Deserialize, Serialize};

/// Percentage change from `start` to `end`.
///
/// Returns `None` unless both prices are present and `start` is nonzero.
#[must_use]
pub fn percent_change(start: Option<f64>, end: Option<f64>) -> Option<f64> {
    match (start, end) {
        (Some(start), Some(end)) if start != 0.0 => Some(end / start - 1.0),
        _ => None,
    }
}

/// Configuration for the momentum calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumConfig {
    /// Number of periods in the trailing window (default: 9).
    pub window: usize,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self { window: 9 }
    }
}

/// Momentum value for one instrument at one offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumSignal {
    /// Instrument ticker.
    pub symbol: Symbol,
    /// Periods back from the latest row; 1 is the latest.
    pub offset: usize,
    /// Percentage change over the window, or `None` when it cannot be computed.
    pub value: Option<f64>,
}

impl MomentumSignal {
    /// Whether a value was computed.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.value.is_some()
    }
}

/// Trailing N-period momentum.
///
/// For a window `W`, the value at row `i >= W` is `price[i] / price[i - W] - 1`.
/// Rows before `W`, rows whose endpoints are absent and rows with a zero start
/// price have no value.
///
/// # Example
///
/// ```
/// use rotation_signals::momentum::{Momentum, MomentumConfig};
///
/// let momentum = Momentum::new(MomentumConfig { window: 2 });
/// let prices = [Some(100.0), Some(105.0), Some(110.0)];
/// let value = momentum.at_offset(&prices, 1).unwrap();
/// assert!((value - 0.10).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Momentum {
    config: MomentumConfig,
}

impl Momentum {
    /// Create a momentum calculator with the given configuration.
    #[must_use]
    pub const fn new(config: MomentumConfig) -> Self {
        Self { config }
    }

    /// Create a momentum calculator over `window` periods.
    #[must_use]
    pub const fn with_window(window: usize) -> Self {
        Self::new(MomentumConfig { window })
    }

    /// Get the window length in periods.
    #[must_use]
    pub const fn window(&self) -> usize {
        self.config.window
    }

    /// Momentum at every row of a price column.
    #[must_use]
    pub fn series(&self, prices: &[Option<f64>]) -> Vec<Option<f64>> {
        let w = self.config.window;
        (0..prices.len())
            .map(|i| {
                if i < w {
                    None
                } else {
                    percent_change(prices[i - w], prices[i])
                }
            })
            .collect()
    }

    /// Momentum at `offset` rows back from the end of a price column.
    ///
    /// An offset of 1 evaluates the last row. Offsets of 0, offsets past the
    /// start of the column and rows earlier than the window have no value.
    #[must_use]
    pub fn at_offset(&self, prices: &[Option<f64>], offset: usize) -> Option<f64> {
        let end = prices.len().checked_sub(offset).filter(|_| offset > 0)?;
        let start = end.checked_sub(self.config.window)?;
        percent_change(prices[start], prices[end])
    }

    /// Momentum signal for one ticker of a matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticker is not in the matrix.
    pub fn signal(&self, matrix: &PriceMatrix, symbol: &str, offset: usize) -> Result<MomentumSignal> {
        let column = matrix.require_column(symbol)?;
        Ok(MomentumSignal {
            symbol: symbol.to_string(),
            offset,
            value: self.at_offset(column, offset),
        })
    }

    /// Momentum signals for every constituent (benchmark excluded), in the
    /// matrix's column order.
    #[must_use]
    pub fn cross_section(&self, matrix: &PriceMatrix, offset: usize) -> Vec<MomentumSignal> {
        matrix
            .constituents()
            .filter_map(|symbol| {
                matrix.column(symbol).map(|column| MomentumSignal {
                    symbol: symbol.to_string(),
                    offset,
                    value: self.at_offset(column, offset),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rotation_traits::{Date, PricePoint, PriceSeries};

    #[test]
    fn test_default_config() {
        let config = MomentumConfig::default();
        assert_eq!(config.window, 9);
        assert_eq!(Momentum::default().window(), 9);
    }

    #[test]
    fn test_percent_change() {
        assert_relative_eq!(percent_change(Some(100.0), Some(120.0)).unwrap(), 0.2);
        assert_eq!(percent_change(None, Some(1.0)), None);
        assert_eq!(percent_change(Some(1.0), None), None);
        assert_eq!(percent_change(Some(0.0), Some(1.0)), None);
    }

    #[test]
    fn test_series_values_present_only_with_both_endpoints() {
        let m = Momentum::with_window(2);
        let prices = [Some(10.0), None, Some(12.0), Some(11.0), Some(0.0), Some(5.0), Some(6.0)];
        let out = m.series(&prices);

        assert_eq!(out.len(), prices.len());
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_relative_eq!(out[2].unwrap(), 0.2);
        // start price absent
        assert_eq!(out[3], None);
        assert_relative_eq!(out[4].unwrap(), -1.0);
        assert_relative_eq!(out[5].unwrap(), 5.0 / 11.0 - 1.0);
        // start price zero
        assert_eq!(out[6], None);

        for (i, value) in out.iter().enumerate() {
            let expected = i >= 2
                && prices[i].is_some()
                && prices[i - 2].is_some_and(|p| p != 0.0);
            assert_eq!(value.is_some(), expected, "row {i}");
        }
    }

    #[test]
    fn test_at_offset_matches_series() {
        let m = Momentum::with_window(3);
        let prices: Vec<Option<f64>> = (1..=10).map(|p| Some(f64::from(p))).collect();
        let series = m.series(&prices);

        for offset in 1..=7 {
            assert_eq!(m.at_offset(&prices, offset), series[prices.len() - offset]);
        }
    }

    #[test]
    fn test_at_offset_out_of_range() {
        let m = Momentum::with_window(3);
        let prices = [Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        assert!(m.at_offset(&prices, 1).is_some());
        assert_eq!(m.at_offset(&prices, 2), None);
        assert_eq!(m.at_offset(&prices, 0), None);
        assert_eq!(m.at_offset(&prices, 10), None);
        assert_eq!(m.at_offset(&[], 1), None);
    }

    #[test]
    fn test_cross_section_excludes_benchmark() {
        let d = |m: u32| Date::from_ymd_opt(2024, m, 1).unwrap();
        let series = vec![
            PriceSeries::new("^NDX", vec![PricePoint::new(d(1), 100.0), PricePoint::new(d(2), 110.0)]),
            PriceSeries::new("BBB", vec![PricePoint::new(d(1), 10.0), PricePoint::new(d(2), 9.0)]),
            PriceSeries::new("AAA", vec![PricePoint::absent(d(1)), PricePoint::new(d(2), 5.0)]),
        ];
        let matrix = PriceMatrix::align(series, "^NDX").unwrap();
        let signals = Momentum::with_window(1).cross_section(&matrix, 1);

        let symbols: Vec<_> = signals.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAA", "BBB"]);
        assert!(!signals[0].is_present());
        assert_relative_eq!(signals[1].value.unwrap(), -0.1);

        let bench = Momentum::with_window(1).signal(&matrix, "^NDX", 1).unwrap();
        assert_relative_eq!(bench.value.unwrap(), 0.1);
        assert!(Momentum::with_window(1).signal(&matrix, "ZZZ", 1).is_err());
    }
}
