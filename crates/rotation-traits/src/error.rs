//! Error types for the rotation engine.
//!
//! Only conditions that stop a computation are errors here. A ticker without a
//! momentum value or an empty selection is ordinary data and never surfaces as
//! a [`RotationError`].

use crate::types::{Date, Symbol};
use thiserror::Error;

/// The main error type for rotation operations.
#[derive(Debug, Error)]
pub enum RotationError {
    /// Error due to invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error when data is insufficient for the requested operation.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Error when a symbol is not part of the price matrix.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(Symbol),

    /// Error when a date is out of range or invalid.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Error fetching data from an external source.
    #[error("Data fetch error: {0}")]
    DataFetch(String),

    /// The benchmark series is missing or cannot produce a regime reading.
    ///
    /// There is no safe default regime, so this aborts the run.
    #[error("Benchmark data unavailable for {symbol}: {reason}")]
    BenchmarkDataUnavailable {
        /// Benchmark ticker.
        symbol: Symbol,
        /// What was missing.
        reason: String,
    },

    /// No priced period exists at or before the requested date.
    #[error("No price for {symbol} at or before {date}")]
    NoPriceAtOrBefore {
        /// Instrument ticker.
        symbol: Symbol,
        /// Requested date.
        date: Date,
    },

    /// Error in strategy configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl RotationError {
    /// Build a [`RotationError::BenchmarkDataUnavailable`].
    pub fn benchmark(symbol: impl Into<Symbol>, reason: impl Into<String>) -> Self {
        Self::BenchmarkDataUnavailable {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error must abort the whole run.
    ///
    /// Per-instrument failures are swallowed by the matrix builder; everything
    /// that reaches the pipeline boundary as one of these is fatal.
    pub const fn is_benchmark_failure(&self) -> bool {
        matches!(self, Self::BenchmarkDataUnavailable { .. })
    }
}

/// A specialized Result type for rotation operations.
pub type Result<T> = std::result::Result<T, RotationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RotationError::InvalidData("bad close".to_string());
        assert_eq!(err.to_string(), "Invalid data: bad close");

        let err = RotationError::benchmark("^NDX", "no 12-period momentum");
        assert_eq!(
            err.to_string(),
            "Benchmark data unavailable for ^NDX: no 12-period momentum"
        );
    }

    #[test]
    fn test_no_price_display() {
        let err = RotationError::NoPriceAtOrBefore {
            symbol: "AAPL".to_string(),
            date: Date::from_ymd_opt(2024, 4, 1).unwrap(),
        };
        assert_eq!(err.to_string(), "No price for AAPL at or before 2024-04-01");
    }

    #[test]
    fn test_benchmark_failure_flag() {
        assert!(RotationError::benchmark("^NDX", "missing").is_benchmark_failure());
        assert!(!RotationError::DataFetch("timeout".to_string()).is_benchmark_failure());
    }
}
