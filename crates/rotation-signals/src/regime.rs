//! Benchmark regime filter.
//!
//! The strategy only holds stocks while the benchmark is not in a confirmed
//! downtrend. A downtrend is a negative long-window momentum together with a
//! short-window momentum below a loss threshold.

use rotation_traits::{PriceMatrix, Result, RotationError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::momentum::Momentum;

/// Market regime as seen from the benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// Use the selection.
    RiskOn,
    /// Hold cash regardless of the selection.
    RiskOff,
}

impl Regime {
    /// Whether the regime forces an all-cash portfolio.
    #[must_use]
    pub const fn is_risk_off(&self) -> bool {
        matches!(self, Self::RiskOff)
    }
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RiskOn => write!(f, "risk-on"),
            Self::RiskOff => write!(f, "risk-off"),
        }
    }
}

/// Configuration for the regime filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeConfig {
    /// Long momentum window in periods (default: 12).
    pub long_window: usize,
    /// Short momentum window in periods (default: 6).
    pub short_window: usize,
    /// Long momentum must be below this to turn risk-off (default: 0.0).
    pub long_threshold: f64,
    /// Short momentum must be below this to turn risk-off (default: -0.05).
    pub short_threshold: f64,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self {
            long_window: 12,
            short_window: 6,
            long_threshold: 0.0,
            short_threshold: -0.05,
        }
    }
}

/// Benchmark momentum readings and the regime they imply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeReading {
    /// Resulting regime.
    pub regime: Regime,
    /// Benchmark momentum over the long window.
    pub long_momentum: f64,
    /// Benchmark momentum over the short window.
    pub short_momentum: f64,
}

/// Regime filter over benchmark momentum.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegimeFilter {
    config: RegimeConfig,
}

impl RegimeFilter {
    /// Create a regime filter with the given configuration.
    #[must_use]
    pub const fn new(config: RegimeConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &RegimeConfig {
        &self.config
    }

    /// Classify a pair of benchmark momentum readings.
    #[must_use]
    pub fn classify(&self, long_momentum: f64, short_momentum: f64) -> Regime {
        if long_momentum < self.config.long_threshold && short_momentum < self.config.short_threshold {
            Regime::RiskOff
        } else {
            Regime::RiskOn
        }
    }

    /// Evaluate the benchmark column of `matrix` at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`RotationError::BenchmarkDataUnavailable`] if either momentum
    /// reading cannot be computed. An unknown regime has no safe default.
    pub fn evaluate(&self, matrix: &PriceMatrix, offset: usize) -> Result<RegimeReading> {
        let column = matrix.benchmark_column()?;
        let reading = |window: usize| {
            Momentum::with_window(window)
                .at_offset(column, offset)
                .ok_or_else(|| {
                    RotationError::benchmark(
                        matrix.benchmark(),
                        format!("no {window}-period momentum at offset {offset}"),
                    )
                })
        };

        let long_momentum = reading(self.config.long_window)?;
        let short_momentum = reading(self.config.short_window)?;
        let regime = self.classify(long_momentum, short_momentum);

        debug!(
            benchmark = matrix.benchmark(),
            long_momentum, short_momentum, %regime, "evaluated regime"
        );

        Ok(RegimeReading {
            regime,
            long_momentum,
            short_momentum,
        })
    }
}
