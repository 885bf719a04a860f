//! Strategy configuration.
//!
//! Every field has a default, so a TOML file only needs the keys it changes:
//!
//! ```toml
//! benchmark = "^NDX"
//!
//! [momentum]
//! window = 9
//!
//! [selector]
//! threshold = 0.02
//! max_holdings = 15
//!
//! [allocation]
//! mode = "fixed_slots"
//! slots = 15
//! ```

use std::{path::Path, time::Duration};

use rotation_data::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT};
use rotation_portfolio::AllocationMode;
use rotation_signals::{MomentumConfig, RegimeConfig, SelectorConfig};
use rotation_traits::{Interval, Result, RotationError, Symbol};
use serde::{Deserialize, Serialize};

/// Default benchmark: the NASDAQ-100 index.
pub const DEFAULT_BENCHMARK: &str = "^NDX";

/// Price fetching limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Maximum requests in flight (default: 8).
    pub concurrency: usize,
    /// Per-ticker timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl FetchConfig {
    /// Per-ticker timeout as a duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// Backtest statistics shown next to the holdings.
///
/// These are reported as given and never computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportedStatistics {
    /// First year of the backtest.
    pub since_year: i32,
    /// Annualized return in percent.
    pub annual_return: f64,
    /// Maximum drawdown in percent.
    pub max_drawdown: f64,
    /// Annualized standard deviation in percent.
    pub annual_std_dev: f64,
    /// Alpha against the benchmark.
    pub alpha: f64,
    /// Beta against the benchmark.
    pub beta: f64,
}

impl Default for ReportedStatistics {
    fn default() -> Self {
        Self {
            since_year: 2000,
            annual_return: 22.6,
            max_drawdown: 42.8,
            annual_std_dev: 19.4,
            alpha: 0.117,
            beta: 0.763,
        }
    }
}

/// Complete configuration of a strategy run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Benchmark ticker driving the regime filter.
    pub benchmark: Symbol,
    /// Price sampling interval.
    pub interval: Interval,
    /// Constituent momentum window.
    pub momentum: MomentumConfig,
    /// Threshold and holding cap.
    pub selector: SelectorConfig,
    /// Benchmark regime windows and thresholds.
    pub regime: RegimeConfig,
    /// Starting allocation convention.
    pub allocation: AllocationMode,
    /// Fetch limits for the matrix builder.
    pub fetch: FetchConfig,
    /// Static backtest statistics.
    pub statistics: ReportedStatistics,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            benchmark: DEFAULT_BENCHMARK.to_string(),
            interval: Interval::Monthly,
            momentum: MomentumConfig::default(),
            selector: SelectorConfig::default(),
            regime: RegimeConfig::default(),
            allocation: AllocationMode::default(),
            fetch: FetchConfig::default(),
            statistics: ReportedStatistics::default(),
        }
    }
}

impl StrategyConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`RotationError::Config`] if the document is malformed or a
    /// value is out of range.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| RotationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`RotationError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| RotationError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`RotationError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(RotationError::Config(msg.to_string()));

        if self.benchmark.trim().is_empty() {
            return fail("benchmark must not be empty");
        }
        if self.momentum.window == 0 {
            return fail("momentum.window must be at least 1");
        }
        if self.regime.long_window == 0 || self.regime.short_window == 0 {
            return fail("regime windows must be at least 1");
        }
        if !self.selector.threshold.is_finite() {
            return fail("selector.threshold must be finite");
        }
        if self.selector.max_holdings == 0 {
            return fail("selector.max_holdings must be at least 1");
        }
        if let AllocationMode::FixedSlots { slots: 0 } = self.allocation {
            return fail("allocation.slots must be at least 1");
        }
        if self.fetch.concurrency == 0 {
            return fail("fetch.concurrency must be at least 1");
        }
        if self.fetch.timeout_secs == 0 {
            return fail("fetch.timeout_secs must be at least 1");
        }
        Ok(())
    }
}
