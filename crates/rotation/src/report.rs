//! Serializable results handed to the presentation layer.

use rotation_data::DroppedSymbol;
use rotation_portfolio::{DriftReport, PortfolioWeights, RebalancePeriod};
use rotation_signals::{RegimeReading, Selection};
use rotation_traits::{Date, Symbol};
use serde::Serialize;

use crate::config::ReportedStatistics;

/// Shown in place of the holdings table when nothing is held.
pub const NO_HOLDINGS_MESSAGE: &str = "No stocks currently held in the portfolio.";

/// Shown when the regime filter forces cash.
pub const RISK_OFF_NOTICE: &str = "Sell all stocks";

/// Everything one run of the strategy produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyReport {
    /// The day the run was evaluated for.
    pub as_of: Date,
    /// Lookback offset used for momentum and regime.
    pub offset: usize,
    /// Matrix period the offset landed on.
    pub anchor_period: Option<Date>,
    /// Benchmark regime reading.
    pub regime: RegimeReading,
    /// Holdings chosen at the anchor period.
    pub selection: Selection,
    /// Current rebalance interval.
    pub period: RebalancePeriod,
    /// Drifted weights and per-holding detail.
    pub drift: DriftReport,
    /// Static backtest statistics.
    pub statistics: ReportedStatistics,
    /// Tickers left out of the price matrix.
    pub dropped: Vec<DroppedSymbol>,
}

impl StrategyReport {
    /// Whether the regime filter forced cash.
    #[must_use]
    pub const fn is_risk_off(&self) -> bool {
        self.regime.regime.is_risk_off()
    }

    /// Whether nothing is held.
    #[must_use]
    pub const fn fully_in_cash(&self) -> bool {
        self.drift.fully_in_cash
    }

    /// Drifted weights.
    #[must_use]
    pub const fn weights(&self) -> &PortfolioWeights {
        &self.drift.weights
    }

    /// Return of the held positions since the last rebalance, in percent.
    #[must_use]
    pub const fn total_return(&self) -> Option<f64> {
        self.drift.total_return
    }

    /// The fully-in-cash message, when it applies.
    #[must_use]
    pub const fn status_message(&self) -> Option<&'static str> {
        if self.drift.fully_in_cash {
            Some(NO_HOLDINGS_MESSAGE)
        } else {
            None
        }
    }
}

/// One row of the momentum ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MomentumRow {
    /// 1-based rank; `None` when momentum is missing.
    pub rank: Option<usize>,
    /// Instrument ticker.
    pub symbol: Symbol,
    /// Momentum at the anchor period.
    pub momentum: Option<f64>,
    /// Whether the ticker makes the selection in a risk-on regime.
    pub selected: bool,
}

/// Momentum of the whole universe at the selection offset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MomentumTable {
    /// The day the table was computed for.
    pub as_of: Date,
    /// Lookback offset.
    pub offset: usize,
    /// Matrix period the offset landed on.
    pub anchor_period: Option<Date>,
    /// Momentum window in periods.
    pub window: usize,
    /// Selection threshold.
    pub threshold: f64,
    /// Ranked rows, then tickers without momentum in ticker order.
    pub rows: Vec<MomentumRow>,
}

impl MomentumTable {
    /// Rows that make the selection.
    pub fn selected(&self) -> impl Iterator<Item = &MomentumRow> {
        self.rows.iter().filter(|r| r.selected)
    }

    /// Tickers without a momentum value.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter(|r| r.momentum.is_none())
            .map(|r| r.symbol.as_str())
    }
}
