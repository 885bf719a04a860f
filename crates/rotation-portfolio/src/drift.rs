//! Weight drift since the last rebalance.
//!
//! Holdings start the period at their allocation fraction and then move with
//! their prices. This module measures where those weights have drifted to by
//! the latest observed close, without rebalancing anything.

use ndarray::Array1;
use rotation_signals::Selection;
use rotation_traits::{Date, PriceMatrix, Result, RotationError, Symbol};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{allocation::AllocationMode, calendar::RebalancePeriod};

/// Label of the synthetic cash row.
pub const CASH: &str = "Cash";

/// Residual cash below this many percentage points is treated as zero.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Drift details for one holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingDrift {
    /// Instrument ticker.
    pub symbol: Symbol,
    /// Momentum the holding was selected on.
    pub momentum: f64,
    /// Starting fraction of the portfolio.
    pub allocation: f64,
    /// Period the rebalance price was taken from.
    pub rebalance_date: Date,
    /// Close at the rebalance.
    pub rebalance_price: f64,
    /// Period the current price was taken from.
    pub current_date: Date,
    /// Latest observed close.
    pub current_price: f64,
    /// `allocation * current_price / rebalance_price`.
    pub drifted_value: f64,
    /// Price return since the rebalance, in percent.
    pub percent_return: f64,
    /// Drifted share of the portfolio, in percent.
    pub weight: f64,
}

/// A selected holding that could not be priced over the period.
///
/// Its allocation is carried at cost: it counts toward the portfolio value and
/// keeps a weight, but has no return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnpricedHolding {
    /// Instrument ticker.
    pub symbol: Symbol,
    /// Momentum the holding was selected on.
    pub momentum: f64,
    /// Starting fraction of the portfolio.
    pub allocation: f64,
    /// Share of the portfolio at cost, in percent.
    pub weight: f64,
    /// Why no drift could be computed.
    pub reason: String,
}

/// One row of the weight table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRow {
    /// Ticker, or [`CASH`].
    pub symbol: Symbol,
    /// Weight in percent.
    pub weight: f64,
}

/// Drifted portfolio weights in percent.
///
/// Position weights and cash are non-negative and sum to 100 whenever there is
/// at least one holding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioWeights {
    positions: Vec<WeightRow>,
    cash: f64,
}

impl PortfolioWeights {
    /// Position rows in selection order, cash excluded.
    pub fn positions(&self) -> &[WeightRow] {
        &self.positions
    }

    /// Cash weight in percent; zero when fully invested.
    pub const fn cash(&self) -> f64 {
        self.cash
    }

    /// Weight of `symbol`, or of cash when asked for [`CASH`].
    pub fn get(&self, symbol: &str) -> Option<f64> {
        if symbol == CASH {
            return (self.cash > 0.0).then_some(self.cash);
        }
        self.positions
            .iter()
            .find(|row| row.symbol == symbol)
            .map(|row| row.weight)
    }

    /// All rows, with a trailing cash row when cash is positive.
    pub fn rows(&self) -> Vec<WeightRow> {
        let mut rows = self.positions.clone();
        if self.cash > 0.0 {
            rows.push(WeightRow {
                symbol: CASH.to_string(),
                weight: self.cash,
            });
        }
        rows
    }

    /// Sum of all weights, cash included.
    pub fn total(&self) -> f64 {
        self.positions.iter().map(|row| row.weight).sum::<f64>() + self.cash
    }

    /// Whether there are no positions.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Result of the drift computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    /// Per-holding details in selection order.
    pub holdings: Vec<HoldingDrift>,
    /// Holdings without a usable rebalance or current price.
    #[serde(default)]
    pub unpriced: Vec<UnpricedHolding>,
    /// Normalized drifted weights.
    pub weights: PortfolioWeights,
    /// Return of the held positions since the rebalance, in percent.
    pub total_return: Option<f64>,
    /// True when nothing is held.
    pub fully_in_cash: bool,
}

impl DriftReport {
    /// The report for an empty selection.
    #[must_use]
    pub fn cash() -> Self {
        Self {
            holdings: Vec::new(),
            unpriced: Vec::new(),
            weights: PortfolioWeights::default(),
            total_return: None,
            fully_in_cash: true,
        }
    }
}

/// Weight drift calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightDrift {
    mode: AllocationMode,
}

impl WeightDrift {
    /// Create a drift calculator for an allocation convention.
    #[must_use]
    pub const fn new(mode: AllocationMode) -> Self {
        Self { mode }
    }

    /// The allocation convention in use.
    #[must_use]
    pub const fn mode(&self) -> AllocationMode {
        self.mode
    }

    /// Rebalance and current price of one holding.
    fn locate(
        symbol: &str,
        matrix: &PriceMatrix,
        period: &RebalancePeriod,
    ) -> Result<((Date, f64), (Date, f64))> {
        let (rebalance_date, rebalance_price) = matrix.price_at_or_before(symbol, period.last)?;
        if rebalance_price <= 0.0 {
            return Err(RotationError::InvalidData(format!(
                "non-positive rebalance price {rebalance_price} for {symbol} on {rebalance_date}"
            )));
        }
        let current = matrix.latest_price(symbol)?;
        Ok(((rebalance_date, rebalance_price), current))
    }

    /// Compute drifted weights of `selection` over `period`.
    ///
    /// The rebalance price of each holding is its close at the latest period
    /// on or before `period.last`; the current price is its latest close.
    /// Any allocation not deployed at the rebalance is held as cash at zero
    /// return and reported as the cash weight.
    ///
    /// A holding with no close at or before the rebalance date, or with a
    /// non-positive rebalance price, is reported in
    /// [`DriftReport::unpriced`] and carried at cost. The total return covers
    /// priced holdings only and is `None` when none could be priced.
    ///
    /// # Errors
    ///
    /// Returns [`RotationError::InvalidData`] when the drifted portfolio value
    /// is not positive.
    pub fn compute(
        &self,
        selection: &Selection,
        matrix: &PriceMatrix,
        period: &RebalancePeriod,
    ) -> Result<DriftReport> {
        if selection.is_empty() {
            info!("no holdings, portfolio is fully in cash");
            return Ok(DriftReport::cash());
        }

        let n = selection.len();
        let per_holding = self.mode.per_holding(n);
        let undeployed = self.mode.undeployed(n);

        let mut priced = Vec::with_capacity(n);
        let mut rebalance_points = Vec::with_capacity(n);
        let mut current_points = Vec::with_capacity(n);
        let mut unpriced = Vec::new();
        for entry in selection {
            match Self::locate(&entry.symbol, matrix, period) {
                Ok((rebalance, current)) => {
                    debug!(
                        symbol = %entry.symbol,
                        rebalance_date = %rebalance.0, rebalance_price = rebalance.1,
                        current_date = %current.0, current_price = current.1,
                        "located drift prices"
                    );
                    priced.push(entry);
                    rebalance_points.push(rebalance);
                    current_points.push(current);
                }
                Err(e) => {
                    warn!(symbol = %entry.symbol, error = %e, "holding carried at cost");
                    unpriced.push(UnpricedHolding {
                        symbol: entry.symbol.clone(),
                        momentum: entry.momentum,
                        allocation: per_holding,
                        weight: 0.0,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let allocation = Array1::from_elem(priced.len(), per_holding);
        let rebalance: Array1<f64> = rebalance_points.iter().map(|p| p.1).collect();
        let current: Array1<f64> = current_points.iter().map(|p| p.1).collect();

        let relative = &current / &rebalance;
        let drifted = &allocation * &relative;
        let invested = drifted.sum();
        let carried = per_holding * unpriced.len() as f64;
        let portfolio_value = invested + carried + undeployed;
        if portfolio_value <= 0.0 {
            return Err(RotationError::InvalidData(
                "drifted portfolio value is zero".to_string(),
            ));
        }

        let weights = drifted.mapv(|v| v / portfolio_value * 100.0);
        for holding in &mut unpriced {
            holding.weight = holding.allocation / portfolio_value * 100.0;
        }
        let unpriced_weight: f64 = unpriced.iter().map(|h| h.weight).sum();
        let residual = 100.0 - weights.sum() - unpriced_weight;
        let cash = if residual > WEIGHT_TOLERANCE { residual } else { 0.0 };
        let total_return =
            (!priced.is_empty()).then(|| (invested / allocation.sum() - 1.0) * 100.0);

        let holdings: Vec<HoldingDrift> = priced
            .iter()
            .enumerate()
            .map(|(i, entry)| HoldingDrift {
                symbol: entry.symbol.clone(),
                momentum: entry.momentum,
                allocation: allocation[i],
                rebalance_date: rebalance_points[i].0,
                rebalance_price: rebalance[i],
                current_date: current_points[i].0,
                current_price: current[i],
                drifted_value: drifted[i],
                percent_return: (relative[i] - 1.0) * 100.0,
                weight: weights[i],
            })
            .collect();

        // Selection order, priced or not.
        let positions = selection
            .iter()
            .filter_map(|entry| {
                let weight = holdings
                    .iter()
                    .find(|h| h.symbol == entry.symbol)
                    .map(|h| h.weight)
                    .or_else(|| {
                        unpriced
                            .iter()
                            .find(|h| h.symbol == entry.symbol)
                            .map(|h| h.weight)
                    })?;
                Some(WeightRow {
                    symbol: entry.symbol.clone(),
                    weight,
                })
            })
            .collect();

        info!(
            holdings = n,
            unpriced = unpriced.len(),
            cash,
            total_return,
            since = %period.last,
            "computed weight drift"
        );

        Ok(DriftReport {
            holdings,
            unpriced,
            weights: PortfolioWeights { positions, cash },
            total_return,
            fully_in_cash: false,
        })
    }
}
