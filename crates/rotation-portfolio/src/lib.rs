//! Portfolio stages of the rotation engine.
//!
//! This crate provides:
//! - The quarterly rebalance calendar
//! - Initial allocation conventions (equal per holding or fixed slots)
//! - Weight drift of the current holdings since the last rebalance
//!
//! # Example
//!
//! ```rust,ignore
//! use rotation_portfolio::{AllocationMode, RebalancePeriod, WeightDrift};
//!
//! let period = RebalancePeriod::containing(today)?;
//! let report = WeightDrift::new(AllocationMode::EqualSelected)
//!     .compute(&selection, &matrix, &period)?;
//! for row in report.weights.rows() {
//!     println!("{:<8} {:>6.2}%", row.symbol, row.weight);
//! }
//! ```

pub mod allocation;
pub mod calendar;
pub mod drift;

// Re-export main types
pub use allocation::{AllocationMode, DEFAULT_SLOTS};
pub use calendar::{REBALANCE_MONTHS, RebalancePeriod};
pub use drift::{
    CASH, DriftReport, HoldingDrift, PortfolioWeights, UnpricedHolding, WeightDrift, WeightRow,
};
