//! Signal stages of the rotation engine.
//!
//! This crate turns an aligned [`PriceMatrix`](rotation_traits::PriceMatrix)
//! into a holding decision:
//! - Momentum: trailing-window percentage change at a lookback offset
//! - Offset: which matrix row stands for the current quarter
//! - Regime: benchmark-level risk gate that can force cash
//! - Selector: threshold, rank and cap the candidates
//!
//! # Example
//!
//! ```ignore
//! use rotation_signals::{Momentum, RegimeFilter, Selector, selection_offset};
//!
//! let offset = selection_offset(today);
//! let regime = RegimeFilter::default().evaluate(&matrix, offset)?;
//! let signals = Momentum::default().cross_section(&matrix, offset);
//! let selection = Selector::default().select_with_regime(&signals, regime.regime);
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod momentum;
pub mod offset;
pub mod regime;
pub mod selector;

// Re-export key types
pub use momentum::{Momentum, MomentumConfig, MomentumSignal, percent_change};
pub use offset::selection_offset;
pub use regime::{Regime, RegimeConfig, RegimeFilter, RegimeReading};
pub use selector::{Selection, SelectionEntry, Selector, SelectorConfig};
