#![doc(issue_tracker_base_url = "https://github.com/factordynamics/rotation/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # rotation
//!
//! Quarterly momentum rotation over the NASDAQ-100.
//!
//! rotation is an umbrella crate that re-exports the rotation sub-crates and
//! wires them into a single stateless pipeline.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use rotation::{Strategy, StrategyConfig};
//! use rotation::data::{WikipediaUniverse, YahooClient};
//!
//! # async fn example() -> rotation::Result<()> {
//! let strategy = Strategy::new(StrategyConfig::default());
//! let today = chrono::Local::now().date_naive();
//! let report = strategy
//!     .run(&WikipediaUniverse::new(), Arc::new(YahooClient::new()?), today)
//!     .await?;
//!
//! for row in report.weights().rows() {
//!     println!("{:<6} {:>6.2}%", row.symbol, row.weight);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! 1. **Price matrix**: monthly closes for the universe and benchmark, aligned
//! 2. **Momentum**: trailing 9-period change at a quarter-dependent offset
//! 3. **Regime**: benchmark 12- and 6-period momentum can force cash
//! 4. **Selection**: top 15 above a 2% threshold
//! 5. **Calendar**: last and next quarterly rebalance
//! 6. **Drift**: weights since the last rebalance, with a cash residual
//!
//! ## Crate Organization
//!
//! - [`traits`] - Core types, the price matrix and source traits
//! - [`signals`] - Momentum, regime filter and selector
//! - [`portfolio`] - Rebalance calendar, allocation and weight drift
//! - [`data`] - Price and universe sources and the matrix builder

/// Version information for the rotation crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod report;
pub mod strategy;

pub use config::{DEFAULT_BENCHMARK, FetchConfig, ReportedStatistics, StrategyConfig};
pub use report::{
    MomentumRow, MomentumTable, NO_HOLDINGS_MESSAGE, RISK_OFF_NOTICE, StrategyReport,
};
pub use strategy::Strategy;

// ============================================================================
// Sub-crates
// ============================================================================

/// Core types and source traits.
pub mod traits {
    pub use rotation_traits::*;
}

/// Momentum, regime filter and selection.
pub mod signals {
    pub use rotation_signals::*;
}

/// Rebalance calendar, allocation modes and weight drift.
pub mod portfolio {
    pub use rotation_portfolio::*;
}

/// Price sources, universe sources and the matrix builder.
///
/// ## Setup
///
/// The Yahoo chart client needs no key. For FMP, set `FMP_API_KEY` in the
/// environment or a `.env` file.
pub mod data {
    pub use rotation_data::*;
}

// Re-export error and common types
pub use rotation_traits::{Date, PriceMatrix, Result, RotationError, Symbol};

/// Prelude module for convenient imports.
///
/// ```ignore
/// use rotation::prelude::*;
/// ```
pub mod prelude {
    pub use crate::traits::{PriceSource, UniverseSource};
    pub use crate::{
        Date, PriceMatrix, Result, RotationError, Strategy, StrategyConfig, StrategyReport,
        Symbol,
    };
}
