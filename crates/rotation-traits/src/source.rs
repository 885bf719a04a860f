//! Traits for the external collaborators that feed the engine.
//!
//! The engine never talks to a network itself. Instrument universes and price
//! histories arrive through these traits, which keeps every downstream stage a
//! pure function of the data they return.

use async_trait::async_trait;

use crate::{Interval, PriceSeries, Result, Symbol};

/// A provider of historical closing prices.
///
/// Implementations must be `Send + Sync` so the matrix builder can fetch many
/// tickers concurrently from a shared instance.
///
/// # Example
///
/// ```no_run
/// use async_trait::async_trait;
/// use rotation_traits::{Interval, PriceSeries, PriceSource, Result};
///
/// struct EmptySource;
///
/// #[async_trait]
/// impl PriceSource for EmptySource {
///     fn name(&self) -> &str {
///         "empty"
///     }
///
///     async fn history(&self, symbol: &str, _interval: Interval) -> Result<PriceSeries> {
///         Ok(PriceSeries::new(symbol, Vec::new()))
///     }
/// }
/// ```
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Fetch the longest available history for `symbol` at `interval`.
    ///
    /// # Errors
    ///
    /// Any failure is reported as an error; the caller decides whether it is
    /// fatal (benchmark) or drops the ticker (constituent).
    async fn history(&self, symbol: &str, interval: Interval) -> Result<PriceSeries>;
}

/// A provider of the tracked instrument universe.
#[async_trait]
pub trait UniverseSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Return the universe tickers. Duplicates are the source's to remove.
    ///
    /// # Errors
    ///
    /// Returns an error if the universe cannot be retrieved.
    async fn symbols(&self) -> Result<Vec<Symbol>>;
}
