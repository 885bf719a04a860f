//! Price and universe sources for the rotation engine.
//!
//! This crate provides:
//! - [`YahooClient`]: full monthly history from the Yahoo Finance chart API
//! - [`FmpClient`]: daily history from Financial Modeling Prep, resampled
//! - [`WikipediaUniverse`] and [`StaticUniverse`] for the tracked tickers
//! - [`PriceMatrixBuilder`]: concurrent fetch and alignment into a
//!   [`PriceMatrix`](rotation_traits::PriceMatrix)
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rotation_data::{PriceMatrixBuilder, WikipediaUniverse, YahooClient};
//!
//! let symbols = WikipediaUniverse::new().fetch().await?;
//! let build = PriceMatrixBuilder::new(Arc::new(YahooClient::new()?))
//!     .build(&symbols, "^NDX")
//!     .await?;
//! println!("{} periods, {} dropped", build.matrix.len(), build.dropped.len());
//! ```
//!
//! # Environment Variables
//!
//! The FMP client reads `FMP_API_KEY` from the environment or a `.env` file.

mod builder;
mod error;
mod fmp;
mod types;
mod universe;
mod yahoo;

pub use builder::{
    DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT, DroppedSymbol, MatrixBuild, PriceMatrixBuilder,
};
pub use error::DataError;
pub use fmp::FmpClient;
pub use types::*;
pub use universe::{NASDAQ_100_URL, StaticUniverse, WikipediaUniverse, parse_constituents};
pub use yahoo::YahooClient;

/// Result type for data source operations.
pub type Result<T> = std::result::Result<T, DataError>;
