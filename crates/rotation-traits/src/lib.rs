#![doc(issue_tracker_base_url = "https://github.com/factordynamics/rotation/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and source traits for the rotation momentum engine.
//!
//! This crate holds the vocabulary every other rotation crate speaks: price
//! points with an explicit absent state, per-instrument price series, the
//! aligned [`PriceMatrix`], and the async traits through which universes and
//! price histories are acquired.

/// The version of the rotation-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod matrix;
pub mod source;
pub mod types;

// Re-exports
pub use error::{Result, RotationError};
pub use matrix::PriceMatrix;
pub use source::{PriceSource, UniverseSource};
pub use types::{Date, Interval, PricePoint, PriceSeries, Symbol};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}
