//! Error types for the data sources.

use rotation_traits::RotationError;
use thiserror::Error;

/// Errors that can occur when talking to a price or universe source.
#[derive(Debug, Error)]
pub enum DataError {
    /// Missing API key.
    #[error("FMP_API_KEY environment variable not set")]
    MissingApiKey,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error.
    #[error("API error: {0}")]
    Api(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Symbol not found.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// No data available.
    #[error("No data available for {0}")]
    NoData(String),

    /// A page did not have the expected structure.
    #[error("Failed to parse page: {0}")]
    Parse(String),
}

impl From<DataError> for RotationError {
    fn from(err: DataError) -> Self {
        Self::DataFetch(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_rotation_error() {
        let err: RotationError = DataError::SymbolNotFound("ZZZZ".to_string()).into();
        assert!(matches!(err, RotationError::DataFetch(_)));
        assert_eq!(err.to_string(), "Data fetch error: Symbol not found: ZZZZ");
    }
}
