//! Data types for price API responses.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Top-level Yahoo chart response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartResponse {
    /// Chart payload.
    pub chart: Chart,
}

/// Chart payload: either results or an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chart {
    /// Results, one per requested symbol.
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    /// Error reported by the API.
    #[serde(default)]
    pub error: Option<ChartError>,
}

/// Error object inside a chart response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartError {
    /// Error code, e.g. "Not Found".
    pub code: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
}

/// Price history for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartResult {
    /// Instrument metadata.
    pub meta: ChartMeta,
    /// Unix timestamps of each bar.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    /// Price arrays aligned with `timestamp`.
    pub indicators: Indicators,
}

/// Instrument metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    /// Ticker symbol.
    pub symbol: String,
    /// Exchange offset from GMT in seconds.
    #[serde(default)]
    pub gmtoffset: i64,
    /// Trading currency.
    #[serde(default)]
    pub currency: Option<String>,
}

/// Indicator arrays of a chart result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Indicators {
    /// OHLCV arrays; Yahoo returns a single element.
    #[serde(default)]
    pub quote: Vec<QuoteIndicator>,
}

/// OHLCV arrays; entries are null where the bar has no trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteIndicator {
    /// Closing prices.
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

impl ChartResult {
    /// Pair each timestamp with its close, as exchange-local dates.
    ///
    /// Timestamps that cannot be represented are skipped.
    #[must_use]
    pub fn closes(&self) -> Vec<(NaiveDate, Option<f64>)> {
        let closes = self
            .indicators
            .quote
            .first()
            .map(|q| q.close.as_slice())
            .unwrap_or_default();

        self.timestamp
            .iter()
            .enumerate()
            .filter_map(|(i, ts)| {
                let date = DateTime::from_timestamp(ts + self.meta.gmtoffset, 0)?.date_naive();
                Some((date, closes.get(i).copied().flatten()))
            })
            .collect()
    }
}

/// Historical end-of-day price from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalPrice {
    /// Date.
    pub date: String,
    /// Close price.
    pub close: f64,
    /// Volume.
    #[serde(default)]
    pub volume: f64,
}

impl HistoricalPrice {
    /// Parse the date string into a NaiveDate.
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}
