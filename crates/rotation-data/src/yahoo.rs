//! Yahoo Finance chart client.
//!
//! Fetches the full available history of a symbol at a fixed interval from the
//! public chart endpoint. No API key is needed.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rotation_traits::{Interval, PricePoint, PriceSeries, PriceSource};
use tracing::debug;

use crate::{Result, error::DataError, types::ChartResponse};

/// Base URL for the chart API.
const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// The chart API rejects requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) rotation/0.1";

/// Yahoo Finance chart client.
#[derive(Debug, Clone)]
pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl YahooClient {
    /// Create a client against the public endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self> {
        Self::with_base_url(YAHOO_BASE_URL)
    }

    /// Create a client against another chart endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Map an index ticker to the symbol the chart API expects.
    ///
    /// Share classes use a dash (`BRK-B`), not a dot.
    fn chart_symbol(symbol: &str) -> String {
        symbol.trim().to_uppercase().replace('.', "-")
    }

    /// Build the chart URL for a symbol.
    fn url(&self, symbol: &str, interval: Interval) -> String {
        format!(
            "{}/{}?range=max&interval={}&events=div%2Csplit",
            self.base_url,
            Self::chart_symbol(symbol),
            interval.as_str()
        )
    }

    /// Fetch the full close history of `symbol` at `interval`.
    ///
    /// Dates are labeled with the start of the period they fall into. When the
    /// API appends a live bar inside the last period, it replaces that
    /// period's close.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the symbol is unknown, or the
    /// response holds no bars.
    pub async fn fetch_history(&self, symbol: &str, interval: Interval) -> Result<PriceSeries> {
        let url = self.url(symbol, interval);
        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => return Err(DataError::RateLimitExceeded),
            StatusCode::NOT_FOUND => return Err(DataError::SymbolNotFound(symbol.to_string())),
            status if !status.is_success() => {
                let text = response.text().await.unwrap_or_default();
                return Err(DataError::Api(format!("HTTP {status}: {text}")));
            }
            _ => {}
        }

        let body: ChartResponse = response.json().await?;
        if let Some(err) = body.chart.error {
            return Err(DataError::Api(format!("{}: {}", err.code, err.description)));
        }

        let result = body
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| DataError::NoData(symbol.to_string()))?;

        let points: Vec<PricePoint> = result
            .closes()
            .into_iter()
            .map(|(date, close)| PricePoint {
                date: interval.period_start(date),
                close,
            })
            .collect();

        if points.is_empty() {
            return Err(DataError::NoData(symbol.to_string()));
        }
        debug!(symbol, bars = points.len(), "fetched chart history");

        Ok(PriceSeries::new(symbol, points))
    }
}

#[async_trait]
impl PriceSource for YahooClient {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn history(&self, symbol: &str, interval: Interval) -> rotation_traits::Result<PriceSeries> {
        Ok(self.fetch_history(symbol, interval).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = YahooClient::new().unwrap();
        assert_eq!(
            client.url("aapl", Interval::Monthly),
            "https://query1.finance.yahoo.com/v8/finance/chart/AAPL?range=max&interval=1mo&events=div%2Csplit"
        );
        assert_eq!(
            client.url("^NDX", Interval::Daily),
            "https://query1.finance.yahoo.com/v8/finance/chart/^NDX?range=max&interval=1d&events=div%2Csplit"
        );
    }

    #[test]
    fn test_chart_symbol() {
        assert_eq!(YahooClient::chart_symbol("BRK.B"), "BRK-B");
        assert_eq!(YahooClient::chart_symbol(" msft "), "MSFT");
    }

    #[test]
    fn test_custom_base_url() {
        let client = YahooClient::with_base_url("http://localhost:9000/chart").unwrap();
        assert!(client.url("AAPL", Interval::Weekly).starts_with("http://localhost:9000/chart/AAPL?"));
    }
}
