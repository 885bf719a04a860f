//! Financial Modeling Prep price client.

use crate::{Result, error::DataError, types::HistoricalPrice};
use async_trait::async_trait;
use reqwest::Client;
use rotation_traits::{Interval, PricePoint, PriceSeries, PriceSource};
use std::env;
use tracing::debug;

/// Base URL for the FMP stable API.
const FMP_BASE_URL: &str = "https://financialmodelingprep.com/stable";

/// Financial Modeling Prep API client.
#[derive(Debug, Clone)]
pub struct FmpClient {
    client: Client,
    api_key: String,
}

impl FmpClient {
    /// Create a new FMP client with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Create a new FMP client from the `FMP_API_KEY` environment variable.
    ///
    /// This will also load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let api_key = env::var("FMP_API_KEY").map_err(|_| DataError::MissingApiKey)?;

        Ok(Self::new(api_key))
    }

    /// Build a URL with the API key.
    fn url(&self, endpoint: &str) -> String {
        if endpoint.contains('?') {
            format!("{FMP_BASE_URL}/{endpoint}&apikey={}", self.api_key)
        } else {
            format!("{FMP_BASE_URL}/{endpoint}?apikey={}", self.api_key)
        }
    }

    /// Make a GET request and parse the JSON response.
    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.url(endpoint);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DataError::Api(format!("HTTP {status}: {text}")));
        }

        let text = response.text().await?;

        if text.contains("\"Error Message\"") {
            return Err(DataError::Api(text));
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Get historical daily prices for a symbol, most recent first.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Stock ticker symbol
    /// * `from` - Start date (YYYY-MM-DD)
    /// * `to` - End date (YYYY-MM-DD)
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn historical_prices(
        &self,
        symbol: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<HistoricalPrice>> {
        let mut params = String::new();
        if let Some(f) = from {
            params.push_str(&format!("&from={f}"));
        }
        if let Some(t) = to {
            params.push_str(&format!("&to={t}"));
        }

        let endpoint = format!(
            "historical-price-eod/full?symbol={}{}",
            symbol.to_uppercase(),
            params
        );
        self.get(&endpoint).await
    }

    /// Fetch the daily history of `symbol` and resample it to `interval`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or no rows come back.
    pub async fn fetch_history(&self, symbol: &str, interval: Interval) -> Result<PriceSeries> {
        let rows = self.historical_prices(symbol, None, None).await?;
        let series = resample(symbol, &rows, interval);
        if series.is_empty() {
            return Err(DataError::NoData(symbol.to_string()));
        }
        debug!(symbol, days = rows.len(), bars = series.len(), "resampled daily history");
        Ok(series)
    }
}

/// Collapse daily rows into one point per period, keeping the last close.
///
/// Rows with an unparseable date are skipped.
pub(crate) fn resample(symbol: &str, rows: &[HistoricalPrice], interval: Interval) -> PriceSeries {
    let mut daily: Vec<_> = rows
        .iter()
        .filter_map(|row| row.parsed_date().map(|d| (d, row.close)))
        .collect();
    daily.sort_by_key(|(d, _)| *d);

    let points = daily
        .into_iter()
        .map(|(d, close)| PricePoint::new(interval.period_start(d), close))
        .collect();

    PriceSeries::new(symbol, points)
}

#[async_trait]
impl PriceSource for FmpClient {
    fn name(&self) -> &str {
        "fmp"
    }

    async fn history(&self, symbol: &str, interval: Interval) -> rotation_traits::Result<PriceSeries> {
        Ok(self.fetch_history(symbol, interval).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotation_traits::Date;

    fn row(date: &str, close: f64) -> HistoricalPrice {
        HistoricalPrice {
            date: date.to_string(),
            close,
            volume: 0.0,
        }
    }

    #[test]
    fn test_url_building() {
        let client = FmpClient::new("test_key");
        assert_eq!(
            client.url("quote?symbol=AAPL"),
            "https://financialmodelingprep.com/stable/quote?symbol=AAPL&apikey=test_key"
        );
        assert_eq!(
            client.url("historical-price-eod/full?symbol=AAPL&from=2020-01-01"),
            "https://financialmodelingprep.com/stable/historical-price-eod/full?symbol=AAPL&from=2020-01-01&apikey=test_key"
        );
    }

    #[test]
    fn test_resample_monthly_keeps_last_close() {
        // FMP lists newest first
        let rows = vec![
            row("2024-02-29", 180.0),
            row("2024-02-01", 186.0),
            row("2024-01-31", 184.0),
            row("2024-01-02", 185.0),
            row("not-a-date", 1.0),
        ];
        let series = resample("AAPL", &rows, Interval::Monthly);

        assert_eq!(series.len(), 2);
        let points = series.points();
        assert_eq!(points[0].date, Date::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(points[0].close, Some(184.0));
        assert_eq!(points[1].date, Date::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(points[1].close, Some(180.0));
    }

    #[test]
    fn test_resample_daily_is_identity() {
        let rows = vec![row("2024-01-03", 2.0), row("2024-01-02", 1.0)];
        let series = resample("X", &rows, Interval::Daily);
        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[0].close, Some(1.0));
    }
}
