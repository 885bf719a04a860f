//! Universe sources: the live NASDAQ-100 constituents table and a fixed list.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rotation_traits::{Symbol, UniverseSource};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::{Result, error::DataError};

/// Wikipedia page listing the NASDAQ-100 constituents.
pub const NASDAQ_100_URL: &str = "https://en.wikipedia.org/wiki/NASDAQ-100";

/// Header labels recognized as the ticker column.
const TICKER_HEADERS: [&str; 2] = ["ticker", "symbol"];

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| DataError::Parse(format!("invalid selector {css}: {e}")))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Extract the tickers from the `table#constituents` element of `html`.
///
/// The ticker column is located by its header. Tickers are uppercased and
/// deduplicated, keeping first-seen order.
///
/// # Errors
///
/// Returns [`DataError::Parse`] when the table or its ticker column is
/// missing, or when the table has no rows.
pub fn parse_constituents(html: &str) -> Result<Vec<Symbol>> {
    let document = Html::parse_document(html);
    let table_sel = selector("table#constituents")?;
    let row_sel = selector("tr")?;
    let th_sel = selector("th")?;
    let td_sel = selector("td")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| DataError::Parse("no table#constituents on page".to_string()))?;

    let column = table
        .select(&row_sel)
        .find_map(|tr| {
            tr.select(&th_sel).position(|th| {
                let label = cell_text(th).to_lowercase();
                TICKER_HEADERS.contains(&label.as_str())
            })
        })
        .ok_or_else(|| DataError::Parse("no ticker column in constituents table".to_string()))?;

    let mut seen = HashSet::new();
    let mut symbols = Vec::new();
    for tr in table.select(&row_sel) {
        let Some(cell) = tr.select(&td_sel).nth(column) else {
            continue;
        };
        let ticker = cell_text(cell).to_uppercase();
        if !ticker.is_empty() && seen.insert(ticker.clone()) {
            symbols.push(ticker);
        }
    }

    if symbols.is_empty() {
        return Err(DataError::Parse("constituents table has no rows".to_string()));
    }
    Ok(symbols)
}

/// Scrapes the current NASDAQ-100 constituents from Wikipedia.
#[derive(Debug, Clone)]
pub struct WikipediaUniverse {
    client: Client,
    url: String,
}

impl WikipediaUniverse {
    /// Create a source for the NASDAQ-100 page.
    #[must_use]
    pub fn new() -> Self {
        Self::with_url(NASDAQ_100_URL)
    }

    /// Create a source for another page with the same table layout.
    #[must_use]
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    /// The page URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download the page and extract its tickers.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the page cannot be parsed.
    pub async fn fetch(&self) -> Result<Vec<Symbol>> {
        let response = self.client.get(&self.url).send().await?;
        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => return Err(DataError::RateLimitExceeded),
            status if !status.is_success() => {
                return Err(DataError::Api(format!("HTTP {status} fetching {}", self.url)));
            }
            _ => {}
        }

        let html = response.text().await?;
        let symbols = parse_constituents(&html)?;
        info!(url = %self.url, count = symbols.len(), "loaded universe");
        Ok(symbols)
    }
}

impl Default for WikipediaUniverse {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UniverseSource for WikipediaUniverse {
    fn name(&self) -> &str {
        "wikipedia"
    }

    async fn symbols(&self) -> rotation_traits::Result<Vec<Symbol>> {
        Ok(self.fetch().await?)
    }
}

/// A fixed list of tickers, for offline runs and `--symbols`.
#[derive(Debug, Clone, Default)]
pub struct StaticUniverse {
    symbols: Vec<Symbol>,
}

impl StaticUniverse {
    /// Create a universe from a list, uppercasing and removing duplicates.
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let symbols = symbols
            .into_iter()
            .map(|s| s.as_ref().trim().to_uppercase())
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect();
        Self { symbols }
    }

    /// Parse a comma-separated list such as `"AAPL,MSFT,NVDA"`.
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }
}

#[async_trait]
impl UniverseSource for StaticUniverse {
    fn name(&self) -> &str {
        "static"
    }

    async fn symbols(&self) -> rotation_traits::Result<Vec<Symbol>> {
        debug!(count = self.symbols.len(), "static universe");
        Ok(self.symbols.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <table class="wikitable"><tr><th>Ticker</th></tr><tr><td>WRONG</td></tr></table>
        <table id="constituents" class="wikitable sortable">
          <tbody>
            <tr><th>Company</th><th>Ticker</th><th>GICS Sector</th></tr>
            <tr><td>Apple Inc.</td><td>AAPL</td><td>Information Technology</td></tr>
            <tr><td>Alphabet Inc. (Class A)</td><td>GOOGL</td><td>Communication Services</td></tr>
            <tr><td>Apple again</td><td> aapl </td><td>Information Technology</td></tr>
            <tr><td>Microsoft</td><td><a href="/wiki/MSFT">MSFT</a></td><td>Information Technology</td></tr>
          </tbody>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_parse_constituents() {
        let symbols = parse_constituents(PAGE).unwrap();
        assert_eq!(symbols, vec!["AAPL", "GOOGL", "MSFT"]);
    }

    #[test]
    fn test_symbol_header() {
        let html = r#"<table id="constituents">
            <tr><th>Symbol</th><th>Name</th></tr>
            <tr><td>NVDA</td><td>Nvidia</td></tr>
        </table>"#;
        assert_eq!(parse_constituents(html).unwrap(), vec!["NVDA"]);
    }

    #[test]
    fn test_missing_table() {
        let err = parse_constituents("<html><body><p>nothing</p></body></html>").unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
    }

    #[test]
    fn test_missing_ticker_column() {
        let html = r#"<table id="constituents"><tr><th>Company</th></tr><tr><td>Apple</td></tr></table>"#;
        assert!(matches!(parse_constituents(html), Err(DataError::Parse(_))));
    }

    #[test]
    fn test_static_universe_dedup() {
        let universe = StaticUniverse::parse("aapl, MSFT,,AAPL,nvda");
        assert_eq!(universe.symbols, vec!["AAPL", "MSFT", "NVDA"]);
    }

    #[tokio::test]
    async fn test_static_universe_source() {
        let source: Box<dyn UniverseSource> = Box::new(StaticUniverse::new(["AMZN", "META"]));
        assert_eq!(source.name(), "static");
        assert_eq!(source.symbols().await.unwrap(), vec!["AMZN", "META"]);
    }
}
