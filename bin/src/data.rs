//! Data source selection for the rotation CLI.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use rotation::{
    StrategyConfig,
    data::{FmpClient, StaticUniverse, WikipediaUniverse, YahooClient},
    traits::{PriceSource, UniverseSource},
};

/// Price history provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub(crate) enum SourceKind {
    /// Yahoo Finance chart API, no key needed.
    #[default]
    Yahoo,
    /// Financial Modeling Prep, needs `FMP_API_KEY`.
    Fmp,
}

/// Build the price source.
pub(crate) fn price_source(kind: SourceKind) -> Result<Arc<dyn PriceSource>> {
    Ok(match kind {
        SourceKind::Yahoo => Arc::new(YahooClient::new()?),
        SourceKind::Fmp => Arc::new(FmpClient::from_env()?),
    })
}

/// Use the given tickers, or scrape the NASDAQ-100 list when none are given.
pub(crate) fn universe(symbols: &[String]) -> Box<dyn UniverseSource> {
    if symbols.is_empty() {
        Box::new(WikipediaUniverse::new())
    } else {
        Box::new(StaticUniverse::new(symbols))
    }
}

/// Load the strategy configuration, falling back to defaults.
pub(crate) fn load_config(path: Option<&str>) -> Result<StrategyConfig> {
    match path {
        Some(p) => StrategyConfig::from_file(p).with_context(|| format!("loading config {p}")),
        None => Ok(StrategyConfig::default()),
    }
}

/// Parse a date string in YYYY-MM-DD format.
pub(crate) fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format: {date_str}"))
}

/// The evaluation date: `--today` if given, else the local date.
pub(crate) fn resolve_today(today: Option<&str>) -> Result<NaiveDate> {
    today.map_or_else(|| Ok(Local::now().date_naive()), parse_date)
}
