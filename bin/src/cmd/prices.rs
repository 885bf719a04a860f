//! Prices command implementation.

use anyhow::Result;
use rotation::{Strategy, StrategyConfig};

use crate::data::{self, SourceKind};

/// Build the aligned price matrix and print its most recent rows.
pub(crate) async fn show_prices(
    config: StrategyConfig,
    source: SourceKind,
    symbols: &[String],
    rows: usize,
) -> Result<()> {
    let universe = data::universe(symbols);
    let prices = data::price_source(source)?;

    let build = Strategy::new(config).load(universe.as_ref(), prices).await?;
    let frame = build.matrix.to_frame()?;

    println!(
        "{} periods x {} tickers (benchmark {})",
        build.matrix.len(),
        build.matrix.width(),
        build.matrix.benchmark()
    );
    if !build.dropped.is_empty() {
        let dropped: Vec<&str> = build.dropped.iter().map(|d| d.symbol.as_str()).collect();
        println!("Dropped: {}", dropped.join(", "));
    }
    println!("{}", frame.tail(Some(rows)));
    Ok(())
}
