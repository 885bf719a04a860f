//! Momentum command implementation.

use std::fmt::Write;

use anyhow::Result;
use rotation::{MomentumTable, Strategy, StrategyConfig};

use super::{OutputFormat, banner, pct, rule};
use crate::data::{self, SourceKind};

/// Rank the whole universe by momentum at the selection offset.
pub(crate) async fn show_momentum(
    config: StrategyConfig,
    source: SourceKind,
    symbols: &[String],
    today: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let today = data::resolve_today(today)?;
    let universe = data::universe(symbols);
    let prices = data::price_source(source)?;

    let strategy = Strategy::new(config);
    let build = strategy.load(universe.as_ref(), prices).await?;
    let table = strategy.momentum_table(&build.matrix, today);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&table)?),
        OutputFormat::Text => print!("{}", render(&table)),
    }
    Ok(())
}

/// Render a momentum table as text.
pub(crate) fn render(table: &MomentumTable) -> String {
    let mut out = String::new();
    banner(&mut out, "Momentum Ranking");

    let anchor = table
        .anchor_period
        .map_or_else(|| "n/a".to_string(), |d| d.to_string());
    let _ = writeln!(out, "As of:     {}", table.as_of);
    let _ = writeln!(out, "Offset:    {} (period {anchor})", table.offset);
    let _ = writeln!(out, "Window:    {} periods", table.window);
    let _ = writeln!(out, "Threshold: {}\n", pct(table.threshold));

    rule(&mut out, "RANKING");
    let _ = writeln!(out, "{:>4}  {:<8} {:>10}  {}", "Rank", "Ticker", "Momentum", "Selected");
    let _ = writeln!(out, "{}", "─".repeat(36));
    for row in &table.rows {
        let rank = row.rank.map_or_else(|| "-".to_string(), |r| r.to_string());
        let momentum = row.momentum.map_or_else(|| "n/a".to_string(), pct);
        let mark = if row.selected { "*" } else { "" };
        let _ = writeln!(out, "{rank:>4}  {:<8} {momentum:>10}  {mark}", row.symbol);
    }

    let _ = writeln!(
        out,
        "\n{} selected, {} without momentum",
        table.selected().count(),
        table.missing().count()
    );
    out
}
