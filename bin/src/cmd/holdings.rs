//! Holdings command implementation.

use std::fmt::Write;

use anyhow::Result;
use rotation::{RISK_OFF_NOTICE, Strategy, StrategyConfig, StrategyReport};
use tracing::warn;

use super::{OutputFormat, banner, pct, rule};
use crate::data::{self, SourceKind};

/// Run the full pipeline and print the current holdings.
pub(crate) async fn show_holdings(
    config: StrategyConfig,
    source: SourceKind,
    symbols: &[String],
    today: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let today = data::resolve_today(today)?;
    let universe = data::universe(symbols);
    let prices = data::price_source(source)?;

    let report = Strategy::new(config).run(universe.as_ref(), prices, today).await?;
    for dropped in &report.dropped {
        warn!(symbol = %dropped.symbol, reason = %dropped.reason, "ticker skipped");
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", render(&report)),
    }
    Ok(())
}

/// Render a report as text.
pub(crate) fn render(report: &StrategyReport) -> String {
    let mut out = String::new();
    banner(&mut out, "Momentum-Based Nasdaq Rotational Strategy");

    let stats = &report.statistics;
    let _ = writeln!(out, "Backtest Statistics from Jan 1, {} to Present", stats.since_year);
    let _ = writeln!(out, "  {:<28}{:>8.1}%", "Annualized Return", stats.annual_return);
    let _ = writeln!(out, "  {:<28}{:>8.1}%", "Max Drawdown", stats.max_drawdown);
    let _ = writeln!(out, "  {:<28}{:>8.1}%", "Annual Standard Deviation", stats.annual_std_dev);
    let _ = writeln!(out, "  {:<28}{:>9.3}", "Alpha", stats.alpha);
    let _ = writeln!(out, "  {:<28}{:>9.3}", "Beta", stats.beta);
    let _ = writeln!(out);

    let regime = &report.regime;
    let _ = writeln!(
        out,
        "Regime: {} (benchmark long {}, short {})",
        regime.regime,
        pct(regime.long_momentum),
        pct(regime.short_momentum)
    );
    if report.is_risk_off() {
        let _ = writeln!(out, "\n## {RISK_OFF_NOTICE}");
    }
    let _ = writeln!(out);

    rule(&mut out, "CURRENT PORTFOLIO HOLDINGS");

    if let Some(message) = report.status_message() {
        let _ = writeln!(out, "{message}");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<8} {:>10} {:>12} {:>12} {:>10} {:>9}",
        "Ticker", "Momentum", "Rebalance", "Current", "Return", "Weight"
    );
    let _ = writeln!(out, "{}", "─".repeat(66));
    for h in &report.drift.holdings {
        let _ = writeln!(
            out,
            "{:<8} {:>10} {:>12.2} {:>12.2} {:>9.2}% {:>8.2}%",
            h.symbol,
            pct(h.momentum),
            h.rebalance_price,
            h.current_price,
            h.percent_return,
            h.weight
        );
    }
    for h in &report.drift.unpriced {
        let _ = writeln!(
            out,
            "{:<8} {:>10} {:>12} {:>12} {:>10} {:>8.2}%",
            h.symbol,
            pct(h.momentum),
            "n/a",
            "n/a",
            "n/a",
            h.weight
        );
    }
    let cash = report.weights().cash();
    if cash > 0.0 {
        let _ = writeln!(out, "{:<8} {:>56.2}%", rotation::portfolio::CASH, cash);
    }
    let _ = writeln!(out);

    let period = &report.period;
    let _ = writeln!(out, "Last Rebalanced on: {}", period.last.format("%B %d, %Y"));
    let _ = writeln!(
        out,
        "Next Rebalance on:  {} ({} days)",
        period.next.format("%B %d, %Y"),
        period.days_until_next(report.as_of)
    );
    if let Some(total) = report.total_return() {
        let _ = writeln!(out, "Total Return Over Current Period: {total:.2}%");
    }
    out
}
