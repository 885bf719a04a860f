//! Calendar command implementation.

use std::fmt::Write;

use anyhow::Result;
use chrono::NaiveDate;
use rotation::{portfolio::RebalancePeriod, signals::selection_offset};

use super::{OutputFormat, banner};
use crate::data;

/// Print the rebalance period and selection offset for a date.
pub(crate) fn show_calendar(today: Option<&str>, format: OutputFormat) -> Result<()> {
    let today = data::resolve_today(today)?;
    let period = RebalancePeriod::containing(today)?;
    let offset = selection_offset(today);

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "today": today,
                "last": period.last,
                "next": period.next,
                "days_until_next": period.days_until_next(today),
                "offset": offset,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => print!("{}", render(today, &period, offset)),
    }
    Ok(())
}

/// Render the calendar as text.
pub(crate) fn render(today: NaiveDate, period: &RebalancePeriod, offset: usize) -> String {
    let mut out = String::new();
    banner(&mut out, "Rebalance Calendar");
    let _ = writeln!(out, "Today:          {today}");
    let _ = writeln!(out, "Last rebalance: {}", period.last);
    let _ = writeln!(
        out,
        "Next rebalance: {} ({} days)",
        period.next,
        period.days_until_next(today)
    );
    let _ = writeln!(out, "Momentum offset: {offset}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_year_end() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let period = RebalancePeriod::containing(today).unwrap();
        let text = render(today, &period, selection_offset(today));

        assert!(text.contains("Last rebalance: 2024-10-01"));
        assert!(text.contains("Next rebalance: 2025-01-01 (1 days)"));
        assert!(text.contains("Momentum offset: 3"));
    }
}
