//! CLI subcommand modules.
//!
//! This module contains the implementations for all rotation CLI subcommands.

pub(crate) mod calendar;
pub(crate) mod holdings;
pub(crate) mod momentum;
pub(crate) mod prices;

/// How a command writes its result to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable tables.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Print a boxed section title.
pub(crate) fn banner(out: &mut String, title: &str) {
    use std::fmt::Write;

    let _ = writeln!(out, "\n╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(out, "║{title:^62}║");
    let _ = writeln!(out, "╚══════════════════════════════════════════════════════════════╝\n");
}

/// Print a ruled sub-heading.
pub(crate) fn rule(out: &mut String, title: &str) {
    use std::fmt::Write;

    let _ = writeln!(out, "{}", "━".repeat(62));
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}\n", "━".repeat(62));
}

/// Format a fraction as a signed percentage.
pub(crate) fn pct(value: f64) -> String {
    format!("{:+.2}%", value * 100.0)
}
