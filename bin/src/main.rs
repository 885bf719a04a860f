//! Rotation CLI binary.
//!
//! Provides the command-line interface for the quarterly momentum rotation
//! strategy.

mod cmd;
mod data;
mod logging;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::process;

use cmd::OutputFormat;
use data::SourceKind;
use logging::LogFormat;

#[derive(Parser)]
#[command(name = "rotation")]
#[command(about = "Quarterly momentum rotation over the NASDAQ-100", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Strategy configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log level or filter directive (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

/// Options shared by the commands that load prices.
#[derive(Args)]
struct MarketArgs {
    /// Tickers to use instead of the NASDAQ-100 list
    #[arg(short, long, value_delimiter = ',')]
    symbols: Vec<String>,

    /// Price source
    #[arg(long, value_enum, default_value_t = SourceKind::Yahoo)]
    source: SourceKind,

    /// Benchmark ticker (overrides the config)
    #[arg(short, long)]
    benchmark: Option<String>,

    /// Evaluate as of this date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    today: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current holdings and their drifted weights
    Holdings {
        #[command(flatten)]
        market: MarketArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Rank the universe by momentum at the selection offset
    Momentum {
        #[command(flatten)]
        market: MarketArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show the rebalance period and selection offset for a date
    Calendar {
        /// Date to evaluate (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        today: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the most recent rows of the aligned price matrix
    Prices {
        #[command(flatten)]
        market: MarketArgs,

        /// Number of rows to print
        #[arg(short, long, default_value = "12")]
        rows: usize,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.log_format)?;

    let mut config = data::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Holdings { market, format } => {
            apply_overrides(&mut config, &market);
            cmd::holdings::show_holdings(
                config,
                market.source,
                &market.symbols,
                market.today.as_deref(),
                format,
            )
            .await?;
        }
        Commands::Momentum { market, format } => {
            apply_overrides(&mut config, &market);
            cmd::momentum::show_momentum(
                config,
                market.source,
                &market.symbols,
                market.today.as_deref(),
                format,
            )
            .await?;
        }
        Commands::Calendar { today, format } => {
            cmd::calendar::show_calendar(today.as_deref(), format)?;
        }
        Commands::Prices { market, rows } => {
            apply_overrides(&mut config, &market);
            cmd::prices::show_prices(config, market.source, &market.symbols, rows).await?;
        }
    }

    Ok(())
}

/// Apply command-line overrides on top of the loaded configuration.
fn apply_overrides(config: &mut rotation::StrategyConfig, market: &MarketArgs) {
    if let Some(benchmark) = &market.benchmark {
        config.benchmark = benchmark.trim().to_uppercase();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_holdings() {
        let cli = Cli::parse_from([
            "rotation",
            "holdings",
            "--symbols",
            "AAPL,MSFT",
            "--source",
            "fmp",
            "--today",
            "2024-05-15",
            "--format",
            "json",
        ]);
        match cli.command {
            Commands::Holdings { market, format } => {
                assert_eq!(market.symbols, vec!["AAPL", "MSFT"]);
                assert_eq!(market.source, SourceKind::Fmp);
                assert_eq!(market.today.as_deref(), Some("2024-05-15"));
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected holdings"),
        }
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["rotation", "calendar", "--log-format", "json", "-c", "r.toml"]);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.config.as_deref(), Some("r.toml"));
    }

    #[test]
    fn test_benchmark_override() {
        let cli = Cli::parse_from(["rotation", "momentum", "--benchmark", "qqq"]);
        let mut config = rotation::StrategyConfig::default();
        if let Commands::Momentum { market, .. } = &cli.command {
            apply_overrides(&mut config, market);
        }
        assert_eq!(config.benchmark, "QQQ");
    }
}
