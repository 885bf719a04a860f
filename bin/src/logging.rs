//! Logging setup for the CLI.
//!
//! Logs go to stderr so that `--format json` output on stdout stays parseable.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Multi-line, human-readable.
    Pretty,
    /// One JSON object per event.
    Json,
    /// Single-line, human-readable.
    #[default]
    Compact,
}

/// Build the level filter; `RUST_LOG` wins over `level` when set.
fn env_filter(level: &str) -> Result<EnvFilter> {
    Ok(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?)
}

/// Install the global subscriber.
pub(crate) fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = env_filter(level)?;
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init()?,
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?,
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
            .try_init()?,
    }

    Ok(())
}
