//! Logging setup
//!
//! Installs the global tracing subscriber. `RUST_LOG` takes precedence over
//! the configured level; JSON output is the default.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LogFormat;

/// Build the filter from `RUST_LOG`, falling back to `log_level`
pub fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
}

/// Initialize the global tracing subscriber
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(log_level: &str, format: LogFormat) -> anyhow::Result<()> {
    let filter = env_filter(log_level);

    let console_layer = match format {
        LogFormat::Json => fmt::layer().json().with_filter(filter).boxed(),
        LogFormat::Pretty => fmt::layer().pretty().with_filter(filter).boxed(),
    };

    tracing_subscriber::registry().with(console_layer).try_init()?;

    Ok(())
}
