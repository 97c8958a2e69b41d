//! Gateway service
//!
//! Logs client input and optionally forwards it to the Predictor.

use anyhow::Result;
use clap::Parser;
use prediction_gateway::{
    config::{Environment, LogFormat, ServiceKind, Settings},
    logging::init_tracing,
    server::App,
};

/// Gateway service
#[derive(Parser, Debug)]
#[command(name = "gateway")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (overrides PORT env var)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides HOST env var)
    #[arg(long)]
    host: Option<String>,

    /// Log level: trace, debug, info, warn, error (overrides LOG_LEVEL env var)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (overrides LOG_FORMAT env var)
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// Environment: dev, staging, prod (overrides ENVIRONMENT env var)
    #[arg(short, long)]
    env: Option<Environment>,

    /// Predictor base URL (overrides PREDICTOR_URL env var)
    #[arg(long)]
    predictor_url: Option<String>,

    /// Predictor request timeout in milliseconds (overrides PREDICTOR_TIMEOUT_MS env var)
    #[arg(long)]
    predictor_timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(ServiceKind::Gateway)?;

    if let Some(port) = args.port {
        settings.port = port;
    }
    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if let Some(log_format) = args.log_format {
        settings.log_format = log_format;
    }
    if let Some(env) = args.env {
        settings.environment = env;
    }
    if let Some(url) = args.predictor_url {
        settings.predictor.url = url;
    }
    if let Some(timeout_ms) = args.predictor_timeout_ms {
        settings.predictor.timeout_ms = timeout_ms;
    }
    settings.validate()?;

    init_tracing(&settings.log_level, settings.log_format)?;

    tracing::info!(
        app_name = %settings.app_name,
        version = %settings.app_version,
        environment = %settings.environment,
        host = %settings.host,
        port = %settings.port,
        predictor_url = %settings.predictor.url,
        "Starting gateway"
    );

    let app = App::gateway(settings)?;
    app.run_with_graceful_shutdown().await?;

    tracing::info!("Gateway shutdown complete");

    Ok(())
}
