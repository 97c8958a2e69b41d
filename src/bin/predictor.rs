//! Predictor service
//!
//! Answers `POST /predict` with a mock classification.

use anyhow::Result;
use clap::Parser;
use prediction_gateway::{
    config::{Environment, LogFormat, ServiceKind, Settings},
    logging::init_tracing,
    server::App,
};

/// Predictor service (mock classifier, not a real model)
#[derive(Parser, Debug)]
#[command(name = "predictor")]
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
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(ServiceKind::Predictor)?;

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
    settings.validate()?;

    init_tracing(&settings.log_level, settings.log_format)?;

    tracing::info!(
        app_name = %settings.app_name,
        version = %settings.app_version,
        environment = %settings.environment,
        host = %settings.host,
        port = %settings.port,
        min_confidence = settings.model.min_confidence,
        max_confidence = settings.model.max_confidence,
        "Starting predictor"
    );

    App::predictor(settings).run_with_graceful_shutdown().await?;

    tracing::info!("Predictor shutdown complete");

    Ok(())
}
