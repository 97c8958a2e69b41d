//! Application server
//!
//! This module provides the server wrapper shared by both services,
//! including initialization and graceful shutdown handling.

use anyhow::Result;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use tokio::{net::TcpListener, signal};

use crate::config::{ServiceKind, Settings};
use crate::server::{
    routes,
    state::{GatewayState, PredictorState},
};

/// A configured service ready to be served
pub struct App {
    settings: Settings,
    router: Router,
}

impl App {
    /// Build the service selected by `settings.service`
    pub fn new(settings: Settings) -> Result<Self> {
        match settings.service {
            ServiceKind::Gateway => Self::gateway(settings),
            ServiceKind::Predictor => Ok(Self::predictor(settings)),
        }
    }

    pub fn gateway(settings: Settings) -> Result<Self> {
        tracing::debug!("Initializing Gateway state");
        let state = GatewayState::new(settings.clone())?;

        Ok(Self {
            router: routes::create_gateway_router(state),
            settings,
        })
    }

    pub fn predictor(settings: Settings) -> Self {
        tracing::debug!("Initializing Predictor state");
        let state = PredictorState::new(settings.clone());

        Self {
            router: routes::create_predictor_router(state),
            settings,
        }
    }

    /// Run the server (without graceful shutdown)
    pub async fn run(self) -> Result<()> {
        let listener = self.bind().await?;
        self.serve(listener, std::future::pending()).await
    }

    /// Run the server with graceful shutdown support
    ///
    /// The server will shut down gracefully when receiving SIGINT (Ctrl+C)
    /// or SIGTERM signals.
    pub async fn run_with_graceful_shutdown(self) -> Result<()> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` completes
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!(
            service = %self.settings.service,
            addr = %listener.local_addr()?,
            "Starting server"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!(service = %self.settings.service, "Server stopped");

        Ok(())
    }

    async fn bind(&self) -> Result<TcpListener> {
        let addr = self.settings.server_addr().parse::<SocketAddr>()?;
        Ok(TcpListener::bind(addr).await?)
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

/// Create a future that completes when a shutdown signal is received
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
