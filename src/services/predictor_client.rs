//! Predictor client used by the Gateway
//!
//! This module handles communication with the Predictor service over HTTP.
//! Every call is bounded by the configured timeouts and is attempted exactly
//! once; failures are reported to the caller without retrying.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::config::PredictorConfig;
use crate::middleware::logging::{TraceId, REQUEST_ID_HEADER};
use crate::schemas::{PredictionQuery, PredictionResponse};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur when calling the Predictor
#[derive(Error, Debug)]
pub enum PredictorClientError {
    /// Connection refused, DNS failure, timeout and other transport errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Predictor returned {code}: {message}")]
    Status { code: u16, message: String },

    #[error("Failed to parse Predictor response: {0}")]
    Parse(String),
}

impl PredictorClientError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, PredictorClientError::Http(e) if e.is_timeout())
    }
}

// ============================================================================
// Backend Trait
// ============================================================================

/// Anything the Gateway can ask for a prediction
#[async_trait]
pub trait PredictionBackend: Send + Sync {
    async fn predict(
        &self,
        query: &PredictionQuery,
        trace_id: Option<&TraceId>,
    ) -> Result<PredictionResponse, PredictorClientError>;

    /// Whether the backend currently answers its health endpoint
    async fn health_check(&self) -> bool;
}

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP implementation of [`PredictionBackend`]
#[derive(Debug, Clone)]
pub struct PredictorClient {
    client: Client,
    base_url: String,
}

impl PredictorClient {
    pub fn new(config: &PredictorConfig) -> Result<Self, PredictorClientError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;

        let base_url = config.url.trim_end_matches('/').to_string();

        tracing::info!(
            base_url = %base_url,
            timeout_ms = config.timeout_ms,
            connect_timeout_ms = config.connect_timeout_ms,
            "Initialized Predictor client"
        );

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn predict_url(&self) -> String {
        format!("{}/predict", self.base_url)
    }

    fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }
}

#[async_trait]
impl PredictionBackend for PredictorClient {
    async fn predict(
        &self,
        query: &PredictionQuery,
        trace_id: Option<&TraceId>,
    ) -> Result<PredictionResponse, PredictorClientError> {
        let url = self.predict_url();

        tracing::debug!(
            url = %url,
            input_length = query.input.chars().count(),
            "Calling Predictor"
        );

        let mut request = self.client.post(&url).json(query);
        if let Some(trace_id) = trace_id {
            request = request.header(REQUEST_ID_HEADER, trace_id.as_str());
        }

        let resp = request.send().await?;
        let status = resp.status();

        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(PredictorClientError::Status {
                code: status.as_u16(),
                message,
            });
        }

        let response_text = resp.text().await?;

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(error = %e, body = %response_text, "Failed to parse Predictor response");
            PredictorClientError::Parse(e.to_string())
        })
    }

    async fn health_check(&self) -> bool {
        match self.client.get(self.health_url()).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "Predictor health check failed");
                false
            }
        }
    }
}
