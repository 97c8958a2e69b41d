//! Health check endpoints
//!
//! Shared by both services. Readiness differs: the Predictor is always
//! ready, while the Gateway reports whether it can reach the Predictor.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::server::state::{GatewayState, ServiceInfo};

/// Response for the root endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub service: String,
    pub status: String,
}

/// Response for the main health check endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub service: String,
    pub status: String,
    pub version: String,
    pub environment: String,
    pub uptime_seconds: u64,
}

/// Response for readiness probe
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub checks: ReadinessChecks,
}

/// Individual readiness checks
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessChecks {
    pub config_loaded: bool,
    /// Only reported by the Gateway
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predictor: Option<bool>,
}

/// Response for liveness probe
#[derive(Debug, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub alive: bool,
}

/// GET /
pub async fn root<S: ServiceInfo>(State(state): State<S>) -> Json<ServiceStatus> {
    Json(ServiceStatus {
        service: state.settings().service.title().to_string(),
        status: "running".to_string(),
    })
}

/// Main health check endpoint
///
/// GET /health
pub async fn health_check<S: ServiceInfo>(State(state): State<S>) -> Json<HealthResponse> {
    let settings = state.settings();
    Json(HealthResponse {
        service: settings.app_name.clone(),
        status: "healthy".to_string(),
        version: settings.app_version.clone(),
        environment: settings.environment.to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// Liveness probe endpoint
///
/// GET /liveness
pub async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse { alive: true })
}

/// Predictor readiness: nothing to wait for once the process serves requests
///
/// GET /ready
pub async fn readiness() -> Json<ReadinessResponse> {
    Json(ReadinessResponse {
        ready: true,
        checks: ReadinessChecks {
            config_loaded: true,
            predictor: None,
        },
    })
}

/// Gateway readiness: probes the Predictor's health endpoint
///
/// Informational only. `/process` never consults it.
///
/// GET /ready
pub async fn gateway_readiness(
    State(state): State<GatewayState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let predictor_healthy = state.predictor.health_check().await;

    let status = if predictor_healthy {
        StatusCode::OK
    } else {
        tracing::warn!("Gateway not ready: Predictor is unreachable");
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessResponse {
            ready: predictor_healthy,
            checks: ReadinessChecks {
                config_loaded: true,
                predictor: Some(predictor_healthy),
            },
        }),
    )
}
