//! Request logging middleware
//!
//! Assigns every request a trace ID, logs its start and completion, and
//! echoes the ID back in the response headers. The ID is also stored in the
//! request extensions so the Gateway can forward it to the Predictor.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Header name for trace ID
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Header name for request ID (alias for trace ID)
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Extension type for storing trace ID in request extensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceId(pub String);

impl TraceId {
    /// Generate a new trace ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the ID from `x-trace-id`, then `x-request-id`, else generate one
    pub fn from_headers(headers: &HeaderMap) -> Self {
        [TRACE_ID_HEADER, REQUEST_ID_HEADER]
            .iter()
            .find_map(|name| {
                headers
                    .get(*name)
                    .and_then(|v| v.to_str().ok())
                    .filter(|v| !v.is_empty())
            })
            .map(|v| TraceId(v.to_string()))
            .unwrap_or_default()
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Middleware to log HTTP requests and responses
///
/// ```ignore
/// Router::new()
///     .layer(axum::middleware::from_fn(log_request))
/// ```
pub async fn log_request(mut request: Request, next: Next) -> Response<Body> {
    let start = Instant::now();

    let trace_id = TraceId::from_headers(request.headers());
    request.extensions_mut().insert(trace_id.clone());

    let method = request.method().clone();
    let path = request.uri().path().to_string();

    tracing::info!(
        trace_id = %trace_id,
        method = %method,
        path = %path,
        "Incoming request"
    );

    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %method,
        path = %path,
    );

    let mut response = next.run(request).instrument(span).await;

    let status = response.status();
    let duration_ms = format!("{:.2}", start.elapsed().as_secs_f64() * 1000.0);

    match classify(status) {
        Outcome::ClientError => tracing::warn!(
            trace_id = %trace_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = %duration_ms,
            "Client error"
        ),
        Outcome::ServerError => tracing::error!(
            trace_id = %trace_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = %duration_ms,
            "Server error"
        ),
        Outcome::Completed => tracing::info!(
            trace_id = %trace_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = %duration_ms,
            "Request completed"
        ),
    }

    if let Ok(header_value) = HeaderValue::from_str(trace_id.as_str()) {
        response
            .headers_mut()
            .insert(TRACE_ID_HEADER, header_value.clone());
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER, header_value);
    }

    response
}

enum Outcome {
    Completed,
    ClientError,
    ServerError,
}

fn classify(status: StatusCode) -> Outcome {
    if status.is_client_error() {
        Outcome::ClientError
    } else if status.is_server_error() {
        Outcome::ServerError
    } else {
        Outcome::Completed
    }
}
