//! Application routing
//!
//! One router per service. Both share the health endpoints and the
//! request-logging middleware.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{gateway, health, predictor};
use crate::middleware::{log_request, REQUEST_ID_HEADER, TRACE_ID_HEADER};
use crate::server::state::{GatewayState, PredictorState, ServiceInfo};

/// Create the Gateway router
pub fn create_gateway_router(state: GatewayState) -> Router {
    Router::new()
        .route("/process", post(gateway::process_input))
        .route("/ready", get(health::gateway_readiness))
        .merge(common_routes::<GatewayState>())
        .layer(create_cors_layer())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Create the Predictor router
pub fn create_predictor_router(state: PredictorState) -> Router {
    Router::new()
        .route("/predict", post(predictor::predict))
        .route("/ready", get(health::readiness))
        .merge(common_routes::<PredictorState>())
        .layer(create_cors_layer())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Root, health and liveness routes (no state beyond service info)
fn common_routes<S: ServiceInfo>() -> Router<S> {
    Router::new()
        .route("/", get(health::root::<S>))
        .route("/health", get(health::health_check::<S>))
        .route("/liveness", get(health::liveness))
}

/// Create CORS layer with permissive settings for development
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            axum::http::HeaderName::from_static(TRACE_ID_HEADER),
            axum::http::HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::health::{HealthResponse, ReadinessResponse, ServiceStatus};
    use crate::config::{ServiceKind, Settings};
    use crate::error::ErrorResponse;
    use crate::schemas::{GatewayResponse, PredictionResponse};
    use crate::services::PredictorClient;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use serde::de::DeserializeOwned;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;
    use tracing_test::traced_test;

    fn predictor_router() -> Router {
        create_predictor_router(PredictorState::new(Settings::for_service(
            ServiceKind::Predictor,
        )))
    }

    /// Gateway whose Predictor URL points at a closed port
    async fn gateway_router_without_predictor() -> Router {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut settings = Settings::for_service(ServiceKind::Gateway);
        settings.predictor.url = format!("http://{}", addr);
        settings.predictor.timeout_ms = 500;
        settings.predictor.connect_timeout_ms = 500;

        let client = PredictorClient::new(&settings.predictor).unwrap();
        create_gateway_router(GatewayState::with_backend(settings, Arc::new(client)))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body<T: DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_predict_reports_input_length() {
        let response = predictor_router()
            .oneshot(post_json("/predict", r#"{"input": "hello world"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: PredictionResponse = json_body(response).await;
        assert_eq!(body.prediction.input_length, 11);
        assert!((0.70..=0.99).contains(&body.prediction.confidence));
        assert_eq!(body.message, body.prediction.describe());
    }

    #[tokio::test]
    async fn test_predict_accepts_empty_input() {
        let response = predictor_router()
            .oneshot(post_json("/predict", r#"{"input": ""}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: PredictionResponse = json_body(response).await;
        assert_eq!(body.prediction.input_length, 0);
    }

    #[tokio::test]
    async fn test_predict_missing_input_is_422() {
        let response = predictor_router()
            .oneshot(post_json("/predict", r#"{"text": "hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: ErrorResponse = json_body(response).await;
        assert_eq!(body.error.type_, "validation_error");
        assert_eq!(body.error.field.as_deref(), Some("input"));
    }

    #[tokio::test]
    async fn test_predict_malformed_json_is_client_error() {
        let response = predictor_router()
            .oneshot(post_json("/predict", "{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_process_without_forwarding_ignores_dead_predictor() {
        let response = gateway_router_without_predictor()
            .await
            .oneshot(post_json("/process", r#"{"data": "hi", "forward_to_model": false}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = json_body(response).await;
        assert_eq!(body, serde_json::json!({"status": "Input logged successfully"}));
    }

    #[tokio::test]
    async fn test_process_forwarding_to_dead_predictor_is_503() {
        let response = gateway_router_without_predictor()
            .await
            .oneshot(post_json("/process", r#"{"data": "hi", "forward_to_model": true}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: ErrorResponse = json_body(response).await;
        assert_eq!(body.error.type_, "service_unavailable");
    }

    #[tokio::test]
    async fn test_process_missing_data_is_422() {
        let response = gateway_router_without_predictor()
            .await
            .oneshot(post_json("/process", r#"{"forward_to_model": true}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: ErrorResponse = json_body(response).await;
        assert_eq!(body.error.field.as_deref(), Some("data"));
    }

    #[tokio::test]
    async fn test_process_empty_data_is_422() {
        let response = gateway_router_without_predictor()
            .await
            .oneshot(post_json("/process", r#"{"data": "", "forward_to_model": true}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: ErrorResponse = json_body(response).await;
        assert_eq!(body.error.field.as_deref(), Some("data"));
    }

    #[tokio::test]
    async fn test_process_non_string_data_is_422() {
        let response = gateway_router_without_predictor()
            .await
            .oneshot(post_json("/process", r#"{"data": 12}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: ErrorResponse = json_body(response).await;
        assert_eq!(body.error.field.as_deref(), Some("data"));
    }

    #[tokio::test]
    async fn test_process_null_data_names_field() {
        let response = gateway_router_without_predictor()
            .await
            .oneshot(post_json("/process", r#"{"data": null, "forward_to_model": true}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: ErrorResponse = json_body(response).await;
        assert_eq!(body.error.field.as_deref(), Some("data"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_rejected_input_is_never_logged() {
        let router = gateway_router_without_predictor().await;

        for body in [
            r#"{"forward_to_model": true}"#,
            r#"{"data": "", "forward_to_model": false}"#,
            r#"{"data": 12}"#,
        ] {
            let response = router
                .clone()
                .oneshot(post_json("/process", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }

        assert!(!logs_contain("Received input"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_request_span_not_left_entered_while_pending() {
        let router = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    "done"
                }),
            )
            .layer(middleware::from_fn(log_request));

        let mut pending = Box::pin(router.oneshot(get_request("/slow")));
        let early = tokio::time::timeout(Duration::from_millis(20), &mut pending).await;
        assert!(early.is_err(), "handler should still be sleeping");

        // Whatever else runs on this thread now must not see the request span
        let current = tracing::Span::current();
        assert_ne!(current.metadata().map(|m| m.name()), Some("http_request"));

        let response = pending.await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_gateway_not_ready_without_predictor() {
        let response = gateway_router_without_predictor()
            .await
            .oneshot(get_request("/ready"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: ReadinessResponse = json_body(response).await;
        assert!(!body.ready);
        assert_eq!(body.checks.predictor, Some(false));
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let router = predictor_router();

        let response = router.clone().oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: HealthResponse = json_body(response).await;
        assert_eq!(body.status, "healthy");
        assert_eq!(body.service, "prediction-service");

        let response = router.clone().oneshot(get_request("/")).await.unwrap();
        let body: ServiceStatus = json_body(response).await;
        assert_eq!(body.status, "running");

        let response = router.oneshot(get_request("/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_trace_id_echoed() {
        let request = Request::builder()
            .uri("/liveness")
            .header(TRACE_ID_HEADER, "trace-123")
            .body(Body::empty())
            .unwrap();

        let response = predictor_router().oneshot(request).await.unwrap();

        assert_eq!(response.headers()[TRACE_ID_HEADER], "trace-123");
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "trace-123");
    }

    #[tokio::test]
    async fn test_logged_response_shape() {
        let response = gateway_router_without_predictor()
            .await
            .oneshot(post_json("/process", r#"{"data": "only log me"}"#))
            .await
            .unwrap();

        let body: GatewayResponse = json_body(response).await;
        assert_eq!(body, GatewayResponse::logged());
    }
}
