//! Gateway processing endpoint
//!
//! POST /process logs the client's input and, when asked to, forwards it to
//! the Predictor and embeds the prediction in the response. A Predictor
//! failure becomes a 503; the input has been logged by then and stays logged.

use axum::{extract::State, Extension, Json};

use crate::api::extract::ValidatedJson;
use crate::error::ApiError;
use crate::middleware::TraceId;
use crate::schemas::{ClientRequest, GatewayResponse};
use crate::server::state::GatewayState;
use crate::services::PredictionBackend;

/// POST /process
pub async fn process_input(
    State(state): State<GatewayState>,
    trace_id: Option<Extension<TraceId>>,
    ValidatedJson(request): ValidatedJson<ClientRequest>,
) -> Result<Json<GatewayResponse>, ApiError> {
    let trace_id = trace_id.map(|Extension(id)| id);
    let response = process(state.predictor.as_ref(), &request, trace_id.as_ref()).await?;
    Ok(Json(response))
}

/// Log `request` and optionally compose a prediction from `backend`
///
/// `request` must already be validated.
pub async fn process(
    backend: &dyn PredictionBackend,
    request: &ClientRequest,
    trace_id: Option<&TraceId>,
) -> Result<GatewayResponse, ApiError> {
    tracing::info!(
        trace_id = %trace_id.map(TraceId::as_str).unwrap_or("-"),
        data = %request.data,
        forward_to_model = request.forward_to_model,
        "Received input"
    );

    if !request.forward_to_model {
        return Ok(GatewayResponse::logged());
    }

    let prediction = backend
        .predict(&request.to_query(), trace_id)
        .await
        .map_err(|e| {
            tracing::error!(
                error = %e,
                timeout = e.is_timeout(),
                "Failed to reach Predictor"
            );
            ApiError::ServiceUnavailable(format!("Predictor is unavailable: {}", e))
        })?;

    tracing::info!(
        class = %prediction.prediction.class,
        confidence = prediction.prediction.confidence,
        input_length = prediction.prediction.input_length,
        "Composed prediction"
    );

    Ok(GatewayResponse::with_prediction(prediction))
}
