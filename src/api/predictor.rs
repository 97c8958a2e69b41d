//! Predictor endpoint
//!
//! POST /predict returns a mock prediction for any well-formed query,
//! including the empty string.

use axum::{extract::State, Extension, Json};

use crate::api::extract::ValidatedJson;
use crate::error::ApiError;
use crate::middleware::TraceId;
use crate::schemas::{PredictionQuery, PredictionResponse};
use crate::server::state::PredictorState;

/// POST /predict
pub async fn predict(
    State(state): State<PredictorState>,
    trace_id: Option<Extension<TraceId>>,
    ValidatedJson(query): ValidatedJson<PredictionQuery>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let prediction = state.classifier.predict(&query.input);

    tracing::info!(
        trace_id = %trace_id.as_ref().map(|Extension(id)| id.as_str()).unwrap_or("-"),
        input = %query.input,
        class = %prediction.class,
        confidence = prediction.confidence,
        input_length = prediction.input_length,
        "Made prediction"
    );

    Ok(Json(prediction.into()))
}
