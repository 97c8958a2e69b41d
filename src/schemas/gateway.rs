//! Gateway API schema definitions

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::prediction::{PredictionQuery, PredictionResponse, PredictionResult};

/// Status reported for every successfully logged input
pub const LOGGED_STATUS: &str = "Input logged successfully";

/// Body of `POST /process`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ClientRequest {
    /// Free-form client payload that gets logged
    #[validate(length(min = 1, message = "data must not be empty"))]
    pub data: String,

    /// Whether to ask the Predictor for a prediction
    #[serde(default)]
    pub forward_to_model: bool,
}

impl ClientRequest {
    /// Query sent to the Predictor when forwarding
    pub fn to_query(&self) -> PredictionQuery {
        PredictionQuery::new(self.data.clone())
    }
}

/// Prediction block embedded in the gateway response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPrediction {
    pub prediction: PredictionResult,
    pub message: String,
}

impl From<PredictionResponse> for ModelPrediction {
    fn from(response: PredictionResponse) -> Self {
        Self {
            prediction: response.prediction,
            message: response.message,
        }
    }
}

/// Body returned by `POST /process`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayResponse {
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_prediction: Option<ModelPrediction>,
}

impl GatewayResponse {
    /// Input was logged and not forwarded
    pub fn logged() -> Self {
        Self {
            status: LOGGED_STATUS.to_string(),
            model_prediction: None,
        }
    }

    /// Input was logged and the Predictor answered
    pub fn with_prediction(prediction: impl Into<ModelPrediction>) -> Self {
        Self {
            status: LOGGED_STATUS.to_string(),
            model_prediction: Some(prediction.into()),
        }
    }
}
