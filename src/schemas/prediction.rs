//! Predictor API schema definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

// ============================================================================
// Request Types
// ============================================================================

/// Body of `POST /predict`
///
/// The empty string is a valid input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PredictionQuery {
    pub input: String,
}

impl PredictionQuery {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Fixed label set of the mock classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionClass {
    Cat,
    Dog,
    Bird,
    Fish,
    Rabbit,
}

impl PredictionClass {
    pub const ALL: [PredictionClass; 5] = [
        PredictionClass::Cat,
        PredictionClass::Dog,
        PredictionClass::Bird,
        PredictionClass::Fish,
        PredictionClass::Rabbit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PredictionClass::Cat => "cat",
            PredictionClass::Dog => "dog",
            PredictionClass::Bird => "bird",
            PredictionClass::Fish => "fish",
            PredictionClass::Rabbit => "rabbit",
        }
    }
}

impl fmt::Display for PredictionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single synthesized prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub class: PredictionClass,

    /// Confidence score, rounded to two decimal places
    pub confidence: f64,

    /// Character count of the input that produced this prediction
    pub input_length: usize,
}

impl PredictionResult {
    /// Human-readable summary, e.g. `Predicted class: dog with 87.0% confidence`
    pub fn describe(&self) -> String {
        format!(
            "Predicted class: {} with {:.1}% confidence",
            self.class,
            self.confidence * 100.0
        )
    }
}

/// Body returned by `POST /predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: PredictionResult,
    pub message: String,
}

impl From<PredictionResult> for PredictionResponse {
    fn from(prediction: PredictionResult) -> Self {
        let message = prediction.describe();
        Self {
            prediction,
            message,
        }
    }
}
