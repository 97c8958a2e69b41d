//! Mock classifier used by the Predictor service
//!
//! This is NOT a machine-learning model. It picks a label uniformly at random
//! from a fixed set and draws a confidence score uniformly from a configured
//! range. Results are intentionally non-reproducible between calls; the only
//! stable property is `input_length`, which always equals the number of
//! characters in the input.

use rand::prelude::*;

use crate::config::ModelConfig;
use crate::schemas::{PredictionClass, PredictionResult};

/// Immutable classifier built once at startup and shared across requests
#[derive(Debug, Clone)]
pub struct SimpleClassifier {
    classes: Vec<PredictionClass>,
    min_confidence: f64,
    max_confidence: f64,
}

impl SimpleClassifier {
    pub fn new(config: &ModelConfig) -> Self {
        let classifier = Self {
            classes: PredictionClass::ALL.to_vec(),
            min_confidence: config.min_confidence,
            max_confidence: config.max_confidence,
        };

        tracing::info!(
            classes = classifier.classes.len(),
            min_confidence = classifier.min_confidence,
            max_confidence = classifier.max_confidence,
            "Mock classifier initialized"
        );

        classifier
    }

    pub fn classes(&self) -> &[PredictionClass] {
        &self.classes
    }

    pub fn confidence_range(&self) -> (f64, f64) {
        (self.min_confidence, self.max_confidence)
    }

    /// Predict using the thread-local RNG
    pub fn predict(&self, input: &str) -> PredictionResult {
        self.predict_with(input, &mut thread_rng())
    }

    /// Predict using the supplied RNG
    pub fn predict_with<R: Rng + ?Sized>(&self, input: &str, rng: &mut R) -> PredictionResult {
        let class = self.classes[rng.gen_range(0..self.classes.len())];
        let raw = rng.gen_range(self.min_confidence..=self.max_confidence);

        PredictionResult {
            class,
            confidence: self.round_confidence(raw),
            input_length: input.chars().count(),
        }
    }

    /// Round to two decimals without leaving the configured range
    fn round_confidence(&self, raw: f64) -> f64 {
        let rounded = (raw * 100.0).round() / 100.0;
        rounded.clamp(self.min_confidence, self.max_confidence)
    }
}

impl Default for SimpleClassifier {
    fn default() -> Self {
        Self::new(&ModelConfig::default())
    }
}
