//! Services module
//!
//! Contains the mock classifier and the Gateway's client for the Predictor.

pub mod classifier;
pub mod predictor_client;

pub use classifier::SimpleClassifier;
pub use predictor_client::{PredictionBackend, PredictorClient, PredictorClientError};
