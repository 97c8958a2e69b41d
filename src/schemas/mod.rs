//! Schema module
//!
//! Request and response bodies for both services. Requests are validated at
//! the boundary before any handler logic runs.

pub mod gateway;
pub mod prediction;

pub use gateway::{ClientRequest, GatewayResponse, ModelPrediction, LOGGED_STATUS};
pub use prediction::{PredictionClass, PredictionQuery, PredictionResponse, PredictionResult};
