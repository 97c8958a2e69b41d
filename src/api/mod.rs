//! API endpoint handlers module
//!
//! Contains the HTTP endpoint handlers of both services.

pub mod extract;
pub mod gateway;
pub mod health;
pub mod predictor;

pub use extract::ValidatedJson;
