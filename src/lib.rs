//! Prediction gateway library
//!
//! Two small HTTP services built from one crate:
//!
//! - the **Gateway** logs client input and, on request, forwards it to the
//!   Predictor, composing the prediction into its own response or answering
//!   503 when the Predictor cannot be reached;
//! - the **Predictor** returns a mock classification. It is not a real
//!   model: the label and confidence are random and differ between calls.

// Public modules
pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod schemas;
pub mod server;
pub mod services;

// Re-export commonly used types
pub use config::{ServiceKind, Settings};
pub use error::ApiError;
pub use server::App;
