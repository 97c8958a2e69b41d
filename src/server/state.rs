//! Application state containers
//!
//! Each service has its own state, passed to handlers via Axum's state
//! extraction. Both are cheaply cloneable and hold only immutable data.

use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::services::{PredictionBackend, PredictorClient, SimpleClassifier};

/// Shared state of the Gateway service
#[derive(Clone)]
pub struct GatewayState {
    pub settings: Arc<Settings>,

    /// Client for the Predictor service
    pub predictor: Arc<dyn PredictionBackend>,

    /// Application start time (for uptime calculation)
    pub start_time: Instant,
}

impl GatewayState {
    /// Create the Gateway state with an HTTP Predictor client
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        tracing::debug!(url = %settings.predictor.url, "Creating Predictor client");
        let client = PredictorClient::new(&settings.predictor)?;

        Ok(Self::with_backend(settings, Arc::new(client)))
    }

    /// Create the Gateway state around any prediction backend
    pub fn with_backend(settings: Settings, predictor: Arc<dyn PredictionBackend>) -> Self {
        Self {
            settings: Arc::new(settings),
            predictor,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Shared state of the Predictor service
#[derive(Clone)]
pub struct PredictorState {
    pub settings: Arc<Settings>,

    /// The mock model, built once at startup
    pub classifier: Arc<SimpleClassifier>,

    pub start_time: Instant,
}

impl PredictorState {
    pub fn new(settings: Settings) -> Self {
        let classifier = Arc::new(SimpleClassifier::new(&settings.model));

        Self {
            settings: Arc::new(settings),
            classifier,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// What the shared health endpoints need to know about a service
pub trait ServiceInfo: Clone + Send + Sync + 'static {
    fn settings(&self) -> &Settings;
    fn uptime_seconds(&self) -> u64;
}

impl ServiceInfo for GatewayState {
    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn uptime_seconds(&self) -> u64 {
        GatewayState::uptime_seconds(self)
    }
}

impl ServiceInfo for PredictorState {
    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn uptime_seconds(&self) -> u64 {
        PredictorState::uptime_seconds(self)
    }
}
