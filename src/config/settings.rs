//! Application settings and configuration
//!
//! Both services load their settings from environment variables with
//! per-service defaults. CLI flags are applied on top by the binaries.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::time::Duration;

/// Application environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[value(alias = "dev")]
    Development,
    #[value(alias = "stage")]
    Staging,
    #[value(alias = "prod")]
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => anyhow::bail!("Invalid environment: {}. Expected: development, staging, or production", s),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            _ => anyhow::bail!("Invalid log format: {}. Expected: json or pretty", s),
        }
    }
}

/// Which of the two services a process is running as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Gateway,
    Predictor,
}

impl ServiceKind {
    /// Default value for `APP_NAME`
    pub fn default_app_name(self) -> &'static str {
        match self {
            ServiceKind::Gateway => "prediction-gateway",
            ServiceKind::Predictor => "prediction-service",
        }
    }

    /// Human-readable title reported by the root endpoint
    pub fn title(self) -> &'static str {
        match self {
            ServiceKind::Gateway => "Gateway - Input Logger",
            ServiceKind::Predictor => "Predictor - ML Prediction",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            ServiceKind::Gateway => 8000,
            ServiceKind::Predictor => 8001,
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceKind::Gateway => write!(f, "gateway"),
            ServiceKind::Predictor => write!(f, "predictor"),
        }
    }
}

/// Gateway → Predictor connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictorConfig {
    /// Base URL of the Predictor service, without a trailing path
    pub url: String,
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
}

impl PredictorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8001".to_string(),
            timeout_ms: 3000,
            connect_timeout_ms: 1000,
        }
    }
}

/// Mock classifier settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    pub min_confidence: f64,
    pub max_confidence: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.70,
            max_confidence: 0.99,
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    // App settings
    pub service: ServiceKind,
    pub app_name: String,
    pub app_version: String,
    pub environment: Environment,
    pub log_level: String,
    pub log_format: LogFormat,

    // Server settings
    pub host: String,
    pub port: u16,

    // Gateway only
    pub predictor: PredictorConfig,

    // Predictor only
    pub model: ModelConfig,
}

impl Settings {
    /// Load settings for `service` from environment variables with defaults
    pub fn load(service: ServiceKind) -> Result<Self> {
        // Load .env file if it exists (ignored in production typically)
        dotenvy::dotenv().ok();

        Self::from_lookup(service, |key| env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source
    ///
    /// Only the section belonging to `service` is read; the other keeps its
    /// defaults, so a bad `PREDICTOR_*` value never stops a Predictor.
    pub fn from_lookup<F>(service: ServiceKind, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let defaults = Self::for_service(service);

        let predictor = match service {
            ServiceKind::Gateway => PredictorConfig {
                url: var("PREDICTOR_URL", &defaults.predictor.url),
                timeout_ms: var("PREDICTOR_TIMEOUT_MS", "3000")
                    .parse()
                    .context("Invalid PREDICTOR_TIMEOUT_MS value")?,
                connect_timeout_ms: var("PREDICTOR_CONNECT_TIMEOUT_MS", "1000")
                    .parse()
                    .context("Invalid PREDICTOR_CONNECT_TIMEOUT_MS value")?,
            },
            ServiceKind::Predictor => defaults.predictor,
        };

        let model = match service {
            ServiceKind::Predictor => ModelConfig {
                min_confidence: var("MODEL_MIN_CONFIDENCE", "0.70")
                    .parse()
                    .context("Invalid MODEL_MIN_CONFIDENCE value")?,
                max_confidence: var("MODEL_MAX_CONFIDENCE", "0.99")
                    .parse()
                    .context("Invalid MODEL_MAX_CONFIDENCE value")?,
            },
            ServiceKind::Gateway => defaults.model,
        };

        let settings = Self {
            service,
            app_name: var("APP_NAME", service.default_app_name()),
            app_version: defaults.app_version,
            environment: var("ENVIRONMENT", "development")
                .parse::<Environment>()
                .context("Invalid ENVIRONMENT value")?,
            log_level: var("LOG_LEVEL", "info"),
            log_format: var("LOG_FORMAT", "json")
                .parse::<LogFormat>()
                .context("Invalid LOG_FORMAT value")?,

            host: var("HOST", "0.0.0.0"),
            port: var("PORT", &service.default_port().to_string())
                .parse()
                .context("Invalid PORT value")?,

            predictor,
            model,
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Default settings for one service, without consulting the environment
    pub fn for_service(service: ServiceKind) -> Self {
        Self {
            service,
            app_name: service.default_app_name().to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: Environment::Development,
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            host: "0.0.0.0".to_string(),
            port: service.default_port(),
            predictor: PredictorConfig::default(),
            model: ModelConfig::default(),
        }
    }

    /// Validate settings
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("Port cannot be 0");
        }

        if self.service == ServiceKind::Gateway {
            let url = self.predictor.url.as_str();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                anyhow::bail!("PREDICTOR_URL must be an http(s) URL, got {}", url);
            }
            if self.predictor.timeout_ms == 0 {
                anyhow::bail!("Predictor timeout must be > 0");
            }
            if self.predictor.connect_timeout_ms == 0 {
                anyhow::bail!("Predictor connect timeout must be > 0");
            }
        }

        if self.service == ServiceKind::Predictor {
            let ModelConfig {
                min_confidence,
                max_confidence,
            } = self.model;
            if !(0.0..=1.0).contains(&min_confidence) || !(0.0..=1.0).contains(&max_confidence) {
                anyhow::bail!("Model confidence bounds must lie within [0, 1]");
            }
            if min_confidence > max_confidence {
                anyhow::bail!(
                    "MODEL_MIN_CONFIDENCE ({}) exceeds MODEL_MAX_CONFIDENCE ({})",
                    min_confidence,
                    max_confidence
                );
            }
        }

        Ok(())
    }

    /// Get the server address string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
