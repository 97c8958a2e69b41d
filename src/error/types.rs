//! API error types

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The request body is missing a field, has the wrong shape, or fails validation
    #[error("Validation error: {message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    /// A downstream dependency could not be reached or answered with an error
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(field: Option<&str>, message: impl Into<String>) -> Self {
        ApiError::Validation {
            field: field.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        let field = match rejection {
            JsonRejection::JsonDataError(_) => {
                missing_field(&message).or_else(|| error_path(&message))
            }
            _ => None,
        };
        ApiError::Validation { field, message }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        // Report the first offending field; the message lists all of them
        let field = errors.field_errors().keys().min().map(|f| f.to_string());
        ApiError::Validation {
            field,
            message: errors.to_string(),
        }
    }
}

/// Pull the field name out of serde's "missing field `name`" message
fn missing_field(message: &str) -> Option<String> {
    let rest = message.split("missing field `").nth(1)?;
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}

/// Pull the leading `<path>:` out of a data error, e.g. `data: invalid type: null`
fn error_path(message: &str) -> Option<String> {
    let detail = message
        .split_once("target type: ")
        .map_or(message, |(_, rest)| rest);
    let (path, _) = detail.split_once(": ")?;
    let valid = !path.is_empty()
        && path != "."
        && !path.contains(|c: char| c.is_whitespace() || c == '`');
    valid.then(|| path.to_string())
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (error_type, message, field) = match self {
            ApiError::Validation { field, message } => ("validation_error", message, field),
            ApiError::ServiceUnavailable(msg) => ("service_unavailable", msg, None),
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "Unhandled internal error");
                ("api_error", "Internal server error".to_string(), None)
            }
        };

        let body = Json(ErrorResponse {
            type_: "error".to_string(),
            error: ErrorDetail {
                type_: error_type.to_string(),
                message,
                field,
            },
        });

        (status, body).into_response()
    }
}

/// Error body shared by both services
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub type_: String,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub type_: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_extraction() {
        let msg = "Failed to deserialize the JSON body into the target type: missing field `data` at line 1 column 26";
        assert_eq!(missing_field(msg), Some("data".to_string()));
        assert_eq!(missing_field("expected value at line 1 column 1"), None);
    }

    #[test]
    fn test_error_path_extraction() {
        let msg = "Failed to deserialize the JSON body into the target type: data: invalid type: null, expected a string at line 1 column 12";
        assert_eq!(error_path(msg), Some("data".to_string()));

        let nested = "Failed to deserialize the JSON body into the target type: model_prediction.prediction: missing field `class`";
        assert_eq!(error_path(nested), Some("model_prediction.prediction".to_string()));

        let top_level = "Failed to deserialize the JSON body into the target type: invalid type: integer `1`, expected struct ClientRequest at line 1 column 1";
        assert_eq!(error_path(top_level), None);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::validation(Some("data"), "missing").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::ServiceUnavailable("down".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = ApiError::Internal(anyhow::anyhow!("secret stack detail")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error.type_, "api_error");
        assert!(!body.error.message.contains("secret"));
    }

    #[tokio::test]
    async fn test_validation_error_body() {
        let response = ApiError::validation(Some("data"), "missing field `data`").into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.type_, "error");
        assert_eq!(body.error.type_, "validation_error");
        assert_eq!(body.error.field.as_deref(), Some("data"));
    }
}
