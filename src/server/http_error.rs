//! HTTP error responses.
//!
//! Provider failures are redacted: the client sees a stable code and a
//! generic message, while the full error is logged by the agent.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, CompletionError, ToolError};

/// JSON error body returned by every endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct HttpError {
    /// User-facing error message
    pub message: String,
    /// Machine-readable error code
    pub code: String,
    /// Optional detail, only for caller-side errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl HttpError {
    /// Create a new HTTP error
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Create a new HTTP error with details
    pub fn with_details(
        message: impl Into<String>,
        code: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: Some(details.into()),
        }
    }

    /// Status code for this error's code
    pub fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<AppError> for HttpError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Tool(ToolError::Validation { field, reason }) => {
                HttpError::with_details(reason, "VALIDATION_ERROR", field)
            }
            AppError::Completion(e) => e.into(),
            AppError::Config { .. } | AppError::Internal { .. } => {
                HttpError::new("Internal server error", "INTERNAL_ERROR")
            }
        }
    }
}

impl From<CompletionError> for HttpError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::Unauthenticated { .. } => HttpError::new(
                "AI provider rejected the configured credentials",
                "PROVIDER_UNAUTHENTICATED",
            ),
            CompletionError::SchemaViolation { .. } => HttpError::new(
                "AI response did not match the expected format",
                "SCHEMA_VIOLATION",
            ),
            CompletionError::ProviderUnavailable { .. }
            | CompletionError::Timeout { .. }
            | CompletionError::Http(_) => {
                HttpError::new("AI provider is unavailable", "PROVIDER_ERROR")
            }
            CompletionError::EmptyPrompt => {
                HttpError::new("Internal server error", "INTERNAL_ERROR")
            }
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        HttpError::with_details("Invalid request body", "VALIDATION_ERROR", rejection.body_text())
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        HttpError::with_details("Invalid query string", "VALIDATION_ERROR", rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err: HttpError =
            AppError::from(ToolError::validation("messages", "Messages cannot be empty")).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Messages cannot be empty");
        assert_eq!(err.details.as_deref(), Some("messages"));
    }

    #[test]
    fn test_provider_errors_are_redacted() {
        let err: HttpError = AppError::from(CompletionError::ProviderUnavailable {
            message: "HTTP 502 from https://internal.example".to_string(),
        })
        .into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code, "PROVIDER_ERROR");
        assert!(!err.message.contains("internal.example"));
        assert!(err.details.is_none());
    }

    #[test]
    fn test_schema_violation_code() {
        let err: HttpError = CompletionError::SchemaViolation {
            message: "bad".to_string(),
            attempts: 3,
        }
        .into();
        assert_eq!(err.code, "SCHEMA_VIOLATION");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unauthenticated_code() {
        let err: HttpError = CompletionError::Unauthenticated {
            message: "HTTP 401".to_string(),
        }
        .into();
        assert_eq!(err.code, "PROVIDER_UNAUTHENTICATED");
    }

    #[test]
    fn test_not_found_status() {
        assert_eq!(HttpError::new("x", "NOT_FOUND").status(), StatusCode::NOT_FOUND);
    }
}
