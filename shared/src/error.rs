//! Unified error system for the booking engine
//!
//! Provides [`ErrorCode`] for classifying failures, [`AppError`] as the
//! rich error type carried through server handlers, and the HTTP mapping
//! used by the API layer.
//!
//! # Taxonomy
//!
//! | Code | HTTP | Meaning |
//! |------|------|---------|
//! | Validation | 400 | malformed/missing input, never sent to the provider |
//! | NotFound | 404 | booking id unknown |
//! | Conflict | 409 | slot no longer available (provider-confirmed) |
//! | Provider | 502 | provider unreachable, timed out, or unexpected status |
//! | Configuration | 500 | missing provider credentials |
//! | Database | 500 | local storage failure |
//! | Internal | 500 | anything else |

use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

use crate::response::ApiResponse;

/// Error classification for the booking engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    NotFound,
    Conflict,
    Provider,
    Configuration,
    Database,
    Internal,
}

impl ErrorCode {
    /// Stable wire identifier for this error code.
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Validation => "E1001",
            Self::NotFound => "E1002",
            Self::Conflict => "E1003",
            Self::Provider => "E2001",
            Self::Configuration => "E2002",
            Self::Database => "E9001",
            Self::Internal => "E9002",
        }
    }

    /// Parse a wire identifier back into an error code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "E1001" => Some(Self::Validation),
            "E1002" => Some(Self::NotFound),
            "E1003" => Some(Self::Conflict),
            "E2001" => Some(Self::Provider),
            "E2002" => Some(Self::Configuration),
            "E9001" => Some(Self::Database),
            "E9002" => Some(Self::Internal),
            _ => None,
        }
    }

    /// Default human-readable message.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::Validation => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::Conflict => "The selected time is no longer available",
            Self::Provider => "Scheduling provider unavailable",
            Self::Configuration => "Scheduling provider not configured",
            Self::Database => "Storage error",
            Self::Internal => "Internal error",
        }
    }

    /// HTTP status for this error code.
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Provider => StatusCode::BAD_GATEWAY,
            Self::Configuration | Self::Database | Self::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

/// Application error with a structured code and optional details.
///
/// Details carry field-level validation messages from the provider so the
/// staff surface can show them verbatim.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the code.
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.default_message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message.
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach a detail entry (field-level errors, provider context).
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::Validation, msg)
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{r} not found")).with_detail("resource", r)
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::Conflict, msg)
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::Provider, msg)
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::Configuration, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::Database, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::Internal, msg)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.http_status();
        let mut body = ApiResponse::<Value>::error(self.code.as_code(), self.message);
        if let Some(details) = self.details {
            body = body.with_data(Value::Object(
                details.into_iter().collect::<serde_json::Map<_, _>>(),
            ));
        }
        (status, axum::Json(body)).into_response()
    }
}

/// Result type used throughout handlers and services.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_round_trip() {
        for code in [
            ErrorCode::Validation,
            ErrorCode::NotFound,
            ErrorCode::Conflict,
            ErrorCode::Provider,
            ErrorCode::Configuration,
            ErrorCode::Database,
            ErrorCode::Internal,
        ] {
            assert_eq!(ErrorCode::from_code(code.as_code()), Some(code));
        }
        assert_eq!(ErrorCode::from_code("E0000"), None);
    }

    #[test]
    fn http_status_mapping() {
        assert_eq!(ErrorCode::Validation.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::Conflict.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::Provider.http_status(), StatusCode::BAD_GATEWAY);
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn details_are_preserved() {
        let err = AppError::validation("email is malformed").with_detail("field", "customer_email");
        let details = err.details.unwrap();
        assert_eq!(details["field"], "customer_email");
    }
}
