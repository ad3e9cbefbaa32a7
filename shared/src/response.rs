//! API response types
//!
//! Error envelope returned by booking-server endpoints. Success bodies
//! are the plain resource JSON; only failures carry the envelope.

use serde::{Deserialize, Serialize};

/// Error response envelope.
///
/// ```json
/// {
///     "code": "E1002",
///     "message": "Booking not found",
///     "data": { "field": "..." }
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Stable error code (see [`crate::ErrorCode`])
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Optional detail payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create an error response.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            data: None,
        }
    }

    /// Attach data to an existing response (used for error detail payloads).
    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }
}
