//! Client-side error types

use shared::ErrorCode;
use thiserror::Error;

/// Errors surfaced by the booking client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with its error envelope.
    #[error("API error {code}: {message}")]
    Api { code: ErrorCode, message: String },

    /// Network failure or timeout before a response arrived.
    #[error("Request failed: {0}")]
    Http(String),

    /// The response body did not match the expected shape.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// A flow method was called out of order.
    #[error("Invalid flow state: {0}")]
    Flow(String),
}

impl ClientError {
    /// The selected slot was taken between selection and confirm; the
    /// flow reacts by re-querying availability.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            ClientError::Api {
                code: ErrorCode::Conflict,
                ..
            }
        )
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Http(err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
