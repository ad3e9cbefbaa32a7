//! Repository module
//!
//! CRUD operations over the SQLite tables. Repositories take a cloned
//! pool and return [`RepoResult`]; mapping to API errors happens in the
//! service layer.

pub mod booking;

pub use booking::{BookingFilter, BookingRepository};

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return RepoError::Conflict(db_err.to_string());
        }
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for shared::AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(what) => shared::AppError::not_found(what),
            RepoError::Conflict(msg) => shared::AppError::conflict(msg),
            RepoError::Database(msg) => shared::AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
