//! Shared types for the booking engine
//!
//! Common types used by both the booking server and the booking client:
//! data models, the unified error system, and API response structures.
//! This crate performs no I/O of its own.

pub mod error;
pub mod models;
pub mod response;

// Re-exports
pub use error::{AppError, AppResult, ErrorCode};
pub use response::ApiResponse;
pub use serde::{Deserialize, Serialize};
