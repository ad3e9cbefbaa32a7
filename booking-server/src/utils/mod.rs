//! Utility module - logging, validation and time helpers

pub mod logger;
pub mod time;
pub mod validation;

// Re-export error types from shared
pub use shared::{AppError, AppResult};
