//! Input validation helpers
//!
//! Centralized text length constants and validation functions for the
//! booking write path. Validation errors are local and never reach the
//! provider.

use shared::AppError;
use validator::ValidateEmail;

// ==================== Text length limits ====================

/// Customer and location names
pub const MAX_NAME_LEN: usize = 200;

/// Notes attached to a booking
pub const MAX_NOTE_LEN: usize = 500;

/// Phone numbers and other short identifiers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

// ==================== Validation helpers ====================

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty"))
            .with_detail("field", field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate an email address: non-empty, length-capped, RFC-shaped.
pub fn validate_email(value: &str, field: &str) -> Result<(), AppError> {
    validate_required_text(value, field, MAX_EMAIL_LEN)?;
    if !value.validate_email() {
        return Err(
            AppError::validation(format!("{field} is not a valid email address"))
                .with_detail("field", field),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_empty_and_oversized() {
        assert!(validate_required_text("Sarah", "customer_name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("  ", "customer_name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "customer_name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn email_format_is_checked() {
        assert!(validate_email("sarah@example.com", "customer_email").is_ok());
        assert!(validate_email("sarah@", "customer_email").is_err());
        assert!(validate_email("", "customer_email").is_err());
    }
}
