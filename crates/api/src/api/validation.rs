// Input validation for the public API
//
// Size limits are last-resort guards against abuse and answer with a vague message.
// Format checks (email, password length, prices) say what is wrong.

use super::common::ErrorResponse;
use axum::http::StatusCode;
use axum::Json;

// =============================================================================
// Input Size Limits
// =============================================================================

/// Maximum size for names (first, last, product).
pub const MAX_NAME_BYTES: usize = 256;

/// Maximum size for an email address (RFC 5321 path limit).
pub const MAX_EMAIL_BYTES: usize = 254;

/// Maximum size for a password. Argon2 input above this is pointless work.
pub const MAX_PASSWORD_BYTES: usize = 1024;

/// Minimum password length.
pub const MIN_PASSWORD_CHARS: usize = 6;

/// Maximum size for free-text fields (descriptions, addresses, URLs).
pub const MAX_TEXT_BYTES: usize = 10 * 1024; // 10 KB

/// Maximum units of one product in a cart line or order line.
pub const MAX_LINE_QUANTITY: u32 = 10_000;

/// Maximum number of lines in a single order.
pub const MAX_ORDER_LINES: usize = 250;

/// Generic validation error message returned when a size limit is hit.
pub const VALIDATION_ERROR_MESSAGE: &str = "Input exceeds allowed limits";

// =============================================================================
// Validation Functions
// =============================================================================

#[derive(Debug)]
pub struct ValidationError(pub String);

impl ValidationError {
    fn limits() -> Self {
        Self(VALIDATION_ERROR_MESSAGE.to_string())
    }

    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<ValidationError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: ValidationError) -> Self {
        (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(err.0)))
    }
}

/// Required, non-blank, bounded name.
pub fn validate_name(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(format!("{} is required", field)));
    }
    if value.len() > MAX_NAME_BYTES {
        tracing::warn!(field, bytes = value.len(), max = MAX_NAME_BYTES, "Name exceeds limit");
        return Err(ValidationError::limits());
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.len() > MAX_EMAIL_BYTES {
        tracing::warn!(bytes = email.len(), max = MAX_EMAIL_BYTES, "Email exceeds limit");
        return Err(ValidationError::limits());
    }
    let valid = match email.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(ValidationError::new("Invalid email address"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        tracing::warn!(bytes = password.len(), max = MAX_PASSWORD_BYTES, "Password exceeds limit");
        return Err(ValidationError::limits());
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ValidationError::new(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_CHARS
        )));
    }
    Ok(())
}

/// Optional free-text field.
pub fn validate_text(value: Option<&str>) -> Result<(), ValidationError> {
    if let Some(value) = value {
        if value.len() > MAX_TEXT_BYTES {
            tracing::warn!(bytes = value.len(), max = MAX_TEXT_BYTES, "Text field exceeds limit");
            return Err(ValidationError::limits());
        }
    }
    Ok(())
}

/// Finite and not negative.
pub fn validate_price(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::new(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    Ok(())
}

pub fn validate_quantity(quantity: u32) -> Result<(), ValidationError> {
    if quantity == 0 {
        return Err(ValidationError::new("Quantity must be at least 1"));
    }
    if quantity > MAX_LINE_QUANTITY {
        tracing::warn!(quantity, max = MAX_LINE_QUANTITY, "Quantity exceeds limit");
        return Err(ValidationError::limits());
    }
    Ok(())
}

pub fn validate_order_lines(count: usize) -> Result<(), ValidationError> {
    if count > MAX_ORDER_LINES {
        tracing::warn!(count, max = MAX_ORDER_LINES, "Order line count exceeds limit");
        return Err(ValidationError::limits());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("firstName", "John").is_ok());
        let err = validate_name("firstName", "   ").unwrap_err();
        assert_eq!(err.0, "firstName is required");
        let err = validate_name("firstName", &"a".repeat(MAX_NAME_BYTES + 1)).unwrap_err();
        assert_eq!(err.0, VALIDATION_ERROR_MESSAGE);
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("john@example.com").is_ok());
        assert!(validate_email("john").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("john@").is_err());
        assert!(validate_email("jo hn@example.com").is_err());
        assert!(validate_email("a@b@c").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"p".repeat(MAX_PASSWORD_BYTES + 1)).is_err());
    }

    #[test]
    fn test_validate_numbers() {
        assert!(validate_price("sellingPrice", 0.0).is_ok());
        assert!(validate_price("sellingPrice", -1.0).is_err());
        assert!(validate_price("sellingPrice", f64::NAN).is_err());

        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(MAX_LINE_QUANTITY + 1).is_err());

        assert!(validate_order_lines(MAX_ORDER_LINES).is_ok());
        assert!(validate_order_lines(MAX_ORDER_LINES + 1).is_err());
    }

    #[test]
    fn test_validation_error_conversion() {
        let (status, Json(body)): (StatusCode, Json<ErrorResponse>) =
            ValidationError::new("Invalid email address").into();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Invalid email address");
    }
}
