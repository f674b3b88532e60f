//! Input validation shared by the route handlers

use crate::error::ApiError;

/// Maximum allowed display name length
pub const MAX_NAME_LENGTH: usize = 64;
/// Maximum allowed email length
pub const MAX_EMAIL_LENGTH: usize = 254;
/// Maximum allowed password length (prevent DoS with very large passwords)
pub const MAX_PASSWORD_LENGTH: usize = 256;
/// Minimum allowed password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Treat absent and blank fields alike
///
/// Partial updates use this: an empty string means "leave unchanged".
pub fn provided(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

/// Require a non-blank field
pub fn required(field: Option<String>, name: &str) -> Result<String, ApiError> {
    provided(field).ok_or_else(|| ApiError::BadRequest(format!("{} is required", name)))
}

/// Validate display name length
pub fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::BadRequest("Name cannot be empty".to_string()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Name exceeds maximum length of {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

/// Validate email shape and length
pub fn validate_email(email: &str) -> Result<(), ApiError> {
    let email = email.trim();
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Email exceeds maximum length of {} characters",
            MAX_EMAIL_LENGTH
        )));
    }
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace) =>
        {
            Ok(())
        }
        _ => Err(ApiError::BadRequest("Please provide a valid email".to_string())),
    }
}

/// Validate password length
pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provided_treats_blank_as_absent() {
        assert_eq!(provided(None), None);
        assert_eq!(provided(Some(String::new())), None);
        assert_eq!(provided(Some("   ".to_string())), None);
        assert_eq!(provided(Some("x".to_string())), Some("x".to_string()));
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email(" a@x.com ").is_ok());
        assert!(validate_email("ax.com").is_err());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email("a@").is_err());
        assert!(validate_email("a b@x.com").is_err());
        assert!(validate_email(&format!("{}@x.com", "a".repeat(300))).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("pw123456").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"x".repeat(MAX_PASSWORD_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("A").is_ok());
        assert!(validate_name(" ").is_err());
        assert!(validate_name(&"n".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }
}
