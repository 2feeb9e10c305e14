//! Authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// =============================================================================
// Registration
// =============================================================================

/// Registration request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 4, max = 225, message = "Name must be 4-225 characters"))]
    pub name: String,
    /// Email address
    #[validate(
        email(message = "Invalid email address"),
        length(max = 225, message = "Email must be at most 225 characters")
    )]
    pub email: String,
    /// Password
    #[validate(length(min = 8, max = 30, message = "Password must be 8-30 characters"))]
    pub password: String,
    /// Password confirmation, must match `password`
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirm: String,
}

// =============================================================================
// Login
// =============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Issued session token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenData {
    /// Signed bearer token
    pub token: String,
    /// Unix timestamp at which the token expires
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_register() -> RegisterRequest {
        RegisterRequest {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "enigma-machine".to_string(),
            password_confirm: "enigma-machine".to_string(),
        }
    }

    #[test]
    fn test_valid_register_request() {
        assert!(valid_register().validate().is_ok());
    }

    #[test]
    fn test_register_rejects_short_name() {
        let mut request = valid_register();
        request.name = "Ada".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_rejects_mismatched_confirmation() {
        let mut request = valid_register();
        request.password_confirm = "something-else".to_string();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password_confirm"));
    }

    #[test]
    fn test_register_rejects_long_password() {
        let mut request = valid_register();
        request.password = "x".repeat(31);
        request.password_confirm = request.password.clone();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_login_requires_well_formed_email() {
        let request = LoginRequest {
            email: "not-an-email".to_string(),
            password: "whatever".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
