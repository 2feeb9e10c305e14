//! Authentication error types
//!
//! Errors are designed to be informative for logging while staying safe
//! for external exposure.

use thiserror::Error;

/// Result type alias for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer token was supplied with the request
    #[error("Missing bearer token")]
    MissingToken,

    /// Token is invalid (malformed, wrong signature, not yet valid)
    #[error("Invalid token")]
    InvalidToken,

    /// Token has expired
    #[error("Token has expired")]
    TokenExpired,

    /// Token could not be signed
    #[error("Token signing failed")]
    TokenSigning,

    /// Password hashing failed
    #[error("Password hashing failed")]
    PasswordHashingFailed,

    /// Password hash verification failed (the hash itself was unusable,
    /// not merely a wrong password)
    #[error("Password verification failed")]
    PasswordVerificationFailed,
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::TokenExpired,
            _ => Self::InvalidToken,
        }
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(_: argon2::password_hash::Error) -> Self {
        Self::PasswordVerificationFailed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_error_mapping() {
        let expired = jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::ExpiredSignature,
        );
        assert!(matches!(AuthError::from(expired), AuthError::TokenExpired));

        let malformed =
            jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidToken);
        assert!(matches!(AuthError::from(malformed), AuthError::InvalidToken));
    }
}
