//! VaultBank Authentication Layer
//!
//! Authentication primitives for the VaultBank platform:
//!
//! - **JWT Sessions**: Stateless HS256 bearer tokens (a session is one
//!   valid, unexpired token)
//! - **Password Security**: Argon2id hashing (OWASP recommended)
//!
//! This crate is deliberately free of HTTP and database concerns; the API
//! layer decides how auth failures map onto responses.

pub mod config;
pub mod error;
pub mod jwt;
pub mod password;

pub use config::{AuthConfig, JwtConfig, PasswordConfig};
pub use error::{AuthError, AuthResult};
pub use jwt::{Claims, IssuedToken, JwtService};
pub use password::PasswordService;

/// Main authentication service combining token and password handling
#[derive(Clone)]
pub struct AuthService {
    pub jwt: JwtService,
    pub password: PasswordService,
}

impl AuthService {
    /// Create a new auth service with all components
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            jwt: JwtService::new(&config.jwt),
            password: PasswordService::new(config.password.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_service_creation() {
        let mut config = AuthConfig::default();
        config.jwt.secret = "test-secret-key-for-jwt-tokens-min-32-bytes!".to_string();

        let service = AuthService::new(&config);
        let issued = service.jwt.issue(uuid::Uuid::new_v4()).unwrap();
        assert!(service.jwt.verify(&issued.token).is_ok());
    }
}
