//! Authentication configuration
//!
//! Centralized configuration for token issuance and password hashing with
//! secure defaults following OWASP recommendations.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Password hashing configuration
    pub password: PasswordConfig,
}

/// JWT token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens (should be at least 256 bits)
    pub secret: String,
    /// Bearer token lifetime
    #[serde(with = "humantime_serde")]
    pub token_ttl: Duration,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(), // Must be set in production
            token_ttl: Duration::from_secs(60 * 60), // 1 hour
        }
    }
}

/// Password hashing configuration (Argon2id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordConfig {
    /// Memory cost in KiB (OWASP recommends 19456 KiB = 19 MiB minimum)
    pub memory_cost: u32,
    /// Time cost (iterations) - OWASP recommends 2 minimum
    pub time_cost: u32,
    /// Parallelism factor
    pub parallelism: u32,
    /// Output hash length in bytes
    pub hash_length: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            // OWASP recommended values for Argon2id
            memory_cost: 19456, // 19 MiB
            time_cost: 2,
            parallelism: 1,
            hash_length: 32,
        }
    }
}

impl AuthConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(secret) = std::env::var("JWT_SECRET") {
            config.jwt.secret = secret;
        }
        if let Ok(ttl) = std::env::var("JWT_TOKEN_TTL_SECS") {
            if let Ok(secs) = ttl.parse::<u64>() {
                config.jwt.token_ttl = Duration::from_secs(secs);
            }
        }

        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.jwt.secret.is_empty() {
            errors.push("JWT secret must be set".to_string());
        } else if self.jwt.secret.len() < 32 {
            errors.push("JWT secret should be at least 256 bits (32 bytes)".to_string());
        }

        if self.jwt.token_ttl.is_zero() {
            errors.push("JWT token lifetime must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
