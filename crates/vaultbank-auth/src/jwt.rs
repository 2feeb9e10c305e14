//! JWT Token Service
//!
//! HS256 bearer tokens carrying the account id. Tokens are stateless;
//! a session is exactly one valid, unexpired token.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};

/// Claims carried inside every bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id of the token holder
    pub sub: Uuid,
    /// Issued-at, unix seconds
    pub iat: i64,
    /// Not-before, unix seconds
    pub nbf: i64,
    /// Expiry, unix seconds
    pub exp: i64,
}

/// A freshly signed token together with its expiry instant
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Expiry as unix seconds, matching the `exp` claim
    pub expires_at: i64,
}

/// JWT service for token issuance and verification
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: std::time::Duration,
}

impl JwtService {
    /// Create a new JWT service
    pub fn new(config: &JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            ttl: config.token_ttl,
        }
    }

    /// Sign a new token for an account
    pub fn issue(&self, user_id: Uuid) -> AuthResult<IssuedToken> {
        let now = Utc::now();
        let expires_at = now
            + Duration::from_std(self.ttl).map_err(|_| AuthError::TokenSigning)?;

        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenSigning)?;

        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
        })
    }

    /// Verify a token's signature and temporal claims, returning its claims
    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.validate_nbf = true;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-for-jwt-tokens-min-32-bytes!".to_string(),
            token_ttl: std::time::Duration::from_secs(3600),
        }
    }

    fn encode_raw(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let service = JwtService::new(&test_config());
        let user_id = Uuid::new_v4();

        let issued = service.issue(user_id).unwrap();
        assert!(!issued.token.is_empty());

        let claims = service.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.exp, issued.expires_at);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::new(&test_config());
        let now = Utc::now().timestamp();

        // Expired well past the default leeway.
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: now - 7200,
            nbf: now - 7200,
            exp: now - 3600,
        };
        let token = encode_raw(&claims, &test_config().secret);

        let result = service.verify(&token);
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_not_yet_valid_token_rejected() {
        let service = JwtService::new(&test_config());
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: now,
            nbf: now + 3600,
            exp: now + 7200,
        };
        let token = encode_raw(&claims, &test_config().secret);

        let result = service.verify(&token);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service = JwtService::new(&test_config());
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: now,
            nbf: now,
            exp: now + 3600,
        };
        let token = encode_raw(&claims, "a-completely-different-signing-secret!!!");

        let result = service.verify(&token);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = JwtService::new(&test_config());

        let result = service.verify("not-a-jwt");
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
