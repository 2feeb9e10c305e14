//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use vaultbank_db::DbUser;

use crate::extractors::AuthenticatedUser;

/// Public projection of a user, password hash excluded
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// User ID
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Email verification timestamp (null until verified)
    pub verified_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<DbUser> for UserResponse {
    fn from(user: DbUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            verified_at: user.verified_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<AuthenticatedUser> for UserResponse {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            verified_at: user.verified_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Payload wrapper for single-user endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserData {
    /// The user record
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_drops_password_hash() {
        let user = DbUser {
            id: Uuid::new_v4(),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            verified_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let response = UserResponse::from(user.clone());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["email"], "ada@example.com");
        assert!(json.get("password_hash").is_none());
        assert!(json["verified_at"].is_null());
    }
}
