//! Custom Axum Extractors
//!
//! Request extractors for the authenticated principal and validated JSON
//! bodies.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::ApiError;
use vaultbank_db::DbUser;

// =============================================================================
// Authenticated User Extractor
// =============================================================================

/// The resolved account behind a request's bearer token
///
/// Inserted into request extensions by the session middleware; the password
/// hash never leaves the storage layer boundary.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbUser> for AuthenticatedUser {
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

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the session middleware; absent on routes it never covered.
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                ApiError::Unauthenticated(
                    "Failed when parsing auth token from request".to_string(),
                )
                .into_response()
            })
    }
}

// =============================================================================
// Validated JSON Extractor
// =============================================================================

/// JSON extractor with validation
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> axum::extract::FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + validator::Validate,
{
    type Rejection = Response;

    async fn from_request(
        req: axum::http::Request<axum::body::Body>,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()).into_response())?;

        value
            .validate()
            .map_err(|e| ApiError::from(e).into_response())?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticated_user_from_db() {
        let now = Utc::now();
        let db_user = DbUser {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            verified_at: None,
            created_at: now,
            updated_at: now,
        };

        let user = AuthenticatedUser::from(db_user.clone());
        assert_eq!(user.id, db_user.id);
        assert_eq!(user.email, "ada@example.com");
    }
}
