//! Authentication Handlers
//!
//! Registration and login endpoints. Session resolution for protected
//! routes lives in the session middleware, not here.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::dto::{ApiResponse, LoginRequest, RegisterRequest, TokenData, UserResponse};
use crate::error::{ApiError, ApiResult, ErrorResponse};
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = UserResponse),
        (status = 400, description = "Invalid payload or email already taken", body = ErrorResponse),
        (status = 502, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    // 1. Hash the password before anything reaches storage
    let password_hash = state.auth.password.hash_password(&request.password)?;

    // 2. Emails are stored lower-cased so the unique index is effectively case-insensitive
    let email = request.email.to_lowercase();

    // 3. Create the user, translating a duplicate-email violation
    let user = state
        .users
        .create(&request.name, &email, &password_hash)
        .await
        .map_err(|e| match e {
            vaultbank_db::DbError::Duplicate(_) => {
                ApiError::Conflict("User with that email already exists".to_string())
            }
            other => ApiError::from(other),
        })?;

    tracing::info!(
        user_id = %user.id,
        email = %user.email,
        "New user registered"
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user.into()))))
}

/// Authenticate and issue a session token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenData),
        (status = 400, description = "Invalid credentials", body = ErrorResponse),
        (status = 502, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<TokenData>>> {
    // 1. Look up by normalized email; a missing account reads the same as a bad password
    let user = state
        .users
        .find_by_email(&request.email.to_lowercase())
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    // 2. Verify the password against the stored hash
    let valid = state
        .auth
        .password
        .verify_password(&request.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::InvalidCredentials);
    }

    // 3. Issue the session token
    let issued = state.auth.jwt.issue(user.id)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(ApiResponse::ok(TokenData {
        token: issued.token,
        expires_in: issued.expires_at,
    })))
}
