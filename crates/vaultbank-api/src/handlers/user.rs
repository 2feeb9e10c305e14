//! User Handlers

use axum::Json;

use crate::dto::{ApiResponse, UserData};
use crate::error::{ApiResult, ErrorResponse};
use crate::extractors::AuthenticatedUser;

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/v1/user",
    tag = "Users",
    security(
        ("bearer" = [])
    ),
    responses(
        (status = 200, description = "Authenticated user", body = UserData),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Token subject no longer exists", body = ErrorResponse)
    )
)]
pub async fn me(user: AuthenticatedUser) -> ApiResult<Json<ApiResponse<UserData>>> {
    Ok(Json(ApiResponse::ok(UserData { user: user.into() })))
}
