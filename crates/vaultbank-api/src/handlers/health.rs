//! Health Check Handlers
//!
//! Endpoints for service health monitoring, plus the root welcome
//! route and the catch-all fallback.

use axum::{http::StatusCode, Json};
use serde::Serialize;

use crate::error::ErrorResponse;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Timestamp
    pub timestamp: i64,
}

/// Health check endpoint
///
/// Returns 200 if the service is running.
/// This is a lightweight check that doesn't verify dependencies.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp,
    })
}

/// Root welcome endpoint
#[utoipa::path(
    get,
    path = "/",
    tag = "General",
    responses(
        (status = 200, description = "Service banner")
    )
)]
pub async fn welcome() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "message": "Welcome to the VaultBank API",
        "documentation": {
            "name": "VaultBank API",
            "url": "/swagger-ui"
        }
    }))
}

/// Fallback for unmatched routes
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            success: false,
            message: Some("Endpoint not found".to_string()),
            errors: None,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_package_version() {
        let Json(response) = health_check().await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
    }
}
