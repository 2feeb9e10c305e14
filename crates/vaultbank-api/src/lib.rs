//! VaultBank REST API
//!
//! HTTP layer for VaultBank accounts and wallets.
//!
//! # API Structure
//!
//! ```text
//! /api/v1/
//! ├── /auth/register - Create an account
//! ├── /auth/login    - Obtain a bearer token
//! ├── /user          - Authenticated user profile
//! └── /wallet        - Wallet lifecycle (list, create, show, update, delete)
//! ```
//!
//! Protected routes resolve the bearer token once, in the session
//! middleware; handlers receive the resolved user via an extractor and
//! never touch tokens themselves.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::http::HeaderName;
use axum::Router;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

pub use error::{ApiError, ApiResult};
pub use state::{AppState, WalletPolicy};

/// API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Enable CORS for browser clients
    pub enable_cors: bool,
    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,
    /// Enable request compression
    pub enable_compression: bool,
    /// Enable request tracing
    pub enable_tracing: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
            enable_compression: true,
            enable_tracing: true,
        }
    }
}

/// Create the main API router with all middleware
pub fn create_router(state: Arc<AppState>, config: ApiConfig) -> Router {
    let mut router = Router::new()
        // API v1 routes
        .nest("/api/v1", routes::api_v1_routes(&state))
        // Welcome banner at root
        .route("/", axum::routing::get(handlers::health::welcome))
        // Health check
        .route("/health", axum::routing::get(handlers::health::health_check))
        // OpenAPI documentation
        .merge(routes::swagger_routes())
        // Everything else is a uniform JSON 404
        .fallback(handlers::health::not_found)
        // Shared state
        .with_state(state);

    // Add request ID middleware
    let x_request_id = HeaderName::from_static("x-request-id");
    router = router
        .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
        .layer(PropagateRequestIdLayer::new(x_request_id));

    // Add tracing
    if config.enable_tracing {
        router = router.layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");

                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        );
    }

    // Add compression
    if config.enable_compression {
        router = router.layer(CompressionLayer::new());
    }

    // Add CORS
    if config.enable_cors {
        let cors = if config.cors_origins.contains(&"*".to_string()) {
            CorsLayer::permissive()
        } else {
            CorsLayer::new()
                .allow_origin(
                    config
                        .cors_origins
                        .iter()
                        .filter_map(|o| o.parse().ok())
                        .collect::<Vec<_>>(),
                )
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PATCH,
                    axum::http::Method::DELETE,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers(Any)
        };
        router = router.layer(cors);
    }

    router
}

/// Create a minimal router for testing
pub fn create_test_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_v1_routes(&state))
        .route("/", axum::routing::get(handlers::health::welcome))
        .route("/health", axum::routing::get(handlers::health::health_check))
        .fallback(handlers::health::not_found)
        .with_state(state)
}
