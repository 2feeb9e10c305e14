//! API Routes
//!
//! Route definitions for all API endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::middleware::SessionLayer;
use crate::state::AppState;

/// Create API v1 routes
pub fn api_v1_routes(state: &AppState) -> Router<Arc<AppState>> {
    let session = SessionLayer::new(state.auth.jwt.clone(), state.users.clone());

    Router::new()
        // Public auth routes
        .nest("/auth", auth_routes())
        // Everything below requires a resolved session
        .nest("/user", user_routes(session.clone()))
        .nest("/wallet", wallet_routes(session))
}

/// Authentication routes
fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
}

/// User profile routes
fn user_routes(session: SessionLayer) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::user::me))
        .route_layer(session)
}

/// Wallet routes
fn wallet_routes(session: SessionLayer) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(handlers::wallet::list_wallets).post(handlers::wallet::create_wallet),
        )
        .route(
            "/:address",
            get(handlers::wallet::show_wallet)
                .patch(handlers::wallet::update_wallet)
                .delete(handlers::wallet::delete_wallet),
        )
        .route_layer(session)
}

/// Create Swagger UI routes
pub fn swagger_routes() -> Router<Arc<AppState>> {
    use crate::openapi::ApiDoc;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
