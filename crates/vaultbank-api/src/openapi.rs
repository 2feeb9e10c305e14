//! OpenAPI Documentation
//!
//! Auto-generated OpenAPI 3.0 specification for the VaultBank API.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::dto;
use crate::error::{ErrorResponse, FieldError};
use crate::handlers;

/// VaultBank API Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "VaultBank API",
        description = "REST API for VaultBank accounts and wallets. Password registration, bearer-token sessions, and per-user wallet management.",
        version = "1.0.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8000", description = "Local Development")
    ),
    paths(
        // Health
        handlers::health::health_check,
        handlers::health::welcome,
        // Auth
        handlers::auth::register,
        handlers::auth::login,
        // User
        handlers::user::me,
        // Wallet
        handlers::wallet::list_wallets,
        handlers::wallet::create_wallet,
        handlers::wallet::show_wallet,
        handlers::wallet::update_wallet,
        handlers::wallet::delete_wallet,
    ),
    components(
        schemas(
            // Common
            ErrorResponse,
            FieldError,
            // Auth
            dto::RegisterRequest,
            dto::LoginRequest,
            dto::TokenData,
            // User
            dto::UserResponse,
            dto::UserData,
            // Wallet
            dto::CreateWalletRequest,
            dto::UpdateWalletRequest,
            dto::WalletResponse,
            dto::WalletData,
            dto::WalletListData,
        )
    ),
    tags(
        (name = "Health", description = "Service health and status"),
        (name = "General", description = "General endpoints"),
        (name = "Authentication", description = "User registration and login"),
        (name = "Users", description = "Authenticated user profile"),
        (name = "Wallet", description = "Wallet lifecycle management")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security scheme modifier
pub struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = &mut openapi.components {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generation() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "VaultBank API");
        assert_eq!(spec.info.version, "1.0.0");
    }

    #[test]
    fn test_openapi_lists_wallet_paths() {
        let spec = ApiDoc::openapi();
        assert!(spec.paths.paths.contains_key("/api/v1/wallet"));
        assert!(spec.paths.paths.contains_key("/api/v1/wallet/{address}"));
    }
}
