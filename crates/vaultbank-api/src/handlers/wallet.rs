//! Wallet Handlers
//!
//! Wallet lifecycle endpoints, all scoped to the authenticated user.
//! Addresses are allocated by inserting directly and retrying on a
//! uniqueness violation, so the store's constraint is the arbiter even
//! when two requests race.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rand::{rngs::OsRng, RngCore};
use std::sync::Arc;

use crate::dto::{
    ApiResponse, CreateWalletRequest, UpdateWalletRequest, UserResponse, WalletData,
    WalletListData, WalletResponse,
};
use crate::error::{ApiError, ApiResult, ErrorResponse};
use crate::extractors::{AuthenticatedUser, ValidatedJson};
use crate::state::AppState;

/// Upper bound on address allocation retries before giving up
const ADDRESS_ALLOC_ATTEMPTS: usize = 5;

/// Number of random bytes behind each wallet address (40 hex characters)
const ADDRESS_BYTE_LENGTH: usize = 20;

/// List the caller's wallets
#[utoipa::path(
    get,
    path = "/api/v1/wallet",
    tag = "Wallet",
    security(
        ("bearer" = [])
    ),
    responses(
        (status = 200, description = "Wallets owned by the caller", body = WalletListData),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 502, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_wallets(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> ApiResult<Json<ApiResponse<WalletListData>>> {
    let records = state.wallets.list_by_user(user.id).await?;

    let owner: UserResponse = user.into();
    let wallets = records
        .into_iter()
        .map(|w| WalletResponse::from_record(w, owner.clone()))
        .collect();

    Ok(Json(ApiResponse::ok(WalletListData { wallets })))
}

/// Get one wallet by address
#[utoipa::path(
    get,
    path = "/api/v1/wallet/{address}",
    tag = "Wallet",
    security(
        ("bearer" = [])
    ),
    params(
        ("address" = String, Path, description = "Wallet address")
    ),
    responses(
        (status = 200, description = "Wallet details", body = WalletData),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such wallet for this user", body = ErrorResponse)
    )
)]
pub async fn show_wallet(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(address): Path<String>,
) -> ApiResult<Json<ApiResponse<WalletData>>> {
    let wallet = resolve_wallet(&state, &user, &address).await?;

    Ok(Json(ApiResponse::ok(WalletData {
        wallet: WalletResponse::from_record(wallet, user.into()),
    })))
}

/// Create a new wallet
#[utoipa::path(
    post,
    path = "/api/v1/wallet",
    tag = "Wallet",
    request_body = CreateWalletRequest,
    security(
        ("bearer" = [])
    ),
    responses(
        (status = 201, description = "Wallet created", body = WalletData),
        (status = 400, description = "Unsupported currency or quota reached", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 502, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn create_wallet(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateWalletRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<WalletData>>)> {
    // 1. Currency must be on the allow-list, compared case-insensitively
    if !state.policy.is_allowed(&request.currency) {
        return Err(unsupported_currency(&state));
    }

    // 2. Enforce the per-user wallet quota
    let count = state.wallets.count_by_user(user.id).await?;
    if count >= i64::from(state.policy.max_wallets_per_user) {
        return Err(ApiError::QuotaExceeded);
    }

    // 3. Allocate an address by inserting directly; the unique constraint
    //    rejects collisions, including ones raced in by other requests
    let currency = request.currency.to_uppercase();
    let owner: UserResponse = user.into();

    for _ in 0..ADDRESS_ALLOC_ATTEMPTS {
        let address = generate_address()?;

        match state.wallets.insert(owner.id, &address, &currency).await {
            Ok(wallet) => {
                tracing::info!(
                    user_id = %owner.id,
                    address = %wallet.address,
                    currency = %wallet.currency,
                    "Wallet created"
                );

                return Ok((
                    StatusCode::CREATED,
                    Json(ApiResponse::ok(WalletData {
                        wallet: WalletResponse::from_record(wallet, owner.clone()),
                    })),
                ));
            }
            // Address already taken, roll a new one
            Err(vaultbank_db::DbError::Duplicate(_)) => continue,
            Err(other) => return Err(other.into()),
        }
    }

    Err(ApiError::Internal(format!(
        "Wallet address allocation failed after {} attempts",
        ADDRESS_ALLOC_ATTEMPTS
    )))
}

/// Update a wallet's currency
#[utoipa::path(
    patch,
    path = "/api/v1/wallet/{address}",
    tag = "Wallet",
    request_body = UpdateWalletRequest,
    security(
        ("bearer" = [])
    ),
    params(
        ("address" = String, Path, description = "Wallet address")
    ),
    responses(
        (status = 200, description = "Wallet updated", body = WalletData),
        (status = 400, description = "Unsupported currency", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such wallet for this user", body = ErrorResponse)
    )
)]
pub async fn update_wallet(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(address): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateWalletRequest>,
) -> ApiResult<Json<ApiResponse<WalletData>>> {
    // 1. Ownership-scoped resolution, same as show
    let wallet = resolve_wallet(&state, &user, &address).await?;

    // 2. A supplied non-empty currency must pass the same allow-list
    //    check as creation; absent or empty leaves the field unchanged
    let currency = match request.currency.as_deref() {
        Some(c) if !c.is_empty() => {
            if !state.policy.is_allowed(c) {
                return Err(unsupported_currency(&state));
            }
            Some(c.to_uppercase())
        }
        _ => None,
    };

    // 3. The update refreshes updated_at even when nothing else changes
    let updated = state
        .wallets
        .update_currency(wallet.id, currency.as_deref())
        .await?;

    Ok(Json(ApiResponse::ok(WalletData {
        wallet: WalletResponse::from_record(updated, user.into()),
    })))
}

/// Delete a wallet
#[utoipa::path(
    delete,
    path = "/api/v1/wallet/{address}",
    tag = "Wallet",
    security(
        ("bearer" = [])
    ),
    params(
        ("address" = String, Path, description = "Wallet address")
    ),
    responses(
        (status = 204, description = "Wallet deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such wallet for this user", body = ErrorResponse),
        (status = 502, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn delete_wallet(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(address): Path<String>,
) -> ApiResult<StatusCode> {
    // 1. Ownership-scoped resolution, same as show
    let wallet = resolve_wallet(&state, &user, &address).await?;

    // 2. Delete by internal id; zero rows means the row vanished after
    //    the lookup, which is surfaced as a storage inconsistency
    let affected = state.wallets.delete_by_id(wallet.id).await?;
    if affected == 0 {
        tracing::error!(wallet_id = %wallet.id, "Delete affected zero rows after lookup");
        return Err(ApiError::Upstream);
    }

    tracing::info!(
        user_id = %user.id,
        address = %wallet.address,
        "Wallet deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Look up a wallet by owner and address.
///
/// Existence and ownership are checked in a single predicate, so a
/// wallet owned by someone else is indistinguishable from one that does
/// not exist.
async fn resolve_wallet(
    state: &AppState,
    user: &AuthenticatedUser,
    address: &str,
) -> ApiResult<vaultbank_db::DbWallet> {
    state
        .wallets
        .find_by_user_and_address(user.id, address)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("Wallet data with this address was not found".to_string())
        })
}

/// Generate a random wallet address from CSPRNG bytes
fn generate_address() -> ApiResult<String> {
    let mut bytes = [0u8; ADDRESS_BYTE_LENGTH];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| ApiError::Internal(format!("Address randomness failed: {}", e)))?;

    Ok(hex::encode(bytes))
}

fn unsupported_currency(state: &AppState) -> ApiError {
    ApiError::BadRequest(format!(
        "Currency not supported, allowed currencies: {}",
        state.policy.allowed_currencies.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_address_is_40_hex_chars() {
        let address = generate_address().unwrap();
        assert_eq!(address.len(), 40);
        assert!(address.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generated_addresses_differ() {
        let a = generate_address().unwrap();
        let b = generate_address().unwrap();
        assert_ne!(a, b);
    }
}
