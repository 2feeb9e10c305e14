//! Wallet DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use vaultbank_db::DbWallet;
use validator::Validate;

use crate::dto::user::UserResponse;

// =============================================================================
// Requests
// =============================================================================

/// Create wallet request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateWalletRequest {
    /// Wallet currency code
    #[validate(length(min = 1, message = "Currency is required"))]
    pub currency: String,
}

/// Update wallet request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateWalletRequest {
    /// New currency code (unchanged when absent or empty)
    #[serde(default)]
    pub currency: Option<String>,
}

// =============================================================================
// Responses
// =============================================================================

/// Wallet projection joined with its owner's public projection
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WalletResponse {
    /// Wallet ID
    pub id: Uuid,
    /// Owning user
    pub user: UserResponse,
    /// Globally unique wallet address
    pub address: String,
    /// Current balance
    pub balance: Decimal,
    /// Currency code
    pub currency: String,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl WalletResponse {
    /// Join a wallet row with its owner's projection
    pub fn from_record(wallet: DbWallet, owner: UserResponse) -> Self {
        Self {
            id: wallet.id,
            user: owner,
            address: wallet.address,
            balance: wallet.balance,
            currency: wallet.currency,
            created_at: wallet.created_at,
            updated_at: wallet.updated_at,
        }
    }
}

/// Payload wrapper for single-wallet endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WalletData {
    /// The wallet record
    pub wallet: WalletResponse,
}

/// Payload wrapper for the wallet listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WalletListData {
    /// All wallets owned by the caller
    pub wallets: Vec<WalletResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_rejects_empty_currency() {
        let request = CreateWalletRequest { currency: String::new() };
        assert!(request.validate().is_err());

        let request = CreateWalletRequest { currency: "idr".to_string() };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_update_request_currency_defaults_to_none() {
        let request: UpdateWalletRequest = serde_json::from_str("{}").unwrap();
        assert!(request.currency.is_none());
    }
}
