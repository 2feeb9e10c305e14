//! Application state shared across handlers
//!
//! Handlers see storage only through the [`UserStore`]/[`WalletStore`]
//! traits, so production runs against PostgreSQL repositories while tests
//! inject the in-memory store.

use std::sync::Arc;
use vaultbank_auth::AuthService;
use vaultbank_db::{UserStore, WalletStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// User account storage
    pub users: Arc<dyn UserStore>,
    /// Wallet storage
    pub wallets: Arc<dyn WalletStore>,
    /// Authentication service
    pub auth: Arc<AuthService>,
    /// Wallet issuance policy
    pub policy: WalletPolicy,
}

impl AppState {
    /// Create a new application state
    pub fn new(
        users: Arc<dyn UserStore>,
        wallets: Arc<dyn WalletStore>,
        auth: Arc<AuthService>,
        policy: WalletPolicy,
    ) -> Self {
        Self {
            users,
            wallets,
            auth,
            policy,
        }
    }
}

/// Limits applied when issuing wallets
#[derive(Debug, Clone)]
pub struct WalletPolicy {
    /// Maximum wallets a single account may hold
    pub max_wallets_per_user: u32,
    /// Currency codes accepted at wallet creation
    pub allowed_currencies: Vec<String>,
}

impl Default for WalletPolicy {
    fn default() -> Self {
        Self {
            max_wallets_per_user: 4,
            allowed_currencies: vec!["IDR".to_string(), "USD".to_string()],
        }
    }
}

impl WalletPolicy {
    /// Check a currency code against the allow-list, case-insensitively
    pub fn is_allowed(&self, currency: &str) -> bool {
        self.allowed_currencies
            .iter()
            .any(|c| c.eq_ignore_ascii_case(currency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_defaults() {
        let policy = WalletPolicy::default();
        assert_eq!(policy.max_wallets_per_user, 4);
        assert!(policy.is_allowed("IDR"));
        assert!(policy.is_allowed("usd"));
        assert!(!policy.is_allowed("EUR"));
    }
}
