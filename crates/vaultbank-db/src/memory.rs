//! In-memory store implementation
//!
//! Backs the storage traits with plain vectors behind an async lock.
//! Used by handler tests and local development, never in production.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::models::{DbUser, DbWallet};
use crate::store::{UserStore, WalletStore};

/// Process-local store enforcing the same uniqueness rules as PostgreSQL
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<DbUser>>,
    wallets: RwLock<Vec<DbWallet>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, name: &str, email: &str, password_hash: &str) -> DbResult<DbUser> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.email == email) {
            return Err(DbError::Duplicate(format!("Email {} already exists", email)));
        }

        let now = Utc::now();
        let user = DbUser {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            verified_at: None,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DbUser>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<DbUser>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl WalletStore for MemoryStore {
    async fn insert(&self, user_id: Uuid, address: &str, currency: &str) -> DbResult<DbWallet> {
        let mut wallets = self.wallets.write().await;

        // Addresses are unique across all users, same as the DB constraint.
        if wallets.iter().any(|w| w.address == address) {
            return Err(DbError::Duplicate(format!(
                "Address {} already exists",
                address
            )));
        }

        let now = Utc::now();
        let wallet = DbWallet {
            id: Uuid::new_v4(),
            user_id,
            address: address.to_string(),
            balance: rust_decimal::Decimal::ZERO,
            currency: currency.to_string(),
            created_at: now,
            updated_at: now,
        };
        wallets.push(wallet.clone());

        Ok(wallet)
    }

    async fn list_by_user(&self, user_id: Uuid) -> DbResult<Vec<DbWallet>> {
        let wallets = self.wallets.read().await;
        let mut owned: Vec<DbWallet> = wallets
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by_key(|w| w.created_at);
        Ok(owned)
    }

    async fn count_by_user(&self, user_id: Uuid) -> DbResult<i64> {
        let wallets = self.wallets.read().await;
        Ok(wallets.iter().filter(|w| w.user_id == user_id).count() as i64)
    }

    async fn find_by_user_and_address(
        &self,
        user_id: Uuid,
        address: &str,
    ) -> DbResult<Option<DbWallet>> {
        let wallets = self.wallets.read().await;
        Ok(wallets
            .iter()
            .find(|w| w.user_id == user_id && w.address == address)
            .cloned())
    }

    async fn update_currency(&self, id: Uuid, currency: Option<&str>) -> DbResult<DbWallet> {
        let mut wallets = self.wallets.write().await;

        let wallet = wallets
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| DbError::NotFound(format!("Wallet {} not found", id)))?;

        if let Some(currency) = currency {
            wallet.currency = currency.to_string();
        }
        wallet.updated_at = Utc::now();

        Ok(wallet.clone())
    }

    async fn delete_by_id(&self, id: Uuid) -> DbResult<u64> {
        let mut wallets = self.wallets.write().await;
        let before = wallets.len();
        wallets.retain(|w| w.id != id);
        Ok((before - wallets.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();

        store
            .create("Ada", "ada@example.com", "hash-a")
            .await
            .unwrap();
        let err = store
            .create("Other Ada", "ada@example.com", "hash-b")
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_find_by_email_roundtrip() {
        let store = MemoryStore::new();

        let created = store
            .create("Ada", "ada@example.com", "hash-a")
            .await
            .unwrap();
        let found = store.find_by_email("ada@example.com").await.unwrap();

        assert_eq!(found.map(|u| u.id), Some(created.id));
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_address_unique_across_users() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.insert(alice, "aabbcc", "IDR").await.unwrap();
        let err = store.insert(bob, "aabbcc", "USD").await.unwrap_err();

        assert!(matches!(err, DbError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_wallet_lookup_scoped_to_owner() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.insert(alice, "aabbcc", "IDR").await.unwrap();

        assert!(store
            .find_by_user_and_address(alice, "aabbcc")
            .await
            .unwrap()
            .is_some());
        assert!(store
            .find_by_user_and_address(bob, "aabbcc")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_update_currency_none_keeps_value_but_touches_row() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();

        let wallet = store.insert(alice, "aabbcc", "IDR").await.unwrap();
        let updated = store.update_currency(wallet.id, None).await.unwrap();

        assert_eq!(updated.currency, "IDR");
        assert!(updated.updated_at >= wallet.updated_at);

        let updated = store.update_currency(wallet.id, Some("USD")).await.unwrap();
        assert_eq!(updated.currency, "USD");
    }

    #[tokio::test]
    async fn test_delete_reports_rows_affected() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();

        let wallet = store.insert(alice, "aabbcc", "IDR").await.unwrap();

        assert_eq!(store.delete_by_id(wallet.id).await.unwrap(), 1);
        assert_eq!(store.delete_by_id(wallet.id).await.unwrap(), 0);
        assert_eq!(store.count_by_user(alice).await.unwrap(), 0);
    }
}
