//! Storage traits - the seam between HTTP handlers and persistence
//!
//! Handlers depend on these traits rather than on concrete repositories,
//! so tests can swap in the in-memory store without a running PostgreSQL.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::{DbUser, DbWallet};

/// Persistence operations for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user row and return it.
    ///
    /// Fails with `DbError::Duplicate` when the email is already taken.
    async fn create(&self, name: &str, email: &str, password_hash: &str) -> DbResult<DbUser>;

    /// Look up a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DbUser>>;

    /// Look up a user by email address.
    async fn find_by_email(&self, email: &str) -> DbResult<Option<DbUser>>;
}

/// Persistence operations for wallets.
#[async_trait]
pub trait WalletStore: Send + Sync {
    /// Insert a new wallet row and return it.
    ///
    /// Fails with `DbError::Duplicate` when the address already exists,
    /// regardless of which user owns the colliding row.
    async fn insert(&self, user_id: Uuid, address: &str, currency: &str) -> DbResult<DbWallet>;

    /// All wallets belonging to a user, oldest first.
    async fn list_by_user(&self, user_id: Uuid) -> DbResult<Vec<DbWallet>>;

    /// Number of wallets a user currently holds.
    async fn count_by_user(&self, user_id: Uuid) -> DbResult<i64>;

    /// Look up a wallet by owner and address. Returns `None` when the
    /// address exists but belongs to somebody else.
    async fn find_by_user_and_address(
        &self,
        user_id: Uuid,
        address: &str,
    ) -> DbResult<Option<DbWallet>>;

    /// Update a wallet's currency. `None` leaves the currency unchanged
    /// but still bumps `updated_at`.
    async fn update_currency(&self, id: Uuid, currency: Option<&str>) -> DbResult<DbWallet>;

    /// Delete a wallet by primary key, returning the number of rows removed.
    async fn delete_by_id(&self, id: Uuid) -> DbResult<u64>;
}
