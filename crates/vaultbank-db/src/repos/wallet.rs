//! Wallet repository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{DbError, DbResult, DbWallet, WalletStore};

/// PostgreSQL-backed store for wallets
pub struct WalletRepo {
    pool: PgPool,
}

impl WalletRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WalletStore for WalletRepo {
    /// Create a new wallet
    async fn insert(&self, user_id: Uuid, address: &str, currency: &str) -> DbResult<DbWallet> {
        let wallet = sqlx::query_as::<_, DbWallet>(
            r#"
            INSERT INTO wallets (user_id, address, currency)
            VALUES ($1, $2, $3)
            RETURNING
                id, user_id, address, balance, currency, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(address)
        .bind(currency)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.constraint() == Some("wallets_address_key") {
                    return DbError::Duplicate(format!("Address {} already exists", address));
                }
            }
            DbError::Query(e)
        })?;

        Ok(wallet)
    }

    /// List all wallets for user
    async fn list_by_user(&self, user_id: Uuid) -> DbResult<Vec<DbWallet>> {
        let wallets = sqlx::query_as::<_, DbWallet>(
            r#"
            SELECT
                id, user_id, address, balance, currency, created_at, updated_at
            FROM wallets
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(wallets)
    }

    /// Count wallets held by user
    async fn count_by_user(&self, user_id: Uuid) -> DbResult<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM wallets WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Find wallet by owner and address
    async fn find_by_user_and_address(
        &self,
        user_id: Uuid,
        address: &str,
    ) -> DbResult<Option<DbWallet>> {
        let wallet = sqlx::query_as::<_, DbWallet>(
            r#"
            SELECT
                id, user_id, address, balance, currency, created_at, updated_at
            FROM wallets
            WHERE user_id = $1 AND address = $2
            "#,
        )
        .bind(user_id)
        .bind(address)
        .fetch_optional(&self.pool)
        .await?;

        Ok(wallet)
    }

    /// Update wallet currency, bumping updated_at either way
    async fn update_currency(&self, id: Uuid, currency: Option<&str>) -> DbResult<DbWallet> {
        let wallet = sqlx::query_as::<_, DbWallet>(
            r#"
            UPDATE wallets
            SET currency = COALESCE($2, currency), updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, user_id, address, balance, currency, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(currency)
        .fetch_optional(&self.pool)
        .await?;

        wallet.ok_or_else(|| DbError::NotFound(format!("Wallet {} not found", id)))
    }

    /// Delete wallet by ID
    async fn delete_by_id(&self, id: Uuid) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM wallets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
