//! Wallet repository
//!
//! Read-side access only. Balance mutations go through the transaction
//! engine, which owns the locking and the journal write.

use sqlx::PgPool;

use crate::{DbResult, DbWallet};

/// Wallet repository for balance lookups
pub struct WalletRepo {
    pool: PgPool,
}

impl WalletRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find wallet by ID
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<DbWallet>> {
        let wallet = sqlx::query_as::<_, DbWallet>(
            "SELECT id, customer_id, amount FROM wallets WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(wallet)
    }

    /// Find the wallet owned by a non-deleted customer
    pub async fn find_by_customer(&self, customer_id: i64) -> DbResult<Option<DbWallet>> {
        let wallet = sqlx::query_as::<_, DbWallet>(
            r#"
            SELECT wallets.id, wallets.customer_id, wallets.amount
            FROM wallets
            JOIN customers ON customers.id = wallets.customer_id
            WHERE customers.id = $1 AND customers.deleted = FALSE
            "#,
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(wallet)
    }
}
