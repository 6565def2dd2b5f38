//! Operation journal repository
//!
//! The journal is append-only; rows are written by the transaction engine
//! inside its atomic unit and never updated afterwards. This repository
//! exposes read access for history and audit.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{DbOperation, DbResult};

/// Journal repository for operation history
pub struct OperationRepo {
    pool: PgPool,
}

impl OperationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Full history for one wallet in processed order
    pub async fn list_by_wallet(&self, wallet_id: i64) -> DbResult<Vec<DbOperation>> {
        let operations = sqlx::query_as::<_, DbOperation>(
            r#"
            SELECT id, transaction_id, wallet_id, amount_was, amount_become,
                   operation_amount, processed_at
            FROM operations
            WHERE wallet_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(wallet_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(operations)
    }

    /// All rows produced by one logical action (one for a replenishment,
    /// two for a transfer)
    pub async fn list_by_transaction(&self, transaction_id: Uuid) -> DbResult<Vec<DbOperation>> {
        let operations = sqlx::query_as::<_, DbOperation>(
            r#"
            SELECT id, transaction_id, wallet_id, amount_was, amount_become,
                   operation_amount, processed_at
            FROM operations
            WHERE transaction_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(operations)
    }
}
