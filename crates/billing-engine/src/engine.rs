//! Wallet transaction engine
//!
//! Both operations run inside a single database transaction and take the
//! row-level exclusive lock on every wallet they mutate before reading its
//! balance for mutation: `transfer` through an explicit `FOR UPDATE`
//! locking read ordered by ascending wallet id, `replenish` implicitly
//! through its single `UPDATE` expression. Concurrent operations on the
//! same wallet therefore serialize in the store, not in this process, and
//! the engine scales horizontally across instances sharing one database.

use billing_db::DbWallet;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// One side of a committed balance change, as reported to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRecord {
    pub customer_id: i64,
    pub amount_was: i64,
    pub amount_become: i64,
    pub operation_amount: i64,
}

/// Result of a committed replenishment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplenishOutcome {
    /// Grouping id shared by all journal rows of this action
    pub transaction_id: Uuid,
    pub customer_id: i64,
    pub amount_was: i64,
    pub amount_become: i64,
    pub operation_amount: i64,
}

/// Result of a committed transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOutcome {
    /// Grouping id shared by the sender and recipient journal rows
    pub transaction_id: Uuid,
    pub sender: OperationRecord,
    pub recipient: OperationRecord,
}

/// The wallet transaction engine.
///
/// Holds a pool handle and nothing else; all state lives in the store.
/// Cheap to clone and share between tasks.
#[derive(Clone)]
pub struct WalletEngine {
    pool: PgPool,
}

impl WalletEngine {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Credit a customer's wallet by `amount` (minor units, >= 1).
    ///
    /// The balance change and its journal row commit together or not at
    /// all. `transaction` lets the caller supply the grouping id; no
    /// deduplication is performed on it.
    pub async fn replenish(
        &self,
        customer_id: i64,
        amount: i64,
        transaction: Option<Uuid>,
    ) -> EngineResult<ReplenishOutcome> {
        if amount < 1 {
            return Err(EngineError::Validation {
                message: format!("Replenish amount must be >= 1, got {}", amount),
            });
        }

        let transaction_id = transaction.unwrap_or_else(Uuid::new_v4);
        let mut tx = self.pool.begin().await?;

        // A single update expression: the UPDATE takes the row's exclusive
        // lock itself, so there is no read-then-write window to lose an
        // increment in.
        let updated: Option<(i64, i64)> = sqlx::query_as(
            r#"
            UPDATE wallets
            SET amount = wallets.amount + $2
            FROM customers
            WHERE customers.id = wallets.customer_id
              AND customers.deleted = FALSE
              AND customers.id = $1
            RETURNING wallets.id, wallets.amount
            "#,
        )
        .bind(customer_id)
        .bind(amount)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((wallet_id, amount_become)) = updated else {
            tx.rollback().await?;
            return Err(EngineError::SenderNotFound { customer_id });
        };
        let amount_was = amount_become - amount;

        record_operation(&mut *tx, transaction_id, wallet_id, amount_was, amount_become, amount)
            .await?;

        tx.commit().await?;

        debug!(
            %transaction_id,
            customer_id, amount_was, amount_become, "replenishment committed"
        );

        Ok(ReplenishOutcome {
            transaction_id,
            customer_id,
            amount_was,
            amount_become,
            operation_amount: amount,
        })
    }

    /// Move `amount` (minor units, >= 1) from one customer's wallet to
    /// another's.
    ///
    /// Both wallets are locked in one `FOR UPDATE` read ordered by
    /// ascending wallet id, so two transfers over the same pair in
    /// opposite directions cannot deadlock. Both balance writes and both
    /// journal rows commit as one unit; any failure aborts everything.
    pub async fn transfer(
        &self,
        sender_id: i64,
        recipient_id: i64,
        amount: i64,
        transaction: Option<Uuid>,
    ) -> EngineResult<TransferOutcome> {
        if amount < 1 {
            return Err(EngineError::Validation {
                message: format!("Transfer amount must be >= 1, got {}", amount),
            });
        }
        if sender_id == recipient_id {
            return Err(EngineError::Validation {
                message: format!("Cannot transfer from customer {} to itself", sender_id),
            });
        }

        let transaction_id = transaction.unwrap_or_else(Uuid::new_v4);
        let mut tx = self.pool.begin().await?;

        let wallets: Vec<DbWallet> = sqlx::query_as(
            r#"
            SELECT wallets.id, wallets.customer_id, wallets.amount
            FROM wallets
            JOIN customers ON customers.id = wallets.customer_id
            WHERE customers.deleted = FALSE
              AND customers.id IN ($1, $2)
            ORDER BY wallets.id ASC
            FOR UPDATE OF wallets
            "#,
        )
        .bind(sender_id)
        .bind(recipient_id)
        .fetch_all(&mut *tx)
        .await?;

        let sender = wallets.iter().find(|w| w.customer_id == sender_id);
        let recipient = wallets.iter().find(|w| w.customer_id == recipient_id);

        let Some(sender) = sender else {
            tx.rollback().await?;
            return Err(EngineError::SenderNotFound { customer_id: sender_id });
        };
        let Some(recipient) = recipient else {
            tx.rollback().await?;
            return Err(EngineError::RecipientNotFound { customer_id: recipient_id });
        };

        let sender_become = sender.amount - amount;
        if sender_become < 0 {
            tx.rollback().await?;
            return Err(EngineError::InsufficientFunds {
                customer_id: sender_id,
                available: sender.amount,
                required: amount,
            });
        }
        let recipient_become =
            recipient.amount.checked_add(amount).ok_or_else(|| EngineError::Validation {
                message: format!("Balance overflow for customer {}", recipient_id),
            })?;

        for (wallet_id, new_amount) in [(sender.id, sender_become), (recipient.id, recipient_become)]
        {
            sqlx::query("UPDATE wallets SET amount = $2 WHERE id = $1")
                .bind(wallet_id)
                .bind(new_amount)
                .execute(&mut *tx)
                .await?;
        }

        record_operation(&mut *tx, transaction_id, sender.id, sender.amount, sender_become, -amount)
            .await?;
        record_operation(
            &mut *tx,
            transaction_id,
            recipient.id,
            recipient.amount,
            recipient_become,
            amount,
        )
        .await?;

        let outcome = TransferOutcome {
            transaction_id,
            sender: OperationRecord {
                customer_id: sender_id,
                amount_was: sender.amount,
                amount_become: sender_become,
                operation_amount: -amount,
            },
            recipient: OperationRecord {
                customer_id: recipient_id,
                amount_was: recipient.amount,
                amount_become: recipient_become,
                operation_amount: amount,
            },
        };

        tx.commit().await?;

        debug!(%transaction_id, sender_id, recipient_id, amount, "transfer committed");

        Ok(outcome)
    }
}

/// Append one journal row inside the caller's transaction
async fn record_operation(
    conn: &mut PgConnection,
    transaction_id: Uuid,
    wallet_id: i64,
    amount_was: i64,
    amount_become: i64,
    operation_amount: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO operations
            (transaction_id, wallet_id, amount_was, amount_become, operation_amount)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(transaction_id)
    .bind(wallet_id)
    .bind(amount_was)
    .bind(amount_become)
    .bind(operation_amount)
    .execute(conn)
    .await?;

    Ok(())
}
