//! Database models - mapped from PostgreSQL tables

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A customer account. Soft-deleted customers keep their rows (and their
/// wallet history) until purged, but are excluded from all lookups.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbCustomer {
    pub id: i64,
    pub name: String,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Per-customer balance in minor currency units. Never negative; mutated
/// only by the transaction engine.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbWallet {
    pub id: i64,
    pub customer_id: i64,
    pub amount: i64,
}

/// One immutable journal row documenting a single balance change.
///
/// `transaction_id` groups the rows of one logical action: a replenishment
/// writes one row, a transfer writes two rows sharing the id.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbOperation {
    pub id: i64,
    pub transaction_id: Uuid,
    pub wallet_id: i64,
    pub amount_was: i64,
    pub amount_become: i64,
    pub operation_amount: i64,
    pub processed_at: DateTime<Utc>,
}
