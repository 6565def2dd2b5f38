//! Engine error types

use billing_db::DbError;
use thiserror::Error;

/// Errors surfaced by wallet transaction operations.
///
/// The first four variants are expected business outcomes; callers map
/// them to their own external representation. `Store` wraps any failure
/// of the underlying durable store and is never retried here. Every
/// variant implies the atomic unit was rolled back in full.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid operation: {message}")]
    Validation { message: String },

    #[error("Sender not found: customer {customer_id}")]
    SenderNotFound { customer_id: i64 },

    #[error("Recipient not found: customer {customer_id}")]
    RecipientNotFound { customer_id: i64 },

    #[error("Insufficient funds: customer {customer_id} has {available}, needs {required}")]
    InsufficientFunds {
        customer_id: i64,
        available: i64,
        required: i64,
    },

    #[error("Store error: {0}")]
    Store(#[from] DbError),
}

impl From<sqlx::Error> for EngineError {
    fn from(e: sqlx::Error) -> Self {
        EngineError::Store(DbError::Query(e))
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
