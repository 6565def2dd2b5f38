//! Billing Wallet Transaction Engine
//!
//! The transactional core of the billing service: it mutates wallet
//! balances and appends journal rows as single atomic units on top of the
//! entity store in `billing-db`.
//!
//! # Invariants
//!
//! 1. No negative balances, checked before commit
//! 2. Every balance change is documented by exactly one journal row
//! 3. A transfer's two rows share one transaction id and their deltas sum
//!    to zero
//! 4. A failed operation leaves no trace: no balance change, no journal row
//!
//! # Concurrency
//!
//! Serialization happens in the store via row-level exclusive locks held
//! for the duration of the database transaction, acquired in ascending
//! wallet-id order. There are no in-process mutexes; any number of engine
//! instances may share one database.

pub mod engine;
pub mod error;

pub use engine::{OperationRecord, ReplenishOutcome, TransferOutcome, WalletEngine};
pub use error::{EngineError, EngineResult};
