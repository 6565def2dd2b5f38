//! Repository implementations

mod customer;
mod operation;
mod wallet;

pub use customer::CustomerRepo;
pub use operation::OperationRepo;
pub use wallet::WalletRepo;
