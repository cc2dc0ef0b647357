//! Ledger module - append-only transaction records and atomic money movement.

mod ledger_model;
mod ledger_service;
mod ledger_traits;
mod locks;

// Re-export the public interface
pub use ledger_model::{
    BalanceUpdate, Transaction, TransactionFilter, TransactionKind, TransactionStatus,
    TransferConversion,
};
pub use ledger_service::LedgerService;
pub(crate) use ledger_service::{day_end_exclusive, day_start};
pub use ledger_traits::{LedgerRepositoryTrait, LedgerServiceTrait};
pub use locks::WalletLocks;
