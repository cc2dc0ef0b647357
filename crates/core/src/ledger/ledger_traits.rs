//! Ledger repository and service traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::ledger_model::{
    BalanceUpdate, Transaction, TransactionFilter, TransferConversion,
};
use crate::errors::Result;

/// Trait defining the contract for ledger persistence.
///
/// The repository never decides balances; it applies the updates the service
/// computed and appends the record, all inside one storage transaction.
#[async_trait]
pub trait LedgerRepositoryTrait: Send + Sync {
    /// Applies wallet balance updates and appends the transaction record as
    /// one atomic unit. Either every row lands or none do.
    async fn apply(
        &self,
        updates: Vec<BalanceUpdate>,
        transaction: Transaction,
    ) -> Result<Transaction>;

    /// Retrieves a transaction by its ID.
    fn get_by_id(&self, transaction_id: Uuid) -> Result<Transaction>;

    /// Transactions touching the wallet, newest first, with paging and an
    /// optional creation-time window.
    fn list_for_wallet(
        &self,
        wallet_id: Uuid,
        limit: i64,
        offset: i64,
        start: Option<DateTime<Utc>>,
        end_exclusive: Option<DateTime<Utc>>,
    ) -> Result<Vec<Transaction>>;

    /// Completed transactions touching the wallet at or after the instant,
    /// oldest first. The statement projector rolls the live balance back
    /// across this suffix, so it must not be truncated.
    fn list_completed_since(
        &self,
        wallet_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<Transaction>>;
}

/// Trait defining the contract for ledger service operations.
///
/// All balance mutations in the system go through this service, which owns
/// the per-wallet locking discipline.
#[async_trait]
pub trait LedgerServiceTrait: Send + Sync {
    /// Deposits a positive amount into the wallet.
    async fn deposit(
        &self,
        wallet_id: Uuid,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Transaction>;

    /// Withdraws a positive amount, rejecting overdrafts.
    async fn withdraw(
        &self,
        wallet_id: Uuid,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Transaction>;

    /// Moves a positive amount between two distinct wallets holding the same
    /// currency.
    async fn transfer(
        &self,
        source_wallet_id: Uuid,
        destination_wallet_id: Uuid,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Transaction>;

    /// Moves money between wallets of different currencies, debiting
    /// `amount` and crediting the pre-computed converted amount.
    ///
    /// Used by the currency converter once it has a quote in hand.
    async fn transfer_with_conversion(
        &self,
        source_wallet_id: Uuid,
        destination_wallet_id: Uuid,
        amount: Decimal,
        conversion: TransferConversion,
        description: Option<String>,
    ) -> Result<Transaction>;

    /// Pages through a wallet's transaction history, newest first.
    fn list_transactions(
        &self,
        wallet_id: Uuid,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>>;

    /// Retrieves a transaction by ID.
    fn get_transaction(&self, transaction_id: Uuid) -> Result<Transaction>;
}
