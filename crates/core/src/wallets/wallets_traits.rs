//! Wallet repository and service traits.
//!
//! These traits define the contract for wallet operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;
use uuid::Uuid;

use super::wallets_model::{NewWallet, Wallet};
use crate::errors::Result;

/// Trait defining the contract for wallet repository operations.
///
/// Implementations handle persistence only; balance arithmetic and the
/// concurrency rules live in the ledger service.
#[async_trait]
pub trait WalletRepositoryTrait: Send + Sync {
    /// Persists a freshly created wallet.
    async fn create(&self, wallet: Wallet) -> Result<Wallet>;

    /// Deletes a wallet by its ID.
    ///
    /// Returns the number of deleted records.
    async fn delete(&self, wallet_id: Uuid) -> Result<usize>;

    /// Retrieves a wallet by its ID.
    fn get_by_id(&self, wallet_id: Uuid) -> Result<Wallet>;

    /// Lists all wallets, newest first.
    fn list(&self) -> Result<Vec<Wallet>>;
}

/// Trait defining the contract for wallet service operations.
#[async_trait]
pub trait WalletServiceTrait: Send + Sync {
    /// Creates a new wallet with a zero balance.
    async fn create_wallet(&self, new_wallet: NewWallet) -> Result<Wallet>;

    /// Retrieves a wallet by ID.
    fn get_wallet(&self, wallet_id: Uuid) -> Result<Wallet>;

    /// Lists all wallets.
    fn list_wallets(&self) -> Result<Vec<Wallet>>;

    /// Deletes a wallet.
    ///
    /// Rejected while the wallet still holds funds or a non-terminal
    /// scheduled payment references it.
    async fn delete_wallet(&self, wallet_id: Uuid) -> Result<()>;
}
