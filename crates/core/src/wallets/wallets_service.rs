use log::debug;
use std::sync::Arc;
use uuid::Uuid;

use super::wallets_model::{NewWallet, Wallet};
use super::wallets_traits::{WalletRepositoryTrait, WalletServiceTrait};
use crate::errors::{DatabaseError, Error, Result};
use crate::scheduled::ScheduledPaymentRepositoryTrait;

/// Service for managing wallet lifecycle.
pub struct WalletService {
    repository: Arc<dyn WalletRepositoryTrait>,
    schedules: Arc<dyn ScheduledPaymentRepositoryTrait>,
}

impl WalletService {
    /// Creates a new WalletService instance.
    pub fn new(
        repository: Arc<dyn WalletRepositoryTrait>,
        schedules: Arc<dyn ScheduledPaymentRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            schedules,
        }
    }
}

/// Maps a storage-level missing record onto the wallet error the API exposes.
pub(crate) fn wallet_not_found(err: Error, wallet_id: Uuid) -> Error {
    match err {
        Error::Database(DatabaseError::NotFound(_)) => {
            Error::WalletNotFound(wallet_id.to_string())
        }
        other => other,
    }
}

#[async_trait::async_trait]
impl WalletServiceTrait for WalletService {
    async fn create_wallet(&self, new_wallet: NewWallet) -> Result<Wallet> {
        let currency = new_wallet.validate()?;
        debug!("Creating wallet, currency: {}", currency);
        (*self.repository).create(Wallet::new(currency)).await
    }

    fn get_wallet(&self, wallet_id: Uuid) -> Result<Wallet> {
        (*self.repository)
            .get_by_id(wallet_id)
            .map_err(|e| wallet_not_found(e, wallet_id))
    }

    fn list_wallets(&self) -> Result<Vec<Wallet>> {
        (*self.repository).list()
    }

    async fn delete_wallet(&self, wallet_id: Uuid) -> Result<()> {
        let wallet = self.get_wallet(wallet_id)?;

        if !wallet.balance.is_zero() {
            return Err(Error::Conflict(format!(
                "wallet {} still holds {} {}",
                wallet.id, wallet.balance, wallet.currency
            )));
        }

        let open_schedules = (*self.schedules).count_open_for_wallet(wallet_id)?;
        if open_schedules > 0 {
            return Err(Error::Conflict(format!(
                "wallet {} is referenced by {} open scheduled payment(s)",
                wallet.id, open_schedules
            )));
        }

        debug!("Deleting wallet {}", wallet_id);
        (*self.repository).delete(wallet_id).await?;
        Ok(())
    }
}
