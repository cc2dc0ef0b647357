//! Per-wallet serialization for balance mutations.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::constants::LOCK_TIMEOUT_MS;
use crate::errors::{Error, Result};

/// Arena of per-wallet async locks.
///
/// A wallet mutation serializes on that wallet's lock only, so operations on
/// disjoint wallets never contend. Transfers take both locks in ascending id
/// order, which makes two opposing transfers queue instead of deadlock.
/// Acquisition is bounded; a wallet that stays locked past the timeout
/// surfaces as `Busy` with no balance touched.
pub struct WalletLocks {
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
    timeout: Duration,
}

impl WalletLocks {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_millis(LOCK_TIMEOUT_MS))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            locks: DashMap::new(),
            timeout,
        }
    }

    fn lock_for(&self, wallet_id: Uuid) -> Arc<Mutex<()>> {
        self.locks
            .entry(wallet_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Acquires the wallet's lock, failing with `Busy` once the timeout
    /// elapses.
    pub async fn acquire(&self, wallet_id: Uuid) -> Result<OwnedMutexGuard<()>> {
        let lock = self.lock_for(wallet_id);
        tokio::time::timeout(self.timeout, lock.lock_owned())
            .await
            .map_err(|_| {
                Error::Busy(format!(
                    "wallet {} is locked by another operation",
                    wallet_id
                ))
            })
    }

    /// Acquires two wallet locks in ascending id order.
    ///
    /// Callers must pass two distinct wallet ids.
    pub async fn acquire_pair(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> Result<(OwnedMutexGuard<()>, OwnedMutexGuard<()>)> {
        debug_assert_ne!(a, b);
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        let first_guard = self.acquire(first).await?;
        let second_guard = self.acquire(second).await?;
        Ok((first_guard, second_guard))
    }
}

impl Default for WalletLocks {
    fn default() -> Self {
        Self::new()
    }
}
