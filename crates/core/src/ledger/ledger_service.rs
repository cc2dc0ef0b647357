use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use super::ledger_model::{
    BalanceUpdate, Transaction, TransactionFilter, TransferConversion,
};
use super::ledger_traits::{LedgerRepositoryTrait, LedgerServiceTrait};
use super::locks::WalletLocks;
use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::errors::{DatabaseError, Error, Result, ValidationError};
use crate::money::Money;
use crate::wallets::{wallet_not_found, Wallet, WalletRepositoryTrait};

/// Service owning every balance mutation in the system.
///
/// Each operation takes the affected wallet locks, re-reads balances under
/// them, and hands the repository a fully computed set of updates plus the
/// ledger record to append atomically.
pub struct LedgerService {
    wallets: Arc<dyn WalletRepositoryTrait>,
    ledger: Arc<dyn LedgerRepositoryTrait>,
    locks: Arc<WalletLocks>,
}

impl LedgerService {
    /// Creates a new LedgerService instance.
    pub fn new(
        wallets: Arc<dyn WalletRepositoryTrait>,
        ledger: Arc<dyn LedgerRepositoryTrait>,
        locks: Arc<WalletLocks>,
    ) -> Self {
        Self {
            wallets,
            ledger,
            locks,
        }
    }

    fn wallet(&self, wallet_id: Uuid) -> Result<Wallet> {
        (*self.wallets)
            .get_by_id(wallet_id)
            .map_err(|e| wallet_not_found(e, wallet_id))
    }

    fn require_sufficient(wallet: &Wallet, requested: Decimal) -> Result<()> {
        if requested > wallet.balance {
            return Err(Error::InsufficientFunds {
                wallet_id: wallet.id.to_string(),
                balance: wallet.balance,
                requested,
            });
        }
        Ok(())
    }
}

fn require_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "amount: must be positive".to_string(),
        )));
    }
    Ok(())
}

pub(crate) fn day_start(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Exclusive upper bound covering the whole of `date`.
pub(crate) fn day_end_exclusive(date: NaiveDate) -> DateTime<Utc> {
    match date.checked_add_days(Days::new(1)) {
        Some(next) => day_start(next),
        None => DateTime::<Utc>::MAX_UTC,
    }
}

#[async_trait::async_trait]
impl LedgerServiceTrait for LedgerService {
    async fn deposit(
        &self,
        wallet_id: Uuid,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Transaction> {
        require_positive(amount)?;

        let _guard = self.locks.acquire(wallet_id).await?;
        let wallet = self.wallet(wallet_id)?;
        let credit = Money::new(amount, wallet.currency)?;
        let balance = Money {
            amount: wallet.balance,
            currency: wallet.currency,
        };
        let new_balance = balance.checked_add(&credit)?;

        debug!("Depositing {} into wallet {}", credit, wallet.id);
        let record = Transaction::deposit(wallet.id, credit.amount, wallet.currency, description);
        (*self.ledger)
            .apply(
                vec![BalanceUpdate {
                    wallet_id: wallet.id,
                    new_balance: new_balance.amount,
                }],
                record,
            )
            .await
    }

    async fn withdraw(
        &self,
        wallet_id: Uuid,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Transaction> {
        require_positive(amount)?;

        let _guard = self.locks.acquire(wallet_id).await?;
        let wallet = self.wallet(wallet_id)?;
        let debit = Money::new(amount, wallet.currency)?;
        Self::require_sufficient(&wallet, debit.amount)?;
        let balance = Money {
            amount: wallet.balance,
            currency: wallet.currency,
        };
        let new_balance = balance.checked_sub(&debit)?;

        debug!("Withdrawing {} from wallet {}", debit, wallet.id);
        let record =
            Transaction::withdrawal(wallet.id, debit.amount, wallet.currency, description);
        (*self.ledger)
            .apply(
                vec![BalanceUpdate {
                    wallet_id: wallet.id,
                    new_balance: new_balance.amount,
                }],
                record,
            )
            .await
    }

    async fn transfer(
        &self,
        source_wallet_id: Uuid,
        destination_wallet_id: Uuid,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Transaction> {
        require_positive(amount)?;
        if source_wallet_id == destination_wallet_id {
            return Err(Error::InvalidTransfer(
                "source and destination wallets are identical".to_string(),
            ));
        }

        let _guards = self
            .locks
            .acquire_pair(source_wallet_id, destination_wallet_id)
            .await?;
        let source = self.wallet(source_wallet_id)?;
        let destination = self.wallet(destination_wallet_id)?;
        if source.currency != destination.currency {
            return Err(Error::InvalidTransfer(format!(
                "wallets hold different currencies ({} vs {})",
                source.currency, destination.currency
            )));
        }

        let moved = Money::new(amount, source.currency)?;
        Self::require_sufficient(&source, moved.amount)?;
        let source_balance = Money {
            amount: source.balance,
            currency: source.currency,
        }
        .checked_sub(&moved)?;
        let destination_balance = Money {
            amount: destination.balance,
            currency: destination.currency,
        }
        .checked_add(&moved)?;

        debug!(
            "Transferring {} from wallet {} to wallet {}",
            moved, source.id, destination.id
        );
        let record = Transaction::transfer(
            source.id,
            destination.id,
            moved.amount,
            source.currency,
            description,
        );
        (*self.ledger)
            .apply(
                vec![
                    BalanceUpdate {
                        wallet_id: source.id,
                        new_balance: source_balance.amount,
                    },
                    BalanceUpdate {
                        wallet_id: destination.id,
                        new_balance: destination_balance.amount,
                    },
                ],
                record,
            )
            .await
    }

    async fn transfer_with_conversion(
        &self,
        source_wallet_id: Uuid,
        destination_wallet_id: Uuid,
        amount: Decimal,
        conversion: TransferConversion,
        description: Option<String>,
    ) -> Result<Transaction> {
        require_positive(amount)?;
        require_positive(conversion.converted_amount)?;
        if conversion.exchange_rate <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "exchangeRate: must be positive".to_string(),
            )));
        }
        if source_wallet_id == destination_wallet_id {
            return Err(Error::InvalidTransfer(
                "source and destination wallets are identical".to_string(),
            ));
        }

        let _guards = self
            .locks
            .acquire_pair(source_wallet_id, destination_wallet_id)
            .await?;
        let source = self.wallet(source_wallet_id)?;
        let destination = self.wallet(destination_wallet_id)?;
        if destination.currency != conversion.target_currency {
            return Err(Error::InvalidTransfer(format!(
                "conversion targets {} but the destination wallet holds {}",
                conversion.target_currency, destination.currency
            )));
        }

        let debit = Money::new(amount, source.currency)?;
        let credit = Money::new(conversion.converted_amount, destination.currency)?;
        Self::require_sufficient(&source, debit.amount)?;
        let source_balance = Money {
            amount: source.balance,
            currency: source.currency,
        }
        .checked_sub(&debit)?;
        let destination_balance = Money {
            amount: destination.balance,
            currency: destination.currency,
        }
        .checked_add(&credit)?;

        debug!(
            "Converting {} from wallet {} into {} for wallet {} at rate {}",
            debit, source.id, credit, destination.id, conversion.exchange_rate
        );
        let record = Transaction::converted_transfer(
            source.id,
            destination.id,
            debit.amount,
            source.currency,
            conversion,
            description,
        );
        (*self.ledger)
            .apply(
                vec![
                    BalanceUpdate {
                        wallet_id: source.id,
                        new_balance: source_balance.amount,
                    },
                    BalanceUpdate {
                        wallet_id: destination.id,
                        new_balance: destination_balance.amount,
                    },
                ],
                record,
            )
            .await
    }

    fn list_transactions(
        &self,
        wallet_id: Uuid,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>> {
        self.wallet(wallet_id)?;

        let page = filter.page.unwrap_or(1).max(1);
        let size = filter
            .size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1).saturating_mul(size);
        let start = filter.start_date.map(day_start);
        let end_exclusive = filter.end_date.map(day_end_exclusive);

        (*self.ledger).list_for_wallet(wallet_id, size, offset, start, end_exclusive)
    }

    fn get_transaction(&self, transaction_id: Uuid) -> Result<Transaction> {
        (*self.ledger)
            .get_by_id(transaction_id)
            .map_err(|e| match e {
                Error::Database(DatabaseError::NotFound(_)) => {
                    Error::NotFound(format!("transaction {}", transaction_id))
                }
                other => other,
            })
    }
}
