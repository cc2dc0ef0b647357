use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::constants::SCHEDULED_TRANSFER_PREFIX;
use crate::errors::{Error, Result};
use crate::fx::ConversionServiceTrait;
use crate::ledger::LedgerServiceTrait;
use crate::wallets::{wallet_not_found, WalletRepositoryTrait};

use super::scheduled_model::{EngineRunSummary, ScheduledPayment, ScheduledPaymentStatus};
use super::scheduled_traits::{PaymentEngineTrait, ScheduledPaymentRepositoryTrait};

/// Executes due scheduled payments through the ledger.
///
/// An in-flight guard keyed by payment id makes overlapping runs safe: a
/// payment being executed by one pass is skipped by any concurrent pass, so
/// the same occurrence never fires twice.
pub struct PaymentEngine {
    repository: Arc<dyn ScheduledPaymentRepositoryTrait>,
    wallets: Arc<dyn WalletRepositoryTrait>,
    ledger: Arc<dyn LedgerServiceTrait>,
    converter: Arc<dyn ConversionServiceTrait>,
    in_flight: DashMap<Uuid, ()>,
}

impl PaymentEngine {
    pub fn new(
        repository: Arc<dyn ScheduledPaymentRepositoryTrait>,
        wallets: Arc<dyn WalletRepositoryTrait>,
        ledger: Arc<dyn LedgerServiceTrait>,
        converter: Arc<dyn ConversionServiceTrait>,
    ) -> Self {
        Self {
            repository,
            wallets,
            ledger,
            converter,
            in_flight: DashMap::new(),
        }
    }

    /// Runs one occurrence and persists the advanced payment state.
    ///
    /// The boolean reports whether the money actually moved; a `false` means
    /// the failure was booked against the payment. An `Err` is a storage
    /// fault persisting the outcome.
    async fn execute_one(&self, payment: &ScheduledPayment) -> Result<(ScheduledPayment, bool)> {
        let description = format!("{}{}", SCHEDULED_TRANSFER_PREFIX, payment.description);
        let outcome = self.move_money(payment, description).await;

        let mut updated = payment.clone();
        let executed = match outcome {
            Ok(transaction_id) => {
                log::debug!(
                    "Scheduled payment {} executed as transaction {}",
                    payment.id,
                    transaction_id
                );
                updated.record_success();
                true
            }
            Err(e) => {
                log::warn!("Scheduled payment {} failed: {}", payment.id, e);
                updated.record_failure();
                false
            }
        };
        let saved = (*self.repository).update(updated).await?;
        Ok((saved, executed))
    }

    /// One transfer, converted when the wallets disagree on currency.
    async fn move_money(&self, payment: &ScheduledPayment, description: String) -> Result<Uuid> {
        let source = (*self.wallets)
            .get_by_id(payment.source_wallet_id)
            .map_err(|e| wallet_not_found(e, payment.source_wallet_id))?;
        let destination = (*self.wallets)
            .get_by_id(payment.destination_wallet_id)
            .map_err(|e| wallet_not_found(e, payment.destination_wallet_id))?;

        if source.currency == destination.currency {
            let transaction = self
                .ledger
                .transfer(
                    payment.source_wallet_id,
                    payment.destination_wallet_id,
                    payment.amount,
                    Some(description),
                )
                .await?;
            Ok(transaction.id)
        } else {
            let (transaction, _) = self
                .converter
                .convert_transfer(
                    payment.source_wallet_id,
                    payment.destination_wallet_id,
                    payment.amount,
                    Some(description),
                )
                .await?;
            Ok(transaction.id)
        }
    }
}

#[async_trait]
impl PaymentEngineTrait for PaymentEngine {
    async fn run_due_payments(&self, today: NaiveDate) -> Result<EngineRunSummary> {
        let due = (*self.repository).list_due(today)?;
        let mut summary = EngineRunSummary {
            due: due.len(),
            ..EngineRunSummary::default()
        };

        for payment in due {
            match self.in_flight.entry(payment.id) {
                Entry::Occupied(_) => {
                    summary.skipped += 1;
                    continue;
                }
                Entry::Vacant(slot) => {
                    slot.insert(());
                }
            }

            let outcome = self.execute_one(&payment).await;
            self.in_flight.remove(&payment.id);

            match outcome {
                Ok((saved, true)) => {
                    summary.executed += 1;
                    if saved.status == ScheduledPaymentStatus::Completed {
                        summary.completed += 1;
                        log::info!(
                            "Scheduled payment {} completed after {} execution(s)",
                            saved.id,
                            saved.execution_count
                        );
                    }
                }
                Ok((saved, false)) => {
                    summary.failed += 1;
                    if saved.status == ScheduledPaymentStatus::Failed {
                        log::error!(
                            "Scheduled payment {} disabled after {} consecutive failures",
                            saved.id,
                            saved.failure_count
                        );
                    }
                }
                Err(e) => {
                    summary.failed += 1;
                    log::error!("Could not persist scheduled payment {}: {}", payment.id, e);
                }
            }
        }
        Ok(summary)
    }

    fn upcoming_payments(
        &self,
        today: NaiveDate,
        within_days: u32,
    ) -> Result<Vec<ScheduledPayment>> {
        let horizon = today
            .checked_add_days(Days::new(u64::from(within_days)))
            .ok_or_else(|| Error::Unexpected("Reminder horizon out of range".to_string()))?;
        (*self.repository).list_upcoming(today, horizon)
    }
}
