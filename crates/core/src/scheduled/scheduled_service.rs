use log::debug;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::{DatabaseError, Error, Result};
use crate::money::Money;
use crate::wallets::{wallet_not_found, WalletRepositoryTrait};

use super::scheduled_model::{NewScheduledPayment, ScheduledPayment};
use super::scheduled_traits::{ScheduledPaymentRepositoryTrait, ScheduledPaymentServiceTrait};

/// Service for managing scheduled payment lifecycle.
pub struct ScheduledPaymentService {
    repository: Arc<dyn ScheduledPaymentRepositoryTrait>,
    wallets: Arc<dyn WalletRepositoryTrait>,
}

impl ScheduledPaymentService {
    /// Creates a new ScheduledPaymentService instance.
    pub fn new(
        repository: Arc<dyn ScheduledPaymentRepositoryTrait>,
        wallets: Arc<dyn WalletRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            wallets,
        }
    }
}

/// Maps a storage-level missing record onto the payment error the API exposes.
pub(crate) fn payment_not_found(err: Error, payment_id: Uuid) -> Error {
    match err {
        Error::Database(DatabaseError::NotFound(_)) => {
            Error::NotFound(format!("scheduled payment {}", payment_id))
        }
        other => other,
    }
}

#[async_trait::async_trait]
impl ScheduledPaymentServiceTrait for ScheduledPaymentService {
    async fn create_payment(&self, new_payment: NewScheduledPayment) -> Result<ScheduledPayment> {
        let recurrence = new_payment.validate()?;
        let source = (*self.wallets)
            .get_by_id(new_payment.source_wallet_id)
            .map_err(|e| wallet_not_found(e, new_payment.source_wallet_id))?;
        (*self.wallets)
            .get_by_id(new_payment.destination_wallet_id)
            .map_err(|e| wallet_not_found(e, new_payment.destination_wallet_id))?;
        // The debit is denominated in the source wallet's currency.
        let amount = Money::new(new_payment.amount, source.currency)?;

        let payment = ScheduledPayment::new(&new_payment, recurrence, amount.currency);
        debug!(
            "Creating {} scheduled payment of {} {}, first due {}",
            payment.recurrence, payment.amount, payment.currency, payment.next_execution_date
        );
        (*self.repository).create(payment).await
    }

    fn get_payment(&self, payment_id: Uuid) -> Result<ScheduledPayment> {
        (*self.repository)
            .get_by_id(payment_id)
            .map_err(|e| payment_not_found(e, payment_id))
    }

    fn list_payments(&self) -> Result<Vec<ScheduledPayment>> {
        (*self.repository).list()
    }

    fn list_for_wallet(&self, wallet_id: Uuid) -> Result<Vec<ScheduledPayment>> {
        (*self.wallets)
            .get_by_id(wallet_id)
            .map_err(|e| wallet_not_found(e, wallet_id))?;
        (*self.repository).list_for_wallet(wallet_id)
    }

    async fn pause_payment(&self, payment_id: Uuid) -> Result<ScheduledPayment> {
        let mut payment = self.get_payment(payment_id)?;
        payment.pause()?;
        (*self.repository).update(payment).await
    }

    async fn resume_payment(&self, payment_id: Uuid) -> Result<ScheduledPayment> {
        let mut payment = self.get_payment(payment_id)?;
        payment.resume()?;
        (*self.repository).update(payment).await
    }

    async fn cancel_payment(&self, payment_id: Uuid) -> Result<ScheduledPayment> {
        let mut payment = self.get_payment(payment_id)?;
        let before = payment.status;
        payment.cancel()?;
        if payment.status == before {
            // already cancelled, nothing to persist
            return Ok(payment);
        }
        (*self.repository).update(payment).await
    }
}
