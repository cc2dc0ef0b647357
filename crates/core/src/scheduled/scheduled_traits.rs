use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::Result;

use super::scheduled_model::{EngineRunSummary, NewScheduledPayment, ScheduledPayment};

/// Trait defining scheduled payment persistence operations.
#[async_trait]
pub trait ScheduledPaymentRepositoryTrait: Send + Sync {
    async fn create(&self, payment: ScheduledPayment) -> Result<ScheduledPayment>;

    /// Replaces the stored payment with the given state.
    async fn update(&self, payment: ScheduledPayment) -> Result<ScheduledPayment>;

    fn get_by_id(&self, payment_id: Uuid) -> Result<ScheduledPayment>;

    fn list(&self) -> Result<Vec<ScheduledPayment>>;

    /// Payments whose source wallet is the given wallet.
    fn list_for_wallet(&self, wallet_id: Uuid) -> Result<Vec<ScheduledPayment>>;

    /// ACTIVE payments due on or before `today`.
    fn list_due(&self, today: NaiveDate) -> Result<Vec<ScheduledPayment>>;

    /// ACTIVE payments due in `[from, to_inclusive]`, soonest first.
    fn list_upcoming(&self, from: NaiveDate, to_inclusive: NaiveDate)
        -> Result<Vec<ScheduledPayment>>;

    /// How many ACTIVE or PAUSED payments reference the wallet on either side.
    fn count_open_for_wallet(&self, wallet_id: Uuid) -> Result<i64>;
}

/// Trait defining scheduled payment lifecycle operations.
#[async_trait]
pub trait ScheduledPaymentServiceTrait: Send + Sync {
    async fn create_payment(&self, new_payment: NewScheduledPayment) -> Result<ScheduledPayment>;

    fn get_payment(&self, payment_id: Uuid) -> Result<ScheduledPayment>;

    fn list_payments(&self) -> Result<Vec<ScheduledPayment>>;

    fn list_for_wallet(&self, wallet_id: Uuid) -> Result<Vec<ScheduledPayment>>;

    async fn pause_payment(&self, payment_id: Uuid) -> Result<ScheduledPayment>;

    async fn resume_payment(&self, payment_id: Uuid) -> Result<ScheduledPayment>;

    /// Cancels the payment; cancelling an already cancelled payment is a
    /// successful no-op.
    async fn cancel_payment(&self, payment_id: Uuid) -> Result<ScheduledPayment>;
}

/// Trait defining the due-payment execution engine.
#[async_trait]
pub trait PaymentEngineTrait: Send + Sync {
    /// Executes every payment due on or before `today` and reports what
    /// happened. Individual payment failures are absorbed into the summary.
    async fn run_due_payments(&self, today: NaiveDate) -> Result<EngineRunSummary>;

    /// ACTIVE payments due within the next `within_days` days.
    fn upcoming_payments(
        &self,
        today: NaiveDate,
        within_days: u32,
    ) -> Result<Vec<ScheduledPayment>>;
}
