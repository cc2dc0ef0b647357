use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::SCHEDULE_FAILURE_CEILING;
use crate::errors::{Error, Result, ValidationError};
use crate::money::Currency;

use super::recurrence::next_occurrence;

/// How often a scheduled payment fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recurrence {
    Once,
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Recurrence {
    /// Returns the string identifier for this recurrence.
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::Once => "ONCE",
            Recurrence::Daily => "DAILY",
            Recurrence::Weekly => "WEEKLY",
            Recurrence::Biweekly => "BIWEEKLY",
            Recurrence::Monthly => "MONTHLY",
            Recurrence::Quarterly => "QUARTERLY",
            Recurrence::Yearly => "YEARLY",
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ONCE" => Ok(Recurrence::Once),
            "DAILY" => Ok(Recurrence::Daily),
            "WEEKLY" => Ok(Recurrence::Weekly),
            "BIWEEKLY" => Ok(Recurrence::Biweekly),
            "MONTHLY" => Ok(Recurrence::Monthly),
            "QUARTERLY" => Ok(Recurrence::Quarterly),
            "YEARLY" => Ok(Recurrence::Yearly),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "recurrence: unknown value '{}'",
                other
            )))),
        }
    }
}

/// Lifecycle status of a scheduled payment.
///
/// COMPLETED, CANCELLED and FAILED are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduledPaymentStatus {
    Active,
    Paused,
    Completed,
    Cancelled,
    Failed,
}

impl ScheduledPaymentStatus {
    /// Returns the string identifier for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduledPaymentStatus::Active => "ACTIVE",
            ScheduledPaymentStatus::Paused => "PAUSED",
            ScheduledPaymentStatus::Completed => "COMPLETED",
            ScheduledPaymentStatus::Cancelled => "CANCELLED",
            ScheduledPaymentStatus::Failed => "FAILED",
        }
    }

    /// True for statuses the payment can still leave.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            ScheduledPaymentStatus::Active | ScheduledPaymentStatus::Paused
        )
    }
}

impl fmt::Display for ScheduledPaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScheduledPaymentStatus {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(ScheduledPaymentStatus::Active),
            "PAUSED" => Ok(ScheduledPaymentStatus::Paused),
            "COMPLETED" => Ok(ScheduledPaymentStatus::Completed),
            "CANCELLED" => Ok(ScheduledPaymentStatus::Cancelled),
            "FAILED" => Ok(ScheduledPaymentStatus::Failed),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "unknown scheduled payment status '{}'",
                other
            )))),
        }
    }
}

/// A standing instruction to move money between two wallets on a cadence.
///
/// `next_execution_date` is meaningful only while the payment is ACTIVE or
/// PAUSED. `currency` is the source wallet's currency; cross-currency
/// destinations are converted at execution time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledPayment {
    pub id: Uuid,
    pub source_wallet_id: Uuid,
    pub destination_wallet_id: Uuid,
    pub amount: Decimal,
    pub currency: Currency,
    pub description: String,
    pub recurrence: Recurrence,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub next_execution_date: NaiveDate,
    pub execution_count: u32,
    pub max_executions: Option<u32>,
    pub failure_count: u32,
    pub status: ScheduledPaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScheduledPayment {
    /// A freshly created ACTIVE payment, first due on its start date.
    pub fn new(request: &NewScheduledPayment, recurrence: Recurrence, currency: Currency) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            source_wallet_id: request.source_wallet_id,
            destination_wallet_id: request.destination_wallet_id,
            amount: request.amount,
            currency,
            description: request.description.clone(),
            recurrence,
            start_date: request.start_date,
            end_date: request.end_date,
            next_execution_date: request.start_date,
            execution_count: 0,
            max_executions: request.max_executions,
            failure_count: 0,
            status: ScheduledPaymentStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn transition_error(&self, to: ScheduledPaymentStatus) -> Error {
        Error::InvalidStateTransition {
            entity: format!("scheduled payment {}", self.id),
            from: self.status.as_str().to_string(),
            to: to.as_str().to_string(),
        }
    }

    /// ACTIVE → PAUSED.
    pub fn pause(&mut self) -> Result<()> {
        if self.status != ScheduledPaymentStatus::Active {
            return Err(self.transition_error(ScheduledPaymentStatus::Paused));
        }
        self.status = ScheduledPaymentStatus::Paused;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// PAUSED → ACTIVE. The stored `next_execution_date` is kept; a date in
    /// the past is picked up by the next engine tick.
    pub fn resume(&mut self) -> Result<()> {
        if self.status != ScheduledPaymentStatus::Paused {
            return Err(self.transition_error(ScheduledPaymentStatus::Active));
        }
        self.status = ScheduledPaymentStatus::Active;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// ACTIVE or PAUSED → CANCELLED. Cancelling an already cancelled payment
    /// succeeds without changing anything.
    pub fn cancel(&mut self) -> Result<()> {
        match self.status {
            ScheduledPaymentStatus::Cancelled => Ok(()),
            ScheduledPaymentStatus::Active | ScheduledPaymentStatus::Paused => {
                self.status = ScheduledPaymentStatus::Cancelled;
                self.updated_at = Utc::now();
                Ok(())
            }
            _ => Err(self.transition_error(ScheduledPaymentStatus::Cancelled)),
        }
    }

    /// Books one successful occurrence.
    ///
    /// Advances `next_execution_date` by one period from its previous value,
    /// never from the execution day, so late ticks cannot drift the cadence.
    /// Terminal checks run in order: one-shot, execution ceiling, end date.
    pub fn record_success(&mut self) {
        self.execution_count += 1;
        self.failure_count = 0;
        self.updated_at = Utc::now();

        if self.recurrence == Recurrence::Once {
            self.status = ScheduledPaymentStatus::Completed;
            return;
        }
        if let Some(max) = self.max_executions {
            if self.execution_count >= max {
                self.status = ScheduledPaymentStatus::Completed;
                return;
            }
        }
        match next_occurrence(self.recurrence, self.start_date, self.next_execution_date) {
            Some(next) => {
                if self.end_date.map_or(false, |end| next > end) {
                    self.status = ScheduledPaymentStatus::Completed;
                } else {
                    self.next_execution_date = next;
                }
            }
            None => self.status = ScheduledPaymentStatus::Completed,
        }
    }

    /// Books one failed occurrence. The same occurrence stays due for the
    /// next tick until the consecutive-failure ceiling disables the payment.
    pub fn record_failure(&mut self) {
        self.failure_count += 1;
        self.updated_at = Utc::now();
        if self.failure_count >= SCHEDULE_FAILURE_CEILING {
            self.status = ScheduledPaymentStatus::Failed;
        }
    }
}

/// Request payload for creating a scheduled payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScheduledPayment {
    pub source_wallet_id: Uuid,
    pub destination_wallet_id: Uuid,
    pub amount: Decimal,
    pub description: String,
    pub recurrence: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub max_executions: Option<u32>,
}

impl NewScheduledPayment {
    /// Validates the request and resolves the recurrence.
    pub fn validate(&self) -> Result<Recurrence> {
        let recurrence = Recurrence::from_str(&self.recurrence)?;
        if self.source_wallet_id == self.destination_wallet_id {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "destinationWalletId: must differ from sourceWalletId".to_string(),
            )));
        }
        if self.amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "amount: must be positive".to_string(),
            )));
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "endDate: must not precede startDate".to_string(),
                )));
            }
        }
        if let Some(max) = self.max_executions {
            if max == 0 {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "maxExecutions: must be at least 1".to_string(),
                )));
            }
        }
        Ok(recurrence)
    }
}

/// Outcome of one engine pass over the due payments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineRunSummary {
    pub due: usize,
    pub executed: usize,
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl fmt::Display for EngineRunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "due={} executed={} completed={} failed={} skipped={}",
            self.due, self.executed, self.completed, self.failed, self.skipped
        )
    }
}
