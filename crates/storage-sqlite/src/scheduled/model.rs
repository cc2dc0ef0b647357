//! Database row type for scheduled payments.

use diesel::prelude::*;

use billfold_core::money::Currency;
use billfold_core::scheduled::{Recurrence, ScheduledPayment, ScheduledPaymentStatus};

use crate::utils::{
    fmt_date, fmt_timestamp, parse_date_lossy, parse_decimal_lossy, parse_enum_lossy,
    parse_timestamp_lossy, parse_uuid_lossy,
};

/// `end_date` must be written back as NULL once cleared, hence
/// `treat_none_as_null`.
#[derive(Queryable, Insertable, AsChangeset, Identifiable, Debug, Clone)]
#[diesel(table_name = crate::schema::scheduled_payments)]
#[diesel(primary_key(id))]
#[diesel(treat_none_as_null = true)]
pub struct ScheduledPaymentRow {
    pub id: String,
    pub source_wallet_id: String,
    pub destination_wallet_id: String,
    pub amount: String,
    pub currency: String,
    pub description: String,
    pub recurrence: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub next_execution_date: String,
    pub execution_count: i32,
    pub max_executions: Option<i32>,
    pub failure_count: i32,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ScheduledPayment> for ScheduledPaymentRow {
    fn from(payment: ScheduledPayment) -> Self {
        Self {
            id: payment.id.to_string(),
            source_wallet_id: payment.source_wallet_id.to_string(),
            destination_wallet_id: payment.destination_wallet_id.to_string(),
            amount: payment.amount.to_string(),
            currency: payment.currency.as_str().to_string(),
            description: payment.description,
            recurrence: payment.recurrence.as_str().to_string(),
            start_date: fmt_date(payment.start_date),
            end_date: payment.end_date.map(fmt_date),
            next_execution_date: fmt_date(payment.next_execution_date),
            execution_count: payment.execution_count as i32,
            max_executions: payment.max_executions.map(|m| m as i32),
            failure_count: payment.failure_count as i32,
            status: payment.status.as_str().to_string(),
            created_at: fmt_timestamp(payment.created_at),
            updated_at: fmt_timestamp(payment.updated_at),
        }
    }
}

impl From<ScheduledPaymentRow> for ScheduledPayment {
    fn from(row: ScheduledPaymentRow) -> Self {
        Self {
            id: parse_uuid_lossy(&row.id, "scheduled payment id"),
            source_wallet_id: parse_uuid_lossy(&row.source_wallet_id, "scheduled payment source"),
            destination_wallet_id: parse_uuid_lossy(
                &row.destination_wallet_id,
                "scheduled payment destination",
            ),
            amount: parse_decimal_lossy(&row.amount, "scheduled payment amount"),
            currency: parse_enum_lossy(&row.currency, "scheduled payment currency", Currency::Usd),
            description: row.description,
            recurrence: parse_enum_lossy(
                &row.recurrence,
                "scheduled payment recurrence",
                Recurrence::Once,
            ),
            start_date: parse_date_lossy(&row.start_date, "scheduled payment start_date"),
            end_date: row
                .end_date
                .as_deref()
                .map(|d| parse_date_lossy(d, "scheduled payment end_date")),
            next_execution_date: parse_date_lossy(
                &row.next_execution_date,
                "scheduled payment next_execution_date",
            ),
            execution_count: row.execution_count.max(0) as u32,
            max_executions: row.max_executions.map(|m| m.max(0) as u32),
            failure_count: row.failure_count.max(0) as u32,
            status: parse_enum_lossy(
                &row.status,
                "scheduled payment status",
                ScheduledPaymentStatus::Failed,
            ),
            created_at: parse_timestamp_lossy(&row.created_at, "scheduled payment created_at"),
            updated_at: parse_timestamp_lossy(&row.updated_at, "scheduled payment updated_at"),
        }
    }
}
