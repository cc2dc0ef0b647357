//! Scheduled payment repository backed by SQLite.
//!
//! Due and upcoming queries compare `%Y-%m-%d` date strings, which order the
//! same as the dates they encode.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use uuid::Uuid;

use billfold_core::errors::{DatabaseError, Error, Result};
use billfold_core::scheduled::{ScheduledPayment, ScheduledPaymentRepositoryTrait};

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::scheduled::model::ScheduledPaymentRow;
use crate::schema::scheduled_payments;
use crate::utils::fmt_date;

const STATUS_ACTIVE: &str = "ACTIVE";
const OPEN_STATUSES: [&str; 2] = ["ACTIVE", "PAUSED"];

pub struct ScheduledPaymentRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ScheduledPaymentRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ScheduledPaymentRepositoryTrait for ScheduledPaymentRepository {
    async fn create(&self, payment: ScheduledPayment) -> Result<ScheduledPayment> {
        self.writer
            .exec(move |conn| {
                let row = ScheduledPaymentRow::from(payment);
                diesel::insert_into(scheduled_payments::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(ScheduledPayment::from(row))
            })
            .await
    }

    async fn update(&self, payment: ScheduledPayment) -> Result<ScheduledPayment> {
        self.writer
            .exec(move |conn| {
                let row = ScheduledPaymentRow::from(payment);
                let affected = diesel::update(scheduled_payments::table.find(row.id.clone()))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(format!(
                        "scheduled payment {} not found",
                        row.id
                    ))));
                }
                Ok(ScheduledPayment::from(row))
            })
            .await
    }

    fn get_by_id(&self, payment_id: Uuid) -> Result<ScheduledPayment> {
        let mut conn = get_connection(&self.pool)?;
        let row = scheduled_payments::table
            .find(payment_id.to_string())
            .first::<ScheduledPaymentRow>(&mut conn)
            .into_core()?;
        Ok(row.into())
    }

    fn list(&self) -> Result<Vec<ScheduledPayment>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = scheduled_payments::table
            .order(scheduled_payments::created_at.desc())
            .load::<ScheduledPaymentRow>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(ScheduledPayment::from).collect())
    }

    fn list_for_wallet(&self, wallet_id: Uuid) -> Result<Vec<ScheduledPayment>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = scheduled_payments::table
            .filter(scheduled_payments::source_wallet_id.eq(wallet_id.to_string()))
            .order(scheduled_payments::created_at.desc())
            .load::<ScheduledPaymentRow>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(ScheduledPayment::from).collect())
    }

    fn list_due(&self, today: NaiveDate) -> Result<Vec<ScheduledPayment>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = scheduled_payments::table
            .filter(scheduled_payments::status.eq(STATUS_ACTIVE))
            .filter(scheduled_payments::next_execution_date.le(fmt_date(today)))
            .order(scheduled_payments::next_execution_date.asc())
            .load::<ScheduledPaymentRow>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(ScheduledPayment::from).collect())
    }

    fn list_upcoming(
        &self,
        from: NaiveDate,
        to_inclusive: NaiveDate,
    ) -> Result<Vec<ScheduledPayment>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = scheduled_payments::table
            .filter(scheduled_payments::status.eq(STATUS_ACTIVE))
            .filter(scheduled_payments::next_execution_date.ge(fmt_date(from)))
            .filter(scheduled_payments::next_execution_date.le(fmt_date(to_inclusive)))
            .order(scheduled_payments::next_execution_date.asc())
            .load::<ScheduledPaymentRow>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(ScheduledPayment::from).collect())
    }

    fn count_open_for_wallet(&self, wallet_id: Uuid) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        let wid = wallet_id.to_string();
        scheduled_payments::table
            .filter(scheduled_payments::status.eq_any(OPEN_STATUSES))
            .filter(
                scheduled_payments::source_wallet_id
                    .eq(wid.clone())
                    .or(scheduled_payments::destination_wallet_id.eq(wid)),
            )
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()
    }
}
