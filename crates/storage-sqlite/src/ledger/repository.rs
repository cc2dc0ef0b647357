//! Ledger repository backed by SQLite.
//!
//! `apply` is the only write path: the balance updates and the transaction
//! record land in one immediate transaction on the writer's connection, so a
//! failure on any row rolls back all of them.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use billfold_core::errors::{Error, Result};
use billfold_core::ledger::{BalanceUpdate, LedgerRepositoryTrait, Transaction};

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::ledger::model::TransactionRow;
use crate::schema::{transactions, wallets};
use crate::utils::fmt_timestamp;

const STATUS_COMPLETED: &str = "COMPLETED";

pub struct LedgerRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl LedgerRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl LedgerRepositoryTrait for LedgerRepository {
    async fn apply(
        &self,
        updates: Vec<BalanceUpdate>,
        transaction: Transaction,
    ) -> Result<Transaction> {
        self.writer
            .exec(move |conn| {
                let touched_at = fmt_timestamp(Utc::now());
                for update in &updates {
                    let affected = diesel::update(
                        wallets::table.find(update.wallet_id.to_string()),
                    )
                    .set((
                        wallets::balance.eq(update.new_balance.to_string()),
                        wallets::updated_at.eq(touched_at.clone()),
                    ))
                    .execute(conn)
                    .into_core()?;
                    if affected == 0 {
                        return Err(Error::WalletNotFound(update.wallet_id.to_string()));
                    }
                }

                let row = TransactionRow::from(&transaction);
                diesel::insert_into(transactions::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(transaction)
            })
            .await
    }

    fn get_by_id(&self, transaction_id: Uuid) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;
        let row = transactions::table
            .find(transaction_id.to_string())
            .first::<TransactionRow>(&mut conn)
            .into_core()?;
        Ok(row.into())
    }

    fn list_for_wallet(
        &self,
        wallet_id: Uuid,
        limit: i64,
        offset: i64,
        start: Option<DateTime<Utc>>,
        end_exclusive: Option<DateTime<Utc>>,
    ) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let wid = wallet_id.to_string();

        let mut query = transactions::table
            .filter(
                transactions::source_wallet_id
                    .eq(wid.clone())
                    .or(transactions::destination_wallet_id.eq(wid)),
            )
            .into_boxed();
        if let Some(start) = start {
            query = query.filter(transactions::created_at.ge(fmt_timestamp(start)));
        }
        if let Some(end) = end_exclusive {
            query = query.filter(transactions::created_at.lt(fmt_timestamp(end)));
        }

        let rows = query
            .order(transactions::created_at.desc())
            .limit(limit)
            .offset(offset)
            .load::<TransactionRow>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    fn list_completed_since(
        &self,
        wallet_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let wid = wallet_id.to_string();

        let rows = transactions::table
            .filter(
                transactions::source_wallet_id
                    .eq(wid.clone())
                    .or(transactions::destination_wallet_id.eq(wid)),
            )
            .filter(transactions::status.eq(STATUS_COMPLETED))
            .filter(transactions::created_at.ge(fmt_timestamp(since)))
            .order(transactions::created_at.asc())
            .load::<TransactionRow>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Transaction::from).collect())
    }
}
