//! Wallet repository backed by SQLite.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use billfold_core::errors::Result;
use billfold_core::wallets::{Wallet, WalletRepositoryTrait};

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{scheduled_payments, wallets};
use crate::wallets::model::WalletRow;

pub struct WalletRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl WalletRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl WalletRepositoryTrait for WalletRepository {
    async fn create(&self, wallet: Wallet) -> Result<Wallet> {
        self.writer
            .exec(move |conn| {
                let row = WalletRow::from(wallet);
                diesel::insert_into(wallets::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(Wallet::from(row))
            })
            .await
    }

    async fn delete(&self, wallet_id: Uuid) -> Result<usize> {
        self.writer
            .exec(move |conn| {
                // Settled schedules still reference the wallet through NOT
                // NULL columns; the service has already refused deletion when
                // open ones exist. Ledger rows keep the history and drop the
                // wallet reference via ON DELETE SET NULL.
                let wid = wallet_id.to_string();
                diesel::delete(
                    scheduled_payments::table.filter(
                        scheduled_payments::source_wallet_id
                            .eq(wid.clone())
                            .or(scheduled_payments::destination_wallet_id.eq(wid.clone())),
                    ),
                )
                .execute(conn)
                .into_core()?;
                diesel::delete(wallets::table.find(wid))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    fn get_by_id(&self, wallet_id: Uuid) -> Result<Wallet> {
        let mut conn = get_connection(&self.pool)?;
        let row = wallets::table
            .find(wallet_id.to_string())
            .first::<WalletRow>(&mut conn)
            .into_core()?;
        Ok(row.into())
    }

    fn list(&self) -> Result<Vec<Wallet>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = wallets::table
            .order(wallets::created_at.desc())
            .load::<WalletRow>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Wallet::from).collect())
    }
}
