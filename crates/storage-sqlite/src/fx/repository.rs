//! Exchange quote repository backed by SQLite.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use billfold_core::errors::Result;
use billfold_core::fx::{ExchangeQuote, FxRepositoryTrait};
use billfold_core::money::Currency;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::fx::model::ExchangeQuoteRow;
use crate::schema::exchange_quotes;

pub struct FxRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl FxRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl FxRepositoryTrait for FxRepository {
    async fn upsert(&self, quote: ExchangeQuote) -> Result<ExchangeQuote> {
        self.writer
            .exec(move |conn| {
                let row = ExchangeQuoteRow::from(quote);
                diesel::replace_into(exchange_quotes::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(ExchangeQuote::from(row))
            })
            .await
    }

    fn get_pair(&self, from: Currency, to: Currency) -> Result<Option<ExchangeQuote>> {
        let mut conn = get_connection(&self.pool)?;
        let row = exchange_quotes::table
            .find(ExchangeQuote::make_id(from, to))
            .first::<ExchangeQuoteRow>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(ExchangeQuote::from))
    }

    fn list(&self) -> Result<Vec<ExchangeQuote>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = exchange_quotes::table
            .order(exchange_quotes::id.asc())
            .load::<ExchangeQuoteRow>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(ExchangeQuote::from).collect())
    }
}
