//! Database row type for exchange quotes.

use diesel::prelude::*;

use billfold_core::fx::{ExchangeQuote, RateSource};
use billfold_core::money::Currency;

use crate::utils::{
    fmt_timestamp, parse_decimal_lossy, parse_enum_lossy, parse_timestamp_lossy,
};

#[derive(Queryable, Insertable, Identifiable, Debug, Clone)]
#[diesel(table_name = crate::schema::exchange_quotes)]
#[diesel(primary_key(id))]
pub struct ExchangeQuoteRow {
    pub id: String,
    pub from_currency: String,
    pub to_currency: String,
    pub rate: String,
    pub source: String,
    pub fetched_at: String,
}

impl From<ExchangeQuote> for ExchangeQuoteRow {
    fn from(quote: ExchangeQuote) -> Self {
        Self {
            id: quote.id,
            from_currency: quote.from_currency.as_str().to_string(),
            to_currency: quote.to_currency.as_str().to_string(),
            rate: quote.rate.to_string(),
            source: quote.source.as_str().to_string(),
            fetched_at: fmt_timestamp(quote.fetched_at),
        }
    }
}

impl From<ExchangeQuoteRow> for ExchangeQuote {
    fn from(row: ExchangeQuoteRow) -> Self {
        Self {
            id: row.id,
            from_currency: parse_enum_lossy(&row.from_currency, "quote from currency", Currency::Usd),
            to_currency: parse_enum_lossy(&row.to_currency, "quote to currency", Currency::Usd),
            rate: parse_decimal_lossy(&row.rate, "quote rate"),
            source: RateSource::from(row.source.as_str()),
            fetched_at: parse_timestamp_lossy(&row.fetched_at, "quote fetched_at"),
        }
    }
}
