//! Database row type for ledger entries.

use diesel::prelude::*;

use billfold_core::ledger::{Transaction, TransactionKind, TransactionStatus};
use billfold_core::money::Currency;

use crate::utils::{
    fmt_timestamp, parse_decimal_lossy, parse_enum_lossy, parse_timestamp_lossy, parse_uuid_lossy,
};

#[derive(Queryable, Insertable, Identifiable, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(primary_key(id))]
pub struct TransactionRow {
    pub id: String,
    pub kind: String,
    pub status: String,
    pub source_wallet_id: Option<String>,
    pub destination_wallet_id: Option<String>,
    pub amount: String,
    pub currency: String,
    pub converted_amount: Option<String>,
    pub target_currency: Option<String>,
    pub exchange_rate: Option<String>,
    pub description: Option<String>,
    pub created_at: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id.to_string(),
            kind: tx.kind.as_str().to_string(),
            status: tx.status.as_str().to_string(),
            source_wallet_id: tx.source_wallet_id.map(|id| id.to_string()),
            destination_wallet_id: tx.destination_wallet_id.map(|id| id.to_string()),
            amount: tx.amount.to_string(),
            currency: tx.currency.as_str().to_string(),
            converted_amount: tx.converted_amount.map(|a| a.to_string()),
            target_currency: tx.target_currency.map(|c| c.as_str().to_string()),
            exchange_rate: tx.exchange_rate.map(|r| r.to_string()),
            description: tx.description.clone(),
            created_at: fmt_timestamp(tx.created_at),
        }
    }
}

impl From<TransactionRow> for Transaction {
    fn from(row: TransactionRow) -> Self {
        Self {
            id: parse_uuid_lossy(&row.id, "transaction id"),
            kind: parse_enum_lossy(&row.kind, "transaction kind", TransactionKind::Transfer),
            status: parse_enum_lossy(
                &row.status,
                "transaction status",
                TransactionStatus::Failed,
            ),
            source_wallet_id: row
                .source_wallet_id
                .as_deref()
                .map(|id| parse_uuid_lossy(id, "transaction source wallet")),
            destination_wallet_id: row
                .destination_wallet_id
                .as_deref()
                .map(|id| parse_uuid_lossy(id, "transaction destination wallet")),
            amount: parse_decimal_lossy(&row.amount, "transaction amount"),
            currency: parse_enum_lossy(&row.currency, "transaction currency", Currency::Usd),
            converted_amount: row
                .converted_amount
                .as_deref()
                .map(|a| parse_decimal_lossy(a, "transaction converted amount")),
            target_currency: row
                .target_currency
                .as_deref()
                .map(|c| parse_enum_lossy(c, "transaction target currency", Currency::Usd)),
            exchange_rate: row
                .exchange_rate
                .as_deref()
                .map(|r| parse_decimal_lossy(r, "transaction exchange rate")),
            description: row.description,
            created_at: parse_timestamp_lossy(&row.created_at, "transaction created_at"),
        }
    }
}
