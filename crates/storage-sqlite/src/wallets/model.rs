//! Database row type for wallets.

use diesel::prelude::*;

use billfold_core::money::Currency;
use billfold_core::wallets::Wallet;

use crate::utils::{
    fmt_timestamp, parse_decimal_lossy, parse_enum_lossy, parse_timestamp_lossy, parse_uuid_lossy,
};

#[derive(Queryable, Insertable, Identifiable, Debug, Clone)]
#[diesel(table_name = crate::schema::wallets)]
#[diesel(primary_key(id))]
pub struct WalletRow {
    pub id: String,
    pub currency: String,
    pub balance: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Wallet> for WalletRow {
    fn from(wallet: Wallet) -> Self {
        Self {
            id: wallet.id.to_string(),
            currency: wallet.currency.as_str().to_string(),
            balance: wallet.balance.to_string(),
            created_at: fmt_timestamp(wallet.created_at),
            updated_at: fmt_timestamp(wallet.updated_at),
        }
    }
}

impl From<WalletRow> for Wallet {
    fn from(row: WalletRow) -> Self {
        Self {
            id: parse_uuid_lossy(&row.id, "wallet id"),
            currency: parse_enum_lossy(&row.currency, "wallet currency", Currency::Usd),
            balance: parse_decimal_lossy(&row.balance, "wallet balance"),
            created_at: parse_timestamp_lossy(&row.created_at, "wallet created_at"),
            updated_at: parse_timestamp_lossy(&row.updated_at, "wallet updated_at"),
        }
    }
}
