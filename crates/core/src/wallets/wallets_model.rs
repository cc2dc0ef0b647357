//! Wallet domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::Result;
use crate::money::Currency;

/// A single-currency wallet holding a non-negative balance.
///
/// The currency is fixed at creation; every balance change goes through the
/// ledger so the stored balance and the transaction history never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: Uuid,
    pub currency: Currency,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Creates a wallet with a zero balance in the given currency.
    pub fn new(currency: Currency) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            currency,
            balance: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input model for creating a new wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWallet {
    pub currency: String,
}

impl NewWallet {
    /// Validates the request and resolves the currency against the registry.
    pub fn validate(&self) -> Result<Currency> {
        Currency::from_code(&self.currency)
    }
}
