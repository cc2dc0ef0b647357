//! Transaction ledger domain models.
//!
//! The ledger is append-only: a `Transaction` row is written exactly once, as
//! part of the balance mutation it records, and never updated or deleted.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::{Error, ValidationError};
use crate::money::Currency;

/// Kind of ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// External money in; only `destination_wallet_id` is set.
    Deposit,
    /// External money out; only `source_wallet_id` is set.
    Withdrawal,
    /// Wallet-to-wallet movement; both wallet ids are set.
    Transfer,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "DEPOSIT",
            TransactionKind::Withdrawal => "WITHDRAWAL",
            TransactionKind::Transfer => "TRANSFER",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEPOSIT" => Ok(TransactionKind::Deposit),
            "WITHDRAWAL" => Ok(TransactionKind::Withdrawal),
            "TRANSFER" => Ok(TransactionKind::Transfer),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "unknown transaction kind '{}'",
                other
            )))),
        }
    }
}

/// Lifecycle status of a ledger entry.
///
/// Completed operations write COMPLETED records directly. PENDING and
/// REVERSED are representable for compensating flows but are never produced
/// by the ledger itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Reversed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::Failed => "FAILED",
            TransactionStatus::Reversed => "REVERSED",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(TransactionStatus::Pending),
            "COMPLETED" => Ok(TransactionStatus::Completed),
            "FAILED" => Ok(TransactionStatus::Failed),
            "REVERSED" => Ok(TransactionStatus::Reversed),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "unknown transaction status '{}'",
                other
            )))),
        }
    }
}

/// A single immutable ledger entry.
///
/// `amount` is always positive and denominated in `currency` (the source
/// side for transfers). Cross-currency transfers additionally carry the
/// credited `converted_amount`, the `target_currency`, and the applied
/// `exchange_rate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub source_wallet_id: Option<Uuid>,
    pub destination_wallet_id: Option<Uuid>,
    pub amount: Decimal,
    pub currency: Currency,
    pub converted_amount: Option<Decimal>,
    pub target_currency: Option<Currency>,
    pub exchange_rate: Option<Decimal>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// A completed deposit into `wallet_id`.
    pub fn deposit(
        wallet_id: Uuid,
        amount: Decimal,
        currency: Currency,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: TransactionKind::Deposit,
            status: TransactionStatus::Completed,
            source_wallet_id: None,
            destination_wallet_id: Some(wallet_id),
            amount,
            currency,
            converted_amount: None,
            target_currency: None,
            exchange_rate: None,
            description,
            created_at: Utc::now(),
        }
    }

    /// A completed withdrawal from `wallet_id`.
    pub fn withdrawal(
        wallet_id: Uuid,
        amount: Decimal,
        currency: Currency,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: TransactionKind::Withdrawal,
            status: TransactionStatus::Completed,
            source_wallet_id: Some(wallet_id),
            destination_wallet_id: None,
            amount,
            currency,
            converted_amount: None,
            target_currency: None,
            exchange_rate: None,
            description,
            created_at: Utc::now(),
        }
    }

    /// A completed same-currency transfer.
    pub fn transfer(
        source_wallet_id: Uuid,
        destination_wallet_id: Uuid,
        amount: Decimal,
        currency: Currency,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: TransactionKind::Transfer,
            status: TransactionStatus::Completed,
            source_wallet_id: Some(source_wallet_id),
            destination_wallet_id: Some(destination_wallet_id),
            amount,
            currency,
            converted_amount: None,
            target_currency: None,
            exchange_rate: None,
            description,
            created_at: Utc::now(),
        }
    }

    /// A completed cross-currency transfer carrying its conversion details.
    pub fn converted_transfer(
        source_wallet_id: Uuid,
        destination_wallet_id: Uuid,
        amount: Decimal,
        currency: Currency,
        conversion: TransferConversion,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: TransactionKind::Transfer,
            status: TransactionStatus::Completed,
            source_wallet_id: Some(source_wallet_id),
            destination_wallet_id: Some(destination_wallet_id),
            amount,
            currency,
            converted_amount: Some(conversion.converted_amount),
            target_currency: Some(conversion.target_currency),
            exchange_rate: Some(conversion.exchange_rate),
            description,
            created_at: Utc::now(),
        }
    }

    /// The amount this transaction credits to `wallet_id` (positive) or
    /// debits from it (negative). `None` when the transaction does not touch
    /// the wallet.
    pub fn signed_amount_for(&self, wallet_id: Uuid) -> Option<Decimal> {
        if self.destination_wallet_id == Some(wallet_id) {
            return Some(self.converted_amount.unwrap_or(self.amount));
        }
        if self.source_wallet_id == Some(wallet_id) {
            return Some(-self.amount);
        }
        None
    }
}

/// Conversion details attached to a cross-currency transfer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferConversion {
    pub converted_amount: Decimal,
    pub target_currency: Currency,
    pub exchange_rate: Decimal,
}

/// New balance for one wallet, applied together with the transaction record.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceUpdate {
    pub wallet_id: Uuid,
    pub new_balance: Decimal,
}

/// Paging and date filters for the transaction history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// 1-based page number; values below 1 are treated as 1.
    pub page: Option<i64>,
    /// Page size, clamped to 1..=200 (default 50).
    pub size: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
