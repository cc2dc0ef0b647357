//! Reporting domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::{Error, ValidationError};
use crate::ledger::TransactionKind;
use crate::money::Currency;

/// One ledger entry as it appears on a statement.
///
/// `amount` is signed from the wallet's point of view: credits positive,
/// debits negative. `running_balance` is the balance after this entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementLine {
    pub date: DateTime<Utc>,
    pub kind: TransactionKind,
    pub description: Option<String>,
    pub amount: Decimal,
    pub running_balance: Decimal,
    pub transaction_id: Uuid,
}

/// A wallet statement over a date window, replayed from the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    pub wallet_id: Uuid,
    pub currency: Currency,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub opening_balance: Decimal,
    pub closing_balance: Decimal,
    pub total_transactions: usize,
    pub lines: Vec<StatementLine>,
}

/// Credit/debit totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub wallet_id: Uuid,
    /// `"YYYY-MM"`.
    pub month: String,
    pub currency: Currency,
    pub total_deposits: Decimal,
    pub total_withdrawals: Decimal,
    pub total_transfers_in: Decimal,
    pub total_transfers_out: Decimal,
    pub net_change: Decimal,
    pub opening_balance: Decimal,
    pub closing_balance: Decimal,
    pub transaction_count: usize,
}

/// File format for statement export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "format: unknown value '{}'",
                other
            )))),
        }
    }
}

/// A rendered statement ready to be served as a file download.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementExport {
    pub content_type: &'static str,
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_parsing() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_metadata() {
        assert_eq!(ExportFormat::Csv.content_type(), "text/csv");
        assert_eq!(ExportFormat::Pdf.content_type(), "application/pdf");
        assert_eq!(ExportFormat::Pdf.extension(), "pdf");
    }
}
