use chrono::{Datelike, Days, NaiveDate};
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::{Error, Result, ValidationError};
use crate::ledger::{day_end_exclusive, day_start, LedgerRepositoryTrait, TransactionKind};
use crate::wallets::{wallet_not_found, WalletRepositoryTrait};

use super::export;
use super::reporting_model::{
    ExportFormat, MonthlySummary, Statement, StatementExport, StatementLine,
};
use super::reporting_traits::ReportingServiceTrait;

/// Derives statements and summaries by replaying the ledger.
///
/// The opening balance is the wallet's live balance rolled back across every
/// completed transaction at or after the window start; the transactions table
/// is the ledger, so no separate balance history is kept.
pub struct ReportingService {
    wallets: Arc<dyn WalletRepositoryTrait>,
    ledger: Arc<dyn LedgerRepositoryTrait>,
}

impl ReportingService {
    /// Creates a new ReportingService instance.
    pub fn new(
        wallets: Arc<dyn WalletRepositoryTrait>,
        ledger: Arc<dyn LedgerRepositoryTrait>,
    ) -> Self {
        Self { wallets, ledger }
    }
}

/// First and last day of the given calendar month.
fn month_window(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        Error::Validation(ValidationError::InvalidInput(format!(
            "month: {}-{} is not a valid calendar month",
            year, month
        )))
    })?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| Error::Unexpected("month window out of range".to_string()))?;
    let last = next_first
        .checked_sub_days(Days::new(1))
        .ok_or_else(|| Error::Unexpected("month window out of range".to_string()))?;
    Ok((first, last))
}

impl ReportingServiceTrait for ReportingService {
    fn statement(&self, wallet_id: Uuid, start: NaiveDate, end: NaiveDate) -> Result<Statement> {
        if end < start {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "endDate: must not precede startDate".to_string(),
            )));
        }
        let wallet = (*self.wallets)
            .get_by_id(wallet_id)
            .map_err(|e| wallet_not_found(e, wallet_id))?;

        // Everything at or after the window start, oldest first. The suffix
        // sum rolls the live balance back to the opening balance; the part
        // inside the window becomes the statement lines.
        let since = (*self.ledger).list_completed_since(wallet_id, day_start(start))?;
        let window_end = day_end_exclusive(end);

        let mut opening = wallet.balance;
        for tx in &since {
            if let Some(signed) = tx.signed_amount_for(wallet_id) {
                opening -= signed;
            }
        }

        let mut lines = Vec::new();
        let mut running = opening;
        for tx in since {
            if tx.created_at >= window_end {
                break;
            }
            let Some(signed) = tx.signed_amount_for(wallet_id) else {
                continue;
            };
            running += signed;
            lines.push(StatementLine {
                date: tx.created_at,
                kind: tx.kind,
                description: tx.description,
                amount: signed,
                running_balance: running,
                transaction_id: tx.id,
            });
        }

        debug!(
            "Statement for wallet {} over {}..{}: {} line(s)",
            wallet_id,
            start,
            end,
            lines.len()
        );
        Ok(Statement {
            wallet_id,
            currency: wallet.currency,
            start_date: start,
            end_date: end,
            opening_balance: opening,
            closing_balance: running,
            total_transactions: lines.len(),
            lines,
        })
    }

    fn monthly_summary(&self, wallet_id: Uuid, year: i32, month: u32) -> Result<MonthlySummary> {
        let (first, last) = month_window(year, month)?;
        let statement = self.statement(wallet_id, first, last)?;

        let mut deposits = Decimal::ZERO;
        let mut withdrawals = Decimal::ZERO;
        let mut transfers_in = Decimal::ZERO;
        let mut transfers_out = Decimal::ZERO;
        for line in &statement.lines {
            match (line.kind, line.amount.is_sign_negative()) {
                (TransactionKind::Deposit, _) => deposits += line.amount,
                (TransactionKind::Withdrawal, _) => withdrawals += -line.amount,
                (TransactionKind::Transfer, false) => transfers_in += line.amount,
                (TransactionKind::Transfer, true) => transfers_out += -line.amount,
            }
        }

        Ok(MonthlySummary {
            wallet_id,
            month: format!("{:04}-{:02}", first.year(), first.month()),
            currency: statement.currency,
            total_deposits: deposits,
            total_withdrawals: withdrawals,
            total_transfers_in: transfers_in,
            total_transfers_out: transfers_out,
            net_change: statement.closing_balance - statement.opening_balance,
            opening_balance: statement.opening_balance,
            closing_balance: statement.closing_balance,
            transaction_count: statement.total_transactions,
        })
    }

    fn export_statement(
        &self,
        wallet_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
        format: ExportFormat,
    ) -> Result<StatementExport> {
        let statement = self.statement(wallet_id, start, end)?;
        let bytes = match format {
            ExportFormat::Csv => export::to_csv(&statement)?,
            ExportFormat::Pdf => export::to_pdf(&statement),
        };
        Ok(StatementExport {
            content_type: format.content_type(),
            filename: format!(
                "statement-{}-{}-{}.{}",
                wallet_id,
                start,
                end,
                format.extension()
            ),
            bytes,
        })
    }
}
