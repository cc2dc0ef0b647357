//! Reporting service trait.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::Result;

use super::reporting_model::{ExportFormat, MonthlySummary, Statement, StatementExport};

/// Trait defining read-only reporting projections.
///
/// Implementations replay persisted ledger records and never mutate anything.
pub trait ReportingServiceTrait: Send + Sync {
    /// Replays the wallet's completed transactions within `[start, end]`
    /// into a statement with a running balance.
    fn statement(&self, wallet_id: Uuid, start: NaiveDate, end: NaiveDate) -> Result<Statement>;

    /// Credit/debit totals for one calendar month.
    fn monthly_summary(&self, wallet_id: Uuid, year: i32, month: u32) -> Result<MonthlySummary>;

    /// Renders a statement as a downloadable CSV or PDF file.
    fn export_statement(
        &self,
        wallet_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
        format: ExportFormat,
    ) -> Result<StatementExport>;
}
