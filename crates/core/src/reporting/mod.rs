//! Read-only reporting projections over the transaction ledger.

mod export;
mod reporting_model;
mod reporting_service;
mod reporting_service_tests;
mod reporting_traits;

// Re-export the public interface
pub use reporting_model::{
    ExportFormat, MonthlySummary, Statement, StatementExport, StatementLine,
};
pub use reporting_service::ReportingService;
pub use reporting_traits::ReportingServiceTrait;
