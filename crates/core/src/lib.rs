//! Billfold Core - Domain entities, services, and traits.
//!
//! This crate contains the wallet platform's business logic: money and
//! currency primitives, the transaction ledger, currency exchange, recurring
//! scheduled payments, and reporting projections. It is database-agnostic and
//! defines traits that are implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod fx;
pub mod ledger;
pub mod money;
pub mod reporting;
pub mod scheduled;
pub mod wallets;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
