//! Core error types for the Billfold application.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use chrono::ParseError as ChronoParseError;
use rust_decimal::Decimal;
use std::num::ParseFloatError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the wallet platform.
///
/// This enum represents all possible errors that can occur in the application.
/// Database-specific errors are wrapped in string form to keep this type
/// database-agnostic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Wallet not found: {0}")]
    WalletNotFound(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(
        "Insufficient funds in wallet {wallet_id}: balance {balance}, requested {requested}"
    )]
    InsufficientFunds {
        wallet_id: String,
        balance: Decimal,
        requested: Decimal,
    },

    #[error("Invalid transfer: {0}")]
    InvalidTransfer(String),

    #[error("Currency '{0}' is not supported")]
    UnsupportedCurrency(String),

    #[error("Exchange rate unavailable for {from}/{to}")]
    RateUnavailable { from: String, to: String },

    #[error("Invalid {entity} state transition from {from} to {to}")]
    InvalidStateTransition {
        entity: String,
        from: String,
        to: String,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Resource busy: {0}")]
    Busy(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint was violated.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Failed to parse number: {0}")]
    NumberParse(#[from] ParseFloatError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Unexpected(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
