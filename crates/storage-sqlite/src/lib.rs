//! SQLite storage implementation for Billfold.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `billfold-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for wallets, the ledger, exchange quotes,
//!   and scheduled payments
//! - Database-specific row types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist. Everything above it is database-agnostic and works with traits.
//! All writes funnel through a single-writer actor that wraps each job in an
//! immediate transaction; reads go straight to the connection pool.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod fx;
pub mod ledger;
pub mod scheduled;
pub mod wallets;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from billfold-core for convenience
pub use billfold_core::errors::{DatabaseError, Error, Result};
