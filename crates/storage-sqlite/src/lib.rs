//! SQLite storage implementation for FeeLedger.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `feeledger-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for bookings, currency rates and the revenue ledger
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! `core` is database-agnostic and works with traits.
//!
//! ```text
//!        core (domain)
//!              │
//!              ▼
//!   storage-sqlite (this crate)
//!              │
//!              ▼
//!          SQLite DB
//! ```
//!
//! All writes go through a single writer actor ([`WriteHandle`]); each job runs
//! in one immediate transaction.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod bookings;
pub mod fx;
pub mod revenue;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export repositories
pub use bookings::BookingRepository;
pub use fx::FxRepository;
pub use revenue::MonthlyRevenueRepository;

// Re-export from feeledger-core for convenience
pub use feeledger_core::errors::{DatabaseError, Error, Result};
