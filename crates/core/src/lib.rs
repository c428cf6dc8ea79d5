//! FeeLedger Core - Domain entities, services, and traits.
//!
//! This crate contains the revenue computation logic for FeeLedger:
//! booking ingestion, the FX rate index, fee aggregation, minimum-fee floors
//! and conversion into the monthly revenue ledger.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod bookings;
pub mod constants;
pub mod errors;
pub mod fx;
pub mod revenue;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
