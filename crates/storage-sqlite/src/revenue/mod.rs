//! SQLite storage implementation for the monthly revenue ledger.

mod model;
mod repository;

pub use model::MonthlyRevenueDB;
pub use repository::MonthlyRevenueRepository;
