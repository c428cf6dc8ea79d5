//! SQLite storage implementation for currency rates.

mod model;
mod repository;

pub use model::CurrencyRateDB;
pub use repository::FxRepository;
