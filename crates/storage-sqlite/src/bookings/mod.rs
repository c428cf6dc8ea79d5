//! SQLite storage implementation for bookings.

mod model;
mod repository;

pub use model::BookingDB;
pub use repository::BookingRepository;
