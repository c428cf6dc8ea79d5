//! Bookings module - booking models, upstream ingestion and storage traits.

mod booking_api_client;
mod booking_ingestion_service;
mod bookings_constants;
mod bookings_model;
mod bookings_traits;

pub use booking_api_client::BookingApiClient;
pub use booking_ingestion_service::BookingIngestionService;
pub use bookings_constants::{default_country_currencies, DEFAULT_PAGE_SIZE};
pub use bookings_model::{month_start, Booking, BookingPage, IngestionSummary, UpstreamBooking};
pub use bookings_traits::{
    BookingIngestionServiceTrait, BookingRepositoryTrait, BookingSourceTrait,
};
