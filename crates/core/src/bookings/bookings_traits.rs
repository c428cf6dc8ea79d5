use crate::bookings::bookings_model::{Booking, BookingPage, IngestionSummary};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait for booking repository operations.
#[async_trait]
pub trait BookingRepositoryTrait: Send + Sync {
    fn list_bookings(&self) -> Result<Vec<Booking>>;

    /// Inserts bookings whose id is not already stored; existing ids are left untouched.
    /// Returns the number of rows actually inserted.
    async fn insert_new_bookings(&self, bookings: Vec<Booking>) -> Result<usize>;
}

/// Source of upstream booking pages (1-based page numbers).
#[async_trait]
pub trait BookingSourceTrait: Send + Sync {
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<BookingPage>;
}

/// Trait for booking ingestion operations.
#[async_trait]
pub trait BookingIngestionServiceTrait: Send + Sync {
    async fn ingest(&self) -> Result<IngestionSummary>;
}
