use crate::bookings::bookings_model::{Booking, IngestionSummary};
use crate::bookings::bookings_traits::{
    BookingIngestionServiceTrait, BookingRepositoryTrait, BookingSourceTrait,
};
use crate::errors::{Error, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Walks the upstream bookings API page by page and stores every booking
/// whose owner country maps to a billing currency.
pub struct BookingIngestionService {
    source: Arc<dyn BookingSourceTrait>,
    repository: Arc<dyn BookingRepositoryTrait>,
    country_currencies: BTreeMap<String, String>,
    per_page: u32,
}

impl BookingIngestionService {
    pub fn new(
        source: Arc<dyn BookingSourceTrait>,
        repository: Arc<dyn BookingRepositoryTrait>,
        country_currencies: BTreeMap<String, String>,
        per_page: u32,
    ) -> Self {
        Self {
            source,
            repository,
            country_currencies,
            per_page,
        }
    }
}

#[async_trait]
impl BookingIngestionServiceTrait for BookingIngestionService {
    async fn ingest(&self) -> Result<IngestionSummary> {
        if self.per_page == 0 {
            return Err(Error::InvalidConfigValue(
                "bookings page size must be at least 1".to_string(),
            ));
        }

        info!("Starting bookings ingestion...");
        let mut summary = IngestionSummary::default();
        let mut page: u32 = 1;

        loop {
            let data = self.source.fetch_page(page, self.per_page).await?;
            summary.pages_fetched += 1;

            if data.results.is_empty() {
                break;
            }
            summary.bookings_received += data.results.len();

            let mut records: Vec<Booking> = Vec::with_capacity(data.results.len());
            for upstream in data.results {
                match self.country_currencies.get(&upstream.owner_company_country) {
                    Some(currency) => records.push(upstream.into_booking(currency.clone())),
                    None => {
                        warn!(
                            "Currency not found for country {}, skipping booking {}",
                            upstream.owner_company_country, upstream.booking_id
                        );
                        summary.bookings_skipped += 1;
                    }
                }
            }

            let prepared = records.len();
            let inserted = self.repository.insert_new_bookings(records).await?;
            summary.bookings_inserted += inserted;
            debug!(
                "Page {} processed: {} prepared, {} new bookings stored",
                page, prepared, inserted
            );

            if u64::from(page) * u64::from(self.per_page) >= data.total {
                break;
            }
            page += 1;
        }

        info!(
            "Ingestion complete. {} bookings received, {} inserted, {} skipped",
            summary.bookings_received, summary.bookings_inserted, summary.bookings_skipped
        );
        Ok(summary)
    }
}
