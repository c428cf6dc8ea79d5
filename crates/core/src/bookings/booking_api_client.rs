use crate::bookings::bookings_model::BookingPage;
use crate::bookings::bookings_traits::BookingSourceTrait;
use crate::errors::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;

/// HTTP client for the paginated upstream bookings API
/// (`GET {base_url}?page=N&per_page=M`).
pub struct BookingApiClient {
    client: Client,
    base_url: String,
}

impl BookingApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        BookingApiClient {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl BookingSourceTrait for BookingApiClient {
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<BookingPage> {
        let page = page.to_string();
        let per_page = per_page.to_string();
        let url = reqwest::Url::parse_with_params(
            &self.base_url,
            &[("page", page.as_str()), ("per_page", per_page.as_str())],
        )
        .map_err(|e| Error::Ingestion(format!("Failed to build URL: {}", e)))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Ingestion(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("Bookings API returned {}: {}", status, error_body);
            return Err(Error::Ingestion(format!(
                "Bookings API error {}: {}",
                status,
                error_body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json::<BookingPage>()
            .await
            .map_err(|e| Error::Ingestion(format!("Malformed bookings page {}: {}", page, e)))
    }
}
