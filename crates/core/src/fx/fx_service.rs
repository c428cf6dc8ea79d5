use super::fx_model::ExchangeRate;
use super::fx_traits::{FxRepositoryTrait, FxServiceTrait};
use super::rate_index::RateIndex;
use super::rates_csv::parse_rates_csv;
use crate::errors::Result;
use async_trait::async_trait;
use std::io::Read;
use std::sync::Arc;

#[derive(Clone)]
pub struct FxService {
    repository: Arc<dyn FxRepositoryTrait>,
}

impl FxService {
    pub fn new(repository: Arc<dyn FxRepositoryTrait>) -> Self {
        Self { repository }
    }

    /// Parses a rate feed and stores every entry targeting `target_currency`.
    pub async fn import_rates_csv<R: Read>(
        &self,
        reader: R,
        target_currency: &str,
    ) -> Result<usize> {
        let rates = parse_rates_csv(reader, target_currency)?;
        log::info!(
            "Parsed {} {} rate entries from feed",
            rates.len(),
            target_currency
        );
        self.import_exchange_rates(rates).await
    }
}

#[async_trait]
impl FxServiceTrait for FxService {
    fn build_rate_index(&self) -> Result<RateIndex> {
        let history = self.repository.get_historical_exchange_rates()?;
        if history.is_empty() {
            log::warn!("No exchange rates available, every non-base bucket will be skipped");
        }
        let index = RateIndex::build(history);
        log::debug!("Rate index built for {} currency pairs", index.pair_count());
        Ok(index)
    }

    async fn import_exchange_rates(&self, rates: Vec<ExchangeRate>) -> Result<usize> {
        let validated = rates
            .into_iter()
            .map(ExchangeRate::validated)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        if validated.is_empty() {
            return Ok(0);
        }
        let written = self.repository.upsert_exchange_rates(validated).await?;
        log::info!("Currency rates loaded successfully ({} rows)", written);
        Ok(written)
    }
}
