use super::fx_model::ExchangeRate;
use super::rate_index::RateIndex;
use crate::errors::Result;
use async_trait::async_trait;

/// Trait defining the contract for FX history storage.
#[async_trait]
pub trait FxRepositoryTrait: Send + Sync {
    /// Every stored entry, all pairs and dates.
    fn get_historical_exchange_rates(&self) -> Result<Vec<ExchangeRate>>;

    /// Inserts or replaces entries keyed by (from, to, rate date), in one transaction.
    async fn upsert_exchange_rates(&self, rates: Vec<ExchangeRate>) -> Result<usize>;
}

/// Trait defining the contract for FX service operations.
#[async_trait]
pub trait FxServiceTrait: Send + Sync {
    /// Builds the lookback index from the full stored history.
    fn build_rate_index(&self) -> Result<RateIndex>;

    /// Validates and stores a batch of history entries; returns rows written.
    async fn import_exchange_rates(&self, rates: Vec<ExchangeRate>) -> Result<usize>;
}
