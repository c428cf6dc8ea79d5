use crate::errors::Result;
use crate::revenue::revenue_model::{MonthlyRevenue, RevenueRunReport};
use async_trait::async_trait;

/// Trait for ledger repository operations.
#[async_trait]
pub trait MonthlyRevenueRepositoryTrait: Send + Sync {
    /// All ledger records ordered by month, then owner.
    fn list_monthly_revenue(&self) -> Result<Vec<MonthlyRevenue>>;

    /// Upserts every record keyed by (month, owner_company), replacing currency and
    /// amounts of existing rows. All records commit together or not at all.
    async fn upsert_monthly_revenue(&self, records: Vec<MonthlyRevenue>) -> Result<usize>;
}

/// Trait for revenue service operations.
#[async_trait]
pub trait RevenueServiceTrait: Send + Sync {
    /// Computes the ledger from the stored bookings and rate history and persists it.
    async fn compute_monthly_revenue(&self) -> Result<RevenueRunReport>;

    /// Same computation without writing to the ledger.
    fn preview_monthly_revenue(&self) -> Result<(Vec<MonthlyRevenue>, RevenueRunReport)>;

    fn get_monthly_revenue(&self) -> Result<Vec<MonthlyRevenue>>;
}
