//! Revenue module - fee policy, aggregation, floors, conversion and the ledger service.

mod fee_aggregator;
mod fee_policy;
mod revenue_converter;
mod revenue_errors;
mod revenue_model;
mod revenue_service;
mod revenue_traits;

pub use fee_aggregator::{aggregate_fees, apply_floors, FeeAggregation, FlooredBuckets};
pub use fee_policy::{FeePolicy, MultiCurrencyPolicy, DEFAULT_BASE_CURRENCY};
pub use revenue_converter::{convert_buckets, plan_monthly_revenue, settle_ledger, Conversion};
pub use revenue_errors::RevenueError;
pub use revenue_model::*;
pub use revenue_service::RevenueService;
pub use revenue_traits::{MonthlyRevenueRepositoryTrait, RevenueServiceTrait};

#[cfg(test)]
mod revenue_service_tests;
