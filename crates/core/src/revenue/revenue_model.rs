//! Revenue domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::fx::RejectedRate;

/// Aggregation unit of the engine.
///
/// Field order gives the ordering used everywhere buckets are listed:
/// month, then owner, then currency.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketKey {
    pub month: NaiveDate,
    pub owner_company: String,
    pub currency: String,
}

impl BucketKey {
    pub fn new(month: NaiveDate, owner_company: &str, currency: &str) -> Self {
        Self {
            month,
            owner_company: owner_company.to_string(),
            currency: currency.to_string(),
        }
    }

    /// The ledger key this bucket settles into.
    pub fn ledger_key(&self) -> (NaiveDate, String) {
        (self.month, self.owner_company.clone())
    }
}

/// A bucket after floor enforcement and conversion into the base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedBucket {
    pub key: BucketKey,
    pub floored_total: Decimal,
    pub rate: Decimal,
    pub base_currency: String,
    pub revenue_base: Decimal,
}

/// Persisted ledger row, unique per (month, owner_company).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    pub month: NaiveDate,
    pub owner_company: String,
    pub original_currency: String,
    /// Floored fee total in `original_currency`.
    pub revenue: Decimal,
    /// `revenue` converted into `base_currency`.
    pub revenue_base: Decimal,
    /// Base currency in force when the record was computed.
    pub base_currency: String,
}

impl From<ConvertedBucket> for MonthlyRevenue {
    fn from(bucket: ConvertedBucket) -> Self {
        MonthlyRevenue {
            month: bucket.key.month,
            owner_company: bucket.key.owner_company,
            original_currency: bucket.key.currency,
            revenue: bucket.floored_total,
            revenue_base: bucket.revenue_base,
            base_currency: bucket.base_currency,
        }
    }
}

/// A bucket left out of the ledger because no rate resolved for its month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedBucket {
    pub key: BucketKey,
    pub floored_total: Decimal,
}

/// A converted bucket that lost to another currency of the same (month, owner).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollapsedBucket {
    pub bucket: ConvertedBucket,
    /// Currency written to the ledger instead, if any.
    pub kept_currency: Option<String>,
}

/// Everything a run would write, plus the per-bucket anomalies met on the way.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenuePlan {
    pub records: Vec<MonthlyRevenue>,
    pub bucket_count: usize,
    pub skipped_missing_rate: Vec<SkippedBucket>,
    pub collapsed: Vec<CollapsedBucket>,
    /// Booking currency -> number of bookings charged a zero fee for lack of a schedule entry.
    pub unknown_currencies: BTreeMap<String, usize>,
    /// Bucket currencies with no minimum fee configured (floor of zero).
    pub currencies_without_floor: BTreeSet<String>,
    /// FX history entries the rate index refused.
    pub invalid_rates: Vec<RejectedRate>,
    /// Buckets dropped because a total or conversion exceeded the decimal range.
    pub overflowed: Vec<BucketKey>,
}

/// Outcome of a computation run, reported to the caller and logged at run end.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueRunReport {
    pub base_currency: String,
    pub bookings_read: usize,
    pub rate_pairs: usize,
    pub buckets: usize,
    pub records_written: usize,
    pub dry_run: bool,
    pub skipped_missing_rate: Vec<SkippedBucket>,
    pub collapsed: Vec<CollapsedBucket>,
    pub unknown_currencies: BTreeMap<String, usize>,
    pub currencies_without_floor: BTreeSet<String>,
    pub invalid_rates: Vec<RejectedRate>,
    pub overflowed: Vec<BucketKey>,
}

impl RevenueRunReport {
    pub fn has_anomalies(&self) -> bool {
        !self.skipped_missing_rate.is_empty()
            || !self.collapsed.is_empty()
            || !self.unknown_currencies.is_empty()
            || !self.currencies_without_floor.is_empty()
            || !self.invalid_rates.is_empty()
            || !self.overflowed.is_empty()
    }
}
