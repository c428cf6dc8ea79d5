//! Conversion of floored buckets into the base currency, and settlement of
//! converted buckets into one ledger record per (month, owner).

use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::fee_aggregator::{aggregate_fees, apply_floors};
use super::fee_policy::{FeePolicy, MultiCurrencyPolicy};
use super::revenue_model::{
    BucketKey, CollapsedBucket, ConvertedBucket, MonthlyRevenue, RevenuePlan, SkippedBucket,
};
use crate::bookings::Booking;
use crate::constants::MONTH_FORMAT;
use crate::fx::RateIndex;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversion {
    pub converted: Vec<ConvertedBucket>,
    pub skipped: Vec<SkippedBucket>,
    /// Buckets whose base amount does not fit in a decimal.
    pub overflowed: Vec<BucketKey>,
}

/// Converts each bucket at the latest `currency -> base` rate dated on or before
/// the bucket's month. Buckets already in the base currency convert at one.
/// Buckets with no such rate are skipped and returned in `skipped`; buckets
/// whose converted amount overflows are returned in `overflowed`.
pub fn convert_buckets(
    buckets: &BTreeMap<BucketKey, Decimal>,
    index: &RateIndex,
    base_currency: &str,
) -> Conversion {
    let mut conversion = Conversion::default();

    for (key, floored_total) in buckets {
        match index.rate_on_or_before(&key.currency, base_currency, key.month) {
            Ok(rate) => match floored_total.checked_mul(rate) {
                Some(revenue_base) => conversion.converted.push(ConvertedBucket {
                    key: key.clone(),
                    floored_total: *floored_total,
                    rate,
                    base_currency: base_currency.to_string(),
                    revenue_base,
                }),
                None => {
                    warn!(
                        "Converting {} {} at {} overflows for {} in {}, skipping bucket",
                        floored_total,
                        key.currency,
                        rate,
                        key.owner_company,
                        key.month.format(MONTH_FORMAT)
                    );
                    conversion.overflowed.push(key.clone());
                }
            },
            Err(e) => {
                warn!(
                    "No FX rate found for {} to {} on or before {} ({}), skipping bucket: {}",
                    key.currency, base_currency, key.month, key.owner_company, e
                );
                conversion.skipped.push(SkippedBucket {
                    key: key.clone(),
                    floored_total: *floored_total,
                });
            }
        }
    }

    conversion
}

/// Reduces converted buckets to at most one record per (month, owner).
///
/// Returns the records ordered by month then owner, and the buckets that were
/// not written because another currency of the same (month, owner) was kept,
/// or because the policy rejects mixed-currency owners.
pub fn settle_ledger(
    converted: Vec<ConvertedBucket>,
    policy: MultiCurrencyPolicy,
) -> (Vec<MonthlyRevenue>, Vec<CollapsedBucket>) {
    let mut by_ledger_key: BTreeMap<(NaiveDate, String), Vec<ConvertedBucket>> = BTreeMap::new();
    for bucket in converted {
        by_ledger_key
            .entry(bucket.key.ledger_key())
            .or_default()
            .push(bucket);
    }

    let mut records = Vec::with_capacity(by_ledger_key.len());
    let mut collapsed = Vec::new();

    for ((month, owner), mut candidates) in by_ledger_key {
        if candidates.len() == 1 {
            records.extend(candidates.pop().map(MonthlyRevenue::from));
            continue;
        }

        let currencies: Vec<String> =
            candidates.iter().map(|c| c.key.currency.clone()).collect();
        match policy {
            MultiCurrencyPolicy::Dominant => {
                // Largest base revenue first; equal revenue falls back to currency code.
                candidates.sort_by(|a, b| {
                    b.revenue_base
                        .cmp(&a.revenue_base)
                        .then_with(|| a.key.currency.cmp(&b.key.currency))
                });
                let kept = candidates.remove(0);
                warn!(
                    "{} has revenue in {} currencies for {} ({}); keeping {}",
                    owner,
                    currencies.len(),
                    month.format(MONTH_FORMAT),
                    currencies.join(", "),
                    kept.key.currency
                );
                let kept_currency = kept.key.currency.clone();
                collapsed.extend(candidates.into_iter().map(|bucket| CollapsedBucket {
                    bucket,
                    kept_currency: Some(kept_currency.clone()),
                }));
                records.push(MonthlyRevenue::from(kept));
            }
            MultiCurrencyPolicy::Reject => {
                warn!(
                    "{} has revenue in {} currencies for {} ({}); no record written",
                    owner,
                    currencies.len(),
                    month.format(MONTH_FORMAT),
                    currencies.join(", ")
                );
                collapsed.extend(candidates.into_iter().map(|bucket| CollapsedBucket {
                    bucket,
                    kept_currency: None,
                }));
            }
        }
    }

    (records, collapsed)
}

/// Runs aggregation, floors, conversion and settlement over a booking snapshot.
/// Pure: nothing is read from or written to storage.
pub fn plan_monthly_revenue(
    bookings: &[Booking],
    index: &RateIndex,
    policy: &FeePolicy,
) -> RevenuePlan {
    let aggregation = aggregate_fees(bookings, policy);
    let bucket_count = aggregation.buckets.len() + aggregation.overflowed.len();
    let floored = apply_floors(aggregation.buckets, policy);
    let conversion = convert_buckets(&floored.buckets, index, &policy.base_currency);
    let (records, collapsed) = settle_ledger(conversion.converted, policy.multi_currency_policy);

    let mut overflowed: Vec<BucketKey> = aggregation.overflowed.into_iter().collect();
    overflowed.extend(conversion.overflowed);

    RevenuePlan {
        records,
        bucket_count,
        skipped_missing_rate: conversion.skipped,
        collapsed,
        unknown_currencies: aggregation.unknown_currencies,
        currencies_without_floor: floored.currencies_without_floor,
        invalid_rates: index.rejected().to_vec(),
        overflowed,
    }
}
