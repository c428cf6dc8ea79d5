//! Fee aggregation and minimum-fee floors.
//!
//! Both steps are pure: they read bookings and the policy, and never touch storage.

use log::warn;
use num_traits::Zero;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

use super::fee_policy::FeePolicy;
use super::revenue_model::BucketKey;
use crate::bookings::Booking;
use crate::fx::normalize_currency_code;

/// Fee totals per (month, owner, currency).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeeAggregation {
    pub buckets: BTreeMap<BucketKey, Decimal>,
    /// Currency -> bookings that had no fee schedule entry (charged zero).
    pub unknown_currencies: BTreeMap<String, usize>,
    /// Buckets whose total exceeded the decimal range. They are left out of `buckets`.
    pub overflowed: BTreeSet<BucketKey>,
}

/// Folds bookings into per-bucket fee totals.
///
/// Bookings in a currency missing from the fee schedule still open or join their
/// bucket, with a zero fee. Addition on `Decimal` is exact, so the result does not
/// depend on the order of `bookings`.
pub fn aggregate_fees(bookings: &[Booking], policy: &FeePolicy) -> FeeAggregation {
    let mut aggregation = FeeAggregation::default();

    for booking in bookings {
        let currency = normalize_currency_code(&booking.currency);
        let fee = match policy.fee_for(&currency) {
            Some(fee) => fee,
            None => {
                *aggregation
                    .unknown_currencies
                    .entry(currency.clone())
                    .or_insert(0) += 1;
                Decimal::zero()
            }
        };

        let key = BucketKey::new(booking.month(), &booking.owner_company, &currency);
        if aggregation.overflowed.contains(&key) {
            continue;
        }
        let total = aggregation.buckets.entry(key.clone()).or_insert_with(Decimal::zero);
        match total.checked_add(fee) {
            Some(sum) => *total = sum,
            None => {
                warn!(
                    "Fee total overflowed for {} {} {}, dropping bucket",
                    key.month, key.owner_company, key.currency
                );
                aggregation.buckets.remove(&key);
                aggregation.overflowed.insert(key);
            }
        }
    }

    aggregation
}

/// Bucket totals raised to their currency's minimum fee.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlooredBuckets {
    pub buckets: BTreeMap<BucketKey, Decimal>,
    /// Currencies seen in buckets that have no minimum fee configured.
    pub currencies_without_floor: BTreeSet<String>,
}

/// Applies `max(total, minimum_fee[currency])` to every bucket independently.
pub fn apply_floors(buckets: BTreeMap<BucketKey, Decimal>, policy: &FeePolicy) -> FlooredBuckets {
    let mut floored = FlooredBuckets::default();
    for (key, total) in buckets {
        if !policy.minimum_fees.contains_key(&key.currency) {
            floored.currencies_without_floor.insert(key.currency.clone());
        }
        let total = policy.apply_floor(&key.currency, total);
        floored.buckets.insert(key, total);
    }
    floored
}
