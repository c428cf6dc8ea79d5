//! Fee policy: the configuration table driving the revenue engine.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::revenue_errors::RevenueError;
use crate::bookings::default_country_currencies;
use crate::errors::{Error, Result};
use crate::fx::{is_valid_currency_code, normalize_currency_code};

/// Currency every ledger amount is converted into unless configured otherwise.
pub const DEFAULT_BASE_CURRENCY: &str = "GBP";

/// How to settle an owner that has buckets in several currencies for one month,
/// given that the ledger holds one record per (month, owner).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiCurrencyPolicy {
    /// Keep the bucket with the largest base-currency revenue; ties go to the
    /// alphabetically first currency code.
    #[default]
    Dominant,
    /// Write nothing for that (month, owner).
    Reject,
}

/// Per-currency booking fee, per-currency monthly minimum and the base currency,
/// plus the owner-country billing table used at ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeePolicy {
    pub base_currency: String,
    /// Fixed fee charged per booking, in the booking's currency.
    pub fees: BTreeMap<String, Decimal>,
    /// Minimum monthly fee per (owner, currency) bucket.
    pub minimum_fees: BTreeMap<String, Decimal>,
    pub multi_currency_policy: MultiCurrencyPolicy,
    /// Upstream owner country -> currency its bookings are billed in.
    pub country_currencies: BTreeMap<String, String>,
}

impl Default for FeePolicy {
    fn default() -> Self {
        FeePolicy {
            base_currency: DEFAULT_BASE_CURRENCY.to_string(),
            fees: BTreeMap::from([
                ("GBP".to_string(), dec!(10)),
                ("USD".to_string(), dec!(14)),
                ("EUR".to_string(), dec!(12)),
            ]),
            minimum_fees: BTreeMap::from([
                ("GBP".to_string(), dec!(100)),
                ("USD".to_string(), dec!(140)),
                ("EUR".to_string(), dec!(120)),
            ]),
            multi_currency_policy: MultiCurrencyPolicy::Dominant,
            country_currencies: default_country_currencies(),
        }
    }
}

impl FeePolicy {
    /// Loads a policy from a JSON file. Fields absent from the file keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigIO(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let policy: FeePolicy = serde_json::from_str(raw)
            .map_err(|e| Error::InvalidConfigValue(format!("fee policy: {}", e)))?;
        Ok(policy.normalized()?)
    }

    /// Uppercases every currency code and checks the table is usable.
    pub fn normalized(self) -> std::result::Result<Self, RevenueError> {
        let base_currency = normalize_currency_code(&self.base_currency);
        if !is_valid_currency_code(&base_currency) {
            return Err(RevenueError::InvalidPolicy(format!(
                "base currency '{}' is not a three-letter code",
                self.base_currency
            )));
        }
        Ok(FeePolicy {
            base_currency,
            fees: normalize_table("fee", self.fees)?,
            minimum_fees: normalize_table("minimum fee", self.minimum_fees)?,
            multi_currency_policy: self.multi_currency_policy,
            country_currencies: normalize_countries(self.country_currencies)?,
        })
    }

    /// Fee for one booking, or `None` when the currency has no schedule entry.
    pub fn fee_for(&self, currency: &str) -> Option<Decimal> {
        self.fees.get(currency).copied()
    }

    /// Minimum fee for a bucket; zero for currencies without a floor.
    pub fn minimum_fee_for(&self, currency: &str) -> Decimal {
        self.minimum_fees
            .get(currency)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Raises a bucket total to the currency's floor: `max(total, minimum)`.
    pub fn apply_floor(&self, currency: &str, total: Decimal) -> Decimal {
        total.max(self.minimum_fee_for(currency))
    }
}

fn normalize_table(
    label: &str,
    table: BTreeMap<String, Decimal>,
) -> std::result::Result<BTreeMap<String, Decimal>, RevenueError> {
    let mut normalized = BTreeMap::new();
    for (code, amount) in table {
        let currency = normalize_currency_code(&code);
        if !is_valid_currency_code(&currency) {
            return Err(RevenueError::InvalidPolicy(format!(
                "{} entry '{}' is not a three-letter currency code",
                label, code
            )));
        }
        if amount < Decimal::ZERO {
            return Err(RevenueError::InvalidPolicy(format!(
                "{} for {} is negative ({})",
                label, currency, amount
            )));
        }
        if normalized.insert(currency.clone(), amount).is_some() {
            return Err(RevenueError::InvalidPolicy(format!(
                "{} for {} is listed twice",
                label, currency
            )));
        }
    }
    Ok(normalized)
}

/// Country names are matched verbatim against upstream data; only the
/// currencies are normalized.
fn normalize_countries(
    table: BTreeMap<String, String>,
) -> std::result::Result<BTreeMap<String, String>, RevenueError> {
    let mut normalized = BTreeMap::new();
    for (country, code) in table {
        let country = country.trim().to_string();
        if country.is_empty() {
            return Err(RevenueError::InvalidPolicy(
                "country currency entry has an empty country".to_string(),
            ));
        }
        let currency = normalize_currency_code(&code);
        if !is_valid_currency_code(&currency) {
            return Err(RevenueError::InvalidPolicy(format!(
                "currency '{}' for country {} is not a three-letter code",
                code, country
            )));
        }
        normalized.insert(country, currency);
    }
    Ok(normalized)
}
