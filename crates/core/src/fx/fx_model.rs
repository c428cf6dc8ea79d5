use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::currency::parse_currency_code;
use super::FxError;

/// One dated entry of the FX history: `1 from_currency = rate to_currency`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub from_currency: String,
    pub to_currency: String,
    pub rate: Decimal,
    pub rate_date: NaiveDate,
}

impl ExchangeRate {
    pub fn new(from: &str, to: &str, rate: Decimal, rate_date: NaiveDate) -> Self {
        Self {
            from_currency: from.to_string(),
            to_currency: to.to_string(),
            rate,
            rate_date,
        }
    }

    /// Returns the `(from, to)` key used to group the history per pair.
    pub fn pair(&self) -> (String, String) {
        (self.from_currency.clone(), self.to_currency.clone())
    }

    /// Normalizes both currency codes and rejects non-positive rates.
    pub fn validated(self) -> Result<Self, FxError> {
        let from_currency = parse_currency_code(&self.from_currency)?;
        let to_currency = parse_currency_code(&self.to_currency)?;
        if self.rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate {
                from: from_currency,
                to: to_currency,
                date: self.rate_date,
                rate: self.rate.to_string(),
            });
        }
        Ok(Self {
            from_currency,
            to_currency,
            ..self
        })
    }
}

/// A history entry that was refused when building the rate index.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RejectedRate {
    pub entry: ExchangeRate,
    pub reason: String,
}
