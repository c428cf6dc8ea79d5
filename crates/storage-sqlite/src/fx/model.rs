//! Database models for currency rates.

use chrono::NaiveDate;
use diesel::prelude::*;
use feeledger_core::fx::ExchangeRate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::StorageError;

/// Database model for one dated rate. The rate is kept as decimal text.
#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::currency_rates)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CurrencyRateDB {
    pub from_currency: String,
    pub to_currency: String,
    pub rate: String,
    pub rate_date: NaiveDate,
}

impl TryFrom<CurrencyRateDB> for ExchangeRate {
    type Error = StorageError;

    fn try_from(db: CurrencyRateDB) -> Result<Self, Self::Error> {
        let rate = Decimal::from_str(&db.rate).map_err(|e| {
            StorageError::Decode(format!(
                "rate '{}' for {}/{} on {}: {}",
                db.rate, db.from_currency, db.to_currency, db.rate_date, e
            ))
        })?;
        Ok(ExchangeRate::new(
            &db.from_currency,
            &db.to_currency,
            rate,
            db.rate_date,
        ))
    }
}

impl From<ExchangeRate> for CurrencyRateDB {
    fn from(domain: ExchangeRate) -> Self {
        Self {
            from_currency: domain.from_currency,
            to_currency: domain.to_currency,
            rate: domain.rate.normalize().to_string(),
            rate_date: domain.rate_date,
        }
    }
}
