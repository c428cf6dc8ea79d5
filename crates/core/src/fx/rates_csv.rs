//! Parser for the periodic currency-rate file feed.
//!
//! Expected header: `from_currency,to_currency,rate,rate_date` (date as `YYYY-MM-DD`).

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::str::FromStr;

use crate::errors::{Error, ValidationError};
use crate::fx::ExchangeRate;
use crate::Result;

#[derive(Debug, Deserialize)]
struct RateRow {
    from_currency: String,
    to_currency: String,
    rate: String,
    rate_date: String,
}

/// Reads every rate row targeting `target_currency`; rows for other target
/// currencies are ignored. Any malformed row fails the whole file.
pub fn parse_rates_csv<R: Read>(reader: R, target_currency: &str) -> Result<Vec<ExchangeRate>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rates = Vec::new();
    for (index, row) in csv_reader.deserialize::<RateRow>().enumerate() {
        // Header is line 1.
        let line = index + 2;
        let row = row.map_err(|e| invalid(line, &e.to_string()))?;

        let rate = Decimal::from_str(&row.rate)
            .map_err(|e| invalid(line, &format!("rate '{}': {}", row.rate, e)))?;
        let rate_date = NaiveDate::parse_from_str(&row.rate_date, "%Y-%m-%d")
            .map_err(|e| invalid(line, &format!("rate_date '{}': {}", row.rate_date, e)))?;

        let entry = ExchangeRate::new(&row.from_currency, &row.to_currency, rate, rate_date)
            .validated()
            .map_err(|e| invalid(line, &e.to_string()))?;

        if entry.to_currency == target_currency {
            rates.push(entry);
        }
    }
    Ok(rates)
}

fn invalid(line: usize, message: &str) -> Error {
    Error::Validation(ValidationError::InvalidInput(format!(
        "currency rates line {}: {}",
        line, message
    )))
}
