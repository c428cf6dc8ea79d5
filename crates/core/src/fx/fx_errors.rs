use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FxError {
    #[error("Exchange rate not found for {from}->{to} on or before {date}")]
    RateNotFound {
        from: String,
        to: String,
        date: NaiveDate,
    },

    #[error("Invalid currency code: {0}")]
    InvalidCurrencyCode(String),

    #[error("Invalid exchange rate {rate} for {from}->{to} on {date}: rate must be positive")]
    InvalidRate {
        from: String,
        to: String,
        date: NaiveDate,
        rate: String,
    },
}
