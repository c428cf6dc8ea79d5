//! FX (Foreign Exchange) module - rate history model, lookback index, feed parser and service.

pub mod currency;
mod fx_errors;
mod fx_model;
mod fx_service;
mod fx_traits;
pub mod rate_index;
pub mod rates_csv;

pub use currency::{is_valid_currency_code, normalize_currency_code, parse_currency_code};
pub use fx_errors::FxError;
pub use fx_model::{ExchangeRate, RejectedRate};
pub use fx_service::FxService;
pub use fx_traits::{FxRepositoryTrait, FxServiceTrait};
pub use rate_index::RateIndex;
pub use rates_csv::parse_rates_csv;
