use std::collections::BTreeMap;

/// Default page size when walking the upstream bookings API.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Upstream owner countries and the currency their bookings are billed in.
pub const DEFAULT_COUNTRY_CURRENCIES: [(&str, &str); 3] =
    [("UK", "GBP"), ("USA", "USD"), ("France", "EUR")];

/// Returns the default country -> currency table.
pub fn default_country_currencies() -> BTreeMap<String, String> {
    DEFAULT_COUNTRY_CURRENCIES
        .iter()
        .map(|(country, currency)| (country.to_string(), currency.to_string()))
        .collect()
}
