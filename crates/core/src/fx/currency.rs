use crate::fx::FxError;

/// Normalizes a currency code as stored upstream (`" usd "` -> `"USD"`).
pub fn normalize_currency_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// ISO 4217 style check: exactly three ASCII letters.
pub fn is_valid_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

/// Normalizes `code` and rejects anything that is not a three-letter code.
pub fn parse_currency_code(code: &str) -> Result<String, FxError> {
    let normalized = normalize_currency_code(code);
    if is_valid_currency_code(&normalized) {
        Ok(normalized)
    } else {
        Err(FxError::InvalidCurrencyCode(code.to_string()))
    }
}
