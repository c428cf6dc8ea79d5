use std::path::PathBuf;

use feeledger_core::bookings::DEFAULT_PAGE_SIZE;

pub const DEFAULT_DB_PATH: &str = "./db/feeledger.db";

/// Runtime configuration read from the environment (and an optional `.env` file).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: String,
    pub policy_file: Option<PathBuf>,
    pub bookings_api_url: Option<String>,
    pub bookings_page_size: u32,
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Config {
            db_path: non_empty("FL_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
            policy_file: non_empty("FL_POLICY_FILE").map(PathBuf::from),
            bookings_api_url: non_empty("FL_BOOKINGS_API_URL"),
            bookings_page_size: non_empty("FL_BOOKINGS_PAGE_SIZE")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_PAGE_SIZE),
            log_format: non_empty("FL_LOG_FORMAT").unwrap_or_else(|| "text".to_string()),
        }
    }
}
