/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Maximum number of example buckets listed per anomaly kind in run summaries
pub const MAX_REPORTED_EXAMPLES: usize = 5;

/// Ledger month format used in logs and reports
pub const MONTH_FORMAT: &str = "%Y-%m";
