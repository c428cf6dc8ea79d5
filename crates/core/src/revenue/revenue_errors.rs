use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RevenueError {
    #[error("Invalid fee policy: {0}")]
    InvalidPolicy(String),
}
