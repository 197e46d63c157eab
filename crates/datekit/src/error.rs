//! Error types for datekit operations.

use thiserror::Error;

use crate::unit::CalendarUnit;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Unsupported unit: {0}")]
    UnsupportedUnit(CalendarUnit),

    #[error("Invalid cycle: {0} (must be non-zero)")]
    InvalidCycle(i64),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Out of range: {0}")]
    OutOfRange(String),
}

pub type Result<T> = std::result::Result<T, DateError>;
