//! Error types for habitual-core

use thiserror::Error;

/// Main error type for the habitual-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Period type code or label outside daily/weekly/monthly
    #[error("invalid period type: {0}")]
    InvalidPeriodType(String),

    /// Habit lookup by name or id failed
    #[error("habit not found: {0}")]
    HabitNotFound(String),

    /// A habit with this name is already stored
    #[error("habit already exists: {0}")]
    HabitExists(String),

    /// Required count per period must be at least 1
    #[error("required count must be at least 1, got {0}")]
    InvalidRequiredCount(i64),

    /// Timestamp string that could not be parsed
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Period navigation left the representable calendar
    #[error("period out of range: {0}")]
    PeriodOutOfRange(String),
}

/// Result type alias for habitual-core
pub type Result<T> = std::result::Result<T, Error>;
