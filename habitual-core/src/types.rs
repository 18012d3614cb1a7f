//! Core domain types for habitual
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Habit** | A tracked recurring activity with a target cadence |
//! | **Event** | One timestamped completion of a habit |
//! | **Period** | A calendar interval (day, ISO week, or month) used as the cadence unit |
//! | **PeriodKey** | Canonical identifier of one period instance (see [`crate::period`]) |
//! | **Streak** | A maximal run of consecutive periods each meeting the required count |
//!
//! All timestamps are naive local date-times: the tracker works on a single
//! implicit local calendar and never converts between timezones.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Canonical storage and display format for event timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================
// Period type
// ============================================

/// Cadence unit of a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    /// One calendar day
    Daily,
    /// One ISO-8601 week (Monday start)
    Weekly,
    /// One calendar month
    Monthly,
}

impl PeriodType {
    /// All period types, in storage-code order.
    pub const ALL: [PeriodType; 3] = [PeriodType::Daily, PeriodType::Weekly, PeriodType::Monthly];

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Daily => "daily",
            PeriodType::Weekly => "weekly",
            PeriodType::Monthly => "monthly",
        }
    }

    /// Singular unit noun ("day", "week", "month").
    pub fn unit(&self) -> &'static str {
        match self {
            PeriodType::Daily => "day",
            PeriodType::Weekly => "week",
            PeriodType::Monthly => "month",
        }
    }

    /// Integer code used in the `habits.period_type` column.
    pub fn code(&self) -> i64 {
        match self {
            PeriodType::Daily => 1,
            PeriodType::Weekly => 2,
            PeriodType::Monthly => 3,
        }
    }

    /// Decode a stored period type code.
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            1 => Ok(PeriodType::Daily),
            2 => Ok(PeriodType::Weekly),
            3 => Ok(PeriodType::Monthly),
            other => Err(Error::InvalidPeriodType(other.to_string())),
        }
    }
}

impl std::fmt::Display for PeriodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PeriodType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(PeriodType::Daily),
            "weekly" | "week" => Ok(PeriodType::Weekly),
            "monthly" | "month" => Ok(PeriodType::Monthly),
            _ => Err(Error::InvalidPeriodType(s.to_string())),
        }
    }
}

// ============================================
// Habit
// ============================================

/// A stored habit definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    /// Store-assigned identifier
    pub id: i64,
    /// Unique human-facing name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Cadence unit
    pub period_type: PeriodType,
    /// Events needed in one period for that period to count
    pub required_count: u32,
    /// When the habit was created
    pub created_at: NaiveDateTime,
}

/// Input for creating a habit.
#[derive(Debug, Clone)]
pub struct NewHabit {
    pub name: String,
    pub description: String,
    pub period_type: PeriodType,
    /// Must be at least 1; checked by the store before insert
    pub required_count: i64,
}

impl NewHabit {
    pub fn new(name: impl Into<String>, period_type: PeriodType, required_count: i64) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            period_type,
            required_count,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

// ============================================
// Timestamps
// ============================================

/// Parse a user- or store-supplied timestamp.
///
/// Accepts `YYYY-MM-DD HH:MM:SS` (optionally with `T` separator and fractional
/// seconds), `YYYY-MM-DD HH:MM`, and a bare `YYYY-MM-DD` (midnight).
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    const FORMATS: &[&str] = &[
        TIMESTAMP_FORMAT,
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];

    for format in FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(ts);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| Error::InvalidTimestamp(s.to_string()))
}

/// Format a timestamp in the canonical storage format.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_type_codes() {
        for period_type in PeriodType::ALL {
            assert_eq!(
                PeriodType::from_code(period_type.code()).unwrap(),
                period_type
            );
        }
        assert!(matches!(
            PeriodType::from_code(4),
            Err(Error::InvalidPeriodType(_))
        ));
        assert!(matches!(
            PeriodType::from_code(0),
            Err(Error::InvalidPeriodType(_))
        ));
    }

    #[test]
    fn test_period_type_from_str() {
        assert_eq!("daily".parse::<PeriodType>().unwrap(), PeriodType::Daily);
        assert_eq!("Weekly".parse::<PeriodType>().unwrap(), PeriodType::Weekly);
        assert_eq!("month".parse::<PeriodType>().unwrap(), PeriodType::Monthly);
        assert!(matches!(
            "hourly".parse::<PeriodType>(),
            Err(Error::InvalidPeriodType(s)) if s == "hourly"
        ));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 7, 17)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2025-07-17 15:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-07-17T15:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-07-17 15:30").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2025-07-17 15:30:00.250").unwrap().date(),
            expected.date()
        );
        assert_eq!(
            parse_timestamp("2025-07-17").unwrap(),
            expected.date().and_hms_opt(0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(matches!(
            parse_timestamp("17/07/2025"),
            Err(Error::InvalidTimestamp(_))
        ));
        assert!(parse_timestamp("2025-02-30 10:00:00").is_err());
    }

    #[test]
    fn test_format_timestamp() {
        let ts = parse_timestamp("2025-01-02 03:04:05").unwrap();
        assert_eq!(format_timestamp(&ts), "2025-01-02 03:04:05");
    }
}
