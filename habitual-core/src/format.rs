//! Formatting helpers shared by front ends.

use crate::types::PeriodType;

/// Pluralised unit noun for a count of periods ("day", "days").
pub fn unit_label(period_type: PeriodType, count: u64) -> String {
    if count == 1 {
        period_type.unit().to_string()
    } else {
        format!("{}s", period_type.unit())
    }
}

/// A count of periods with its unit (e.g., "1 week", "5 days").
pub fn format_periods(period_type: PeriodType, count: u64) -> String {
    format!("{} {}", count, unit_label(period_type, count))
}

/// Cadence of a habit (e.g., "3× per week").
pub fn format_cadence(period_type: PeriodType, required_count: u32) -> String {
    format!("{}× per {}", required_count, period_type.unit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_periods() {
        assert_eq!(format_periods(PeriodType::Daily, 1), "1 day");
        assert_eq!(format_periods(PeriodType::Weekly, 0), "0 weeks");
        assert_eq!(format_periods(PeriodType::Monthly, 12), "12 months");
    }

    #[test]
    fn test_format_cadence() {
        assert_eq!(format_cadence(PeriodType::Weekly, 3), "3× per week");
    }
}
