//! Period index
//!
//! Maps timestamps onto calendar periods and navigates between adjacent
//! periods. Keys of one [`PeriodType`] form a total order with exactly one
//! predecessor and one successor, so `key.next()?.previous()? == key` holds
//! across month, year and ISO week-53 boundaries.

use chrono::{Datelike, Days, IsoWeek, NaiveDate, NaiveDateTime, Weekday};

use crate::error::{Error, Result};
use crate::types::PeriodType;

/// A calendar month, always within chrono's representable date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|_| Self { year, month })
            .ok_or_else(|| Error::PeriodOutOfRange(format!("{year:04}-{month:02}")))
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

/// Canonical identifier of one period instance.
///
/// - Daily: the calendar date (year, month, day)
/// - Weekly: the ISO-8601 (year, week); the ISO year can differ from the
///   calendar year in the last days of December and first days of January
/// - Monthly: (year, month)
///
/// Ordering is only meaningful between keys of the same period type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PeriodKey {
    Day(NaiveDate),
    Week(IsoWeek),
    Month(YearMonth),
}

/// Map a timestamp onto the period of `period_type` that contains it.
pub fn map_to_period(ts: &NaiveDateTime, period_type: PeriodType) -> PeriodKey {
    let date = ts.date();
    match period_type {
        PeriodType::Daily => PeriodKey::Day(date),
        PeriodType::Weekly => PeriodKey::Week(date.iso_week()),
        PeriodType::Monthly => PeriodKey::Month(YearMonth {
            year: date.year(),
            month: date.month(),
        }),
    }
}

impl PeriodKey {
    /// Daily key for a calendar date.
    pub fn day(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(PeriodKey::Day)
            .ok_or_else(|| Error::PeriodOutOfRange(format!("{year:04}-{month:02}-{day:02}")))
    }

    /// Weekly key for an ISO (year, week) pair. Week 53 only exists in long ISO years.
    pub fn week(iso_year: i32, week: u32) -> Result<Self> {
        NaiveDate::from_isoywd_opt(iso_year, week, Weekday::Mon)
            .map(|monday| PeriodKey::Week(monday.iso_week()))
            .ok_or_else(|| Error::PeriodOutOfRange(format!("{iso_year:04}-W{week:02}")))
    }

    /// Monthly key.
    pub fn month(year: i32, month: u32) -> Result<Self> {
        YearMonth::new(year, month).map(PeriodKey::Month)
    }

    pub fn period_type(&self) -> PeriodType {
        match self {
            PeriodKey::Day(_) => PeriodType::Daily,
            PeriodKey::Week(_) => PeriodType::Weekly,
            PeriodKey::Month(_) => PeriodType::Monthly,
        }
    }

    /// The immediately preceding period of the same type.
    pub fn previous(&self) -> Result<Self> {
        let prev = match self {
            PeriodKey::Day(date) => date.pred_opt().map(PeriodKey::Day),
            PeriodKey::Week(week) => {
                let anchor = if week.week() == 1 {
                    // Dec 28 always falls in the last ISO week of its year
                    NaiveDate::from_ymd_opt(week.year() - 1, 12, 28)
                } else {
                    NaiveDate::from_isoywd_opt(week.year(), week.week() - 1, Weekday::Mon)
                };
                anchor.map(|d| PeriodKey::Week(d.iso_week()))
            }
            PeriodKey::Month(ym) => {
                let (year, month) = if ym.month == 1 {
                    (ym.year - 1, 12)
                } else {
                    (ym.year, ym.month - 1)
                };
                YearMonth::new(year, month).ok().map(PeriodKey::Month)
            }
        };
        prev.ok_or_else(|| Error::PeriodOutOfRange(format!("no period before {self}")))
    }

    /// The immediately following period of the same type.
    pub fn next(&self) -> Result<Self> {
        let next = match self {
            PeriodKey::Day(date) => date.succ_opt().map(PeriodKey::Day),
            PeriodKey::Week(week) => {
                NaiveDate::from_isoywd_opt(week.year(), week.week(), Weekday::Mon)
                    .and_then(|monday| monday.checked_add_days(Days::new(7)))
                    .map(|d| PeriodKey::Week(d.iso_week()))
            }
            PeriodKey::Month(ym) => {
                let (year, month) = if ym.month == 12 {
                    (ym.year + 1, 1)
                } else {
                    (ym.year, ym.month + 1)
                };
                YearMonth::new(year, month).ok().map(PeriodKey::Month)
            }
        };
        next.ok_or_else(|| Error::PeriodOutOfRange(format!("no period after {self}")))
    }
}

impl std::fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeriodKey::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            PeriodKey::Week(week) => write!(f, "{:04}-W{:02}", week.year(), week.week()),
            PeriodKey::Month(ym) => write!(f, "{:04}-{:02}", ym.year, ym.month),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        crate::types::parse_timestamp(s).unwrap()
    }

    fn assert_round_trip(key: PeriodKey) {
        assert_eq!(key.next().unwrap().previous().unwrap(), key, "next then previous of {key}");
        assert_eq!(key.previous().unwrap().next().unwrap(), key, "previous then next of {key}");
    }

    #[test]
    fn test_map_to_period_exact() {
        let t = ts("2025-07-17 15:00:00");
        assert_eq!(
            map_to_period(&t, PeriodType::Daily),
            PeriodKey::day(2025, 7, 17).unwrap()
        );
        assert_eq!(
            map_to_period(&t, PeriodType::Weekly),
            PeriodKey::week(2025, 29).unwrap()
        );
        assert_eq!(
            map_to_period(&t, PeriodType::Monthly),
            PeriodKey::month(2025, 7).unwrap()
        );
    }

    #[test]
    fn test_iso_year_differs_from_calendar_year() {
        // Monday 2024-12-30 belongs to 2025-W01
        assert_eq!(
            map_to_period(&ts("2024-12-30 08:00:00"), PeriodType::Weekly),
            PeriodKey::week(2025, 1).unwrap()
        );
        // Friday 2021-01-01 belongs to 2020-W53
        assert_eq!(
            map_to_period(&ts("2021-01-01 08:00:00"), PeriodType::Weekly),
            PeriodKey::week(2020, 53).unwrap()
        );
    }

    #[test]
    fn test_daily_navigation() {
        let key = PeriodKey::day(2025, 7, 17).unwrap();
        assert_eq!(key.previous().unwrap(), PeriodKey::day(2025, 7, 16).unwrap());
        assert_eq!(key.next().unwrap(), PeriodKey::day(2025, 7, 18).unwrap());

        let new_years_eve = PeriodKey::day(2025, 12, 31).unwrap();
        assert_eq!(new_years_eve.next().unwrap(), PeriodKey::day(2026, 1, 1).unwrap());
        assert_eq!(
            PeriodKey::day(2025, 3, 1).unwrap().previous().unwrap(),
            PeriodKey::day(2025, 2, 28).unwrap()
        );
        assert_round_trip(new_years_eve);
        assert_round_trip(PeriodKey::day(2026, 1, 1).unwrap());
    }

    #[test]
    fn test_weekly_navigation_across_week_53() {
        let w53 = PeriodKey::week(2020, 53).unwrap();
        assert_eq!(w53.next().unwrap(), PeriodKey::week(2021, 1).unwrap());
        assert_eq!(
            PeriodKey::week(2021, 1).unwrap().previous().unwrap(),
            w53
        );

        let w53_2026 = PeriodKey::week(2026, 53).unwrap();
        assert_eq!(w53_2026.next().unwrap(), PeriodKey::week(2027, 1).unwrap());
        assert_round_trip(w53_2026);
        assert_round_trip(PeriodKey::week(2027, 1).unwrap());
    }

    #[test]
    fn test_weekly_navigation_across_week_52() {
        // 2025 has 52 ISO weeks
        assert_eq!(
            PeriodKey::week(2026, 1).unwrap().previous().unwrap(),
            PeriodKey::week(2025, 52).unwrap()
        );
        assert_eq!(
            PeriodKey::week(2025, 1).unwrap().previous().unwrap(),
            PeriodKey::week(2024, 52).unwrap()
        );
        assert_round_trip(PeriodKey::week(2025, 1).unwrap());
        assert_round_trip(PeriodKey::week(2025, 29).unwrap());
    }

    #[test]
    fn test_monthly_navigation() {
        let key = PeriodKey::month(2025, 7).unwrap();
        assert_eq!(key.previous().unwrap(), PeriodKey::month(2025, 6).unwrap());
        assert_eq!(key.next().unwrap(), PeriodKey::month(2025, 8).unwrap());

        assert_eq!(
            PeriodKey::month(2025, 12).unwrap().next().unwrap(),
            PeriodKey::month(2026, 1).unwrap()
        );
        assert_eq!(
            PeriodKey::month(2026, 1).unwrap().previous().unwrap(),
            PeriodKey::month(2025, 12).unwrap()
        );
        assert_round_trip(PeriodKey::month(2025, 12).unwrap());
        assert_round_trip(PeriodKey::month(2026, 1).unwrap());
    }

    #[test]
    fn test_round_trip_over_a_long_walk() {
        for period_type in PeriodType::ALL {
            let mut key = map_to_period(&ts("2019-11-20 12:00:00"), period_type);
            for _ in 0..800 {
                let next = key.next().unwrap();
                assert!(next > key);
                assert_eq!(next.previous().unwrap(), key);
                key = next;
            }
        }
    }

    #[test]
    fn test_invalid_keys_rejected() {
        assert!(PeriodKey::week(2025, 53).is_err());
        assert!(PeriodKey::week(2025, 0).is_err());
        assert!(PeriodKey::month(2025, 13).is_err());
        assert!(PeriodKey::day(2025, 2, 29).is_err());
    }

    #[test]
    fn test_navigation_at_calendar_limit() {
        let last = PeriodKey::Day(NaiveDate::MAX);
        assert!(matches!(last.next(), Err(Error::PeriodOutOfRange(_))));
        let first = PeriodKey::Day(NaiveDate::MIN);
        assert!(matches!(first.previous(), Err(Error::PeriodOutOfRange(_))));
    }

    #[test]
    fn test_display() {
        assert_eq!(PeriodKey::day(2025, 7, 3).unwrap().to_string(), "2025-07-03");
        assert_eq!(PeriodKey::week(2025, 2).unwrap().to_string(), "2025-W02");
        assert_eq!(PeriodKey::month(2025, 7).unwrap().to_string(), "2025-07");
    }

    #[test]
    fn test_period_type_of_key() {
        assert_eq!(PeriodKey::week(2025, 2).unwrap().period_type(), PeriodType::Weekly);
    }
}
