//! Streak evaluation over bucketed period counts.
//!
//! A period *qualifies* when its event count is at least the habit's required
//! count. Streaks are runs of qualifying periods linked by the period
//! successor relation, so any gap breaks a run no matter how long it is.

use chrono::NaiveDateTime;

use super::bucket::PeriodCounts;
use crate::error::{Error, Result};
use crate::period::{map_to_period, PeriodKey};
use crate::types::PeriodType;

/// A maximal run of consecutive qualifying periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakRun {
    /// First period of the run
    pub start: PeriodKey,
    /// Last period of the run
    pub end: PeriodKey,
    /// Number of periods in the run
    pub length: u32,
}

fn check_required(required: u32) -> Result<()> {
    if required == 0 {
        return Err(Error::InvalidRequiredCount(0));
    }
    Ok(())
}

fn count_of(counts: &PeriodCounts, key: &PeriodKey) -> u32 {
    counts.get(key).copied().unwrap_or(0)
}

/// Number of consecutive qualifying periods ending at the period containing `now`.
///
/// Returns 0 when the current period itself does not qualify.
pub fn current_streak(
    counts: &PeriodCounts,
    period_type: PeriodType,
    required: u32,
    now: &NaiveDateTime,
) -> Result<u32> {
    check_required(required)?;

    let mut key = map_to_period(now, period_type);
    let mut streak = 0;
    while count_of(counts, &key) >= required {
        streak += 1;
        match key.previous() {
            Ok(prev) => key = prev,
            Err(_) => break,
        }
    }

    Ok(streak)
}

/// The longest run of consecutive qualifying periods anywhere in `counts`.
///
/// Ties resolve to the earliest run. Keys of other period types are ignored.
pub fn longest_run(
    counts: &PeriodCounts,
    period_type: PeriodType,
    required: u32,
) -> Result<Option<StreakRun>> {
    check_required(required)?;

    let mut qualifying: Vec<PeriodKey> = counts
        .iter()
        .filter(|(key, count)| key.period_type() == period_type && **count >= required)
        .map(|(key, _)| *key)
        .collect();
    qualifying.sort();

    let mut best: Option<StreakRun> = None;
    let mut current: Option<StreakRun> = None;

    for key in qualifying {
        current = match current {
            Some(run) if run.end.next().ok() == Some(key) => Some(StreakRun {
                end: key,
                length: run.length + 1,
                ..run
            }),
            _ => Some(StreakRun {
                start: key,
                end: key,
                length: 1,
            }),
        };

        if let Some(run) = current {
            if best.map_or(true, |b| run.length > b.length) {
                best = Some(run);
            }
        }
    }

    Ok(best)
}

/// Length of the longest run of consecutive qualifying periods, 0 if none.
pub fn longest_streak(counts: &PeriodCounts, period_type: PeriodType, required: u32) -> Result<u32> {
    Ok(longest_run(counts, period_type, required)?.map_or(0, |run| run.length))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::bucket::bucket;
    use crate::types::parse_timestamp;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    /// 2025-07-13..17 and 2025-07-20..21, one event each.
    fn split_week() -> PeriodCounts {
        let mut counts = PeriodCounts::new();
        for day in 13..=17 {
            counts.insert(PeriodKey::day(2025, 7, day).unwrap(), 1);
        }
        counts.insert(PeriodKey::day(2025, 7, 20).unwrap(), 1);
        counts.insert(PeriodKey::day(2025, 7, 21).unwrap(), 1);
        counts
    }

    #[test]
    fn test_longest_streak_with_gap() {
        let counts = split_week();
        assert_eq!(longest_streak(&counts, PeriodType::Daily, 1).unwrap(), 5);
        assert_eq!(longest_streak(&counts, PeriodType::Daily, 2).unwrap(), 0);

        let run = longest_run(&counts, PeriodType::Daily, 1).unwrap().unwrap();
        assert_eq!(run.start, PeriodKey::day(2025, 7, 13).unwrap());
        assert_eq!(run.end, PeriodKey::day(2025, 7, 17).unwrap());
    }

    #[test]
    fn test_current_streak_with_injected_now() {
        let counts = split_week();
        let required = 1;
        assert_eq!(
            current_streak(&counts, PeriodType::Daily, required, &ts("2025-07-17 20:00:00")).unwrap(),
            5
        );
        assert_eq!(
            current_streak(&counts, PeriodType::Daily, required, &ts("2025-07-21 09:00:00")).unwrap(),
            2
        );
        // Nothing recorded on the 18th
        assert_eq!(
            current_streak(&counts, PeriodType::Daily, required, &ts("2025-07-18 09:00:00")).unwrap(),
            0
        );
    }

    #[test]
    fn test_current_streak_threshold_is_at_least() {
        let mut events: Vec<NaiveDateTime> = (0..4)
            .map(|h| ts(&format!("2025-07-17 0{h}:00:00")))
            .collect();
        let now = ts("2025-07-17 23:00:00");

        let counts = bucket(&events, PeriodType::Daily);
        assert_eq!(current_streak(&counts, PeriodType::Daily, 4, &now).unwrap(), 1);

        events.push(ts("2025-07-17 05:00:00"));
        let counts = bucket(&events, PeriodType::Daily);
        assert_eq!(current_streak(&counts, PeriodType::Daily, 4, &now).unwrap(), 1);

        events.pop();
        events.pop();
        let counts = bucket(&events, PeriodType::Daily);
        assert_eq!(current_streak(&counts, PeriodType::Daily, 4, &now).unwrap(), 0);
    }

    #[test]
    fn test_empty_counts() {
        let counts = PeriodCounts::new();
        let now = ts("2025-07-17 12:00:00");
        for period_type in PeriodType::ALL {
            assert_eq!(current_streak(&counts, period_type, 1, &now).unwrap(), 0);
            assert_eq!(longest_streak(&counts, period_type, 1).unwrap(), 0);
            assert!(longest_run(&counts, period_type, 1).unwrap().is_none());
        }
    }

    #[test]
    fn test_zero_required_rejected() {
        let counts = split_week();
        let now = ts("2025-07-17 12:00:00");
        assert!(matches!(
            current_streak(&counts, PeriodType::Daily, 0, &now),
            Err(Error::InvalidRequiredCount(0))
        ));
        assert!(matches!(
            longest_streak(&counts, PeriodType::Daily, 0),
            Err(Error::InvalidRequiredCount(0))
        ));
    }

    #[test]
    fn test_weekly_streak_across_week_53() {
        let events = [
            ts("2020-12-16 10:00:00"), // W51
            ts("2020-12-23 10:00:00"), // W52
            ts("2020-12-31 10:00:00"), // W53
            ts("2021-01-01 10:00:00"), // W53 (ISO year 2020)
            ts("2021-01-05 10:00:00"), // 2021-W01
        ];
        let counts = bucket(&events, PeriodType::Weekly);
        assert_eq!(longest_streak(&counts, PeriodType::Weekly, 1).unwrap(), 4);
        assert_eq!(longest_streak(&counts, PeriodType::Weekly, 2).unwrap(), 1);
        assert_eq!(
            current_streak(&counts, PeriodType::Weekly, 1, &ts("2021-01-10 18:00:00")).unwrap(),
            4
        );
    }

    #[test]
    fn test_monthly_streak_across_year_end() {
        let events = [
            ts("2024-11-03 10:00:00"),
            ts("2024-12-03 10:00:00"),
            ts("2025-01-03 10:00:00"),
            ts("2025-03-03 10:00:00"),
        ];
        let counts = bucket(&events, PeriodType::Monthly);
        assert_eq!(longest_streak(&counts, PeriodType::Monthly, 1).unwrap(), 3);
        assert_eq!(
            current_streak(&counts, PeriodType::Monthly, 1, &ts("2025-03-31 10:00:00")).unwrap(),
            1
        );
        assert_eq!(
            current_streak(&counts, PeriodType::Monthly, 1, &ts("2025-02-10 10:00:00")).unwrap(),
            0
        );
    }

    #[test]
    fn test_distant_qualifier_breaks_streak() {
        let mut counts = PeriodCounts::new();
        counts.insert(PeriodKey::month(2021, 5).unwrap(), 1);
        counts.insert(PeriodKey::month(2023, 5).unwrap(), 1);
        counts.insert(PeriodKey::month(2023, 6).unwrap(), 1);
        assert_eq!(longest_streak(&counts, PeriodType::Monthly, 1).unwrap(), 2);
    }

    #[test]
    fn test_below_threshold_period_splits_runs() {
        let mut counts = PeriodCounts::new();
        counts.insert(PeriodKey::day(2025, 7, 1).unwrap(), 3);
        counts.insert(PeriodKey::day(2025, 7, 2).unwrap(), 1);
        counts.insert(PeriodKey::day(2025, 7, 3).unwrap(), 3);
        counts.insert(PeriodKey::day(2025, 7, 4).unwrap(), 4);
        assert_eq!(longest_streak(&counts, PeriodType::Daily, 3).unwrap(), 2);
        assert_eq!(longest_streak(&counts, PeriodType::Daily, 1).unwrap(), 4);
    }

    #[test]
    fn test_tie_keeps_earliest_run() {
        let mut counts = PeriodCounts::new();
        for day in [1, 2, 5, 6] {
            counts.insert(PeriodKey::day(2025, 7, day).unwrap(), 1);
        }
        let run = longest_run(&counts, PeriodType::Daily, 1).unwrap().unwrap();
        assert_eq!(run.length, 2);
        assert_eq!(run.start, PeriodKey::day(2025, 7, 1).unwrap());
    }

    #[test]
    fn test_other_period_types_ignored() {
        let mut counts = split_week();
        counts.insert(PeriodKey::month(2025, 7).unwrap(), 10);
        assert_eq!(longest_streak(&counts, PeriodType::Monthly, 1).unwrap(), 1);
        assert_eq!(longest_streak(&counts, PeriodType::Daily, 1).unwrap(), 5);
    }
}
