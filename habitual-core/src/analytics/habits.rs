//! Habit query facade
//!
//! Binds the bucketing and streak evaluation to stored habits. Storage is
//! reached through the [`HabitSource`] trait, which [`crate::Database`]
//! implements; every query reads a fresh snapshot and keeps no state.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use habitual_core::analytics::HabitAnalytics;
//! use habitual_core::Database;
//!
//! let db = Database::open_in_memory().unwrap();
//! db.migrate().unwrap();
//!
//! let analytics = HabitAnalytics::new(&db);
//! let now = chrono::Local::now().naive_local();
//! let current = analytics.current_streak("run", &now).unwrap();
//! ```

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use super::bucket::{bucket, PeriodCounts};
use super::streak::{self, StreakRun};
use crate::error::{Error, Result};
use crate::types::{Habit, PeriodType};

/// Read access to stored habits and their events.
pub trait HabitSource {
    /// Look up a habit by its unique name.
    fn resolve_habit(&self, name: &str) -> Result<Option<Habit>>;

    /// All event timestamps of a habit, in any order.
    fn fetch_events(&self, habit_id: i64) -> Result<Vec<NaiveDateTime>>;

    /// All habits in storage order.
    fn list_habits(&self) -> Result<Vec<Habit>>;
}

/// Longest-streak result for one habit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakAnalysis {
    /// Habit name
    pub habit: String,
    /// Unit of `length`
    pub period_type: PeriodType,
    /// Number of consecutive qualifying periods
    pub length: u32,
    /// Bounds of the run, `None` when `length` is 0
    pub run: Option<StreakRun>,
}

/// All headline metrics for one habit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitReport {
    pub habit: Habit,
    pub event_count: usize,
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Streak and count queries over a [`HabitSource`].
pub struct HabitAnalytics<'a, S: HabitSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: HabitSource + ?Sized> HabitAnalytics<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    fn habit(&self, name: &str) -> Result<Habit> {
        self.source
            .resolve_habit(name)?
            .ok_or_else(|| Error::HabitNotFound(name.to_string()))
    }

    fn counts(&self, habit: &Habit) -> Result<PeriodCounts> {
        let events = self.source.fetch_events(habit.id)?;
        Ok(bucket(&events, habit.period_type))
    }

    fn analyse(&self, habit: &Habit) -> Result<StreakAnalysis> {
        let counts = self.counts(habit)?;
        let run = streak::longest_run(&counts, habit.period_type, habit.required_count)?;
        Ok(StreakAnalysis {
            habit: habit.name.clone(),
            period_type: habit.period_type,
            length: run.map_or(0, |r| r.length),
            run,
        })
    }

    /// Consecutive qualifying periods ending at the period containing `now`.
    pub fn current_streak(&self, name: &str, now: &NaiveDateTime) -> Result<u32> {
        let habit = self.habit(name)?;
        let counts = self.counts(&habit)?;
        let length = streak::current_streak(&counts, habit.period_type, habit.required_count, now)?;
        tracing::debug!(habit = %name, length, "Computed current streak");
        Ok(length)
    }

    /// Longest run of consecutive qualifying periods in the habit's history.
    pub fn longest_streak(&self, name: &str) -> Result<u32> {
        Ok(self.streak_analysis(name)?.length)
    }

    /// Longest streak together with its unit, for caller-side labeling.
    pub fn streak_analysis(&self, name: &str) -> Result<StreakAnalysis> {
        let habit = self.habit(name)?;
        let analysis = self.analyse(&habit)?;
        tracing::debug!(
            habit = %name,
            length = analysis.length,
            period_type = %analysis.period_type,
            "Computed longest streak"
        );
        Ok(analysis)
    }

    /// Total number of recorded events, regardless of period.
    pub fn event_count(&self, name: &str) -> Result<usize> {
        let habit = self.habit(name)?;
        Ok(self.source.fetch_events(habit.id)?.len())
    }

    /// Event count plus current and longest streak in one pass over the events.
    pub fn habit_report(&self, name: &str, now: &NaiveDateTime) -> Result<HabitReport> {
        let habit = self.habit(name)?;
        let events = self.source.fetch_events(habit.id)?;
        let counts = bucket(&events, habit.period_type);

        Ok(HabitReport {
            event_count: events.len(),
            current_streak: streak::current_streak(
                &counts,
                habit.period_type,
                habit.required_count,
                now,
            )?,
            longest_streak: streak::longest_streak(&counts, habit.period_type, habit.required_count)?,
            habit,
        })
    }

    /// Habit names per period type. Names keep storage order within a group;
    /// period types without habits are absent.
    pub fn group_by_period_type(&self) -> Result<BTreeMap<PeriodType, Vec<String>>> {
        let mut groups: BTreeMap<PeriodType, Vec<String>> = BTreeMap::new();
        for habit in self.source.list_habits()? {
            groups.entry(habit.period_type).or_default().push(habit.name);
        }
        Ok(groups)
    }

    /// The habit with the greatest longest streak.
    ///
    /// The first habit in storage order wins ties. `None` when no habit has a
    /// qualifying period.
    pub fn longest_streak_overall(&self) -> Result<Option<StreakAnalysis>> {
        let mut best: Option<StreakAnalysis> = None;
        for habit in self.source.list_habits()? {
            let analysis = self.analyse(&habit)?;
            if analysis.length > best.as_ref().map_or(0, |b| b.length) {
                best = Some(analysis);
            }
        }
        Ok(best)
    }
}
