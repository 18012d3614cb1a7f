//! Analytics module for habitual
//!
//! Data flows leaf-first:
//! - [`bucket`]: event timestamps → per-period counts
//! - [`streak`]: per-period counts → current and longest streaks
//! - [`habits`]: stored habits → headline metrics and reports

pub mod bucket;
pub mod habits;
pub mod streak;

pub use bucket::{bucket, PeriodCounts};
pub use habits::{HabitAnalytics, HabitReport, HabitSource, StreakAnalysis};
pub use streak::{current_streak, longest_run, longest_streak, StreakRun};
