//! Bucketing of event timestamps into periods.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::period::{map_to_period, PeriodKey};
use crate::types::PeriodType;

/// Event count per period. Derived from a habit's events, never stored.
pub type PeriodCounts = HashMap<PeriodKey, u32>;

/// Tally timestamps per period of `period_type`.
///
/// Input order does not matter and duplicate timestamps add to the same bucket.
pub fn bucket(timestamps: &[NaiveDateTime], period_type: PeriodType) -> PeriodCounts {
    let mut counts = PeriodCounts::new();
    for ts in timestamps {
        *counts.entry(map_to_period(ts, period_type)).or_insert(0) += 1;
    }
    counts
}
