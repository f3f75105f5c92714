//! Pure derivation helpers.
//!
//! # Responsibility
//! - Recompute aggregates (sums, percentages, streaks) from live records.
//!
//! # Invariants
//! - Every helper is a pure function of its inputs; nothing here reads the
//!   clock or touches a store.
//! - Aggregates are recomputed on every read and never cached, so they can
//!   never drift from their source records.

use crate::model::record::Record;
use chrono::{Days, NaiveDate};
use std::collections::BTreeSet;

/// Sums a numeric field across records.
///
/// Records missing the field, or holding it under a different kind,
/// contribute nothing. Empty input yields `0.0`.
pub fn sum_field(records: &[Record], field: &str) -> f64 {
    records
        .iter()
        .filter_map(|record| record.number(field))
        .sum()
}

/// Groups records by a text/choice discriminant and sums a numeric field
/// per group.
///
/// Group order follows the first-seen order of each discriminant value.
/// Records without a usable discriminant are skipped.
pub fn group_sum(records: &[Record], group_field: &str, value_field: &str) -> Vec<(String, f64)> {
    let mut totals: Vec<(String, f64)> = Vec::new();
    for record in records {
        let Some(key) = record.field(group_field).and_then(|value| value.as_key()) else {
            continue;
        };
        let amount = record.number(value_field).unwrap_or(0.0);
        match totals.iter_mut().find(|(group, _)| group.as_str() == key) {
            Some((_, total)) => *total += amount,
            None => totals.push((key.to_string(), amount)),
        }
    }
    totals
}

/// Share of `part` in `whole`, as a percentage.
///
/// Returns `0.0` when `whole` is zero instead of dividing by zero.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        100.0 * part / whole
    }
}

/// Rounds to two decimal places for user-facing percentages.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Count of consecutive calendar days ending at `today` with an entry.
///
/// The walk starts at `today` and stops at the first gap, so a log that
/// misses `today` always yields `0`.
pub fn streak(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut run = 0;
    let mut day = today;
    while dates.contains(&day) {
        run += 1;
        match day.checked_sub_days(Days::new(1)) {
            Some(previous) => day = previous,
            None => break,
        }
    }
    run
}

/// Count of records matching a predicate.
pub fn count_where<F>(records: &[Record], predicate: F) -> usize
where
    F: Fn(&Record) -> bool,
{
    records.iter().filter(|record| predicate(record)).count()
}
