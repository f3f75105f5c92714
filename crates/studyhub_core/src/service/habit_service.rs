//! Habit tracking use-cases.
//!
//! # Responsibility
//! - Own the `habits` collection (habit name + nested completion log).
//! - Derive streaks and completion totals from the log on every read.
//!
//! # Invariants
//! - Habit names are unique within a session.
//! - Marking a habit done is idempotent per calendar date.

use super::{ServiceError, ServiceResult};
use crate::analytics::streak;
use crate::model::record::{FieldValue, Record, RecordId};
use crate::store::{RecordAddress, RecordStore};
use chrono::NaiveDate;
use std::collections::BTreeSet;

const HABITS: &str = "habits";

/// Read model for one habit row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitItem {
    pub id: RecordId,
    pub name: String,
    /// Total days this habit was ever marked done.
    pub days_completed: usize,
}

/// Use-case facade over the habit collection.
pub struct HabitService<'a, S: RecordStore> {
    store: &'a mut S,
}

impl<'a, S: RecordStore> HabitService<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Adds one habit with an empty completion log.
    pub fn add_habit(&mut self, name: &str) -> ServiceResult<RecordId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::EmptyInput("habit name"));
        }
        if self
            .store
            .snapshot(HABITS)
            .iter()
            .any(|record| record.text("name") == Some(name))
        {
            return Err(ServiceError::Duplicate {
                what: "habit",
                name: name.to_string(),
            });
        }
        let record = Record::new()
            .with("name", FieldValue::Text(name.to_string()))
            .with("log", FieldValue::List(Vec::new()));
        Ok(self.store.append(HABITS, record)?)
    }

    /// Marks one habit done for `date`. A second mark on the same date is
    /// a no-op.
    pub fn mark_done(&mut self, id: RecordId, date: NaiveDate) -> ServiceResult<()> {
        let mut log = self.log_for(id)?;
        if log.iter().any(|entry| entry.date("date") == Some(date)) {
            return Ok(());
        }
        log.push(Record::new().with("date", FieldValue::Date(date)));
        self.store
            .update_at(HABITS, RecordAddress::Id(id), "log", FieldValue::List(log))?;
        Ok(())
    }

    /// Consecutive-day streak ending at `today`.
    pub fn streak_for(&self, id: RecordId, today: NaiveDate) -> ServiceResult<u32> {
        let dates: BTreeSet<NaiveDate> = self
            .log_for(id)?
            .iter()
            .filter_map(|entry| entry.date("date"))
            .collect();
        Ok(streak(&dates, today))
    }

    /// Lists habits in insertion order with completion totals.
    pub fn habits(&self) -> ServiceResult<Vec<HabitItem>> {
        self.store
            .snapshot(HABITS)
            .iter()
            .map(|record| {
                Ok(HabitItem {
                    id: record.id,
                    name: record
                        .text("name")
                        .ok_or(ServiceError::MalformedRecord {
                            collection: HABITS,
                            field: "name",
                        })?
                        .to_string(),
                    days_completed: record.items("log").map_or(0, <[Record]>::len),
                })
            })
            .collect()
    }

    /// Removes one habit and its whole log.
    pub fn remove(&mut self, id: RecordId) -> ServiceResult<()> {
        self.store.remove_at(HABITS, RecordAddress::Id(id))?;
        Ok(())
    }

    fn log_for(&self, id: RecordId) -> ServiceResult<Vec<Record>> {
        let record = self
            .store
            .snapshot(HABITS)
            .into_iter()
            .find(|record| record.id == id)
            .ok_or(crate::store::StoreError::NotFound {
                collection: HABITS.to_string(),
                address: RecordAddress::Id(id),
            })?;
        record
            .items("log")
            .map(<[Record]>::to_vec)
            .ok_or(ServiceError::MalformedRecord {
                collection: HABITS,
                field: "log",
            })
    }
}

#[cfg(test)]
mod tests {
    use super::HabitService;
    use crate::store::SessionStore;
    use chrono::{Days, NaiveDate};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    #[test]
    fn duplicate_habit_names_are_rejected() {
        let mut store = SessionStore::new();
        let mut service = HabitService::new(&mut store);
        service.add_habit("Read 30 minutes").unwrap();
        assert!(service.add_habit("Read 30 minutes").is_err());
    }

    #[test]
    fn mark_done_is_idempotent_per_date() {
        let mut store = SessionStore::new();
        let mut service = HabitService::new(&mut store);
        let id = service.add_habit("stretch").unwrap();

        service.mark_done(id, today()).unwrap();
        service.mark_done(id, today()).unwrap();

        let habits = service.habits().unwrap();
        assert_eq!(habits[0].days_completed, 1);
    }

    #[test]
    fn streak_skips_nothing_and_stops_at_gaps() {
        let mut store = SessionStore::new();
        let mut service = HabitService::new(&mut store);
        let id = service.add_habit("run").unwrap();

        let yesterday = today().checked_sub_days(Days::new(1)).unwrap();
        let three_ago = today().checked_sub_days(Days::new(3)).unwrap();
        service.mark_done(id, today()).unwrap();
        service.mark_done(id, yesterday).unwrap();
        service.mark_done(id, three_ago).unwrap();

        assert_eq!(service.streak_for(id, today()).unwrap(), 2);
    }
}
