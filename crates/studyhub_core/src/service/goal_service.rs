//! Goal setting use-cases.
//!
//! # Responsibility
//! - Own the `goals` collection.
//! - Track progress updates and time remaining until target dates.

use super::{ServiceError, ServiceResult};
use crate::model::record::{FieldValue, Record, RecordId};
use crate::store::{RecordAddress, RecordStore};
use chrono::NaiveDate;

const GOALS: &str = "goals";

/// Planning horizon for one goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizon {
    /// 1-3 months out.
    ShortTerm,
    /// 6+ months out.
    LongTerm,
}

impl Horizon {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ShortTerm => "short_term",
            Self::LongTerm => "long_term",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "short_term" => Some(Self::ShortTerm),
            "long_term" => Some(Self::LongTerm),
            _ => None,
        }
    }
}

/// Input for creating one goal.
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub title: String,
    pub description: String,
    pub horizon: Horizon,
    pub category: String,
    pub target_date: NaiveDate,
}

/// Read model for one goal row.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalItem {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub horizon: Horizon,
    pub category: String,
    pub target_date: NaiveDate,
    /// Progress in whole percent, `0..=100`.
    pub progress: f64,
}

impl GoalItem {
    /// Days until the target date; negative once the date has passed.
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        (self.target_date - today).num_days()
    }
}

/// Use-case facade over the goal collection.
pub struct GoalService<'a, S: RecordStore> {
    store: &'a mut S,
}

impl<'a, S: RecordStore> GoalService<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Adds one goal starting at zero progress.
    pub fn add_goal(&mut self, goal: NewGoal, created: NaiveDate) -> ServiceResult<RecordId> {
        if goal.title.trim().is_empty() {
            return Err(ServiceError::EmptyInput("goal title"));
        }
        let record = Record::new()
            .with("title", FieldValue::Text(goal.title.trim().to_string()))
            .with("description", FieldValue::Text(goal.description))
            .with("horizon", FieldValue::Choice(goal.horizon.as_str().to_string()))
            .with("category", FieldValue::Choice(goal.category))
            .with("target_date", FieldValue::Date(goal.target_date))
            .with("progress", FieldValue::Number(0.0))
            .with("created", FieldValue::Date(created));
        Ok(self.store.append(GOALS, record)?)
    }

    /// Sets one goal's progress, clamped to `0..=100`.
    pub fn set_progress(&mut self, id: RecordId, progress: f64) -> ServiceResult<GoalItem> {
        let clamped = progress.clamp(0.0, 100.0);
        let updated = self.store.update_at(
            GOALS,
            RecordAddress::Id(id),
            "progress",
            FieldValue::Number(clamped),
        )?;
        parse_goal(&updated)
    }

    /// Lists goals in insertion order.
    pub fn goals(&self) -> ServiceResult<Vec<GoalItem>> {
        self.store.snapshot(GOALS).iter().map(parse_goal).collect()
    }

    /// Removes one goal.
    pub fn remove(&mut self, id: RecordId) -> ServiceResult<()> {
        self.store.remove_at(GOALS, RecordAddress::Id(id))?;
        Ok(())
    }
}

fn parse_goal(record: &Record) -> ServiceResult<GoalItem> {
    let malformed = |field| ServiceError::MalformedRecord {
        collection: GOALS,
        field,
    };
    Ok(GoalItem {
        id: record.id,
        title: record.text("title").ok_or(malformed("title"))?.to_string(),
        description: record
            .text("description")
            .ok_or(malformed("description"))?
            .to_string(),
        horizon: record
            .choice("horizon")
            .and_then(Horizon::parse)
            .ok_or(malformed("horizon"))?,
        category: record
            .choice("category")
            .ok_or(malformed("category"))?
            .to_string(),
        target_date: record.date("target_date").ok_or(malformed("target_date"))?,
        progress: record.number("progress").ok_or(malformed("progress"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::{GoalService, Horizon, NewGoal};
    use crate::store::SessionStore;
    use chrono::NaiveDate;

    fn new_goal(title: &str, target: NaiveDate) -> NewGoal {
        NewGoal {
            title: title.to_string(),
            description: "details".to_string(),
            horizon: Horizon::ShortTerm,
            category: "Academic".to_string(),
            target_date: target,
        }
    }

    #[test]
    fn progress_is_clamped_to_percent_range() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let target = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let mut store = SessionStore::new();
        let mut service = GoalService::new(&mut store);
        let id = service.add_goal(new_goal("pass finals", target), today).unwrap();

        assert_eq!(service.set_progress(id, 150.0).unwrap().progress, 100.0);
        assert_eq!(service.set_progress(id, -5.0).unwrap().progress, 0.0);
    }

    #[test]
    fn days_left_counts_down_to_the_target() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let target = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        let mut store = SessionStore::new();
        let mut service = GoalService::new(&mut store);
        service.add_goal(new_goal("draft essay", target), today).unwrap();

        let goals = service.goals().unwrap();
        assert_eq!(goals[0].days_left(today), 10);
        assert_eq!(goals[0].progress, 0.0);
    }
}
