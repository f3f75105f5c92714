//! To-do list and daily productivity log use-cases.
//!
//! # Responsibility
//! - Own the `tasks` and `productivity` collections.
//! - Derive completion statistics fresh on every read.
//!
//! # Invariants
//! - Task completion is a plain boolean toggle; no intermediate states.
//! - Statistics are never stored, only recomputed.

use super::{ServiceError, ServiceResult};
use crate::analytics::{count_where, percentage, round2, sum_field};
use crate::model::record::{FieldValue, Record, RecordId};
use crate::store::{RecordAddress, RecordStore};
use chrono::NaiveDate;

const TASKS: &str = "tasks";
const PRODUCTIVITY: &str = "productivity";

/// Task urgency bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Work-log entry state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkStatus {
    Completed,
    InProgress,
    Pending,
}

impl WorkStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::InProgress => "in_progress",
            Self::Pending => "pending",
        }
    }
}

/// Which tasks a listing should include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFilter {
    All,
    Active,
    Completed,
}

/// Read model for one task row.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskItem {
    pub id: RecordId,
    pub title: String,
    pub priority: Priority,
    pub completed: bool,
    pub created: NaiveDate,
}

/// Recomputed task statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Completion share rounded to two decimals; 0 for an empty list.
    pub completion_pct: f64,
}

/// Use-case facade over the task collections.
pub struct TaskService<'a, S: RecordStore> {
    store: &'a mut S,
}

impl<'a, S: RecordStore> TaskService<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Adds one task, initially not completed.
    pub fn add_task(
        &mut self,
        title: &str,
        priority: Priority,
        created: NaiveDate,
    ) -> ServiceResult<RecordId> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ServiceError::EmptyInput("task title"));
        }
        let record = Record::new()
            .with("title", FieldValue::Text(title.to_string()))
            .with("priority", FieldValue::Choice(priority.as_str().to_string()))
            .with("completed", FieldValue::Bool(false))
            .with("created", FieldValue::Date(created));
        Ok(self.store.append(TASKS, record)?)
    }

    /// Lists tasks in insertion order, optionally filtered by state.
    pub fn tasks(&self, filter: TaskFilter) -> ServiceResult<Vec<TaskItem>> {
        let mut items = Vec::new();
        for record in self.store.snapshot(TASKS) {
            let item = parse_task(&record)?;
            let keep = match filter {
                TaskFilter::All => true,
                TaskFilter::Active => !item.completed,
                TaskFilter::Completed => item.completed,
            };
            if keep {
                items.push(item);
            }
        }
        Ok(items)
    }

    /// Flips one task's completion flag and returns the updated row.
    pub fn toggle(&mut self, id: RecordId) -> ServiceResult<TaskItem> {
        let current = self
            .store
            .snapshot(TASKS)
            .into_iter()
            .find(|record| record.id == id)
            .map(|record| record.flag("completed") == Some(true))
            .unwrap_or(false);
        let updated = self.store.update_at(
            TASKS,
            RecordAddress::Id(id),
            "completed",
            FieldValue::Bool(!current),
        )?;
        parse_task(&updated)
    }

    /// Removes one task by stable id.
    pub fn remove(&mut self, id: RecordId) -> ServiceResult<()> {
        self.store.remove_at(TASKS, RecordAddress::Id(id))?;
        Ok(())
    }

    /// Drops every completed task, keeping active ones in order.
    pub fn clear_completed(&mut self) -> ServiceResult<usize> {
        let done: Vec<RecordId> = self
            .store
            .snapshot(TASKS)
            .into_iter()
            .filter(|record| record.flag("completed") == Some(true))
            .map(|record| record.id)
            .collect();
        for id in &done {
            self.store.remove_at(TASKS, RecordAddress::Id(*id))?;
        }
        Ok(done.len())
    }

    /// Recomputes task statistics from the live collection.
    pub fn stats(&self) -> TaskStats {
        let records = self.store.snapshot(TASKS);
        let total = records.len();
        let completed = count_where(&records, |record| record.flag("completed") == Some(true));
        TaskStats {
            total,
            completed,
            pending: total - completed,
            completion_pct: round2(percentage(completed as f64, total as f64)),
        }
    }

    /// Logs one productivity entry (task name, hours spent, state).
    pub fn log_work(
        &mut self,
        task: &str,
        hours: f64,
        status: WorkStatus,
        date: NaiveDate,
    ) -> ServiceResult<RecordId> {
        let task = task.trim();
        if task.is_empty() {
            return Err(ServiceError::EmptyInput("work-log task"));
        }
        let record = Record::new()
            .with("task", FieldValue::Text(task.to_string()))
            .with("hours", FieldValue::Number(hours))
            .with("status", FieldValue::Choice(status.as_str().to_string()))
            .with("date", FieldValue::Date(date));
        Ok(self.store.append(PRODUCTIVITY, record)?)
    }

    /// Total hours across all productivity entries.
    pub fn total_logged_hours(&self) -> f64 {
        sum_field(&self.store.snapshot(PRODUCTIVITY), "hours")
    }
}

fn parse_task(record: &Record) -> ServiceResult<TaskItem> {
    let malformed = |field| ServiceError::MalformedRecord {
        collection: TASKS,
        field,
    };
    Ok(TaskItem {
        id: record.id,
        title: record.text("title").ok_or(malformed("title"))?.to_string(),
        priority: record
            .choice("priority")
            .and_then(Priority::parse)
            .ok_or(malformed("priority"))?,
        completed: record.flag("completed").ok_or(malformed("completed"))?,
        created: record.date("created").ok_or(malformed("created"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::{Priority, TaskFilter, TaskService, WorkStatus};
    use crate::store::SessionStore;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 20).unwrap()
    }

    #[test]
    fn add_rejects_blank_titles() {
        let mut store = SessionStore::new();
        let mut service = TaskService::new(&mut store);
        assert!(service.add_task("   ", Priority::Low, today()).is_err());
    }

    #[test]
    fn completion_stats_follow_the_two_of_three_scenario() {
        let mut store = SessionStore::new();
        let mut service = TaskService::new(&mut store);
        let a = service.add_task("read", Priority::High, today()).unwrap();
        service.add_task("write", Priority::Medium, today()).unwrap();
        let c = service.add_task("review", Priority::Low, today()).unwrap();

        service.toggle(a).unwrap();
        service.toggle(c).unwrap();

        let stats = service.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.completion_pct, 66.67);
    }

    #[test]
    fn clear_completed_keeps_active_tasks_in_order() {
        let mut store = SessionStore::new();
        let mut service = TaskService::new(&mut store);
        let a = service.add_task("one", Priority::Low, today()).unwrap();
        service.add_task("two", Priority::Low, today()).unwrap();
        let c = service.add_task("three", Priority::Low, today()).unwrap();
        service.toggle(a).unwrap();
        service.toggle(c).unwrap();

        assert_eq!(service.clear_completed().unwrap(), 2);
        let remaining = service.tasks(TaskFilter::All).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "two");
    }

    #[test]
    fn work_log_totals_are_summed_on_read() {
        let mut store = SessionStore::new();
        let mut service = TaskService::new(&mut store);
        service
            .log_work("algebra", 1.5, WorkStatus::Completed, today())
            .unwrap();
        service
            .log_work("essay", 2.0, WorkStatus::InProgress, today())
            .unwrap();
        assert_eq!(service.total_logged_hours(), 3.5);
    }
}
