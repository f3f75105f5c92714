//! Study planner use-cases: schedule, assignments, exam countdown.
//!
//! # Responsibility
//! - Own the `schedule` and `assignments` collections.
//! - Derive due-date ordering, days-left and status counts on every read.
//!
//! # Invariants
//! - Assignment listings are sorted by due date ascending; ties keep
//!   insertion order.
//! - The exam countdown is pure date math over an injected `today`.

use super::{ServiceError, ServiceResult};
use crate::analytics::count_where;
use crate::model::record::{FieldValue, Record, RecordId};
use crate::store::{RecordAddress, RecordStore};
use chrono::NaiveDate;

const SCHEDULE: &str = "schedule";
const ASSIGNMENTS: &str = "assignments";

/// Assignment lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentStatus {
    NotStarted,
    InProgress,
    Submitted,
    Graded,
}

impl AssignmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Submitted => "submitted",
            Self::Graded => "graded",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "not_started" => Some(Self::NotStarted),
            "in_progress" => Some(Self::InProgress),
            "submitted" => Some(Self::Submitted),
            "graded" => Some(Self::Graded),
            _ => None,
        }
    }
}

/// Input for creating one assignment.
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub name: String,
    pub subject: String,
    pub due_date: NaiveDate,
    pub priority: String,
    pub status: AssignmentStatus,
    pub grade: Option<String>,
}

/// Read model for one assignment row.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentItem {
    pub id: RecordId,
    pub name: String,
    pub subject: String,
    pub due_date: NaiveDate,
    pub priority: String,
    pub status: AssignmentStatus,
    pub grade: Option<String>,
}

impl AssignmentItem {
    /// Days until the due date; negative once it has passed.
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        (self.due_date - today).num_days()
    }
}

/// Recomputed assignment status counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentCounts {
    pub total: usize,
    pub submitted: usize,
    pub graded: usize,
}

/// Read model for one schedule row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSlot {
    pub id: RecordId,
    pub subject: String,
    pub time_slot: String,
}

/// Time remaining until a named exam date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExamCountdown {
    pub days: i64,
}

impl ExamCountdown {
    pub fn until(exam_date: NaiveDate, today: NaiveDate) -> Self {
        Self {
            days: (exam_date - today).num_days(),
        }
    }

    pub fn is_today(&self) -> bool {
        self.days == 0
    }

    pub fn has_passed(&self) -> bool {
        self.days < 0
    }

    pub fn weeks(&self) -> f64 {
        self.days as f64 / 7.0
    }

    pub fn months(&self) -> f64 {
        self.days as f64 / 30.0
    }
}

/// Use-case facade over the planner collections.
pub struct PlannerService<'a, S: RecordStore> {
    store: &'a mut S,
}

impl<'a, S: RecordStore> PlannerService<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Adds one schedule row.
    pub fn add_slot(&mut self, subject: &str, time_slot: &str) -> ServiceResult<RecordId> {
        let subject = subject.trim();
        let time_slot = time_slot.trim();
        if subject.is_empty() {
            return Err(ServiceError::EmptyInput("schedule subject"));
        }
        if time_slot.is_empty() {
            return Err(ServiceError::EmptyInput("schedule time slot"));
        }
        let record = Record::new()
            .with("subject", FieldValue::Text(subject.to_string()))
            .with("time_slot", FieldValue::Text(time_slot.to_string()));
        Ok(self.store.append(SCHEDULE, record)?)
    }

    /// Lists schedule rows in insertion order.
    pub fn schedule(&self) -> ServiceResult<Vec<ScheduleSlot>> {
        self.store
            .snapshot(SCHEDULE)
            .iter()
            .map(|record| {
                let malformed = |field| ServiceError::MalformedRecord {
                    collection: SCHEDULE,
                    field,
                };
                Ok(ScheduleSlot {
                    id: record.id,
                    subject: record.text("subject").ok_or(malformed("subject"))?.to_string(),
                    time_slot: record
                        .text("time_slot")
                        .ok_or(malformed("time_slot"))?
                        .to_string(),
                })
            })
            .collect()
    }

    /// Drops the whole schedule.
    pub fn clear_schedule(&mut self) {
        self.store.clear(SCHEDULE);
    }

    /// Adds one assignment.
    pub fn add_assignment(&mut self, assignment: NewAssignment) -> ServiceResult<RecordId> {
        if assignment.name.trim().is_empty() {
            return Err(ServiceError::EmptyInput("assignment name"));
        }
        let mut record = Record::new()
            .with("name", FieldValue::Text(assignment.name.trim().to_string()))
            .with("subject", FieldValue::Text(assignment.subject))
            .with("due_date", FieldValue::Date(assignment.due_date))
            .with("priority", FieldValue::Choice(assignment.priority))
            .with(
                "status",
                FieldValue::Choice(assignment.status.as_str().to_string()),
            );
        if let Some(grade) = assignment.grade {
            record.set("grade", FieldValue::Text(grade));
        }
        Ok(self.store.append(ASSIGNMENTS, record)?)
    }

    /// Moves one assignment to a new lifecycle state.
    pub fn set_status(&mut self, id: RecordId, status: AssignmentStatus) -> ServiceResult<()> {
        self.store.update_at(
            ASSIGNMENTS,
            RecordAddress::Id(id),
            "status",
            FieldValue::Choice(status.as_str().to_string()),
        )?;
        Ok(())
    }

    /// Records a grade on one assignment and marks it graded.
    pub fn record_grade(&mut self, id: RecordId, grade: &str) -> ServiceResult<()> {
        self.store.update_at(
            ASSIGNMENTS,
            RecordAddress::Id(id),
            "grade",
            FieldValue::Text(grade.to_string()),
        )?;
        self.set_status(id, AssignmentStatus::Graded)
    }

    /// Removes one assignment.
    pub fn remove_assignment(&mut self, id: RecordId) -> ServiceResult<()> {
        self.store.remove_at(ASSIGNMENTS, RecordAddress::Id(id))?;
        Ok(())
    }

    /// Lists assignments sorted by due date ascending.
    pub fn assignments_by_due(&self) -> ServiceResult<Vec<AssignmentItem>> {
        let mut items: Vec<AssignmentItem> = self
            .store
            .snapshot(ASSIGNMENTS)
            .iter()
            .map(parse_assignment)
            .collect::<ServiceResult<_>>()?;
        items.sort_by_key(|item| item.due_date);
        Ok(items)
    }

    /// Recomputes assignment status counts.
    pub fn counts(&self) -> AssignmentCounts {
        let records = self.store.snapshot(ASSIGNMENTS);
        AssignmentCounts {
            total: records.len(),
            submitted: count_where(&records, |record| {
                record.choice("status") == Some("submitted")
            }),
            graded: count_where(&records, |record| record.choice("status") == Some("graded")),
        }
    }
}

fn parse_assignment(record: &Record) -> ServiceResult<AssignmentItem> {
    let malformed = |field| ServiceError::MalformedRecord {
        collection: ASSIGNMENTS,
        field,
    };
    Ok(AssignmentItem {
        id: record.id,
        name: record.text("name").ok_or(malformed("name"))?.to_string(),
        subject: record.text("subject").ok_or(malformed("subject"))?.to_string(),
        due_date: record.date("due_date").ok_or(malformed("due_date"))?,
        priority: record
            .choice("priority")
            .ok_or(malformed("priority"))?
            .to_string(),
        status: record
            .choice("status")
            .and_then(AssignmentStatus::parse)
            .ok_or(malformed("status"))?,
        grade: record.text("grade").map(str::to_string),
    })
}
