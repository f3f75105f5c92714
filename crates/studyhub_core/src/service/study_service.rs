//! Study analytics and attendance use-cases.
//!
//! # Responsibility
//! - Own the `study_sessions` and `attendance` collections.
//! - Derive hour totals, per-subject breakdowns, weekly activity and
//!   attendance standing on every read.
//!
//! # Invariants
//! - Course names are unique within a session.
//! - The weekly overview always spans Monday through Sunday of the week
//!   containing `today`.

use super::{ServiceError, ServiceResult};
use crate::analytics::{group_sum, percentage, round2, sum_field};
use crate::model::record::{FieldValue, Record, RecordId};
use crate::store::{RecordAddress, RecordStore};
use chrono::{Datelike, Days, NaiveDate};

const STUDY_SESSIONS: &str = "study_sessions";
const ATTENDANCE: &str = "attendance";

/// Attendance standing for one course.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseStatus {
    pub id: RecordId,
    pub name: String,
    /// Attendance share rounded to two decimals.
    pub attendance_pct: f64,
    pub required_pct: f64,
    /// Further classes that must be attended (with no absences) to reach
    /// the requirement; 0 when the requirement is already met.
    pub classes_needed: u32,
}

/// Use-case facade over study analytics.
pub struct StudyService<'a, S: RecordStore> {
    store: &'a mut S,
}

impl<'a, S: RecordStore> StudyService<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Logs one study session.
    pub fn log_session(
        &mut self,
        subject: &str,
        duration_hours: f64,
        date: NaiveDate,
    ) -> ServiceResult<RecordId> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(ServiceError::EmptyInput("study subject"));
        }
        if duration_hours <= 0.0 {
            return Err(ServiceError::NonPositiveAmount(duration_hours));
        }
        let record = Record::new()
            .with("subject", FieldValue::Text(subject.to_string()))
            .with("duration", FieldValue::Number(duration_hours))
            .with("date", FieldValue::Date(date));
        Ok(self.store.append(STUDY_SESSIONS, record)?)
    }

    /// Total logged hours across all sessions.
    pub fn total_hours(&self) -> f64 {
        sum_field(&self.store.snapshot(STUDY_SESSIONS), "duration")
    }

    /// Per-subject hour totals in first-seen order.
    pub fn hours_by_subject(&self) -> Vec<(String, f64)> {
        group_sum(&self.store.snapshot(STUDY_SESSIONS), "subject", "duration")
    }

    /// Session counts for Monday..Sunday of the week containing `today`.
    pub fn week_overview(&self, today: NaiveDate) -> Vec<(NaiveDate, usize)> {
        let sessions = self.store.snapshot(STUDY_SESSIONS);
        let monday = today - Days::new(u64::from(today.weekday().num_days_from_monday()));
        (0..7)
            .map(|offset| {
                let day = monday + Days::new(offset);
                let count = sessions
                    .iter()
                    .filter(|record| record.date("date") == Some(day))
                    .count();
                (day, count)
            })
            .collect()
    }

    /// Registers one course for attendance tracking.
    pub fn add_course(&mut self, name: &str, required_pct: f64) -> ServiceResult<RecordId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::EmptyInput("course name"));
        }
        if self
            .store
            .snapshot(ATTENDANCE)
            .iter()
            .any(|record| record.text("name") == Some(name))
        {
            return Err(ServiceError::Duplicate {
                what: "course",
                name: name.to_string(),
            });
        }
        let record = Record::new()
            .with("name", FieldValue::Text(name.to_string()))
            .with("required", FieldValue::Number(required_pct))
            .with("present", FieldValue::Number(0.0))
            .with("total", FieldValue::Number(0.0));
        Ok(self.store.append(ATTENDANCE, record)?)
    }

    /// Replaces one course's attended/held class counts.
    pub fn record_attendance(
        &mut self,
        id: RecordId,
        present: u32,
        total: u32,
    ) -> ServiceResult<()> {
        self.store.update_at(
            ATTENDANCE,
            RecordAddress::Id(id),
            "present",
            FieldValue::Number(f64::from(present)),
        )?;
        self.store.update_at(
            ATTENDANCE,
            RecordAddress::Id(id),
            "total",
            FieldValue::Number(f64::from(total)),
        )?;
        Ok(())
    }

    /// Attendance standing for every course, in insertion order.
    pub fn course_statuses(&self) -> ServiceResult<Vec<CourseStatus>> {
        self.store
            .snapshot(ATTENDANCE)
            .iter()
            .map(parse_course)
            .collect()
    }
}

fn parse_course(record: &Record) -> ServiceResult<CourseStatus> {
    let malformed = |field| ServiceError::MalformedRecord {
        collection: ATTENDANCE,
        field,
    };
    let name = record.text("name").ok_or(malformed("name"))?.to_string();
    let required = record.number("required").ok_or(malformed("required"))?;
    let present = record.number("present").ok_or(malformed("present"))?;
    let total = record.number("total").ok_or(malformed("total"))?;

    let shortage = total * required / 100.0 - present;
    Ok(CourseStatus {
        id: record.id,
        name,
        attendance_pct: round2(percentage(present, total)),
        required_pct: required,
        classes_needed: if shortage > 0.0 {
            shortage.ceil() as u32
        } else {
            0
        },
    })
}

#[cfg(test)]
mod tests {
    use super::StudyService;
    use crate::store::SessionStore;
    use chrono::NaiveDate;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn totals_and_subject_breakdown_are_recomputed_on_read() {
        let mut store = SessionStore::new();
        let mut service = StudyService::new(&mut store);
        service.log_session("Algebra", 1.5, day(3, 3)).unwrap();
        service.log_session("History", 2.0, day(3, 3)).unwrap();
        service.log_session("Algebra", 0.5, day(3, 4)).unwrap();

        assert_eq!(service.total_hours(), 4.0);
        assert_eq!(
            service.hours_by_subject(),
            vec![("Algebra".to_string(), 2.0), ("History".to_string(), 2.0)]
        );
    }

    #[test]
    fn week_overview_spans_monday_to_sunday() {
        let mut store = SessionStore::new();
        let mut service = StudyService::new(&mut store);
        // 2025-03-05 is a Wednesday; its week starts Monday 2025-03-03.
        let wednesday = day(3, 5);
        service.log_session("Algebra", 1.0, day(3, 3)).unwrap();
        service.log_session("History", 1.0, day(3, 5)).unwrap();
        service.log_session("History", 1.0, day(3, 5)).unwrap();

        let week = service.week_overview(wednesday);
        assert_eq!(week.len(), 7);
        assert_eq!(week[0], (day(3, 3), 1));
        assert_eq!(week[2], (day(3, 5), 2));
        assert_eq!(week[6], (day(3, 9), 0));
    }

    #[test]
    fn attendance_standing_reports_classes_needed() {
        let mut store = SessionStore::new();
        let mut service = StudyService::new(&mut store);
        let id = service.add_course("Physics", 75.0).unwrap();
        service.record_attendance(id, 6, 10).unwrap();

        let statuses = service.course_statuses().unwrap();
        assert_eq!(statuses[0].attendance_pct, 60.0);
        // 75% of 10 classes is 7.5; two more attended classes close the gap.
        assert_eq!(statuses[0].classes_needed, 2);
    }

    #[test]
    fn attendance_of_an_empty_course_is_zero_without_division_errors() {
        let mut store = SessionStore::new();
        let mut service = StudyService::new(&mut store);
        service.add_course("Chemistry", 75.0).unwrap();

        let statuses = service.course_statuses().unwrap();
        assert_eq!(statuses[0].attendance_pct, 0.0);
        assert_eq!(statuses[0].classes_needed, 0);
    }

    #[test]
    fn duplicate_courses_are_rejected() {
        let mut store = SessionStore::new();
        let mut service = StudyService::new(&mut store);
        service.add_course("Physics", 75.0).unwrap();
        assert!(service.add_course("Physics", 80.0).is_err());
    }
}
