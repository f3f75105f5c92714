//! Expense tracking use-cases.
//!
//! # Responsibility
//! - Own the `expenses` collection and the single-record `budget`
//!   collection.
//! - Derive spend totals and category breakdowns on every read.
//!
//! # Invariants
//! - The budget collection holds at most one record.
//! - Category breakdown order follows first-seen category order.

use super::{ServiceError, ServiceResult};
use crate::analytics::{group_sum, sum_field};
use crate::model::record::{FieldValue, Record, RecordId};
use crate::store::{RecordAddress, RecordStore};
use chrono::NaiveDate;

const EXPENSES: &str = "expenses";
const BUDGET: &str = "budget";

/// Starting monthly budget before the user sets one.
pub const DEFAULT_BUDGET: f64 = 10_000.0;

/// Read model for one expense row.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseItem {
    pub id: RecordId,
    pub name: String,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
}

/// Recomputed budget position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpenseSummary {
    pub budget: f64,
    pub spent: f64,
    /// May go negative when the budget is overrun.
    pub remaining: f64,
}

/// Use-case facade over the expense collections.
pub struct ExpenseService<'a, S: RecordStore> {
    store: &'a mut S,
}

impl<'a, S: RecordStore> ExpenseService<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Replaces the monthly budget value.
    pub fn set_budget(&mut self, amount: f64) -> ServiceResult<()> {
        if self.store.snapshot(BUDGET).is_empty() {
            let record = Record::new().with("amount", FieldValue::Number(amount));
            self.store.append(BUDGET, record)?;
        } else {
            self.store.update_at(
                BUDGET,
                RecordAddress::Position(0),
                "amount",
                FieldValue::Number(amount),
            )?;
        }
        Ok(())
    }

    /// Current monthly budget, falling back to the default.
    pub fn budget(&self) -> f64 {
        self.store
            .snapshot(BUDGET)
            .first()
            .and_then(|record| record.number("amount"))
            .unwrap_or(DEFAULT_BUDGET)
    }

    /// Adds one expense row.
    pub fn add_expense(
        &mut self,
        name: &str,
        amount: f64,
        category: &str,
        date: NaiveDate,
    ) -> ServiceResult<RecordId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::EmptyInput("expense name"));
        }
        if amount <= 0.0 {
            return Err(ServiceError::NonPositiveAmount(amount));
        }
        let record = Record::new()
            .with("name", FieldValue::Text(name.to_string()))
            .with("amount", FieldValue::Number(amount))
            .with("category", FieldValue::Choice(category.to_string()))
            .with("date", FieldValue::Date(date));
        Ok(self.store.append(EXPENSES, record)?)
    }

    /// Removes one expense by stable id.
    pub fn remove(&mut self, id: RecordId) -> ServiceResult<()> {
        self.store.remove_at(EXPENSES, RecordAddress::Id(id))?;
        Ok(())
    }

    /// Recomputes the budget position from the live expense rows.
    pub fn summary(&self) -> ExpenseSummary {
        let budget = self.budget();
        let spent = sum_field(&self.store.snapshot(EXPENSES), "amount");
        ExpenseSummary {
            budget,
            spent,
            remaining: budget - spent,
        }
    }

    /// Per-category totals in first-seen order.
    pub fn by_category(&self) -> Vec<(String, f64)> {
        group_sum(&self.store.snapshot(EXPENSES), "category", "amount")
    }

    /// Most recent expenses first, capped at `limit` rows.
    pub fn recent(&self, limit: usize) -> ServiceResult<Vec<ExpenseItem>> {
        let mut items: Vec<ExpenseItem> = self
            .store
            .snapshot(EXPENSES)
            .iter()
            .map(parse_expense)
            .collect::<ServiceResult<_>>()?;
        items.sort_by(|a, b| b.date.cmp(&a.date));
        items.truncate(limit);
        Ok(items)
    }
}

fn parse_expense(record: &Record) -> ServiceResult<ExpenseItem> {
    let malformed = |field| ServiceError::MalformedRecord {
        collection: EXPENSES,
        field,
    };
    Ok(ExpenseItem {
        id: record.id,
        name: record.text("name").ok_or(malformed("name"))?.to_string(),
        amount: record.number("amount").ok_or(malformed("amount"))?,
        category: record
            .choice("category")
            .ok_or(malformed("category"))?
            .to_string(),
        date: record.date("date").ok_or(malformed("date"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::{ExpenseService, DEFAULT_BUDGET};
    use crate::store::SessionStore;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    #[test]
    fn budget_defaults_until_explicitly_set() {
        let mut store = SessionStore::new();
        let mut service = ExpenseService::new(&mut store);
        assert_eq!(service.budget(), DEFAULT_BUDGET);

        service.set_budget(5_000.0).unwrap();
        service.set_budget(7_500.0).unwrap();
        assert_eq!(service.budget(), 7_500.0);
    }

    #[test]
    fn summary_and_categories_follow_the_spec_scenario() {
        let mut store = SessionStore::new();
        let mut service = ExpenseService::new(&mut store);
        service.set_budget(1_000.0).unwrap();
        service.add_expense("lunch", 100.0, "Food", day(1)).unwrap();
        service.add_expense("dinner", 250.0, "Food", day(2)).unwrap();
        service.add_expense("textbook", 75.0, "Books", day(3)).unwrap();

        let summary = service.summary();
        assert_eq!(summary.spent, 425.0);
        assert_eq!(summary.remaining, 575.0);

        let categories = service.by_category();
        assert_eq!(
            categories,
            vec![("Food".to_string(), 350.0), ("Books".to_string(), 75.0)]
        );
    }

    #[test]
    fn recent_sorts_by_date_descending() {
        let mut store = SessionStore::new();
        let mut service = ExpenseService::new(&mut store);
        service.add_expense("early", 10.0, "Other", day(1)).unwrap();
        service.add_expense("late", 20.0, "Other", day(9)).unwrap();
        service.add_expense("middle", 30.0, "Other", day(5)).unwrap();

        let recent = service.recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].name, "late");
        assert_eq!(recent[1].name, "middle");
    }

    #[test]
    fn zero_amounts_are_rejected() {
        let mut store = SessionStore::new();
        let mut service = ExpenseService::new(&mut store);
        assert!(service.add_expense("bad", 0.0, "Other", day(1)).is_err());
    }
}
