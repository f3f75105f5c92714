use chrono::NaiveDate;
use std::collections::BTreeSet;
use studyhub_core::analytics::{group_sum, percentage, round2, streak, sum_field};
use studyhub_core::{FieldValue, Record};

fn expense(name: &str, amount: f64, category: &str) -> Record {
    Record::new()
        .with("name", FieldValue::Text(name.to_string()))
        .with("amount", FieldValue::Number(amount))
        .with("category", FieldValue::Choice(category.to_string()))
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn expense_scenario_groups_and_totals() {
    let records = vec![
        expense("lunch", 100.0, "Food"),
        expense("groceries", 250.0, "Food"),
        expense("textbook", 75.0, "Books"),
    ];

    assert_eq!(
        group_sum(&records, "category", "amount"),
        vec![("Food".to_string(), 350.0), ("Books".to_string(), 75.0)]
    );
    assert_eq!(sum_field(&records, "amount"), 425.0);
}

#[test]
fn completion_scenario_yields_two_thirds() {
    let records = vec![
        Record::new().with("completed", FieldValue::Bool(true)),
        Record::new().with("completed", FieldValue::Bool(false)),
        Record::new().with("completed", FieldValue::Bool(true)),
    ];
    let done = records
        .iter()
        .filter(|record| record.flag("completed") == Some(true))
        .count();
    assert_eq!(round2(percentage(done as f64, records.len() as f64)), 66.67);
}

#[test]
fn percentage_guards_division_by_zero() {
    assert_eq!(percentage(0.0, 0.0), 0.0);
    assert_eq!(percentage(50.0, 200.0), 25.0);
}

#[test]
fn unbroken_streak_counts_every_day() {
    let today = day(2025, 8, 6);
    let dates: BTreeSet<NaiveDate> = [day(2025, 8, 6), day(2025, 8, 5), day(2025, 8, 4)]
        .into_iter()
        .collect();
    assert_eq!(streak(&dates, today), 3);
}

#[test]
fn streak_without_today_is_zero() {
    let today = day(2025, 8, 6);
    let dates: BTreeSet<NaiveDate> = [day(2025, 8, 5), day(2025, 8, 4)].into_iter().collect();
    assert_eq!(streak(&dates, today), 0);
    assert_eq!(streak(&BTreeSet::new(), today), 0);
}

#[test]
fn streak_ends_at_the_first_gap() {
    let today = day(2025, 8, 6);
    let dates: BTreeSet<NaiveDate> = [day(2025, 8, 6), day(2025, 8, 5), day(2025, 8, 3)]
        .into_iter()
        .collect();
    assert_eq!(streak(&dates, today), 2);
}

#[test]
fn group_sum_ignores_records_without_a_discriminant() {
    let records = vec![
        expense("lunch", 100.0, "Food"),
        Record::new().with("amount", FieldValue::Number(40.0)),
    ];
    assert_eq!(
        group_sum(&records, "category", "amount"),
        vec![("Food".to_string(), 100.0)]
    );
}
