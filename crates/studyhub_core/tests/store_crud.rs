use studyhub_core::{
    FieldValue, Record, RecordAddress, RecordStore, SessionStore, StoreError,
};
use uuid::Uuid;

fn task(title: &str) -> Record {
    Record::new()
        .with("title", FieldValue::Text(title.to_string()))
        .with("completed", FieldValue::Bool(false))
}

fn task_with_fixed_id(id: &str, title: &str) -> Record {
    let mut record = task(title);
    record.id = Uuid::parse_str(id).unwrap();
    record
}

#[test]
fn appends_come_back_in_exactly_insertion_order() {
    let mut store = SessionStore::new();
    for title in ["first", "second", "third", "fourth"] {
        store.append("tasks", task(title)).unwrap();
    }

    let titles: Vec<&str> = store
        .collection("tasks")
        .iter()
        .filter_map(|record| record.text("title"))
        .collect();
    assert_eq!(titles, vec!["first", "second", "third", "fourth"]);
}

#[test]
fn remove_drops_only_the_target_and_keeps_relative_order() {
    let mut store = SessionStore::new();
    store.append("tasks", task("a")).unwrap();
    let b = store.append("tasks", task("b")).unwrap();
    store.append("tasks", task("c")).unwrap();

    let removed = store.remove_at("tasks", RecordAddress::Id(b)).unwrap();
    assert_eq!(removed.text("title"), Some("b"));

    let titles: Vec<&str> = store
        .collection("tasks")
        .iter()
        .filter_map(|record| record.text("title"))
        .collect();
    assert_eq!(titles, vec!["a", "c"]);
}

#[test]
fn update_on_a_missing_address_fails_and_modifies_nothing() {
    let mut store = SessionStore::new();
    store.append("tasks", task("only")).unwrap();
    let before = store.snapshot("tasks");

    let by_position = store.update_at(
        "tasks",
        RecordAddress::Position(5),
        "title",
        FieldValue::Text("ghost".into()),
    );
    assert!(matches!(by_position, Err(StoreError::NotFound { .. })));

    let by_id = store.update_at(
        "tasks",
        RecordAddress::Id(Uuid::new_v4()),
        "title",
        FieldValue::Text("ghost".into()),
    );
    assert!(matches!(by_id, Err(StoreError::NotFound { .. })));

    assert_eq!(store.snapshot("tasks"), before);
}

#[test]
fn update_overwrites_in_place_and_returns_the_record() {
    let mut store = SessionStore::new();
    let id = store.append("tasks", task("draft")).unwrap();

    let updated = store
        .update_at(
            "tasks",
            RecordAddress::Id(id),
            "completed",
            FieldValue::Bool(true),
        )
        .unwrap();
    assert_eq!(updated.id, id);
    assert_eq!(updated.flag("completed"), Some(true));
    assert_eq!(store.collection("tasks").len(), 1);
}

#[test]
fn kind_conflicts_are_validation_errors_on_both_write_paths() {
    let mut store = SessionStore::new();
    let id = store.append("tasks", task("typed")).unwrap();

    let bad_append = store.append(
        "tasks",
        Record::new().with("completed", FieldValue::Text("yes".into())),
    );
    assert!(matches!(bad_append, Err(StoreError::Validation(_))));

    let bad_update = store.update_at(
        "tasks",
        RecordAddress::Id(id),
        "completed",
        FieldValue::Number(1.0),
    );
    assert!(matches!(bad_update, Err(StoreError::Validation(_))));
    assert_eq!(store.collection("tasks").len(), 1);
}

#[test]
fn id_addressing_survives_earlier_removals() {
    let mut store = SessionStore::new();
    let a = task_with_fixed_id("00000000-0000-4000-8000-000000000001", "a");
    let b = task_with_fixed_id("00000000-0000-4000-8000-000000000002", "b");
    let b_id = b.id;
    store.append("tasks", a).unwrap();
    store.append("tasks", b).unwrap();

    store
        .remove_at("tasks", RecordAddress::Position(0))
        .unwrap();

    let updated = store
        .update_at(
            "tasks",
            RecordAddress::Id(b_id),
            "title",
            FieldValue::Text("still b".into()),
        )
        .unwrap();
    assert_eq!(updated.text("title"), Some("still b"));
}

#[test]
fn snapshot_export_import_round_trips_order_and_values() {
    let mut store = SessionStore::new();
    store.append("tasks", task("one")).unwrap();
    store.append("tasks", task("two")).unwrap();
    store
        .append(
            "expenses",
            Record::new()
                .with("name", FieldValue::Text("lunch".into()))
                .with("amount", FieldValue::Number(100.0)),
        )
        .unwrap();

    let payload = store.export_snapshot().unwrap();
    let mut restored = SessionStore::import_snapshot(&payload).unwrap();

    assert_eq!(restored.snapshot("tasks"), store.snapshot("tasks"));
    assert_eq!(restored.snapshot("expenses"), store.snapshot("expenses"));

    // Kind bindings survive the round trip.
    let bad = Record::new().with("amount", FieldValue::Text("lots".into()));
    assert!(restored.append("expenses", bad).is_err());
}

#[test]
fn clear_never_fails_even_for_unknown_collections() {
    let mut store = SessionStore::new();
    store.clear("never_referenced");
    store.append("tasks", task("x")).unwrap();
    store.clear("tasks");
    assert!(store.collection("tasks").is_empty());
}
