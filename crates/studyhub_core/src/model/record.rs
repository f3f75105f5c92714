//! Record domain model.
//!
//! # Responsibility
//! - Define the discriminated field-value model (`FieldKind`/`FieldValue`).
//! - Provide the generic `Record` shape all collections store.
//!
//! # Invariants
//! - `id` is stable and never reused for another record.
//! - A `FieldValue` always reports exactly one `FieldKind`.
//! - Nested lists contain full `Record` values, not loose scalars.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every record held by a session store.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type RecordId = Uuid;

/// Discriminant for the small closed set of field value shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Bool,
    /// Enumerated choice rendered from a fixed option list by the caller.
    Choice,
    /// Ordered list of nested records (completion logs, lap lists).
    List,
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Bool => "bool",
            Self::Choice => "choice",
            Self::List => "list",
        };
        write!(f, "{name}")
    }
}

/// One typed field value.
///
/// Loose form payloads are mapped into this enum at the store boundary so
/// that every downstream read is type-checked instead of stringly typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Bool(bool),
    Choice(String),
    List(Vec<Record>),
}

impl FieldValue {
    /// Returns the discriminant of this value.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Number(_) => FieldKind::Number,
            Self::Date(_) => FieldKind::Date,
            Self::Bool(_) => FieldKind::Bool,
            Self::Choice(_) => FieldKind::Choice,
            Self::List(_) => FieldKind::List,
        }
    }

    /// Returns a grouping key for `Text` and `Choice` values.
    ///
    /// Other kinds have no natural discriminant semantics and return `None`.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Text(value) | Self::Choice(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

/// Typed failure for a caller-supplied value that does not match the
/// field's bound kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Field name the caller tried to write.
    pub field: String,
    /// Kind bound for this field by the collection.
    pub expected: FieldKind,
    /// Kind of the value the caller supplied.
    pub actual: FieldKind,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "field `{}` expects {} but got {}",
            self.field, self.expected, self.actual
        )
    }
}

impl Error for ValidationError {}

/// Canonical user-entered item: a mapping from field name to typed value.
///
/// One shape serves every feature (task, expense, habit, flashcard, ...);
/// the owning collection decides which fields exist and binds their kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Stable id used for addressing, preferred over raw positions.
    pub id: RecordId,
    /// Field name to typed value. Name order is deterministic.
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Creates an empty record with a generated stable id.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    /// Creates an empty record with a caller-provided stable id.
    ///
    /// Used by snapshot import where identity already exists.
    pub fn with_id(id: RecordId) -> Self {
        Self {
            id,
            fields: BTreeMap::new(),
        }
    }

    /// Sets one field, replacing any previous value unchecked.
    ///
    /// Kind enforcement happens at the store boundary, not here.
    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    /// Chaining variant of [`Record::set`] for record construction.
    pub fn with(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.set(name, value);
        self
    }

    /// Returns one field value if present.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Returns a text field's content.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(FieldValue::Text(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns a numeric field's value.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.fields.get(name) {
            Some(FieldValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    /// Returns a date field's value.
    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        match self.fields.get(name) {
            Some(FieldValue::Date(value)) => Some(*value),
            _ => None,
        }
    }

    /// Returns a boolean field's value.
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.fields.get(name) {
            Some(FieldValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    /// Returns an enumerated-choice field's selected option.
    pub fn choice(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(FieldValue::Choice(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns a nested-list field's records.
    pub fn items(&self, name: &str) -> Option<&[Record]> {
        match self.fields.get(name) {
            Some(FieldValue::List(value)) => Some(value.as_slice()),
            _ => None,
        }
    }

    /// Mutable access to a nested-list field's records.
    pub fn items_mut(&mut self, name: &str) -> Option<&mut Vec<Record>> {
        match self.fields.get_mut(name) {
            Some(FieldValue::List(value)) => Some(value),
            _ => None,
        }
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldKind, FieldValue, Record};
    use chrono::NaiveDate;

    #[test]
    fn every_value_reports_its_kind() {
        assert_eq!(FieldValue::Text("x".into()).kind(), FieldKind::Text);
        assert_eq!(FieldValue::Number(1.5).kind(), FieldKind::Number);
        assert_eq!(FieldValue::Bool(true).kind(), FieldKind::Bool);
        assert_eq!(FieldValue::Choice("Food".into()).kind(), FieldKind::Choice);
        assert_eq!(FieldValue::List(Vec::new()).kind(), FieldKind::List);
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(FieldValue::Date(date).kind(), FieldKind::Date);
    }

    #[test]
    fn typed_accessors_reject_other_kinds() {
        let record = Record::new()
            .with("title", FieldValue::Text("read".into()))
            .with("amount", FieldValue::Number(42.0));

        assert_eq!(record.text("title"), Some("read"));
        assert_eq!(record.number("amount"), Some(42.0));
        assert_eq!(record.text("amount"), None);
        assert_eq!(record.number("title"), None);
        assert_eq!(record.flag("missing"), None);
    }

    #[test]
    fn grouping_key_exists_only_for_text_and_choice() {
        assert_eq!(FieldValue::Choice("Books".into()).as_key(), Some("Books"));
        assert_eq!(FieldValue::Text("Food".into()).as_key(), Some("Food"));
        assert_eq!(FieldValue::Number(1.0).as_key(), None);
        assert_eq!(FieldValue::Bool(false).as_key(), None);
    }

    #[test]
    fn set_replaces_previous_value() {
        let mut record = Record::new();
        record.set("done", FieldValue::Bool(false));
        record.set("done", FieldValue::Bool(true));
        assert_eq!(record.flag("done"), Some(true));
    }
}
