//! Session store contracts and in-memory implementation.
//!
//! # Responsibility
//! - Define the closed verb set every feature handler goes through.
//! - Keep mutation semantics (full-success or typed failure) in one place.
//!
//! # Invariants
//! - A failing operation leaves the addressed collection unchanged.
//! - Collection iteration order is insertion order.
//! - Derived aggregates are never written back into the store.

use crate::model::record::{FieldValue, Record, RecordId, ValidationError};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod session;

pub use session::SessionStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// How a mutation addresses one record inside a collection.
///
/// Stable ids are the preferred mode; positions exist for compatibility
/// with position-driven callers and shift on removal, so a held position
/// can silently alias a different record after a prior delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordAddress {
    Id(RecordId),
    Position(usize),
}

impl Display for RecordAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {id}"),
            Self::Position(index) => write!(f, "position {index}"),
        }
    }
}

/// Typed failure for store mutations.
#[derive(Debug)]
pub enum StoreError {
    /// The addressed record does not exist at call time.
    NotFound {
        collection: String,
        address: RecordAddress,
    },
    /// A supplied value does not match the field's bound kind.
    Validation(ValidationError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound {
                collection,
                address,
            } => write!(f, "no record at {address} in collection `{collection}`"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound { .. } => None,
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Verb set shared by every session-state implementation.
///
/// Feature services are generic over this trait so each session owns and
/// threads an injected store instead of touching ambient global state.
pub trait RecordStore {
    /// Returns the named collection, creating an empty one if absent.
    /// Never fails.
    fn collection(&mut self, name: &str) -> &[Record];

    /// Returns a by-value copy of the named collection for pure
    /// derivations. Absent collections yield an empty vector and are not
    /// created.
    fn snapshot(&self, name: &str) -> Vec<Record>;

    /// Appends a record; the new record is immediately visible to
    /// subsequent reads.
    ///
    /// # Errors
    /// - `StoreError::Validation` when a field's kind conflicts with the
    ///   kind bound for that field by earlier records.
    fn append(&mut self, name: &str, record: Record) -> StoreResult<RecordId>;

    /// Overwrites one field in place and returns the updated record.
    ///
    /// # Errors
    /// - `StoreError::NotFound` when the address does not resolve.
    /// - `StoreError::Validation` on a field-kind conflict.
    fn update_at(
        &mut self,
        name: &str,
        address: RecordAddress,
        field: &str,
        value: FieldValue,
    ) -> StoreResult<Record>;

    /// Removes and returns one record. Positions of subsequent records
    /// shift down by one.
    ///
    /// # Errors
    /// - `StoreError::NotFound` when the address does not resolve.
    fn remove_at(&mut self, name: &str, address: RecordAddress) -> StoreResult<Record>;

    /// Empties the collection unconditionally. Never fails.
    fn clear(&mut self, name: &str);
}
