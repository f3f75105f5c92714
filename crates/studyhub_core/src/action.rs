//! Presentation-facing action dispatch.
//!
//! # Responsibility
//! - Give presentation layers one typed entry point: action in, collection
//!   snapshot or typed failure out.
//!
//! # Invariants
//! - Dispatch adds no semantics of its own; every action maps onto exactly
//!   one store verb.

use crate::model::record::{FieldValue, Record};
use crate::store::{RecordAddress, RecordStore, StoreError};
use serde::{Deserialize, Serialize};

/// One discrete user action against a named collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Get {
        collection: String,
    },
    Append {
        collection: String,
        record: Record,
    },
    UpdateAt {
        collection: String,
        address: RecordAddress,
        field: String,
        value: FieldValue,
    },
    RemoveAt {
        collection: String,
        address: RecordAddress,
    },
    Clear {
        collection: String,
    },
}

impl Action {
    /// Collection the action targets.
    pub fn collection(&self) -> &str {
        match self {
            Self::Get { collection }
            | Self::Append { collection, .. }
            | Self::UpdateAt { collection, .. }
            | Self::RemoveAt { collection, .. }
            | Self::Clear { collection } => collection,
        }
    }
}

/// Applies one action and returns the post-action collection snapshot.
///
/// # Errors
/// - Propagates `StoreError` from the underlying verb; a failed action
///   leaves the store unchanged.
pub fn dispatch<S: RecordStore>(store: &mut S, action: Action) -> Result<Vec<Record>, StoreError> {
    let name = action.collection().to_string();
    match action {
        Action::Get { .. } => {
            store.collection(&name);
        }
        Action::Append { record, .. } => {
            store.append(&name, record)?;
        }
        Action::UpdateAt {
            address,
            field,
            value,
            ..
        } => {
            store.update_at(&name, address, &field, value)?;
        }
        Action::RemoveAt { address, .. } => {
            store.remove_at(&name, address)?;
        }
        Action::Clear { .. } => {
            store.clear(&name);
        }
    }
    Ok(store.snapshot(&name))
}
