//! In-memory session store.
//!
//! # Responsibility
//! - Hold all mutable user data for the lifetime of one session.
//! - Enforce field-kind binding on every write path.
//! - Provide session-boundary JSON snapshot export/import.
//!
//! # Invariants
//! - All state lives in this object; dropping it destroys the session.
//! - The first value stored under a field name binds that field's kind
//!   for the whole collection.
//! - Failed mutations leave records and kind bindings untouched.

use super::{RecordAddress, RecordStore, StoreError, StoreResult};
use crate::model::record::{FieldKind, FieldValue, Record, RecordId, ValidationError};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct Collection {
    records: Vec<Record>,
    kinds: BTreeMap<String, FieldKind>,
}

impl Collection {
    /// Checks one candidate write against the bound kinds without
    /// mutating anything.
    fn check(&self, field: &str, value: &FieldValue) -> Result<(), ValidationError> {
        match self.kinds.get(field) {
            Some(expected) if *expected != value.kind() => Err(ValidationError {
                field: field.to_string(),
                expected: *expected,
                actual: value.kind(),
            }),
            _ => Ok(()),
        }
    }

    /// Binds kinds for fields seen for the first time. Callers must have
    /// run `check` on every field beforehand.
    fn bind(&mut self, record: &Record) {
        for (field, value) in &record.fields {
            self.kinds
                .entry(field.clone())
                .or_insert_with(|| value.kind());
        }
    }

    fn resolve(&self, address: RecordAddress) -> Option<usize> {
        match address {
            RecordAddress::Position(index) if index < self.records.len() => Some(index),
            RecordAddress::Position(_) => None,
            RecordAddress::Id(id) => self.records.iter().position(|record| record.id == id),
        }
    }
}

/// Process/session-scoped mutable state for one interactive session.
///
/// Constructed per session and threaded through all handlers; never a
/// singleton. Nothing here survives the session unless the caller exports
/// a snapshot at a session boundary.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SessionStore {
    collections: BTreeMap<String, Collection>,
}

impl SessionStore {
    /// Creates an empty store for a fresh session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of collections referenced so far, in deterministic order.
    pub fn collection_names(&self) -> Vec<String> {
        self.collections.keys().cloned().collect()
    }

    /// Serializes the whole store for a session-boundary handoff.
    ///
    /// The core never calls this on its own; durability is the embedding
    /// deployment's concern.
    pub fn export_snapshot(&self) -> Result<String, serde_json::Error> {
        let payload = serde_json::to_string_pretty(self)?;
        info!(
            "event=snapshot_export module=store status=ok collections={}",
            self.collections.len()
        );
        Ok(payload)
    }

    /// Rebuilds a store from a snapshot produced by `export_snapshot`.
    pub fn import_snapshot(payload: &str) -> Result<Self, serde_json::Error> {
        let store: Self = serde_json::from_str(payload)?;
        info!(
            "event=snapshot_import module=store status=ok collections={}",
            store.collections.len()
        );
        Ok(store)
    }

    fn entry(&mut self, name: &str) -> &mut Collection {
        self.collections.entry(name.to_string()).or_default()
    }
}

impl RecordStore for SessionStore {
    fn collection(&mut self, name: &str) -> &[Record] {
        self.entry(name).records.as_slice()
    }

    fn snapshot(&self, name: &str) -> Vec<Record> {
        self.collections
            .get(name)
            .map(|collection| collection.records.clone())
            .unwrap_or_default()
    }

    fn append(&mut self, name: &str, record: Record) -> StoreResult<RecordId> {
        let collection = self.entry(name);
        for (field, value) in &record.fields {
            collection.check(field, value)?;
        }
        collection.bind(&record);

        let id = record.id;
        collection.records.push(record);
        debug!(
            "event=record_append module=store status=ok collection={name} id={id} size={}",
            collection.records.len()
        );
        Ok(id)
    }

    fn update_at(
        &mut self,
        name: &str,
        address: RecordAddress,
        field: &str,
        value: FieldValue,
    ) -> StoreResult<Record> {
        let collection = self.entry(name);
        let index = collection
            .resolve(address)
            .ok_or_else(|| StoreError::NotFound {
                collection: name.to_string(),
                address,
            })?;
        collection.check(field, &value)?;
        collection
            .kinds
            .entry(field.to_string())
            .or_insert_with(|| value.kind());

        let record = &mut collection.records[index];
        record.set(field, value);
        debug!("event=record_update module=store status=ok collection={name} {address}");
        Ok(record.clone())
    }

    fn remove_at(&mut self, name: &str, address: RecordAddress) -> StoreResult<Record> {
        let collection = self.entry(name);
        let index = collection
            .resolve(address)
            .ok_or_else(|| StoreError::NotFound {
                collection: name.to_string(),
                address,
            })?;

        let removed = collection.records.remove(index);
        debug!(
            "event=record_remove module=store status=ok collection={name} id={} size={}",
            removed.id,
            collection.records.len()
        );
        Ok(removed)
    }

    fn clear(&mut self, name: &str) {
        let collection = self.entry(name);
        let dropped = collection.records.len();
        collection.records.clear();
        debug!("event=collection_clear module=store status=ok collection={name} dropped={dropped}");
    }
}
