//! Typed record model shared by every feature collection.
//!
//! # Responsibility
//! - Define the canonical record shape used by core business logic.
//! - Keep one generic field-value model for every feature's data.
//!
//! # Invariants
//! - Every record is identified by a stable `RecordId`.
//! - Field values are discriminated by `FieldKind`; kind mismatches are
//!   surfaced as typed validation errors, never coerced.

pub mod record;
