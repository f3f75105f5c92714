//! Daily journal and notes use-cases.
//!
//! # Responsibility
//! - Own the `journal` collection (one entry per calendar date) and the
//!   `notes` collection (keyed by folder/subject).
//! - Derive plain-text previews from markdown note bodies.
//!
//! # Invariants
//! - Saving a journal entry for an existing date replaces it in place.
//! - Note keys (`folder/subject`) are unique; saving an existing key
//!   replaces the body.

use super::{ServiceError, ServiceResult};
use crate::model::record::{FieldValue, Record, RecordId};
use crate::store::{RecordAddress, RecordStore};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

const JOURNAL: &str = "journal";
const NOTES: &str = "notes";
const PREVIEW_MAX_CHARS: usize = 100;

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\(([^)]+)\)").expect("valid image regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\*_`#>~\-\[\]\(\)!]+"#).expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// How the writer felt on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Terrible,
    Bad,
    Okay,
    Good,
    Great,
}

impl Mood {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Terrible => "terrible",
            Self::Bad => "bad",
            Self::Okay => "okay",
            Self::Good => "good",
            Self::Great => "great",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "terrible" => Some(Self::Terrible),
            "bad" => Some(Self::Bad),
            "okay" => Some(Self::Okay),
            "good" => Some(Self::Good),
            "great" => Some(Self::Great),
            _ => None,
        }
    }
}

/// Read model for one journal entry.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub id: RecordId,
    pub date: NaiveDate,
    pub mood: Mood,
    pub body: String,
    pub tags: Vec<String>,
}

/// Read model for one saved note.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteItem {
    pub id: RecordId,
    pub folder: String,
    pub subject: String,
    pub body: String,
    /// Sanitized summary text, absent for symbol-only bodies.
    pub preview_text: Option<String>,
    /// First markdown image path, if any.
    pub preview_image: Option<String>,
}

impl NoteItem {
    /// Display key in the original `folder/subject` form.
    pub fn key(&self) -> String {
        format!("{}/{}", self.folder, self.subject)
    }
}

/// Use-case facade over journal and notes.
pub struct JournalService<'a, S: RecordStore> {
    store: &'a mut S,
}

impl<'a, S: RecordStore> JournalService<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Saves the journal entry for `date`, replacing any existing one.
    pub fn save_entry(
        &mut self,
        date: NaiveDate,
        mood: Mood,
        body: &str,
        tags: Vec<String>,
    ) -> ServiceResult<RecordId> {
        let tag_list = FieldValue::List(
            tags.into_iter()
                .map(|tag| Record::new().with("name", FieldValue::Text(tag)))
                .collect(),
        );
        let existing = self
            .store
            .snapshot(JOURNAL)
            .into_iter()
            .find(|record| record.date("date") == Some(date))
            .map(|record| record.id);

        if let Some(id) = existing {
            let address = RecordAddress::Id(id);
            self.store
                .update_at(JOURNAL, address, "mood", FieldValue::Choice(mood.as_str().into()))?;
            self.store
                .update_at(JOURNAL, address, "body", FieldValue::Text(body.to_string()))?;
            self.store.update_at(JOURNAL, address, "tags", tag_list)?;
            Ok(id)
        } else {
            let record = Record::new()
                .with("date", FieldValue::Date(date))
                .with("mood", FieldValue::Choice(mood.as_str().to_string()))
                .with("body", FieldValue::Text(body.to_string()))
                .with("tags", tag_list);
            Ok(self.store.append(JOURNAL, record)?)
        }
    }

    /// Returns the entry for `date`, if one was saved.
    pub fn entry_on(&self, date: NaiveDate) -> ServiceResult<Option<JournalEntry>> {
        self.store
            .snapshot(JOURNAL)
            .iter()
            .find(|record| record.date("date") == Some(date))
            .map(parse_entry)
            .transpose()
    }

    /// Most recent entries first, capped at `limit` rows.
    pub fn recent_entries(&self, limit: usize) -> ServiceResult<Vec<JournalEntry>> {
        let mut entries: Vec<JournalEntry> = self
            .store
            .snapshot(JOURNAL)
            .iter()
            .map(parse_entry)
            .collect::<ServiceResult<_>>()?;
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries.truncate(limit);
        Ok(entries)
    }

    /// Saves a note under `folder/subject`, replacing any existing body.
    pub fn save_note(&mut self, folder: &str, subject: &str, body: &str) -> ServiceResult<RecordId> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(ServiceError::EmptyInput("note subject"));
        }
        if body.trim().is_empty() {
            return Err(ServiceError::EmptyInput("note body"));
        }

        let existing = self
            .store
            .snapshot(NOTES)
            .into_iter()
            .find(|record| {
                record.choice("folder") == Some(folder) && record.text("subject") == Some(subject)
            })
            .map(|record| record.id);

        if let Some(id) = existing {
            self.store.update_at(
                NOTES,
                RecordAddress::Id(id),
                "body",
                FieldValue::Text(body.to_string()),
            )?;
            Ok(id)
        } else {
            let record = Record::new()
                .with("folder", FieldValue::Choice(folder.to_string()))
                .with("subject", FieldValue::Text(subject.to_string()))
                .with("body", FieldValue::Text(body.to_string()));
            Ok(self.store.append(NOTES, record)?)
        }
    }

    /// Lists notes in insertion order with derived previews.
    pub fn notes(&self) -> ServiceResult<Vec<NoteItem>> {
        self.store.snapshot(NOTES).iter().map(parse_note).collect()
    }

    /// Deletes one note.
    pub fn delete_note(&mut self, id: RecordId) -> ServiceResult<()> {
        self.store.remove_at(NOTES, RecordAddress::Id(id))?;
        Ok(())
    }
}

fn parse_entry(record: &Record) -> ServiceResult<JournalEntry> {
    let malformed = |field| ServiceError::MalformedRecord {
        collection: JOURNAL,
        field,
    };
    let tags = record
        .items("tags")
        .ok_or(malformed("tags"))?
        .iter()
        .filter_map(|tag| tag.text("name").map(str::to_string))
        .collect();
    Ok(JournalEntry {
        id: record.id,
        date: record.date("date").ok_or(malformed("date"))?,
        mood: record
            .choice("mood")
            .and_then(Mood::parse)
            .ok_or(malformed("mood"))?,
        body: record.text("body").ok_or(malformed("body"))?.to_string(),
        tags,
    })
}

fn parse_note(record: &Record) -> ServiceResult<NoteItem> {
    let malformed = |field| ServiceError::MalformedRecord {
        collection: NOTES,
        field,
    };
    let body = record.text("body").ok_or(malformed("body"))?.to_string();
    let (preview_text, preview_image) = derive_note_preview(&body);
    Ok(NoteItem {
        id: record.id,
        folder: record.choice("folder").ok_or(malformed("folder"))?.to_string(),
        subject: record.text("subject").ok_or(malformed("subject"))?.to_string(),
        body,
        preview_text,
        preview_image,
    })
}

/// Derives note preview projections from a markdown body.
///
/// The preview image is the first markdown image path; the preview text
/// has images removed, markdown symbols stripped, whitespace collapsed and
/// is capped at 100 characters.
pub fn derive_note_preview(body: &str) -> (Option<String>, Option<String>) {
    let preview_image = MARKDOWN_IMAGE_RE
        .captures(body)
        .and_then(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
        .filter(|value| !value.is_empty());

    let without_images = MARKDOWN_IMAGE_RE.replace_all(body, " ");
    let without_symbols = MARKDOWN_SYMBOL_RE.replace_all(&without_images, " ");
    let collapsed = WHITESPACE_RE.replace_all(&without_symbols, " ");
    let trimmed = collapsed.trim();
    let preview_text = if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(PREVIEW_MAX_CHARS).collect())
    };

    (preview_text, preview_image)
}
