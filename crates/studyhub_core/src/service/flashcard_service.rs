//! Flashcard deck and study-mode use-cases.
//!
//! # Responsibility
//! - Own the `flashcards` collection.
//! - Model study mode as an explicit state value with pure transitions.
//!
//! # Invariants
//! - Study mode captures the deck order at entry; later deck edits do not
//!   reshuffle a session in progress.
//! - Card navigation clamps at both ends of the deck.

use super::{ServiceError, ServiceResult};
use crate::model::record::{FieldValue, Record, RecordId};
use crate::store::{RecordAddress, RecordStore};
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

const FLASHCARDS: &str = "flashcards";

/// Read model for one flashcard.
#[derive(Debug, Clone, PartialEq)]
pub struct CardItem {
    pub id: RecordId,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub created: NaiveDate,
}

/// Study-mode session state.
///
/// A plain value owned by the presentation layer; every button press maps
/// to one [`StudyAction`] applied through [`StudyState::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyState {
    /// Shuffled card ids captured when study mode was entered.
    pub order: Vec<RecordId>,
    /// Index into `order`.
    pub current: usize,
    pub show_answer: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyAction {
    ShowAnswer,
    Next,
    Previous,
}

impl StudyState {
    /// Applies one action and returns the successor state.
    pub fn apply(self, action: StudyAction) -> Self {
        match action {
            StudyAction::ShowAnswer => Self {
                show_answer: true,
                ..self
            },
            StudyAction::Next => {
                let last = self.order.len().saturating_sub(1);
                Self {
                    current: (self.current + 1).min(last),
                    show_answer: false,
                    ..self
                }
            }
            StudyAction::Previous => Self {
                current: self.current.saturating_sub(1),
                show_answer: false,
                ..self
            },
        }
    }

    /// One-based position label for progress rendering.
    pub fn position(&self) -> (usize, usize) {
        (self.current + 1, self.order.len())
    }
}

/// Use-case facade over the flashcard collection.
pub struct FlashcardService<'a, S: RecordStore> {
    store: &'a mut S,
}

impl<'a, S: RecordStore> FlashcardService<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Adds one card to the deck.
    pub fn add_card(
        &mut self,
        question: &str,
        answer: &str,
        category: &str,
        created: NaiveDate,
    ) -> ServiceResult<RecordId> {
        if question.trim().is_empty() {
            return Err(ServiceError::EmptyInput("flashcard question"));
        }
        if answer.trim().is_empty() {
            return Err(ServiceError::EmptyInput("flashcard answer"));
        }
        let record = Record::new()
            .with("question", FieldValue::Text(question.trim().to_string()))
            .with("answer", FieldValue::Text(answer.trim().to_string()))
            .with("category", FieldValue::Choice(category.to_string()))
            .with("created", FieldValue::Date(created));
        Ok(self.store.append(FLASHCARDS, record)?)
    }

    /// Removes one card.
    pub fn remove(&mut self, id: RecordId) -> ServiceResult<()> {
        self.store.remove_at(FLASHCARDS, RecordAddress::Id(id))?;
        Ok(())
    }

    /// Lists the deck in insertion order.
    pub fn cards(&self) -> ServiceResult<Vec<CardItem>> {
        self.store
            .snapshot(FLASHCARDS)
            .iter()
            .map(parse_card)
            .collect()
    }

    /// Enters study mode over a shuffled copy of the current deck.
    ///
    /// # Errors
    /// - `EmptyInput` when the deck has no cards to study.
    pub fn start_study<R: Rng>(&self, rng: &mut R) -> ServiceResult<StudyState> {
        let mut order: Vec<RecordId> = self
            .store
            .snapshot(FLASHCARDS)
            .iter()
            .map(|record| record.id)
            .collect();
        if order.is_empty() {
            return Err(ServiceError::EmptyInput("flashcard deck"));
        }
        order.shuffle(rng);
        Ok(StudyState {
            order,
            current: 0,
            show_answer: false,
        })
    }

    /// Resolves the card study mode currently points at.
    pub fn current_card(&self, state: &StudyState) -> ServiceResult<CardItem> {
        let id = state
            .order
            .get(state.current)
            .copied()
            .ok_or(ServiceError::MalformedRecord {
                collection: FLASHCARDS,
                field: "order",
            })?;
        let record = self
            .store
            .snapshot(FLASHCARDS)
            .into_iter()
            .find(|record| record.id == id)
            .ok_or(crate::store::StoreError::NotFound {
                collection: FLASHCARDS.to_string(),
                address: RecordAddress::Id(id),
            })?;
        parse_card(&record)
    }
}

fn parse_card(record: &Record) -> ServiceResult<CardItem> {
    let malformed = |field| ServiceError::MalformedRecord {
        collection: FLASHCARDS,
        field,
    };
    Ok(CardItem {
        id: record.id,
        question: record
            .text("question")
            .ok_or(malformed("question"))?
            .to_string(),
        answer: record.text("answer").ok_or(malformed("answer"))?.to_string(),
        category: record
            .choice("category")
            .ok_or(malformed("category"))?
            .to_string(),
        created: record.date("created").ok_or(malformed("created"))?,
    })
}
