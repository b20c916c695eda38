//! Note batch request types.

use std::collections::HashSet;

use notra_core::{Error, Language, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single note to generate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteRequest {
    /// Caller-supplied identifier, unique within a batch.
    pub id: String,
    /// Short label naming the note section.
    pub label: String,
    /// Guide describing how the section should be written.
    pub guide: String,
    /// Source material the note is generated from.
    pub sample: String,
}

impl NoteRequest {
    /// Creates a note request with the given id and label.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            guide: String::new(),
            sample: String::new(),
        }
    }

    /// Sets the generation guide.
    pub fn with_guide(mut self, guide: impl Into<String>) -> Self {
        self.guide = guide.into();
        self
    }

    /// Sets the source material.
    pub fn with_sample(mut self, sample: impl Into<String>) -> Self {
        self.sample = sample.into();
        self
    }

    /// Validates that the required fields are present.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::invalid_input().with_message("item id must not be empty"));
        }
        if self.label.is_empty() {
            return Err(Error::invalid_input()
                .with_message(format!("item label must not be empty (id: {})", self.id)));
        }
        Ok(())
    }
}

/// An ordered batch of notes processed as one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteBatch {
    /// Unique identifier for this batch.
    pub batch_id: Uuid,
    language: Language,
    items: Vec<NoteRequest>,
}

impl NoteBatch {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self {
            batch_id: Uuid::now_v7(),
            language: Language::default(),
            items: Vec::new(),
        }
    }

    /// Creates a batch from a list of items.
    pub fn from_items(items: Vec<NoteRequest>) -> Self {
        Self {
            batch_id: Uuid::now_v7(),
            language: Language::default(),
            items,
        }
    }

    /// Sets the response language for the whole batch.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Appends an item to the batch.
    pub fn with_item(mut self, item: NoteRequest) -> Self {
        self.items.push(item);
        self
    }

    /// Response language for the batch.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Number of items in the batch.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the batch has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the items in order.
    pub fn iter_items(&self) -> impl Iterator<Item = &NoteRequest> {
        self.items.iter()
    }

    /// Consumes the batch, returning its items in order.
    pub fn into_items(self) -> Vec<NoteRequest> {
        self.items
    }

    /// Validates every item and rejects duplicate ids.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            item.validate()?;
            if !seen.insert(item.id.as_str()) {
                return Err(Error::invalid_input()
                    .with_message(format!("duplicate item id: {}", item.id)));
            }
        }
        Ok(())
    }
}

impl Default for NoteBatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_batch_creation() {
        let batch = NoteBatch::new()
            .with_item(NoteRequest::new("a", "Summary").with_guide("Summarize the visit."))
            .with_item(NoteRequest::new("b", "Plan").with_sample("Follow up in two weeks."))
            .with_language(Language::English);

        assert_eq!(batch.len(), 2);
        assert!(!batch.is_empty());
        assert_eq!(batch.language(), Language::English);
        assert!(batch.validate().is_ok());
    }

    #[test]
    fn test_empty_batch_is_valid() {
        let batch = NoteBatch::new();
        assert!(batch.is_empty());
        assert!(batch.validate().is_ok());
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let batch = NoteBatch::new()
            .with_item(NoteRequest::new("a", "Summary"))
            .with_item(NoteRequest::new("a", "Plan"));

        let error = batch.validate().unwrap_err();
        assert_eq!(error.to_string(), "InvalidInput: duplicate item id: a");
    }

    #[test]
    fn test_empty_id_is_rejected() {
        let batch = NoteBatch::new().with_item(NoteRequest::new("", "Summary"));
        assert!(batch.validate().is_err());
    }

    #[test]
    fn test_empty_label_is_rejected() {
        let batch = NoteBatch::new().with_item(NoteRequest::new("a", ""));
        let error = batch.validate().unwrap_err();
        assert_eq!(
            error.to_string(),
            "InvalidInput: item label must not be empty (id: a)"
        );
    }

    #[test]
    fn test_into_items_preserves_order() {
        let batch = NoteBatch::from_items(vec![
            NoteRequest::new("a", "L1"),
            NoteRequest::new("b", "L2"),
            NoteRequest::new("c", "L3"),
        ]);

        let ids: Vec<_> = batch.into_items().into_iter().map(|item| item.id).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }
}
