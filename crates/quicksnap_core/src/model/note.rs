//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and its identifier.
//! - Provide the blank-content rule used by the add path.
//!
//! # Invariants
//! - `id` is assigned by the store at creation and never reused.
//! - Updates replace `content` and keep `id`.

use serde::{Deserialize, Serialize};

/// Store-assigned surrogate key of a note.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = i64;

/// One free-text note.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    /// Stable identifier assigned by the store.
    pub id: NoteId,
    /// Free text. Never blank when created through the add path.
    pub content: String,
}

impl Note {
    pub fn new(id: NoteId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }

    /// Returns a copy with replaced content and the same `id`.
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            id: self.id,
            content: content.into(),
        }
    }
}

/// Returns whether `content` is empty or whitespace only.
pub fn is_blank_content(content: &str) -> bool {
    content.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::{is_blank_content, Note};

    #[test]
    fn blank_content_covers_whitespace_variants() {
        assert!(is_blank_content(""));
        assert!(is_blank_content("   "));
        assert!(is_blank_content("\t\n "));
        assert!(!is_blank_content(" x "));
    }

    #[test]
    fn with_content_keeps_identity() {
        let note = Note::new(7, "Buy milk");
        let updated = note.with_content("Buy oat milk");
        assert_eq!(updated.id, 7);
        assert_eq!(updated.content, "Buy oat milk");
    }

    #[test]
    fn note_serializes_with_plain_field_names() {
        let json = serde_json::to_value(Note::new(3, "hello")).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["content"], "hello");
    }
}
