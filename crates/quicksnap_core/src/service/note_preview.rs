//! Title/body preview derivation for note list rendering.
//!
//! The first two space-separated words form the title, the rest of the text
//! is the body. Splitting is on single ASCII spaces, so runs of spaces and
//! line breaks inside the body are preserved verbatim.

/// Display projection of one note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePreview {
    pub title: String,
    pub body: String,
}

impl NotePreview {
    /// Whether the body block (divider + text) should be rendered.
    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }
}

/// Splits note content into a two-word title and the remaining body.
pub fn derive_note_preview(content: &str) -> NotePreview {
    let parts: Vec<&str> = content.splitn(3, ' ').collect();
    match parts.as_slice() {
        [first, second, rest] => NotePreview {
            title: format!("{first} {second}"),
            body: (*rest).to_string(),
        },
        // Zero, one or two words: everything is title.
        _ => NotePreview {
            title: content.to_string(),
            body: String::new(),
        },
    }
}
