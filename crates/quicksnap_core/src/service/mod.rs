//! Core use-case services.
//!
//! # Responsibility
//! - Mediate between callers and the note store (`NotesRepository`).
//! - Derive display projections from note content.

pub mod note_preview;
pub mod notes_repository;
