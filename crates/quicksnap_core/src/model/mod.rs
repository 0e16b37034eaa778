//! Domain model for the notes core.
//!
//! # Responsibility
//! - Define the canonical note record shared by store, repository and CLI.
//!
//! # Invariants
//! - Every note is identified by a store-assigned `NoteId`.
//! - Identity is never derived from note content.

pub mod note;
