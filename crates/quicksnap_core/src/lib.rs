//! Core of the QuickSnap notes app.
//! Owns the note model, its SQLite persistence and the observable notes
//! repository that presentation code reads from and writes through.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{is_blank_content, Note, NoteId};
pub use service::note_preview::{derive_note_preview, NotePreview};
pub use service::notes_repository::{NoteOperation, NoteStoreFailure, NotesRepository};
pub use store::memory_store::InMemoryNoteStore;
pub use store::observed::{NoteListReceiver, ObservedNoteStore, Written};
pub use store::sqlite_store::SqliteNoteStore;
pub use store::{NoteStore, StoreError, StoreResult};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
