//! Note Store contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the durable CRUD contract consumed by the notes repository.
//! - Isolate SQLite query details from repository orchestration.
//! - Provide live observation of the full note list (`ObservedNoteStore`).
//!
//! # Invariants
//! - The store assigns note ids; ids are never reused.
//! - `list_all` returns notes in insertion order.
//! - Update/delete of an absent id is a no-op reported as `Ok(false)`.

use crate::db::DbError;
use crate::model::note::{Note, NoteId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory_store;
pub mod observed;
pub mod sqlite_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for note persistence and query operations.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "connection is not migrated: missing table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "connection is not migrated: missing column `{table}.{column}`"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable note persistence.
///
/// Implementations are synchronous; the notes repository moves the store onto
/// a background worker so callers never block on these calls.
pub trait NoteStore: Send + 'static {
    /// Persists a new note and returns it with its fresh id.
    fn insert(&mut self, content: &str) -> StoreResult<Note>;
    /// Replaces content of `id`. Returns `false` when no such note exists.
    fn update(&mut self, id: NoteId, content: &str) -> StoreResult<bool>;
    /// Removes `id`. Returns `false` when no such note exists.
    fn delete(&mut self, id: NoteId) -> StoreResult<bool>;
    fn get(&self, id: NoteId) -> StoreResult<Option<Note>>;
    /// Returns every note in insertion order.
    fn list_all(&self) -> StoreResult<Vec<Note>>;
}
