//! SQLite-backed note store.
//!
//! # Responsibility
//! - Persist notes in the `notes` table created by migration v1.
//! - Reject rows that do not hold text content.
//!
//! # Invariants
//! - `id` comes from `INTEGER PRIMARY KEY AUTOINCREMENT`, so deleted ids are
//!   never handed out again.
//! - Reads are ordered by `id ASC` (insertion order).

use crate::db::{open_db, open_db_in_memory};
use crate::model::note::{Note, NoteId};
use crate::store::{NoteStore, StoreError, StoreResult};
use rusqlite::types::Value;
use rusqlite::{params, Connection, Row};
use std::path::Path;

const NOTE_SELECT_SQL: &str = "SELECT id, content FROM notes";

/// Note store over a migrated SQLite connection.
pub struct SqliteNoteStore {
    conn: Connection,
}

impl SqliteNoteStore {
    /// Wraps a migrated/ready connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the connection
    ///   was not opened through `open_db`/`open_db_in_memory`.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self { conn })
    }

    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a migrated in-memory database. Contents vanish with the store.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }
}

impl NoteStore for SqliteNoteStore {
    fn insert(&mut self, content: &str) -> StoreResult<Note> {
        self.conn
            .execute("INSERT INTO notes (content) VALUES (?1);", [content])?;
        Ok(Note::new(self.conn.last_insert_rowid(), content))
    }

    fn update(&mut self, id: NoteId, content: &str) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET
                content = ?2,
                updated_at = (CAST(strftime('%s', 'now') AS INTEGER) * 1000)
             WHERE id = ?1;",
            params![id, content],
        )?;
        Ok(changed > 0)
    }

    fn delete(&mut self, id: NoteId) -> StoreResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn get(&self, id: NoteId) -> StoreResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_note_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_all(&self) -> StoreResult<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }
}

fn parse_note_row(row: &Row<'_>) -> StoreResult<Note> {
    let id: NoteId = row.get("id")?;
    let content = match row.get::<_, Value>("content")? {
        Value::Text(text) => text,
        other => {
            return Err(StoreError::InvalidData(format!(
                "non-text value of type {:?} in notes.content for id {id}",
                other.data_type()
            )));
        }
    };
    Ok(Note { id, content })
}

fn ensure_connection_ready(conn: &Connection) -> StoreResult<()> {
    if !table_exists(conn, "notes")? {
        return Err(StoreError::MissingRequiredTable("notes"));
    }

    for column in ["id", "content", "created_at", "updated_at"] {
        if !table_has_column(conn, "notes", column)? {
            return Err(StoreError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
