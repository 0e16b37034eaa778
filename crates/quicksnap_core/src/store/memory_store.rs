//! Volatile note store.
//!
//! Keeps notes in a `Vec` for tests and throwaway sessions. Ids come from a
//! monotonic counter so a deleted id is never reused, matching the SQLite
//! store.

use crate::model::note::{Note, NoteId};
use crate::store::{NoteStore, StoreResult};

#[derive(Debug, Default)]
pub struct InMemoryNoteStore {
    notes: Vec<Note>,
    last_id: NoteId,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoteStore for InMemoryNoteStore {
    fn insert(&mut self, content: &str) -> StoreResult<Note> {
        self.last_id += 1;
        let note = Note::new(self.last_id, content);
        self.notes.push(note.clone());
        Ok(note)
    }

    fn update(&mut self, id: NoteId, content: &str) -> StoreResult<bool> {
        match self.notes.iter_mut().find(|note| note.id == id) {
            Some(note) => {
                note.content = content.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&mut self, id: NoteId) -> StoreResult<bool> {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != id);
        Ok(self.notes.len() != before)
    }

    fn get(&self, id: NoteId) -> StoreResult<Option<Note>> {
        Ok(self.notes.iter().find(|note| note.id == id).cloned())
    }

    fn list_all(&self) -> StoreResult<Vec<Note>> {
        Ok(self.notes.clone())
    }
}
