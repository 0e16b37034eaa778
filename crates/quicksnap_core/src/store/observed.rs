//! Live observation over a note store.
//!
//! # Responsibility
//! - Hold the latest full note list and notify subscribers on change.
//! - Write through to the wrapped store and republish after each change.
//!
//! # Invariants
//! - A new subscriber sees the current list immediately.
//! - Exactly one publication per successful change; a no-op update/delete
//!   publishes nothing.
//! - A write that succeeded is reported as such even when the reload after it
//!   fails; the list is then stale until the next successful refresh.
//! - Dropping the wrapper closes every subscription.

use crate::model::note::{Note, NoteId};
use crate::store::{NoteStore, StoreResult};
use tokio::sync::watch;

/// Subscription to the live note list.
pub type NoteListReceiver = watch::Receiver<Vec<Note>>;

/// Outcome of a write that reached the store.
#[derive(Debug)]
pub struct Written<T> {
    /// What the store returned for the write itself.
    pub value: T,
    /// Result of republishing the list afterwards.
    pub publish: StoreResult<()>,
}

pub struct ObservedNoteStore<S: NoteStore> {
    store: S,
    publisher: watch::Sender<Vec<Note>>,
    stale: bool,
}

impl<S: NoteStore> ObservedNoteStore<S> {
    /// Wraps `store`. The published list starts empty and stale until the
    /// first `refresh`.
    pub fn new(store: S) -> Self {
        let (publisher, _) = watch::channel(Vec::new());
        Self {
            store,
            publisher,
            stale: true,
        }
    }

    /// Returns a new subscription to the note list.
    pub fn observe_all(&self) -> NoteListReceiver {
        self.publisher.subscribe()
    }

    /// Returns a copy of the last published list.
    pub fn latest(&self) -> Vec<Note> {
        self.publisher.borrow().clone()
    }

    /// Whether the published list may lag behind the store.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Reloads the full list from the store and publishes it.
    pub fn refresh(&mut self) -> StoreResult<()> {
        match self.store.list_all() {
            Ok(notes) => {
                // `send_replace` stores the value even while nobody is subscribed.
                self.publisher.send_replace(notes);
                self.stale = false;
                Ok(())
            }
            Err(err) => {
                self.stale = true;
                Err(err)
            }
        }
    }

    /// Refreshes only when an earlier reload failed. Returns whether a
    /// reload was attempted and succeeded.
    pub fn refresh_if_stale(&mut self) -> StoreResult<bool> {
        if !self.stale {
            return Ok(false);
        }
        self.refresh()?;
        Ok(true)
    }

    pub fn insert(&mut self, content: &str) -> StoreResult<Written<Note>> {
        let note = self.store.insert(content)?;
        Ok(Written {
            value: note,
            publish: self.refresh(),
        })
    }

    pub fn update(&mut self, id: NoteId, content: &str) -> StoreResult<Written<bool>> {
        let changed = self.store.update(id, content)?;
        Ok(self.after_change(changed))
    }

    pub fn delete(&mut self, id: NoteId) -> StoreResult<Written<bool>> {
        let changed = self.store.delete(id)?;
        Ok(self.after_change(changed))
    }

    fn after_change(&mut self, changed: bool) -> Written<bool> {
        let publish = if changed { self.refresh() } else { Ok(()) };
        Written {
            value: changed,
            publish,
        }
    }
}
