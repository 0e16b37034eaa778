use quicksnap_core::{
    InMemoryNoteStore, Note, NoteId, NoteStore, ObservedNoteStore, SqliteNoteStore, StoreError,
    StoreResult,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn subscriber_sees_current_list_on_subscription() {
    let mut seeded = SqliteNoteStore::open_in_memory().unwrap();
    let existing = seeded.insert("already here").unwrap();

    let mut observed = ObservedNoteStore::new(seeded);
    assert!(observed.latest().is_empty());
    assert!(observed.is_stale());
    observed.refresh().unwrap();
    assert!(!observed.is_stale());

    let receiver = observed.observe_all();
    assert_eq!(*receiver.borrow(), vec![existing]);
}

#[test]
fn each_change_is_published_once_and_noops_publish_nothing() {
    let mut observed = ObservedNoteStore::new(InMemoryNoteStore::new());
    let mut receiver = observed.observe_all();
    receiver.borrow_and_update();

    let note = observed.insert("first").unwrap().value;
    assert!(receiver.has_changed().unwrap());
    assert_eq!(*receiver.borrow_and_update(), vec![note.clone()]);

    assert!(!observed.update(note.id + 100, "nobody").unwrap().value);
    assert!(!observed.delete(note.id + 100).unwrap().value);
    assert!(!receiver.has_changed().unwrap());

    assert!(observed.update(note.id, "edited").unwrap().value);
    assert!(receiver.has_changed().unwrap());
    assert_eq!(receiver.borrow_and_update()[0].content, "edited");

    assert!(observed.delete(note.id).unwrap().value);
    assert!(receiver.borrow_and_update().is_empty());
}

#[test]
fn dropping_the_store_closes_subscriptions() {
    let observed = ObservedNoteStore::new(InMemoryNoteStore::new());
    let receiver = observed.observe_all();
    drop(observed);
    assert!(receiver.has_changed().is_err());
}

/// In-memory store whose next `list_all` calls fail `failing_lists` times.
struct FlakyListStore {
    inner: InMemoryNoteStore,
    failing_lists: Arc<AtomicUsize>,
}

impl NoteStore for FlakyListStore {
    fn insert(&mut self, content: &str) -> StoreResult<Note> {
        self.inner.insert(content)
    }

    fn update(&mut self, id: NoteId, content: &str) -> StoreResult<bool> {
        self.inner.update(id, content)
    }

    fn delete(&mut self, id: NoteId) -> StoreResult<bool> {
        self.inner.delete(id)
    }

    fn get(&self, id: NoteId) -> StoreResult<Option<Note>> {
        self.inner.get(id)
    }

    fn list_all(&self) -> StoreResult<Vec<Note>> {
        let pending = self.failing_lists.load(Ordering::SeqCst);
        if pending > 0 {
            self.failing_lists.store(pending - 1, Ordering::SeqCst);
            return Err(StoreError::InvalidData("list unavailable".to_string()));
        }
        self.inner.list_all()
    }
}

#[test]
fn failed_reload_keeps_the_write_and_marks_the_list_stale() {
    let failing_lists = Arc::new(AtomicUsize::new(0));
    let mut observed = ObservedNoteStore::new(FlakyListStore {
        inner: InMemoryNoteStore::new(),
        failing_lists: Arc::clone(&failing_lists),
    });
    observed.refresh().unwrap();

    failing_lists.store(1, Ordering::SeqCst);
    let written = observed.insert("saved anyway").unwrap();
    assert_eq!(written.value.content, "saved anyway");
    assert!(matches!(written.publish, Err(StoreError::InvalidData(_))));
    assert!(observed.is_stale());
    assert!(observed.latest().is_empty());

    assert!(observed.refresh_if_stale().unwrap());
    assert_eq!(observed.latest(), vec![written.value]);
    assert!(!observed.refresh_if_stale().unwrap());
}
