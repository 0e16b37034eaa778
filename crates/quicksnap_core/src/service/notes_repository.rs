//! Notes repository: the observable view-model over a note store.
//!
//! # Responsibility
//! - Expose the live note list to any number of observers.
//! - Accept add/update/delete requests without blocking the caller and apply
//!   them on one background worker that owns the store.
//! - Report store failures on logs and a broadcast channel, never to the
//!   mutating caller.
//!
//! # Invariants
//! - Blank content is rejected on add before anything is queued.
//! - Requests from one caller apply in the order they were issued.
//! - Notes are addressed by `id` only; content never identifies a note.
//! - A write that reached the store is never reported as a failed write;
//!   a failed reload after it is reported as `Load` and retried before the
//!   next request.
//! - After teardown the worker stops, queued requests are discarded and
//!   every list subscription observes closure.

use crate::model::note::{is_blank_content, Note, NoteId};
use crate::store::observed::{NoteListReceiver, ObservedNoteStore, Written};
use crate::store::{NoteStore, StoreError, StoreResult};
use log::{debug, info, warn};
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

const FAILURE_CHANNEL_CAPACITY: usize = 32;

/// Store operation attempted by the background worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteOperation {
    /// Reloading the full list, at start-up or after a write.
    Load,
    Add,
    Update,
    Delete,
}

impl NoteOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl Display for NoteOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A store failure swallowed by the fire-and-forget dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteStoreFailure {
    pub operation: NoteOperation,
    /// Target note, when the operation addressed one.
    pub note_id: Option<NoteId>,
    pub message: String,
}

impl Display for NoteStoreFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.note_id {
            Some(id) => write!(f, "{} failed for note {id}: {}", self.operation, self.message),
            None => write!(f, "{} failed: {}", self.operation, self.message),
        }
    }
}

enum NoteCommand {
    Add { content: String },
    Update { id: NoteId, content: String },
    Delete { id: NoteId },
    Settle { done: oneshot::Sender<()> },
}

/// Observable note list plus non-blocking mutation entry points.
pub struct NotesRepository {
    commands: mpsc::UnboundedSender<NoteCommand>,
    notes: NoteListReceiver,
    failures: broadcast::Sender<NoteStoreFailure>,
    stopped: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl NotesRepository {
    /// Takes ownership of `store` and starts the background worker.
    ///
    /// The observed list starts empty and is filled once the worker has
    /// loaded the store.
    ///
    /// # Panics
    /// - When called outside a tokio runtime.
    pub fn spawn<S: NoteStore>(store: S) -> Self {
        let observed = ObservedNoteStore::new(store);
        let notes = observed.observe_all();
        let (commands, queue) = mpsc::unbounded_channel();
        let (failures, _) = broadcast::channel(FAILURE_CHANNEL_CAPACITY);
        let stopped = Arc::new(AtomicBool::new(false));

        let worker = {
            let failures = failures.clone();
            let stopped = Arc::clone(&stopped);
            tokio::task::spawn_blocking(move || run_worker(observed, queue, failures, stopped))
        };

        Self {
            commands,
            notes,
            failures,
            stopped,
            worker: Some(worker),
        }
    }

    /// Creates a note from `content` unless it is blank.
    ///
    /// Blank input is ignored without error. Returns immediately; the new
    /// note shows up in `notes()` once the worker has stored it.
    pub fn add_note(&self, content: impl Into<String>) {
        let content = content.into();
        if is_blank_content(&content) {
            debug!("event=note_add module=notes status=skipped reason=blank_content");
            return;
        }
        self.dispatch(NoteOperation::Add, NoteCommand::Add { content });
    }

    /// Replaces the content of `target` (by id). Blank content is allowed.
    pub fn update_note(&self, target: &Note, new_content: impl Into<String>) {
        self.dispatch(
            NoteOperation::Update,
            NoteCommand::Update {
                id: target.id,
                content: new_content.into(),
            },
        );
    }

    /// Removes `target` (by id). Removing an unknown id is a no-op.
    pub fn delete_note(&self, target: &Note) {
        self.dispatch(NoteOperation::Delete, NoteCommand::Delete { id: target.id });
    }

    /// Returns a new subscription to the live note list.
    pub fn notes(&self) -> NoteListReceiver {
        self.notes.clone()
    }

    /// Returns the latest observed list.
    pub fn current_notes(&self) -> Vec<Note> {
        self.notes.borrow().clone()
    }

    /// Looks up a note by id in the latest observed list.
    pub fn note_by_id(&self, id: NoteId) -> Option<Note> {
        self.notes.borrow().iter().find(|note| note.id == id).cloned()
    }

    /// Subscribes to store failures raised by later requests.
    pub fn subscribe_failures(&self) -> broadcast::Receiver<NoteStoreFailure> {
        self.failures.subscribe()
    }

    /// Waits until every request issued before this call has been applied
    /// and published. Returns early if the worker is gone.
    pub async fn settled(&self) {
        let (done, applied) = oneshot::channel();
        if self.commands.send(NoteCommand::Settle { done }).is_err() {
            return;
        }
        let _ = applied.await;
    }

    /// Stops the worker and waits for it to exit.
    ///
    /// Requests still queued are discarded. Dropping the repository has the
    /// same effect without the wait.
    pub async fn shutdown(mut self) {
        let worker = self.worker.take();
        drop(self);
        if let Some(worker) = worker {
            if let Err(err) = worker.await {
                warn!("event=notes_worker module=notes status=error error={err}");
            }
        }
    }

    fn dispatch(&self, operation: NoteOperation, command: NoteCommand) {
        if self.commands.send(command).is_err() {
            warn!(
                "event=note_{operation} module=notes status=dropped reason=worker_stopped"
            );
        }
    }
}

impl Drop for NotesRepository {
    fn drop(&mut self) {
        // The worker drains what is left in the queue without applying it.
        self.stopped.store(true, Ordering::Release);
    }
}

fn run_worker<S: NoteStore>(
    mut store: ObservedNoteStore<S>,
    mut queue: mpsc::UnboundedReceiver<NoteCommand>,
    failures: broadcast::Sender<NoteStoreFailure>,
    stopped: Arc<AtomicBool>,
) {
    info!("event=notes_worker module=notes status=start");
    if let Err(err) = store.refresh() {
        report_failure(&failures, NoteOperation::Load, None, &err);
    }

    let mut discarded = 0usize;
    while let Some(command) = queue.blocking_recv() {
        if stopped.load(Ordering::Acquire) {
            if !matches!(command, NoteCommand::Settle { .. }) {
                discarded += 1;
            }
            continue;
        }
        catch_up(&mut store, &failures);
        apply_command(&mut store, command, &failures);
    }

    info!("event=notes_worker module=notes status=stopped discarded={discarded}");
}

/// Retries a reload that failed earlier so the list converges on the store.
fn catch_up<S: NoteStore>(
    store: &mut ObservedNoteStore<S>,
    failures: &broadcast::Sender<NoteStoreFailure>,
) {
    match store.refresh_if_stale() {
        Ok(true) => info!("event=notes_reload module=notes status=ok reason=stale"),
        Ok(false) => {}
        Err(err) => report_failure(failures, NoteOperation::Load, None, &err),
    }
}

fn apply_command<S: NoteStore>(
    store: &mut ObservedNoteStore<S>,
    command: NoteCommand,
    failures: &broadcast::Sender<NoteStoreFailure>,
) {
    let started_at = Instant::now();
    match command {
        NoteCommand::Add { content } => match store.insert(&content) {
            Ok(Written { value: note, publish }) => {
                info!(
                    "event=note_add module=notes status=ok note_id={} content_len={} duration_ms={}",
                    note.id,
                    content.chars().count(),
                    started_at.elapsed().as_millis()
                );
                report_publish(failures, note.id, publish);
            }
            Err(err) => report_failure(failures, NoteOperation::Add, None, &err),
        },
        NoteCommand::Update { id, content } => match store.update(id, &content) {
            Ok(Written { value: true, publish }) => {
                info!(
                    "event=note_update module=notes status=ok note_id={id} content_len={} duration_ms={}",
                    content.chars().count(),
                    started_at.elapsed().as_millis()
                );
                report_publish(failures, id, publish);
            }
            Ok(Written { value: false, .. }) => {
                debug!("event=note_update module=notes status=noop note_id={id}")
            }
            Err(err) => report_failure(failures, NoteOperation::Update, Some(id), &err),
        },
        NoteCommand::Delete { id } => match store.delete(id) {
            Ok(Written { value: true, publish }) => {
                info!(
                    "event=note_delete module=notes status=ok note_id={id} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                report_publish(failures, id, publish);
            }
            Ok(Written { value: false, .. }) => {
                debug!("event=note_delete module=notes status=noop note_id={id}")
            }
            Err(err) => report_failure(failures, NoteOperation::Delete, Some(id), &err),
        },
        NoteCommand::Settle { done } => {
            let _ = done.send(());
        }
    }
}

fn report_publish(
    failures: &broadcast::Sender<NoteStoreFailure>,
    note_id: NoteId,
    publish: StoreResult<()>,
) {
    if let Err(err) = publish {
        report_failure(failures, NoteOperation::Load, Some(note_id), &err);
    }
}

fn report_failure(
    failures: &broadcast::Sender<NoteStoreFailure>,
    operation: NoteOperation,
    note_id: Option<NoteId>,
    err: &StoreError,
) {
    warn!(
        "event=note_{operation} module=notes status=error note_id={} error={err}",
        note_id.map_or_else(|| "none".to_string(), |id| id.to_string())
    );
    // No subscribers is fine: the failure is already in the log.
    let _ = failures.send(NoteStoreFailure {
        operation,
        note_id,
        message: err.to_string(),
    });
}
