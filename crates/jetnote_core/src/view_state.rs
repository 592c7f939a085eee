//! Displayed-notes state holder.
//!
//! # Responsibility
//! - Own the list of notes currently shown, as an observable value.
//! - Turn user intents into independent repository tasks.
//!
//! # Invariants
//! - The observable value starts empty and only ever holds non-empty
//!   snapshots afterwards. An emptied store (for example after "delete all")
//!   therefore leaves the last non-empty list on display.
//! - Intents never wait for each other; issuance order is not preserved.
//! - Teardown stops the subscription at once. An intent whose store call has
//!   started runs to completion and reports its real outcome; one that has not
//!   started yet resolves to `Cancelled` without touching the store.

use crate::model::note::Note;
use crate::repository::NotesRepository;
use crate::store::{NoteSnapshot, SnapshotStream, StoreError, StoreResult};
use futures::StreamExt;
use log::{debug, error, info};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

pub struct NotesViewState {
    repository: Arc<NotesRepository>,
    notes: Arc<watch::Sender<NoteSnapshot>>,
    scope: CancellationToken,
    tasks: TaskTracker,
}

impl NotesViewState {
    /// Creates the holder and subscribes to the repository's live query.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(repository: Arc<NotesRepository>) -> Self {
        let (sender, _) = watch::channel(NoteSnapshot::empty());
        let notes = Arc::new(sender);
        let scope = CancellationToken::new();
        let tasks = TaskTracker::new();

        tasks.spawn(collect_snapshots(
            repository.get_notes(),
            Arc::clone(&notes),
            scope.clone(),
        ));
        info!("event=view_state_start module=view_state status=ok");

        Self {
            repository,
            notes,
            scope,
            tasks,
        }
    }

    /// Subscribes to the displayed list; the latest value is available immediately.
    pub fn notes(&self) -> watch::Receiver<NoteSnapshot> {
        self.notes.subscribe()
    }

    pub fn current_notes(&self) -> NoteSnapshot {
        self.notes.borrow().clone()
    }

    pub fn add_note(&self, note: Note) -> JoinHandle<StoreResult<()>> {
        self.launch("add", move |repo| async move { repo.add_note(&note).await })
    }

    pub fn update_note(&self, note: Note) -> JoinHandle<StoreResult<()>> {
        self.launch("update", move |repo| async move { repo.update_note(&note).await })
    }

    pub fn delete_note(&self, note: Note) -> JoinHandle<StoreResult<()>> {
        self.launch("delete", move |repo| async move { repo.delete_note(&note).await })
    }

    pub fn delete_all_notes(&self) -> JoinHandle<StoreResult<()>> {
        self.launch("delete_all", |repo| async move { repo.delete_all_notes().await })
    }

    /// Stops the subscription, cancels intents that have not started and waits
    /// for in-flight store calls to finish.
    pub async fn shutdown(self) {
        self.scope.cancel();
        self.tasks.close();
        self.tasks.wait().await;
        info!("event=view_state_stop module=view_state status=ok");
    }

    fn launch<F, Fut>(&self, intent: &'static str, op: F) -> JoinHandle<StoreResult<()>>
    where
        F: FnOnce(Arc<NotesRepository>) -> Fut,
        Fut: Future<Output = StoreResult<()>> + Send + 'static,
    {
        let operation = op(Arc::clone(&self.repository));
        let scope = self.scope.clone();
        self.tasks.spawn(async move {
            // `operation` has not been polled yet, so nothing reached the store.
            let result = if scope.is_cancelled() {
                Err(StoreError::Cancelled)
            } else {
                operation.await
            };
            if let Err(err) = &result {
                error!(
                    "event=note_intent module=view_state status=error intent={} error={}",
                    intent, err
                );
            }
            result
        })
    }
}

impl Drop for NotesViewState {
    fn drop(&mut self) {
        self.scope.cancel();
        self.tasks.close();
    }
}

/// Whether an emitted snapshot replaces the displayed list.
///
/// Empty snapshots are skipped so the store's cold-start emission does not
/// flash an empty list.
pub fn should_display(snapshot: &NoteSnapshot) -> bool {
    !snapshot.is_empty()
}

async fn collect_snapshots(
    mut snapshots: SnapshotStream,
    notes: Arc<watch::Sender<NoteSnapshot>>,
    scope: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = scope.cancelled() => break,
            next = snapshots.next() => match next {
                Some(snapshot) if should_display(&snapshot) => {
                    debug!(
                        "event=snapshot_apply module=view_state size={}",
                        snapshot.len()
                    );
                    notes.send_replace(snapshot);
                }
                Some(_) => debug!("event=snapshot_skip module=view_state reason=empty"),
                None => break,
            },
        }
    }
    debug!("event=subscription_end module=view_state");
}
