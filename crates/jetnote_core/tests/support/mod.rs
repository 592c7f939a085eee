#![allow(dead_code)]

use async_trait::async_trait;
use futures::{stream, Stream, StreamExt};
use jetnote_core::{Note, NoteId, NoteSnapshot, NotesStore, SnapshotStream, StoreError, StoreResult};
use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::watch;

pub const WAIT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteBehavior {
    Succeed,
    Fail,
}

/// Store double that replays a fixed snapshot script on its live query.
pub struct ScriptedStore {
    script: Mutex<Option<Vec<NoteSnapshot>>>,
    writes: WriteBehavior,
    write_calls: AtomicUsize,
}

impl ScriptedStore {
    pub fn new(script: Vec<NoteSnapshot>, writes: WriteBehavior) -> Self {
        Self {
            script: Mutex::new(Some(script)),
            writes,
            write_calls: AtomicUsize::new(0),
        }
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    async fn write(&self) -> StoreResult<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        match self.writes {
            WriteBehavior::Succeed => Ok(()),
            WriteBehavior::Fail => Err(StoreError::Worker("disk unavailable".to_string())),
        }
    }
}

#[async_trait]
impl NotesStore for ScriptedStore {
    async fn insert(&self, _note: &Note) -> StoreResult<()> {
        self.write().await
    }

    async fn update(&self, _note: &Note) -> StoreResult<()> {
        self.write().await
    }

    async fn delete(&self, _note: &Note) -> StoreResult<()> {
        self.write().await
    }

    async fn delete_all(&self) -> StoreResult<()> {
        self.write().await
    }

    async fn get_by_id(&self, id: NoteId) -> StoreResult<Note> {
        Err(StoreError::NotFound(id))
    }

    fn observe_all(&self) -> SnapshotStream {
        let script = self.script.lock().unwrap().take().unwrap_or_default();
        stream::iter(script).chain(stream::pending()).boxed()
    }
}

pub fn snapshot(notes: &[&Note]) -> NoteSnapshot {
    NoteSnapshot::from(notes.iter().map(|note| (*note).clone()).collect::<Vec<_>>())
}

pub fn ids(snapshot: &NoteSnapshot) -> HashSet<NoteId> {
    snapshot.iter().map(Note::id).collect()
}

pub fn id_set(notes: &[&Note]) -> HashSet<NoteId> {
    notes.iter().map(|note| note.id()).collect()
}

/// Pulls from `stream` until an item satisfies `predicate`.
pub async fn next_matching<S>(stream: &mut S, predicate: impl Fn(&NoteSnapshot) -> bool) -> NoteSnapshot
where
    S: Stream<Item = NoteSnapshot> + Unpin,
{
    within(async {
        loop {
            let item = stream.next().await.expect("live query ended unexpectedly");
            if predicate(&item) {
                return item;
            }
        }
    })
    .await
}

/// Waits until the watched value satisfies `predicate`.
pub async fn displayed_matching(
    rx: &mut watch::Receiver<NoteSnapshot>,
    predicate: impl FnMut(&NoteSnapshot) -> bool,
) -> NoteSnapshot {
    within(async {
        rx.wait_for(predicate)
            .await
            .expect("view state dropped")
            .clone()
    })
    .await
}

pub async fn within<F: Future>(future: F) -> F::Output {
    tokio::time::timeout(WAIT, future)
        .await
        .expect("timed out waiting for notes")
}
