//! Policy layer between the raw notes store and presentation.
//!
//! # Responsibility
//! - Forward mutations to the store unchanged.
//! - Suppress consecutive content-equal snapshots on the live query.
//!
//! # Invariants
//! - Equality is by full record-set content, never by reference.
//! - Store errors are returned as-is; nothing is retried or translated.

use crate::model::note::{Note, NoteId};
use crate::store::{NotesStore, SnapshotStream, StoreResult};
use futures::{future, Stream, StreamExt};
use log::debug;
use std::sync::Arc;

pub struct NotesRepository {
    store: Arc<dyn NotesStore>,
}

impl NotesRepository {
    pub fn new(store: Arc<dyn NotesStore>) -> Self {
        Self { store }
    }

    pub async fn add_note(&self, note: &Note) -> StoreResult<()> {
        debug!("event=note_add module=repository id={}", note.id());
        self.store.insert(note).await
    }

    pub async fn update_note(&self, note: &Note) -> StoreResult<()> {
        debug!("event=note_update module=repository id={}", note.id());
        self.store.update(note).await
    }

    pub async fn delete_note(&self, note: &Note) -> StoreResult<()> {
        debug!("event=note_delete module=repository id={}", note.id());
        self.store.delete(note).await
    }

    pub async fn delete_all_notes(&self) -> StoreResult<()> {
        debug!("event=note_delete_all module=repository");
        self.store.delete_all().await
    }

    pub async fn get_note(&self, id: NoteId) -> StoreResult<Note> {
        self.store.get_by_id(id).await
    }

    /// Live snapshots with consecutive duplicates removed.
    pub fn get_notes(&self) -> SnapshotStream {
        distinct_until_changed(self.store.observe_all()).boxed()
    }
}

/// Drops every item equal to the item emitted just before it.
pub fn distinct_until_changed<S>(stream: S) -> impl Stream<Item = S::Item>
where
    S: Stream,
    S::Item: PartialEq + Clone,
{
    let mut last: Option<S::Item> = None;
    stream.filter(move |item| {
        let changed = last.as_ref() != Some(item);
        if changed {
            last = Some(item.clone());
        }
        future::ready(changed)
    })
}
