//! Immutable full-table snapshots emitted by the live query.

use crate::model::note::Note;
use std::sync::Arc;

/// The complete set of notes at one point in time, in arrival order.
///
/// Cloning shares the underlying buffer. Equality compares the set of
/// records keyed by id; neither buffer identity nor row order takes part.
#[derive(Debug, Clone)]
pub struct NoteSnapshot {
    notes: Arc<[Note]>,
}

impl NoteSnapshot {
    pub fn empty() -> Self {
        Self {
            notes: Arc::from(Vec::<Note>::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Note> {
        self.notes.iter()
    }

    pub fn as_slice(&self) -> &[Note] {
        &self.notes
    }

    fn sorted_by_id(&self) -> Vec<&Note> {
        let mut notes: Vec<&Note> = self.notes.iter().collect();
        notes.sort_by_key(|note| note.id());
        notes
    }
}

impl PartialEq for NoteSnapshot {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.notes, &other.notes) {
            return true;
        }
        self.len() == other.len() && self.sorted_by_id() == other.sorted_by_id()
    }
}

impl Eq for NoteSnapshot {}

impl Default for NoteSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<Note>> for NoteSnapshot {
    fn from(notes: Vec<Note>) -> Self {
        Self {
            notes: Arc::from(notes),
        }
    }
}

impl<'a> IntoIterator for &'a NoteSnapshot {
    type Item = &'a Note;
    type IntoIter = std::slice::Iter<'a, Note>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
