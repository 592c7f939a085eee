//! Notes store contract and SQLite implementation.
//!
//! # Responsibility
//! - Durable CRUD over note records keyed by id.
//! - A live query that re-emits the full record set after every change.
//!
//! # Invariants
//! - `insert` replaces a record with the same id.
//! - `update`, `delete` on an absent id are silent no-ops.
//! - Snapshots are published in commit order.
//! - Storage failures propagate unchanged; nothing here retries.

use crate::db::DbError;
use crate::model::note::{Note, NoteId};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod snapshot;
mod sqlite;

pub use snapshot::NoteSnapshot;
pub use sqlite::SqliteNotesStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Live, never-ending sequence of full snapshots.
pub type SnapshotStream = BoxStream<'static, NoteSnapshot>;

#[derive(Debug)]
pub enum StoreError {
    /// `get_by_id` found no record.
    NotFound(NoteId),
    Db(DbError),
    /// A stored row could not be mapped back to a `Note`.
    InvalidData(String),
    /// The blocking worker running the statement failed.
    Worker(String),
    /// The owning scope was torn down before the operation finished.
    Cancelled,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::Worker(message) => write!(f, "storage worker failed: {message}"),
            Self::Cancelled => write!(f, "operation cancelled"),
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

/// Durable keyed note storage with a query-and-subscribe interface.
#[async_trait]
pub trait NotesStore: Send + Sync {
    /// Inserts `note`, replacing any record with the same id.
    async fn insert(&self, note: &Note) -> StoreResult<()>;
    /// Replaces title and description of the record with the same id.
    async fn update(&self, note: &Note) -> StoreResult<()>;
    /// Removes the record with `note`'s id.
    async fn delete(&self, note: &Note) -> StoreResult<()>;
    /// Removes every record.
    async fn delete_all(&self) -> StoreResult<()>;
    /// Loads one record or fails with `NotFound`.
    async fn get_by_id(&self, id: NoteId) -> StoreResult<Note>;
    /// Opens a new live view starting from the current snapshot.
    fn observe_all(&self) -> SnapshotStream;
}
