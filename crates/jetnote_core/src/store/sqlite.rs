//! SQLite-backed notes store.
//!
//! Statements run on the blocking pool. Each mutation that changes at least
//! one row re-reads the table and publishes the snapshot before releasing the
//! connection, so publication order equals commit order.

use super::{NoteSnapshot, NotesStore, SnapshotStream, StoreError, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use crate::model::note::{
    entry_date_from_epoch_millis, entry_date_to_epoch_millis, Note, NoteId,
};
use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, error};
use rusqlite::{params, Connection, Row};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    note_title,
    description,
    entry_date
FROM notes";

pub struct SqliteNotesStore {
    conn: Arc<Mutex<Connection>>,
    snapshots: Arc<watch::Sender<NoteSnapshot>>,
}

impl SqliteNotesStore {
    /// Wraps a connection whose schema is already in place.
    ///
    /// Loads the current table so the first live-query emission reflects it.
    pub fn from_connection(conn: Connection) -> StoreResult<Self> {
        let initial = load_snapshot(&conn)?;
        let (sender, _) = watch::channel(initial);
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            snapshots: Arc::new(sender),
        })
    }

    /// Opens (or creates) the database file at `path` on the blocking pool.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        tokio::task::spawn_blocking(move || {
            let conn = open_db(&path)?;
            Self::from_connection(conn)
        })
        .await
        .map_err(|err| StoreError::Worker(err.to_string()))?
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(open_db_in_memory()?)
    }

    /// Returns the most recently published snapshot.
    pub fn current_snapshot(&self) -> NoteSnapshot {
        self.snapshots.borrow().clone()
    }

    async fn with_connection<T, F>(&self, op: &'static str, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection, &watch::Sender<NoteSnapshot>) -> StoreResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let snapshots = Arc::clone(&self.snapshots);
        let started_at = Instant::now();

        let result = tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::Worker("connection lock poisoned".to_string()))?;
            f(&*guard, snapshots.as_ref())
        })
        .await
        .map_err(|err| StoreError::Worker(err.to_string()))
        .and_then(|inner| inner);

        match &result {
            Ok(_) => debug!(
                "event=store_op module=store status=ok op={} duration_ms={}",
                op,
                started_at.elapsed().as_millis()
            ),
            Err(StoreError::NotFound(id)) => debug!(
                "event=store_op module=store status=not_found op={} id={}",
                op, id
            ),
            Err(err) => error!(
                "event=store_op module=store status=error op={} duration_ms={} error={}",
                op,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    async fn mutate<F>(&self, op: &'static str, statement: F) -> StoreResult<()>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<usize> + Send + 'static,
    {
        self.with_connection(op, move |conn, snapshots| {
            let changed = statement(conn)?;
            if changed > 0 {
                let snapshot = load_snapshot(conn)?;
                debug!(
                    "event=snapshot_publish module=store op={} changed={} size={}",
                    op,
                    changed,
                    snapshot.len()
                );
                snapshots.send_replace(snapshot);
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl NotesStore for SqliteNotesStore {
    async fn insert(&self, note: &Note) -> StoreResult<()> {
        let note = note.clone();
        self.mutate("insert", move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO notes (
                    id,
                    note_title,
                    description,
                    entry_date
                ) VALUES (?1, ?2, ?3, ?4);",
                params![
                    note.id().to_string(),
                    note.title(),
                    note.description(),
                    entry_date_to_epoch_millis(&note.entry_date()),
                ],
            )
        })
        .await
    }

    async fn update(&self, note: &Note) -> StoreResult<()> {
        let note = note.clone();
        self.mutate("update", move |conn| {
            conn.execute(
                "UPDATE notes
                 SET
                    note_title = ?2,
                    description = ?3
                 WHERE id = ?1;",
                params![note.id().to_string(), note.title(), note.description()],
            )
        })
        .await
    }

    async fn delete(&self, note: &Note) -> StoreResult<()> {
        let id = note.id().to_string();
        self.mutate("delete", move |conn| {
            conn.execute("DELETE FROM notes WHERE id = ?1;", [id.as_str()])
        })
        .await
    }

    async fn delete_all(&self) -> StoreResult<()> {
        self.mutate("delete_all", |conn| conn.execute("DELETE FROM notes;", []))
            .await
    }

    async fn get_by_id(&self, id: NoteId) -> StoreResult<Note> {
        self.with_connection("get_by_id", move |conn, _| {
            let mut stmt = conn.prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
            let mut rows = stmt.query([id.to_string()])?;
            if let Some(row) = rows.next()? {
                return parse_note_row(row);
            }
            Err(StoreError::NotFound(id))
        })
        .await
    }

    fn observe_all(&self) -> SnapshotStream {
        WatchStream::new(self.snapshots.subscribe()).boxed()
    }
}

fn load_snapshot(conn: &Connection) -> StoreResult<NoteSnapshot> {
    let mut stmt = conn.prepare(&format!("{NOTE_SELECT_SQL} ORDER BY rowid ASC;"))?;
    let mut rows = stmt.query([])?;
    let mut notes = Vec::new();
    while let Some(row) = rows.next()? {
        notes.push(parse_note_row(row)?);
    }
    Ok(NoteSnapshot::from(notes))
}

fn parse_note_row(row: &Row<'_>) -> StoreResult<Note> {
    let id_text: String = row.get("id")?;
    let id = id_text
        .parse::<NoteId>()
        .map_err(|_| StoreError::InvalidData(format!("invalid uuid value `{id_text}` in notes.id")))?;

    let entry_millis: i64 = row.get("entry_date")?;
    let entry_date = entry_date_from_epoch_millis(entry_millis).ok_or_else(|| {
        StoreError::InvalidData(format!(
            "invalid epoch value `{entry_millis}` in notes.entry_date"
        ))
    })?;

    Ok(Note::from_parts(
        id,
        row.get::<_, String>("note_title")?,
        row.get::<_, String>("description")?,
        entry_date,
    ))
}
