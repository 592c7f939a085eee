//! Composition point wiring store, repository and view-state holder.
//!
//! # Invariants
//! - Every collaborator is passed in by constructor; nothing is global.
//! - Must be used from within a Tokio runtime.

use crate::config::CoreConfig;
use crate::repository::NotesRepository;
use crate::store::{NotesStore, SqliteNotesStore, StoreResult};
use crate::view_state::NotesViewState;
use log::info;
use std::sync::Arc;

pub struct NotesApp {
    pub store: Arc<SqliteNotesStore>,
    pub repository: Arc<NotesRepository>,
    pub view_state: NotesViewState,
}

impl NotesApp {
    /// Opens the configured database and wires the notes stack on top of it.
    pub async fn open(config: &CoreConfig) -> StoreResult<Self> {
        let store = SqliteNotesStore::open(config.db_path.clone()).await?;
        info!(
            "event=app_wire module=app status=ok db_path={} notes={}",
            config.db_path.display(),
            store.current_snapshot().len()
        );
        Ok(Self::wire(store))
    }

    pub fn in_memory() -> StoreResult<Self> {
        Ok(Self::wire(SqliteNotesStore::open_in_memory()?))
    }

    fn wire(store: SqliteNotesStore) -> Self {
        let store = Arc::new(store);
        let repository = Arc::new(NotesRepository::new(
            Arc::clone(&store) as Arc<dyn NotesStore>
        ));
        let view_state = NotesViewState::new(Arc::clone(&repository));
        Self {
            store,
            repository,
            view_state,
        }
    }

    /// Tears down the view-state holder and waits for its tasks.
    pub async fn shutdown(self) {
        self.view_state.shutdown().await;
    }
}
