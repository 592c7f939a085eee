//! Core domain logic for JetNote.
//! This crate is the single source of truth for the notes invariants.

pub mod app;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repository;
pub mod store;
pub mod view_state;

pub use app::NotesApp;
pub use config::{ConfigError, CoreConfig, LoggingConfig};
pub use db::DbError;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{
    format_entry_date, is_accepted_input, Note, NoteField, NoteId, NoteValidationError,
};
pub use model::sample::sample_notes;
pub use repository::{distinct_until_changed, NotesRepository};
pub use store::{
    NoteSnapshot, NotesStore, SnapshotStream, SqliteNotesStore, StoreError, StoreResult,
};
pub use view_state::{should_display, NotesViewState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
