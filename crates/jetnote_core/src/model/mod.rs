//! Note domain model.
//!
//! # Responsibility
//! - Define the note record and its identity.
//! - Keep input rules next to the record they guard.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod note;
pub mod sample;
