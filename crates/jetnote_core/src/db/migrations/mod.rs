//! SQLite schema registry and destructive schema policy.
//!
//! # Responsibility
//! - Register schema scripts in strictly increasing order.
//! - Create the schema on a fresh database, or rebuild it atomically when the
//!   stored version differs from the latest one.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - `DROPPED_TABLES` lists every table any migration has ever created.

use crate::db::DbResult;
use log::warn;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_notes.sql"),
}];

const DROPPED_TABLES: &[&str] = &["notes"];

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the connection's schema to the latest version.
///
/// A fresh database (`user_version` 0) gets the schema created. Any other
/// version than the latest one drops every known table first, so data stored
/// under another schema is discarded.
///
/// # Errors
/// - `Sqlite` when any statement fails; the transaction is rolled back.
pub fn apply_schema_policy(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version == latest {
        return Ok(());
    }
    if current_version != 0 {
        warn!(
            "event=schema_reset module=db status=start db_version={} latest_version={}",
            current_version, latest
        );
    }
    rebuild_schema(conn)
}

fn rebuild_schema(conn: &mut Connection) -> DbResult<()> {
    let tx = conn.transaction()?;
    for table in DROPPED_TABLES {
        tx.execute_batch(&format!("DROP TABLE IF EXISTS {table};"))?;
    }
    for migration in MIGRATIONS {
        tx.execute_batch(migration.sql)?;
    }
    tx.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))?;
    tx.commit()?;
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
