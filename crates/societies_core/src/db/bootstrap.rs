//! Registry-driven table creation.
//!
//! # Invariants
//! - Tables are created in registry order inside one transaction.
//! - `PRAGMA user_version` is set to `SCHEMA_VERSION` after creation.
//! - A database stamped with a newer version is refused untouched.

use crate::db::{DbError, DbResult};
use crate::schema::{SchemaRegistry, SCHEMA_VERSION};
use log::info;
use rusqlite::Connection;

/// Creates all registry tables when the database is not yet stamped.
pub fn apply_schema(conn: &mut Connection, registry: &SchemaRegistry) -> DbResult<()> {
    let current_version = current_schema_version(conn)?;

    if current_version > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: SCHEMA_VERSION,
        });
    }

    if current_version == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for table in registry.tables() {
        tx.execute_batch(table.create_statement)?;
    }
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    tx.commit()?;

    info!(
        "event=schema_apply module=db status=ok from_version={} version={}",
        current_version, SCHEMA_VERSION
    );
    Ok(())
}

/// Reads `PRAGMA user_version`.
pub fn current_schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
