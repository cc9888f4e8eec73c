//! SQLite implementation of `StorageGateway`.
//!
//! # Responsibility
//! - Resolve content locators to registry tables.
//! - Translate provider-style calls into parameterized SQL.
//!
//! # Invariants
//! - Unknown locators, missing tables and open/busy/locked/IO/corrupt
//!   database failures map to `StorageUnavailable`.
//! - Projection entries must be plain identifiers.
//! - Written columns must exist in the live table; otherwise the write is
//!   refused with `UnknownColumn` before any SQL runs.
//! - Each call is one statement; nothing is batched across rows.

use crate::entity::{LocalId, StoredRow, ValueMap};
use crate::repo::gateway::{RowQuery, StorageGateway};
use crate::repo::{StoreError, StoreResult};
use crate::schema::{ContentLocator, SchemaRegistry};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, ErrorCode};
use std::collections::BTreeSet;

static IDENTIFIER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Gateway over one open connection and the schema registry.
pub struct SqliteGateway<'conn> {
    conn: &'conn Connection,
    registry: &'conn SchemaRegistry,
}

impl<'conn> SqliteGateway<'conn> {
    /// Wraps a connection returned by `db::open_db*`.
    pub fn new(conn: &'conn Connection, registry: &'conn SchemaRegistry) -> Self {
        Self { conn, registry }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        self.registry
    }

    fn resolve_table(&self, locator: &ContentLocator) -> StoreResult<&'static str> {
        let table = self
            .registry
            .resolve(locator)
            .ok_or_else(|| unavailable(locator, "unknown content locator".to_string()))?;
        let exists =
            table_exists(self.conn, table.table_name).map_err(|err| classify(locator, err))?;
        if !exists {
            return Err(unavailable(
                locator,
                format!("table `{}` does not exist", table.table_name),
            ));
        }
        Ok(table.table_name)
    }

    fn ensure_columns(
        &self,
        locator: &ContentLocator,
        table: &str,
        values: &ValueMap,
    ) -> StoreResult<()> {
        let live = live_columns(self.conn, table).map_err(|err| classify(locator, err))?;
        for column in values.columns() {
            if !live.contains(column) {
                return Err(StoreError::UnknownColumn {
                    table: table.to_string(),
                    column: column.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl StorageGateway for SqliteGateway<'_> {
    fn query(&self, locator: &ContentLocator, query: &RowQuery) -> StoreResult<Vec<StoredRow>> {
        let table = self.resolve_table(locator)?;
        let columns = match query.projection.as_deref() {
            Some(projection) if !projection.is_empty() => {
                if let Some(bad) = projection.iter().find(|column| !is_identifier(column)) {
                    return Err(StoreError::InvalidQuery(format!(
                        "projection entry `{bad}` is not a column name"
                    )));
                }
                projection.join(", ")
            }
            _ => "*".to_string(),
        };

        let mut sql = format!("SELECT {columns} FROM {table}");
        if let Some(selection) = non_blank(query.selection.as_deref()) {
            sql.push_str(" WHERE ");
            sql.push_str(selection);
        }
        if let Some(sort_order) = non_blank(query.sort_order.as_deref()) {
            sql.push_str(" ORDER BY ");
            sql.push_str(sort_order);
        }

        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|err| classify(locator, err))?;
        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let mut rows = stmt
            .query(params_from_iter(query.selection_args.iter()))
            .map_err(|err| classify(locator, err))?;

        let mut stored_rows = Vec::new();
        while let Some(row) = rows.next().map_err(|err| classify(locator, err))? {
            let mut stored = StoredRow::new();
            for (index, name) in names.iter().enumerate() {
                stored.put(name.as_str(), row.get::<_, Value>(index)?);
            }
            stored_rows.push(stored);
        }

        debug!(
            "event=gateway_query module=repo status=ok table={} rows={}",
            table,
            stored_rows.len()
        );
        Ok(stored_rows)
    }

    fn insert(&self, locator: &ContentLocator, values: &ValueMap) -> StoreResult<LocalId> {
        if values.is_empty() {
            return Err(StoreError::InvalidWrite(
                "insert requires at least one column".to_string(),
            ));
        }
        let table = self.resolve_table(locator)?;
        self.ensure_columns(locator, table, values)?;

        let columns: Vec<&str> = values.columns().collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {table} ({}) VALUES ({placeholders})",
            columns.join(", ")
        );
        self.conn
            .execute(&sql, params_from_iter(values.iter().map(|(_, value)| value)))
            .map_err(|err| classify(locator, err))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update(
        &self,
        locator: &ContentLocator,
        values: &ValueMap,
        selection: &str,
        selection_args: &[Value],
    ) -> StoreResult<usize> {
        if values.is_empty() {
            return Err(StoreError::InvalidWrite(
                "update requires at least one column".to_string(),
            ));
        }
        let selection = require_selection(selection, "update")?;
        let table = self.resolve_table(locator)?;
        self.ensure_columns(locator, table, values)?;

        let assignments = values
            .columns()
            .map(|column| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE {table} SET {assignments} WHERE {selection}");
        let bound = values
            .iter()
            .map(|(_, value)| value)
            .chain(selection_args.iter());
        let changed = self
            .conn
            .execute(&sql, params_from_iter(bound))
            .map_err(|err| classify(locator, err))?;

        Ok(changed)
    }

    fn delete(
        &self,
        locator: &ContentLocator,
        selection: &str,
        selection_args: &[Value],
    ) -> StoreResult<usize> {
        let selection = require_selection(selection, "delete")?;
        let table = self.resolve_table(locator)?;

        let sql = format!("DELETE FROM {table} WHERE {selection}");
        let removed = self
            .conn
            .execute(&sql, params_from_iter(selection_args.iter()))
            .map_err(|err| classify(locator, err))?;

        Ok(removed)
    }
}

fn unavailable(locator: &ContentLocator, reason: String) -> StoreError {
    StoreError::StorageUnavailable {
        locator: locator.clone(),
        reason,
    }
}

fn classify(locator: &ContentLocator, err: rusqlite::Error) -> StoreError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &err {
        if matches!(
            failure.code,
            ErrorCode::CannotOpen
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::NotADatabase
                | ErrorCode::DatabaseCorrupt
                | ErrorCode::SystemIoFailure
        ) {
            return unavailable(locator, err.to_string());
        }
    }
    StoreError::from(err)
}

fn require_selection<'a>(selection: &'a str, operation: &str) -> StoreResult<&'a str> {
    non_blank(Some(selection)).ok_or_else(|| {
        StoreError::InvalidQuery(format!("{operation} requires a non-empty selection"))
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

fn is_identifier(value: &str) -> bool {
    IDENTIFIER_PATTERN.is_match(value)
}

fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn live_columns(conn: &Connection, table: &str) -> rusqlite::Result<BTreeSet<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = BTreeSet::new();
    while let Some(row) = rows.next()? {
        columns.insert(row.get::<_, String>(1)?);
    }
    Ok(columns)
}
