//! Column maps and typed column readers.
//!
//! # Responsibility
//! - Carry one row (read side) or one field map (write side) by column name.
//! - Read typed scalars with "absent" kept distinct from "present null".
//!
//! # Invariants
//! - Readers return `Ok(None)` for absent and null columns alike; optional
//!   attributes never fail a row.
//! - Only type mismatches and missing required columns are row-shape errors.

use rusqlite::types::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RowResult<T> = Result<T, RowShapeError>;

/// Why one row could not be mapped into an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowShapeError {
    /// A required column is absent from the row.
    MissingColumn { column: String },
    /// A required column is present but null.
    NullColumn { column: String },
    /// A column holds a value of an unreadable storage type.
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: &'static str,
    },
    /// The local id column holds a non-positive value.
    InvalidLocalId(i64),
    /// A serialized line has no `=` separator.
    MalformedLine(String),
}

impl Display for RowShapeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingColumn { column } => write!(f, "required column `{column}` is missing"),
            Self::NullColumn { column } => write!(f, "required column `{column}` is null"),
            Self::TypeMismatch {
                column,
                expected,
                found,
            } => write!(f, "column `{column}` expected {expected}, found {found}"),
            Self::InvalidLocalId(value) => write!(f, "invalid local id `{value}`"),
            Self::MalformedLine(line) => write!(f, "malformed serialized line `{line}`"),
        }
    }
}

impl Error for RowShapeError {}

/// Read access to named column values.
///
/// `column` returns `None` when the column is absent and
/// `Some(Value::Null)` when it is present but null.
pub trait ColumnSource {
    fn column(&self, name: &str) -> Option<&Value>;
}

/// Column-name to value mapping.
///
/// Used both as the persistable field map an entity yields for writes and
/// as the owned row a gateway returns for reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
    values: BTreeMap<String, Value>,
}

/// One row returned by a storage gateway.
pub type StoredRow = ValueMap;

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, column: impl Into<String>, value: Value) {
        self.values.insert(column.into(), value);
    }

    /// Stores text, or null when `value` is unset.
    pub fn put_text(&mut self, column: impl Into<String>, value: Option<&str>) {
        let value = match value {
            Some(text) => Value::Text(text.to_owned()),
            None => Value::Null,
        };
        self.put(column, value);
    }

    pub fn put_integer(&mut self, column: impl Into<String>, value: i64) {
        self.put(column, Value::Integer(value));
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.values.remove(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Column names in sorted order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// `(column, value)` pairs in sorted column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(column, value)| (column.as_str(), value))
    }
}

impl ColumnSource for ValueMap {
    fn column(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl FromIterator<(String, Value)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Reads an optional integer column.
///
/// Text holding a decimal integer is accepted; reals and blobs are not.
pub fn get_int(row: &dyn ColumnSource, column: &str) -> RowResult<Option<i64>> {
    match row.column(column) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Integer(value)) => Ok(Some(*value)),
        Some(Value::Text(text)) => text
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| type_mismatch(column, "integer", "text")),
        Some(Value::Real(_)) => Err(type_mismatch(column, "integer", "real")),
        Some(Value::Blob(_)) => Err(type_mismatch(column, "integer", "blob")),
    }
}

/// Reads an optional text column.
///
/// Numeric values are rendered as text; blobs are rejected.
pub fn get_string(row: &dyn ColumnSource, column: &str) -> RowResult<Option<String>> {
    match row.column(column) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Text(text)) => Ok(Some(text.clone())),
        Some(Value::Integer(value)) => Ok(Some(value.to_string())),
        Some(Value::Real(value)) => Ok(Some(value.to_string())),
        Some(Value::Blob(_)) => Err(type_mismatch(column, "text", "blob")),
    }
}

/// Reads a text column that must be present and non-null.
pub fn require_string(row: &dyn ColumnSource, column: &str) -> RowResult<String> {
    match row.column(column) {
        None => Err(RowShapeError::MissingColumn {
            column: column.to_string(),
        }),
        Some(Value::Null) => Err(RowShapeError::NullColumn {
            column: column.to_string(),
        }),
        Some(_) => get_string(row, column)?.ok_or_else(|| RowShapeError::NullColumn {
            column: column.to_string(),
        }),
    }
}

fn type_mismatch(column: &str, expected: &'static str, found: &'static str) -> RowShapeError {
    RowShapeError::TypeMismatch {
        column: column.to_string(),
        expected,
        found,
    }
}
