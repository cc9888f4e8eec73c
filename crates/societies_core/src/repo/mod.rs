//! Storage gateway and generic entity store.
//!
//! # Responsibility
//! - Define the provider-style CRUD contract entities are persisted through.
//! - Implement that contract over SQLite.
//! - Run every fetch and write through one path generic over the kind.
//!
//! # Invariants
//! - Unreachable storage surfaces as `StorageUnavailable`, never as an
//!   empty result.
//! - Writes with an empty value map are refused before reaching storage.
//! - Nothing here retries; callers own retry policy.

use crate::db::DbError;
use crate::entity::{IdentityError, LocalId, RowShapeError};
use crate::schema::{ContentLocator, EntityKind};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod entity_store;
pub mod gateway;
pub mod sqlite_gateway;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for gateway and store operations.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// The locator does not name a reachable storage resource.
    StorageUnavailable {
        locator: ContentLocator,
        reason: String,
    },
    /// The kind yielded an empty value map for a write.
    UnsupportedWrite(EntityKind),
    /// A write named a column the live table does not have.
    UnknownColumn { table: String, column: String },
    InvalidQuery(String),
    InvalidWrite(String),
    AlreadyPersisted { kind: EntityKind, local_id: LocalId },
    NotPersisted(EntityKind),
    /// No row with this local id exists any more.
    NotFound { kind: EntityKind, local_id: LocalId },
    RowShape(RowShapeError),
    Identity(IdentityError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::StorageUnavailable { locator, reason } => {
                write!(f, "storage unavailable for `{locator}`: {reason}")
            }
            Self::UnsupportedWrite(kind) => {
                write!(f, "kind `{kind}` does not support persistence")
            }
            Self::UnknownColumn { table, column } => {
                write!(f, "table `{table}` has no column `{column}`")
            }
            Self::InvalidQuery(message) => write!(f, "invalid query: {message}"),
            Self::InvalidWrite(message) => write!(f, "invalid write: {message}"),
            Self::AlreadyPersisted { kind, local_id } => {
                write!(f, "{kind} already persisted with local id {local_id}")
            }
            Self::NotPersisted(kind) => write!(f, "{kind} has no local id yet"),
            Self::NotFound { kind, local_id } => {
                write!(f, "{kind} not found: local id {local_id}")
            }
            Self::RowShape(err) => write!(f, "{err}"),
            Self::Identity(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::RowShape(err) => Some(err),
            Self::Identity(err) => Some(err),
            Self::StorageUnavailable { .. }
            | Self::UnsupportedWrite(_)
            | Self::UnknownColumn { .. }
            | Self::InvalidQuery(_)
            | Self::InvalidWrite(_)
            | Self::AlreadyPersisted { .. }
            | Self::NotPersisted(_)
            | Self::NotFound { .. } => None,
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

impl From<RowShapeError> for StoreError {
    fn from(value: RowShapeError) -> Self {
        Self::RowShape(value)
    }
}

impl From<IdentityError> for StoreError {
    fn from(value: IdentityError) -> Self {
        Self::Identity(value)
    }
}
