//! Generic entity mapping contract.
//!
//! # Responsibility
//! - Define how every entity kind converts between rows and objects.
//! - Own identity bookkeeping: storage-assigned local id, global id.
//! - Define the opaque sync-status convention.
//!
//! # Invariants
//! - The local id is never part of an entity's value map or wire form.
//! - The local id is assigned at most once, only by this crate.
//! - Sync status is carried verbatim, never interpreted.

use crate::schema::{columns, ContentLocator, EntityKind};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod row;
pub mod wire;

pub use row::{
    get_int, get_string, require_string, ColumnSource, RowResult, RowShapeError, StoredRow,
    ValueMap,
};

/// Storage-assigned row identity, valid only within one local database.
pub type LocalId = i64;

/// Identity bookkeeping errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    LocalIdAlreadyAssigned { current: LocalId, attempted: LocalId },
}

impl Display for IdentityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LocalIdAlreadyAssigned { current, attempted } => write!(
                f,
                "local id already assigned ({current}); refusing to reassign to {attempted}"
            ),
        }
    }
}

impl Error for IdentityError {}

/// Key for `Entity::identity` and `Entity::identity_mut`.
///
/// Only this crate can construct one. Descriptors defined elsewhere can
/// still implement `Entity`, but no caller outside the crate can reach an
/// identity to overwrite, clear or copy a stored local id.
///
/// ```compile_fail
/// use societies_core::{Community, Entity, EntityIdentity, IdentityAccess};
///
/// let mut community = Community::new();
/// *community.identity_mut(IdentityAccess::new()) = EntityIdentity::default();
/// ```
#[derive(Debug)]
pub struct IdentityAccess(());

impl IdentityAccess {
    pub(crate) fn new() -> Self {
        Self(())
    }
}

/// Local and global identity of one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityIdentity {
    local_id: Option<LocalId>,
    global_id: Option<String>,
}

impl EntityIdentity {
    /// Identity for a locally originated entity with a fresh global id.
    pub fn generated() -> Self {
        Self::with_global_id(Uuid::new_v4().to_string())
    }

    /// Identity carrying an externally assigned global id.
    pub fn with_global_id(global_id: impl Into<String>) -> Self {
        Self {
            local_id: None,
            global_id: Some(global_id.into()),
        }
    }

    pub fn local_id(&self) -> Option<LocalId> {
        self.local_id
    }

    pub fn global_id(&self) -> Option<&str> {
        self.global_id.as_deref()
    }

    pub fn set_global_id(&mut self, global_id: Option<String>) {
        self.global_id = global_id;
    }

    pub(crate) fn assign_local_id(&mut self, local_id: LocalId) -> Result<(), IdentityError> {
        match self.local_id {
            Some(current) => Err(IdentityError::LocalIdAlreadyAssigned {
                current,
                attempted: local_id,
            }),
            None => {
                self.local_id = Some(local_id);
                Ok(())
            }
        }
    }
}

/// Opaque reconciliation state of a row relative to its remote copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyncStatus(String);

impl SyncStatus {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SyncStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reads the opaque sync-status column.
pub fn get_sync_status(row: &dyn ColumnSource) -> RowResult<Option<SyncStatus>> {
    Ok(get_string(row, columns::SYNC_STATUS)?.map(SyncStatus::new))
}

/// Contract every persisted entity kind implements.
///
/// `Default` is the blank-instance factory used before populating a row.
/// Descriptors own every column except the local id, which is read by
/// `from_row` and assigned by the store on insert.
pub trait Entity: Default {
    const KIND: EntityKind;

    /// Identity accessor, callable only from inside this crate.
    fn identity(&self, access: IdentityAccess) -> &EntityIdentity;

    /// Mutable identity accessor, callable only from inside this crate.
    fn identity_mut(&mut self, access: IdentityAccess) -> &mut EntityIdentity;

    /// Fills kind-specific fields and the global id from one row.
    ///
    /// Absent or null optional columns leave the field unset.
    fn populate(&mut self, row: &dyn ColumnSource) -> RowResult<()>;

    /// Persistable state keyed by column name, local id excluded.
    ///
    /// An empty map marks the kind as not persistable; the store refuses
    /// to write it.
    fn entity_values(&self) -> ValueMap;

    /// Ordered `(key, value)` pairs for the wire form.
    ///
    /// Includes the global id; excludes local id, origin and sync status.
    fn serialized_fields(&self) -> Vec<(&'static str, Option<&str>)>;

    fn content_locator() -> ContentLocator {
        Self::KIND.content_locator()
    }

    fn local_id(&self) -> Option<LocalId> {
        self.identity(IdentityAccess::new()).local_id()
    }

    fn global_id(&self) -> Option<&str> {
        self.identity(IdentityAccess::new()).global_id()
    }

    fn set_global_id(&mut self, global_id: impl Into<String>) {
        self.identity_mut(IdentityAccess::new())
            .set_global_id(Some(global_id.into()));
    }

    fn serialize(&self) -> String {
        wire::write_fields(&self.serialized_fields())
    }

    /// Builds a new instance from one stored row.
    fn from_row(row: &dyn ColumnSource) -> RowResult<Self> {
        let local_id = match get_int(row, columns::LOCAL_ID)? {
            Some(local_id) if local_id <= 0 => {
                return Err(RowShapeError::InvalidLocalId(local_id));
            }
            local_id => local_id,
        };
        let mut entity = Self::default();
        entity.identity_mut(IdentityAccess::new()).local_id = local_id;
        entity.populate(row)?;
        Ok(entity)
    }

    /// Builds a new, unpersisted instance from a serialized block.
    ///
    /// A `_id` key in the payload is ignored.
    fn deserialize(text: &str) -> RowResult<Self> {
        let mut fields = wire::parse_fields(text)?;
        fields.remove(columns::LOCAL_ID);
        let mut entity = Self::default();
        entity.populate(&fields)?;
        Ok(entity)
    }
}

/// Kinds whose table carries the sync-status column.
pub trait SyncTracked: Entity {
    fn sync_status(&self) -> Option<&SyncStatus>;

    fn set_sync_status(&mut self, status: Option<SyncStatus>);
}
