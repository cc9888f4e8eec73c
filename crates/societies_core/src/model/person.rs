//! Person descriptor.

use crate::entity::{
    get_string, get_sync_status, ColumnSource, Entity, EntityIdentity, IdentityAccess, RowResult,
    SyncStatus, SyncTracked, ValueMap,
};
use crate::schema::{columns, EntityKind};

/// A person known to the local device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Person {
    identity: EntityIdentity,
    pub name: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub creation_date: Option<String>,
    pub last_modified_date: Option<String>,
    pub origin: Option<String>,
    pub sync_status: Option<SyncStatus>,
}

impl Person {
    pub fn new() -> Self {
        Self {
            identity: EntityIdentity::generated(),
            ..Self::default()
        }
    }

    pub fn with_global_id(global_id: impl Into<String>) -> Self {
        Self {
            identity: EntityIdentity::with_global_id(global_id),
            ..Self::default()
        }
    }
}

impl Entity for Person {
    const KIND: EntityKind = EntityKind::Person;

    fn identity(&self, _: IdentityAccess) -> &EntityIdentity {
        &self.identity
    }

    fn identity_mut(&mut self, _: IdentityAccess) -> &mut EntityIdentity {
        &mut self.identity
    }

    fn populate(&mut self, row: &dyn ColumnSource) -> RowResult<()> {
        self.identity
            .set_global_id(get_string(row, columns::GLOBAL_ID)?);
        self.name = get_string(row, columns::NAME)?;
        self.email = get_string(row, columns::EMAIL)?;
        self.description = get_string(row, columns::DESCRIPTION)?;
        self.creation_date = get_string(row, columns::CREATION_DATE)?;
        self.last_modified_date = get_string(row, columns::LAST_MODIFIED_DATE)?;
        self.origin = get_string(row, columns::ORIGIN)?;
        self.sync_status = get_sync_status(row)?;
        Ok(())
    }

    fn entity_values(&self) -> ValueMap {
        let mut values = ValueMap::new();
        values.put_text(columns::GLOBAL_ID, self.global_id());
        values.put_text(columns::NAME, self.name.as_deref());
        values.put_text(columns::EMAIL, self.email.as_deref());
        values.put_text(columns::DESCRIPTION, self.description.as_deref());
        values.put_text(columns::CREATION_DATE, self.creation_date.as_deref());
        values.put_text(
            columns::LAST_MODIFIED_DATE,
            self.last_modified_date.as_deref(),
        );
        values.put_text(columns::ORIGIN, self.origin.as_deref());
        values.put_text(
            columns::SYNC_STATUS,
            self.sync_status.as_ref().map(SyncStatus::as_str),
        );
        values
    }

    fn serialized_fields(&self) -> Vec<(&'static str, Option<&str>)> {
        vec![
            (columns::GLOBAL_ID, self.global_id()),
            (columns::NAME, self.name.as_deref()),
            (columns::EMAIL, self.email.as_deref()),
            (columns::DESCRIPTION, self.description.as_deref()),
            (columns::CREATION_DATE, self.creation_date.as_deref()),
            (
                columns::LAST_MODIFIED_DATE,
                self.last_modified_date.as_deref(),
            ),
        ]
    }
}

impl SyncTracked for Person {
    fn sync_status(&self) -> Option<&SyncStatus> {
        self.sync_status.as_ref()
    }

    fn set_sync_status(&mut self, status: Option<SyncStatus>) {
        self.sync_status = status;
    }
}
