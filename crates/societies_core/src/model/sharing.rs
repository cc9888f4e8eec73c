//! Sharing descriptor: a service shared into a community.
//!
//! # Invariants
//! - The stored `sharings` table has no `owner_global_id` column (its DDL
//!   fuses the name with its type). Rows therefore populate with
//!   `owner_global_id` unset, and writes carrying that column are refused
//!   by the gateway with `UnknownColumn`.

use crate::entity::{
    get_string, ColumnSource, Entity, EntityIdentity, IdentityAccess, RowResult, ValueMap,
};
use crate::schema::{columns, EntityKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sharing {
    identity: EntityIdentity,
    pub owner_global_id: Option<String>,
    pub global_id_service: Option<String>,
    pub global_id_community: Option<String>,
    /// Stored in the `type` column.
    pub sharing_type: Option<String>,
    pub origin: Option<String>,
}

impl Sharing {
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

impl Entity for Sharing {
    const KIND: EntityKind = EntityKind::Sharing;

    fn identity(&self, _: IdentityAccess) -> &EntityIdentity {
        &self.identity
    }

    fn identity_mut(&mut self, _: IdentityAccess) -> &mut EntityIdentity {
        &mut self.identity
    }

    fn populate(&mut self, row: &dyn ColumnSource) -> RowResult<()> {
        self.identity
            .set_global_id(get_string(row, columns::GLOBAL_ID)?);
        self.owner_global_id = get_string(row, columns::OWNER_GLOBAL_ID)?;
        self.global_id_service = get_string(row, columns::GLOBAL_ID_SERVICE)?;
        self.global_id_community = get_string(row, columns::GLOBAL_ID_COMMUNITY)?;
        self.sharing_type = get_string(row, columns::TYPE)?;
        self.origin = get_string(row, columns::ORIGIN)?;
        Ok(())
    }

    fn entity_values(&self) -> ValueMap {
        let mut values = ValueMap::new();
        values.put_text(columns::GLOBAL_ID, self.global_id());
        values.put_text(columns::OWNER_GLOBAL_ID, self.owner_global_id.as_deref());
        values.put_text(
            columns::GLOBAL_ID_SERVICE,
            self.global_id_service.as_deref(),
        );
        values.put_text(
            columns::GLOBAL_ID_COMMUNITY,
            self.global_id_community.as_deref(),
        );
        values.put_text(columns::TYPE, self.sharing_type.as_deref());
        values.put_text(columns::ORIGIN, self.origin.as_deref());
        values
    }

    fn serialized_fields(&self) -> Vec<(&'static str, Option<&str>)> {
        vec![
            (columns::GLOBAL_ID, self.global_id()),
            (columns::OWNER_GLOBAL_ID, self.owner_global_id.as_deref()),
            (
                columns::GLOBAL_ID_SERVICE,
                self.global_id_service.as_deref(),
            ),
            (
                columns::GLOBAL_ID_COMMUNITY,
                self.global_id_community.as_deref(),
            ),
            (columns::TYPE, self.sharing_type.as_deref()),
        ]
    }
}
