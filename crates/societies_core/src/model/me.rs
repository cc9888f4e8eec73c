//! Me descriptor: the account of the device owner.
//!
//! # Invariants
//! - The `me` table carries no sync status.
//! - The password is stored locally but never written to the wire form.

use crate::entity::{
    get_string, ColumnSource, Entity, EntityIdentity, IdentityAccess, RowResult, ValueMap,
};
use crate::repo::entity_store::EntityStore;
use crate::repo::gateway::StorageGateway;
use crate::repo::StoreResult;
use crate::schema::{columns, EntityKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Me {
    identity: EntityIdentity,
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub origin: Option<String>,
}

impl Me {
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

    /// The stored account with the lowest local id, if any.
    pub fn current<G: StorageGateway>(store: &EntityStore<G>) -> StoreResult<Option<Me>> {
        Ok(store.fetch_all::<Me>()?.into_iter().next())
    }
}

impl Entity for Me {
    const KIND: EntityKind = EntityKind::Me;

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
        self.display_name = get_string(row, columns::DISPLAY_NAME)?;
        self.user_name = get_string(row, columns::USER_NAME)?;
        self.password = get_string(row, columns::PASSWORD)?;
        self.origin = get_string(row, columns::ORIGIN)?;
        Ok(())
    }

    fn entity_values(&self) -> ValueMap {
        let mut values = ValueMap::new();
        values.put_text(columns::GLOBAL_ID, self.global_id());
        values.put_text(columns::NAME, self.name.as_deref());
        values.put_text(columns::DISPLAY_NAME, self.display_name.as_deref());
        values.put_text(columns::USER_NAME, self.user_name.as_deref());
        values.put_text(columns::PASSWORD, self.password.as_deref());
        values.put_text(columns::ORIGIN, self.origin.as_deref());
        values
    }

    fn serialized_fields(&self) -> Vec<(&'static str, Option<&str>)> {
        vec![
            (columns::GLOBAL_ID, self.global_id()),
            (columns::NAME, self.name.as_deref()),
            (columns::DISPLAY_NAME, self.display_name.as_deref()),
            (columns::USER_NAME, self.user_name.as_deref()),
        ]
    }
}
