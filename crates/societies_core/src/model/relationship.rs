//! Relationship descriptor: a typed edge between two people.

use crate::entity::{
    get_string, ColumnSource, Entity, EntityIdentity, IdentityAccess, RowResult, ValueMap,
};
use crate::schema::{columns, EntityKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationship {
    identity: EntityIdentity,
    /// Global id of the first person.
    pub global_id_p1: Option<String>,
    /// Global id of the second person.
    pub global_id_p2: Option<String>,
    /// Stored in the `type` column.
    pub relationship_type: Option<String>,
    pub origin: Option<String>,
}

impl Relationship {
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

impl Entity for Relationship {
    const KIND: EntityKind = EntityKind::Relationship;

    fn identity(&self, _: IdentityAccess) -> &EntityIdentity {
        &self.identity
    }

    fn identity_mut(&mut self, _: IdentityAccess) -> &mut EntityIdentity {
        &mut self.identity
    }

    fn populate(&mut self, row: &dyn ColumnSource) -> RowResult<()> {
        self.identity
            .set_global_id(get_string(row, columns::GLOBAL_ID)?);
        self.global_id_p1 = get_string(row, columns::GLOBAL_ID_P1)?;
        self.global_id_p2 = get_string(row, columns::GLOBAL_ID_P2)?;
        self.relationship_type = get_string(row, columns::TYPE)?;
        self.origin = get_string(row, columns::ORIGIN)?;
        Ok(())
    }

    fn entity_values(&self) -> ValueMap {
        let mut values = ValueMap::new();
        values.put_text(columns::GLOBAL_ID, self.global_id());
        values.put_text(columns::GLOBAL_ID_P1, self.global_id_p1.as_deref());
        values.put_text(columns::GLOBAL_ID_P2, self.global_id_p2.as_deref());
        values.put_text(columns::TYPE, self.relationship_type.as_deref());
        values.put_text(columns::ORIGIN, self.origin.as_deref());
        values
    }

    fn serialized_fields(&self) -> Vec<(&'static str, Option<&str>)> {
        vec![
            (columns::GLOBAL_ID, self.global_id()),
            (columns::GLOBAL_ID_P1, self.global_id_p1.as_deref()),
            (columns::GLOBAL_ID_P2, self.global_id_p2.as_deref()),
            (columns::TYPE, self.relationship_type.as_deref()),
        ]
    }
}
