//! Membership descriptor: one person's membership in one community.
//!
//! # Invariants
//! - `type` is required (`not null` in storage); a row without it fails
//!   to map and is skipped by fetches.

use crate::entity::{
    get_string, require_string, ColumnSource, Entity, EntityIdentity, IdentityAccess, RowResult,
    ValueMap,
};
use crate::schema::{columns, EntityKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Membership {
    identity: EntityIdentity,
    pub global_id_member: Option<String>,
    pub global_id_community: Option<String>,
    /// Stored in the `type` column.
    pub membership_type: String,
    pub origin: Option<String>,
}

impl Membership {
    pub fn new(membership_type: impl Into<String>) -> Self {
        Self {
            identity: EntityIdentity::generated(),
            membership_type: membership_type.into(),
            ..Self::default()
        }
    }

    pub fn with_global_id(
        global_id: impl Into<String>,
        membership_type: impl Into<String>,
    ) -> Self {
        Self {
            identity: EntityIdentity::with_global_id(global_id),
            membership_type: membership_type.into(),
            ..Self::default()
        }
    }
}

impl Entity for Membership {
    const KIND: EntityKind = EntityKind::Membership;

    fn identity(&self, _: IdentityAccess) -> &EntityIdentity {
        &self.identity
    }

    fn identity_mut(&mut self, _: IdentityAccess) -> &mut EntityIdentity {
        &mut self.identity
    }

    fn populate(&mut self, row: &dyn ColumnSource) -> RowResult<()> {
        self.identity
            .set_global_id(get_string(row, columns::GLOBAL_ID)?);
        self.global_id_member = get_string(row, columns::GLOBAL_ID_MEMBER)?;
        self.global_id_community = get_string(row, columns::GLOBAL_ID_COMMUNITY)?;
        self.membership_type = require_string(row, columns::TYPE)?;
        self.origin = get_string(row, columns::ORIGIN)?;
        Ok(())
    }

    fn entity_values(&self) -> ValueMap {
        let mut values = ValueMap::new();
        values.put_text(columns::GLOBAL_ID, self.global_id());
        values.put_text(columns::GLOBAL_ID_MEMBER, self.global_id_member.as_deref());
        values.put_text(
            columns::GLOBAL_ID_COMMUNITY,
            self.global_id_community.as_deref(),
        );
        values.put_text(columns::TYPE, Some(self.membership_type.as_str()));
        values.put_text(columns::ORIGIN, self.origin.as_deref());
        values
    }

    fn serialized_fields(&self) -> Vec<(&'static str, Option<&str>)> {
        vec![
            (columns::GLOBAL_ID, self.global_id()),
            (columns::GLOBAL_ID_MEMBER, self.global_id_member.as_deref()),
            (
                columns::GLOBAL_ID_COMMUNITY,
                self.global_id_community.as_deref(),
            ),
            (columns::TYPE, Some(self.membership_type.as_str())),
        ]
    }
}
