//! Service activity descriptor.
//!
//! An activity is an `actor verb object [target]` statement recorded in
//! the feed of its owner. All parts are global ids or opaque strings.

use crate::entity::{
    get_string, get_sync_status, ColumnSource, Entity, EntityIdentity, IdentityAccess, RowResult,
    SyncStatus, SyncTracked, ValueMap,
};
use crate::repo::entity_store::EntityStore;
use crate::repo::gateway::StorageGateway;
use crate::repo::StoreResult;
use crate::schema::{columns, EntityKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceActivity {
    identity: EntityIdentity,
    /// Global id of the service whose feed holds this activity.
    pub global_id_feed_owner: Option<String>,
    pub global_id_actor: Option<String>,
    pub global_id_object: Option<String>,
    pub global_id_verb: Option<String>,
    pub global_id_target: Option<String>,
    pub creation_date: Option<String>,
    pub origin: Option<String>,
    pub sync_status: Option<SyncStatus>,
}

impl ServiceActivity {
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

    /// Activities whose sync status equals `status`, lowest local id first.
    ///
    /// Returns an empty vector when none match.
    pub fn list_updated<G: StorageGateway>(
        store: &EntityStore<G>,
        status: &SyncStatus,
    ) -> StoreResult<Vec<ServiceActivity>> {
        store.fetch_by_sync_status(status)
    }

    /// The activity with `global_id`; duplicates resolve to the lowest local id.
    pub fn find<G: StorageGateway>(
        store: &EntityStore<G>,
        global_id: &str,
    ) -> StoreResult<Option<ServiceActivity>> {
        store.find_by_global_id(global_id)
    }
}

impl Entity for ServiceActivity {
    const KIND: EntityKind = EntityKind::ServiceActivity;

    fn identity(&self, _: IdentityAccess) -> &EntityIdentity {
        &self.identity
    }

    fn identity_mut(&mut self, _: IdentityAccess) -> &mut EntityIdentity {
        &mut self.identity
    }

    fn populate(&mut self, row: &dyn ColumnSource) -> RowResult<()> {
        self.identity
            .set_global_id(get_string(row, columns::GLOBAL_ID)?);
        self.global_id_feed_owner = get_string(row, columns::GLOBAL_ID_FEED_OWNER)?;
        self.global_id_actor = get_string(row, columns::GLOBAL_ID_ACTOR)?;
        self.global_id_object = get_string(row, columns::GLOBAL_ID_OBJECT)?;
        self.global_id_verb = get_string(row, columns::GLOBAL_ID_VERB)?;
        self.global_id_target = get_string(row, columns::GLOBAL_ID_TARGET)?;
        self.creation_date = get_string(row, columns::CREATION_DATE)?;
        self.origin = get_string(row, columns::ORIGIN)?;
        self.sync_status = get_sync_status(row)?;
        Ok(())
    }

    fn entity_values(&self) -> ValueMap {
        let mut values = ValueMap::new();
        values.put_text(columns::GLOBAL_ID, self.global_id());
        values.put_text(
            columns::GLOBAL_ID_FEED_OWNER,
            self.global_id_feed_owner.as_deref(),
        );
        values.put_text(columns::GLOBAL_ID_ACTOR, self.global_id_actor.as_deref());
        values.put_text(columns::GLOBAL_ID_OBJECT, self.global_id_object.as_deref());
        values.put_text(columns::GLOBAL_ID_VERB, self.global_id_verb.as_deref());
        values.put_text(columns::GLOBAL_ID_TARGET, self.global_id_target.as_deref());
        values.put_text(columns::CREATION_DATE, self.creation_date.as_deref());
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
            (
                columns::GLOBAL_ID_FEED_OWNER,
                self.global_id_feed_owner.as_deref(),
            ),
            (columns::GLOBAL_ID_ACTOR, self.global_id_actor.as_deref()),
            (columns::GLOBAL_ID_OBJECT, self.global_id_object.as_deref()),
            (columns::GLOBAL_ID_VERB, self.global_id_verb.as_deref()),
            (columns::GLOBAL_ID_TARGET, self.global_id_target.as_deref()),
            (columns::CREATION_DATE, self.creation_date.as_deref()),
        ]
    }
}

impl SyncTracked for ServiceActivity {
    fn sync_status(&self) -> Option<&SyncStatus> {
        self.sync_status.as_ref()
    }

    fn set_sync_status(&mut self, status: Option<SyncStatus>) {
        self.sync_status = status;
    }
}
