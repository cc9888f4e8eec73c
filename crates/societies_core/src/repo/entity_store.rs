//! Generic fetch and write operations over any entity kind.
//!
//! # Responsibility
//! - Turn gateway rows into entities through each kind's `populate`.
//! - Persist entities from their value maps against the kind's locator.
//!
//! # Invariants
//! - A row that fails to map is logged and skipped; the fetch continues.
//! - Gateway failures are returned unchanged.
//! - Global-id lookups order by local id ascending; the single-entity
//!   lookup returns the lowest local id when duplicates exist.
//! - An insert assigns the entity's local id exactly once.

use crate::entity::{Entity, IdentityAccess, LocalId, SyncStatus, SyncTracked, ValueMap};
use crate::repo::gateway::{RowQuery, StorageGateway};
use crate::repo::{StoreError, StoreResult};
use crate::schema::{columns, ContentLocator};
use log::{debug, error, info, warn};
use rusqlite::types::Value;
use std::time::Instant;

/// Runs `query` against `locator` and maps every row into a new `E`.
///
/// Returns an empty vector when nothing matches. Rows that cannot be mapped
/// are dropped with a `row_skipped` warning.
pub fn fetch_entities<E, G>(
    gateway: &G,
    locator: &ContentLocator,
    query: &RowQuery,
) -> StoreResult<Vec<E>>
where
    E: Entity,
    G: StorageGateway + ?Sized,
{
    let started_at = Instant::now();
    let rows = match gateway.query(locator, query) {
        Ok(rows) => rows,
        Err(err) => {
            error!(
                "event=entity_fetch module=repo status=error kind={} duration_ms={} error={}",
                E::KIND,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err);
        }
    };

    let mut entities = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;
    for row in &rows {
        match E::from_row(row) {
            Ok(entity) => entities.push(entity),
            Err(err) => {
                skipped += 1;
                let local_id = row
                    .get(columns::LOCAL_ID)
                    .and_then(|value| match value {
                        Value::Integer(id) => Some(id.to_string()),
                        _ => None,
                    })
                    .unwrap_or_else(|| "unknown".to_string());
                warn!(
                    "event=row_skipped module=repo status=skip kind={} local_id={} error={}",
                    E::KIND,
                    local_id,
                    err
                );
            }
        }
    }

    debug!(
        "event=entity_fetch module=repo status=ok kind={} rows={} skipped={} duration_ms={}",
        E::KIND,
        entities.len(),
        skipped,
        started_at.elapsed().as_millis()
    );
    Ok(entities)
}

/// Entity store over one storage gateway.
pub struct EntityStore<G: StorageGateway> {
    gateway: G,
}

impl<G: StorageGateway> EntityStore<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Runs an arbitrary query against an arbitrary locator as kind `E`.
    pub fn fetch<E: Entity>(
        &self,
        locator: &ContentLocator,
        query: &RowQuery,
    ) -> StoreResult<Vec<E>> {
        fetch_entities(&self.gateway, locator, query)
    }

    /// All rows of `E`, ordered by local id.
    pub fn fetch_all<E: Entity>(&self) -> StoreResult<Vec<E>> {
        self.fetch(
            &E::content_locator(),
            &RowQuery::all().order_by(local_id_ascending()),
        )
    }

    /// Every row carrying `global_id`, lowest local id first.
    ///
    /// More than one result means the table holds duplicate copies of one
    /// logical entity.
    pub fn fetch_by_global_id<E: Entity>(&self, global_id: &str) -> StoreResult<Vec<E>> {
        self.fetch(
            &E::content_locator(),
            &RowQuery::filter(
                format!("{} = ?", columns::GLOBAL_ID),
                vec![Value::Text(global_id.to_string())],
            )
            .order_by(local_id_ascending()),
        )
    }

    /// The entity with `global_id`, or `None` when no row matches.
    ///
    /// Duplicates resolve to the row with the lowest local id.
    pub fn find_by_global_id<E: Entity>(&self, global_id: &str) -> StoreResult<Option<E>> {
        Ok(self
            .fetch_by_global_id::<E>(global_id)?
            .into_iter()
            .next())
    }

    /// Rows of `E` whose sync status equals `status`, lowest local id first.
    pub fn fetch_by_sync_status<E: SyncTracked>(
        &self,
        status: &SyncStatus,
    ) -> StoreResult<Vec<E>> {
        self.fetch(
            &E::content_locator(),
            &RowQuery::filter(
                format!("{} = ?", columns::SYNC_STATUS),
                vec![Value::Text(status.as_str().to_string())],
            )
            .order_by(local_id_ascending()),
        )
    }

    /// Inserts a never-persisted entity and assigns its local id.
    ///
    /// # Errors
    /// - `AlreadyPersisted` when the entity already has a local id.
    /// - `UnsupportedWrite` when the kind yields an empty value map.
    /// - `InvalidWrite` when the value map names the local id column.
    pub fn insert<E: Entity>(&self, entity: &mut E) -> StoreResult<LocalId> {
        if let Some(local_id) = entity.local_id() {
            return Err(StoreError::AlreadyPersisted {
                kind: E::KIND,
                local_id,
            });
        }
        let values = writable_values(entity)?;

        let local_id = match self.gateway.insert(&E::content_locator(), &values) {
            Ok(local_id) => local_id,
            Err(err) => {
                log_write_error::<E>("insert", None, &err);
                return Err(err);
            }
        };
        entity
            .identity_mut(IdentityAccess::new())
            .assign_local_id(local_id)?;

        info!(
            "event=entity_write module=repo status=ok op=insert kind={} local_id={}",
            E::KIND,
            local_id
        );
        Ok(local_id)
    }

    /// Rewrites the stored row of a persisted entity.
    ///
    /// # Errors
    /// - `NotPersisted` when the entity has no local id.
    /// - `NotFound` when no row with that local id remains.
    pub fn update<E: Entity>(&self, entity: &E) -> StoreResult<()> {
        let local_id = entity.local_id().ok_or(StoreError::NotPersisted(E::KIND))?;
        let values = writable_values(entity)?;

        let changed = match self.gateway.update(
            &E::content_locator(),
            &values,
            &by_local_id(),
            &[Value::Integer(local_id)],
        ) {
            Ok(changed) => changed,
            Err(err) => {
                log_write_error::<E>("update", Some(local_id), &err);
                return Err(err);
            }
        };
        if changed == 0 {
            return Err(StoreError::NotFound {
                kind: E::KIND,
                local_id,
            });
        }

        info!(
            "event=entity_write module=repo status=ok op=update kind={} local_id={}",
            E::KIND,
            local_id
        );
        Ok(())
    }

    /// Deletes the stored row of a persisted entity.
    ///
    /// The in-memory entity keeps its local id.
    pub fn delete<E: Entity>(&self, entity: &E) -> StoreResult<()> {
        let local_id = entity.local_id().ok_or(StoreError::NotPersisted(E::KIND))?;

        let removed = match self.gateway.delete(
            &E::content_locator(),
            &by_local_id(),
            &[Value::Integer(local_id)],
        ) {
            Ok(removed) => removed,
            Err(err) => {
                log_write_error::<E>("delete", Some(local_id), &err);
                return Err(err);
            }
        };
        if removed == 0 {
            return Err(StoreError::NotFound {
                kind: E::KIND,
                local_id,
            });
        }

        info!(
            "event=entity_write module=repo status=ok op=delete kind={} local_id={}",
            E::KIND,
            local_id
        );
        Ok(())
    }

    /// Deletes every row of `E` carrying `global_id`; returns the count.
    pub fn delete_by_global_id<E: Entity>(&self, global_id: &str) -> StoreResult<usize> {
        let removed = match self.gateway.delete(
            &E::content_locator(),
            &format!("{} = ?", columns::GLOBAL_ID),
            &[Value::Text(global_id.to_string())],
        ) {
            Ok(removed) => removed,
            Err(err) => {
                log_write_error::<E>("delete", None, &err);
                return Err(err);
            }
        };
        info!(
            "event=entity_write module=repo status=ok op=delete kind={} rows={}",
            E::KIND,
            removed
        );
        Ok(removed)
    }
}

fn writable_values<E: Entity>(entity: &E) -> StoreResult<ValueMap> {
    let values = entity.entity_values();
    if values.is_empty() {
        warn!(
            "event=write_refused module=repo status=error kind={} reason=empty_value_map",
            E::KIND
        );
        return Err(StoreError::UnsupportedWrite(E::KIND));
    }
    if values.contains(columns::LOCAL_ID) {
        warn!(
            "event=write_refused module=repo status=error kind={} reason=local_id_in_values",
            E::KIND
        );
        return Err(StoreError::InvalidWrite(format!(
            "{} values must not contain `{}`",
            E::KIND,
            columns::LOCAL_ID
        )));
    }
    Ok(values)
}

fn log_write_error<E: Entity>(op: &str, local_id: Option<LocalId>, err: &StoreError) {
    error!(
        "event=entity_write module=repo status=error op={} kind={} local_id={} error={}",
        op,
        E::KIND,
        local_id.map_or_else(|| "none".to_string(), |id| id.to_string()),
        err
    );
}

fn by_local_id() -> String {
    format!("{} = ?", columns::LOCAL_ID)
}

fn local_id_ascending() -> String {
    format!("{} ASC", columns::LOCAL_ID)
}

#[cfg(test)]
mod tests {
    use super::{fetch_entities, EntityStore};
    use crate::entity::{
        get_string, ColumnSource, Entity, EntityIdentity, IdentityAccess, LocalId, RowResult,
        StoredRow, ValueMap,
    };
    use crate::repo::gateway::{RowQuery, StorageGateway};
    use crate::repo::{StoreError, StoreResult};
    use crate::schema::{columns, ContentLocator, EntityKind};
    use rusqlite::types::Value;
    use std::cell::{Cell, RefCell};

    #[derive(Debug, Default)]
    struct Stub {
        identity: EntityIdentity,
        name: Option<String>,
    }

    impl Entity for Stub {
        const KIND: EntityKind = EntityKind::Community;

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
            Ok(())
        }

        fn entity_values(&self) -> ValueMap {
            let mut values = ValueMap::new();
            values.put_text(columns::GLOBAL_ID, self.global_id());
            values.put_text(columns::NAME, self.name.as_deref());
            values
        }

        fn serialized_fields(&self) -> Vec<(&'static str, Option<&str>)> {
            vec![
                (columns::GLOBAL_ID, self.global_id()),
                (columns::NAME, self.name.as_deref()),
            ]
        }
    }

    #[derive(Default)]
    struct MockGateway {
        rows: Vec<StoredRow>,
        unavailable: bool,
        next_id: Cell<LocalId>,
        inserted: RefCell<Vec<ValueMap>>,
    }

    impl StorageGateway for MockGateway {
        fn query(
            &self,
            locator: &ContentLocator,
            _query: &RowQuery,
        ) -> StoreResult<Vec<StoredRow>> {
            if self.unavailable {
                return Err(StoreError::StorageUnavailable {
                    locator: locator.clone(),
                    reason: "mock offline".to_string(),
                });
            }
            Ok(self.rows.clone())
        }

        fn insert(&self, _locator: &ContentLocator, values: &ValueMap) -> StoreResult<LocalId> {
            self.inserted.borrow_mut().push(values.clone());
            self.next_id.set(self.next_id.get() + 1);
            Ok(self.next_id.get())
        }

        fn update(
            &self,
            _locator: &ContentLocator,
            _values: &ValueMap,
            _selection: &str,
            _selection_args: &[Value],
        ) -> StoreResult<usize> {
            Ok(0)
        }

        fn delete(
            &self,
            locator: &ContentLocator,
            _selection: &str,
            _selection_args: &[Value],
        ) -> StoreResult<usize> {
            if self.unavailable {
                return Err(StoreError::StorageUnavailable {
                    locator: locator.clone(),
                    reason: "mock offline".to_string(),
                });
            }
            Ok(0)
        }
    }

    fn row(local_id: Value, name: Value) -> StoredRow {
        let mut row = StoredRow::new();
        row.put(columns::LOCAL_ID, local_id);
        row.put_text(columns::GLOBAL_ID, Some("c1"));
        row.put(columns::NAME, name);
        row
    }

    #[test]
    fn malformed_rows_are_skipped_not_fatal() {
        let gateway = MockGateway {
            rows: vec![
                row(Value::Integer(1), Value::Text("ok".to_string())),
                row(Value::Integer(2), Value::Blob(vec![1, 2, 3])),
                row(Value::Integer(-5), Value::Text("bad id".to_string())),
                row(Value::Integer(4), Value::Null),
            ],
            ..MockGateway::default()
        };

        let stubs: Vec<Stub> = fetch_entities(
            &gateway,
            &Stub::content_locator(),
            &RowQuery::all(),
        )
        .unwrap();
        assert_eq!(stubs.len(), 2);
        assert_eq!(stubs[0].local_id(), Some(1));
        assert_eq!(stubs[0].name.as_deref(), Some("ok"));
        assert_eq!(stubs[1].local_id(), Some(4));
        assert_eq!(stubs[1].name, None);
    }

    #[test]
    fn gateway_failure_propagates_instead_of_empty_result() {
        let gateway = MockGateway {
            unavailable: true,
            ..MockGateway::default()
        };
        let store = EntityStore::new(gateway);
        let err = store.fetch_all::<Stub>().unwrap_err();
        assert!(matches!(err, StoreError::StorageUnavailable { .. }));
    }

    #[test]
    fn insert_assigns_local_id_once_and_rejects_repeat() {
        let store = EntityStore::new(MockGateway::default());
        let mut stub = Stub {
            identity: EntityIdentity::with_global_id("c9"),
            name: Some("stub".to_string()),
        };

        let local_id = store.insert(&mut stub).unwrap();
        assert_eq!(stub.local_id(), Some(local_id));
        assert!(!store.gateway().inserted.borrow()[0].contains(columns::LOCAL_ID));

        let err = store.insert(&mut stub).unwrap_err();
        assert!(matches!(
            err,
            StoreError::AlreadyPersisted { local_id: id, .. } if id == local_id
        ));
        assert_eq!(store.gateway().inserted.borrow().len(), 1);
    }

    #[test]
    fn update_of_vanished_row_is_not_found() {
        let store = EntityStore::new(MockGateway::default());
        let mut stub = Stub::default();
        stub.set_global_id("c1");
        store.insert(&mut stub).unwrap();

        let err = store.update(&stub).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        let err = store.delete(&stub).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn delete_by_global_id_returns_gateway_failure() {
        let store = EntityStore::new(MockGateway {
            unavailable: true,
            ..MockGateway::default()
        });
        let err = store.delete_by_global_id::<Stub>("c1").unwrap_err();
        assert!(matches!(err, StoreError::StorageUnavailable { .. }));

        let store = EntityStore::new(MockGateway::default());
        assert_eq!(store.delete_by_global_id::<Stub>("c1").unwrap(), 0);
    }
}
