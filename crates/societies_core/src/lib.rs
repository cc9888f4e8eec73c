//! Local entity store for the societies social data model.
//!
//! Maps ten social entity kinds onto a provider-style storage gateway:
//! a static schema registry, a generic fetch/write core, and one
//! descriptor per kind.

pub mod config;
pub mod db;
pub mod entity;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schema;

pub use config::{LoggingConfig, StoreConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use entity::{
    Entity, EntityIdentity, IdentityAccess, LocalId, SyncStatus, SyncTracked, ValueMap,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{
    Community, CommunityActivity, Me, Membership, PeopleActivity, Person, Relationship, Service,
    ServiceActivity, Sharing,
};
pub use repo::entity_store::{fetch_entities, EntityStore};
pub use repo::gateway::{RowQuery, StorageGateway};
pub use repo::sqlite_gateway::SqliteGateway;
pub use repo::{StoreError, StoreResult};
pub use schema::{ContentLocator, EntityKind, SchemaRegistry};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
