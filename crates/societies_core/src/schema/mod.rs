//! Schema registry for the social data model.
//!
//! # Responsibility
//! - Map every entity kind to its table name, columns and creation DDL.
//! - Map every entity kind to the content locator storage calls target.
//!
//! # Invariants
//! - The registry is immutable once built; callers share it by reference.
//! - Locators are a pure function of the kind, never of instance state.
//! - `global()` builds the process-wide registry exactly once.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

pub mod columns;
pub mod tables;

pub use tables::TableSchema;

/// Authority part of every content locator handed out by the registry.
pub const SOCIAL_PROVIDER_AUTHORITY: &str = "org.societies.android.SocialProvider";
/// Default database file name.
pub const DB_NAME: &str = "societies.db";
/// Schema version written to `PRAGMA user_version`.
pub const SCHEMA_VERSION: u32 = 1;

static LOCATOR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^content://([A-Za-z0-9_.]+)/([a-z_]+)$").expect("valid locator regex")
});

static GLOBAL_REGISTRY: Lazy<SchemaRegistry> = Lazy::new(SchemaRegistry::new);

/// Every persisted entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    /// The device owner's own account.
    Me,
    Person,
    Community,
    Service,
    Relationship,
    Membership,
    Sharing,
    PeopleActivity,
    CommunityActivity,
    ServiceActivity,
}

impl EntityKind {
    /// All kinds in registry order.
    pub const ALL: [EntityKind; 10] = [
        EntityKind::Me,
        EntityKind::Person,
        EntityKind::Community,
        EntityKind::Service,
        EntityKind::Relationship,
        EntityKind::Membership,
        EntityKind::Sharing,
        EntityKind::PeopleActivity,
        EntityKind::CommunityActivity,
        EntityKind::ServiceActivity,
    ];

    /// Stable name used in log events and diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Me => "me",
            Self::Person => "person",
            Self::Community => "community",
            Self::Service => "service",
            Self::Relationship => "relationship",
            Self::Membership => "membership",
            Self::Sharing => "sharing",
            Self::PeopleActivity => "people_activity",
            Self::CommunityActivity => "community_activity",
            Self::ServiceActivity => "service_activity",
        }
    }

    /// Content locator for this kind's table.
    pub fn content_locator(self) -> ContentLocator {
        ContentLocator::for_table(tables::table_for(self).table_name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// URI-like handle naming the storage resource an operation targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentLocator(String);

impl ContentLocator {
    /// Builds the provider locator for one table.
    pub fn for_table(table_name: &str) -> Self {
        Self(format!("content://{SOCIAL_PROVIDER_AUTHORITY}/{table_name}"))
    }

    /// Wraps an arbitrary locator string without validating it.
    ///
    /// Unknown locators are reported by the gateway as unavailable storage.
    pub fn parse(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `(authority, path)` when the locator is well formed.
    pub fn parts(&self) -> Option<(&str, &str)> {
        let captures = LOCATOR_PATTERN.captures(&self.0)?;
        let authority = captures.get(1)?.as_str();
        let path = captures.get(2)?.as_str();
        Some((authority, path))
    }
}

impl Display for ContentLocator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable kind -> table lookup, built once and passed by reference.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    tables: [TableSchema; 10],
}

impl SchemaRegistry {
    /// Builds an independent registry instance.
    pub fn new() -> Self {
        Self {
            tables: EntityKind::ALL.map(tables::table_for),
        }
    }

    /// Returns the process-wide registry, built on first use.
    pub fn global() -> &'static SchemaRegistry {
        &GLOBAL_REGISTRY
    }

    pub fn table(&self, kind: EntityKind) -> &TableSchema {
        &self.tables[kind.index()]
    }

    pub fn table_name(&self, kind: EntityKind) -> &'static str {
        self.table(kind).table_name
    }

    pub fn column_names(&self, kind: EntityKind) -> &'static [&'static str] {
        self.table(kind).columns
    }

    pub fn create_statement(&self, kind: EntityKind) -> &'static str {
        self.table(kind).create_statement
    }

    /// All table definitions in registry order.
    pub fn tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.iter()
    }

    /// Maps a locator back to its table.
    ///
    /// Returns `None` for foreign authorities and unknown paths.
    pub fn resolve(&self, locator: &ContentLocator) -> Option<&TableSchema> {
        let (authority, path) = locator.parts()?;
        if authority != SOCIAL_PROVIDER_AUTHORITY {
            return None;
        }
        self.tables.iter().find(|table| table.table_name == path)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{columns, ContentLocator, EntityKind, SchemaRegistry};

    #[test]
    fn every_kind_maps_to_its_own_table() {
        let registry = SchemaRegistry::new();
        for kind in EntityKind::ALL {
            assert_eq!(registry.table(kind).kind, kind);
            assert_eq!(registry.column_names(kind)[0], columns::LOCAL_ID);
            assert!(registry.column_names(kind).contains(&columns::GLOBAL_ID));
        }
    }

    #[test]
    fn locators_resolve_back_to_their_table() {
        let registry = SchemaRegistry::global();
        for kind in EntityKind::ALL {
            let locator = kind.content_locator();
            let table = registry.resolve(&locator).expect("locator should resolve");
            assert_eq!(table.kind, kind);
        }
    }

    #[test]
    fn resolve_rejects_foreign_or_malformed_locators() {
        let registry = SchemaRegistry::new();
        assert!(registry
            .resolve(&ContentLocator::parse("content://other.provider/communities"))
            .is_none());
        let unknown_table =
            ContentLocator::parse("content://org.societies.android.SocialProvider/profiles");
        assert!(registry.resolve(&unknown_table).is_none());
        assert!(registry.resolve(&ContentLocator::parse("communities")).is_none());
    }

    #[test]
    fn me_table_is_registered_first() {
        let registry = SchemaRegistry::new();
        let first = registry.tables().next().expect("registry is never empty");
        assert_eq!(first.kind, EntityKind::Me);
        assert_eq!(first.table_name, "me");
        assert!(registry
            .column_names(EntityKind::Me)
            .contains(&columns::PASSWORD));
        let locator = ContentLocator::parse("content://org.societies.android.SocialProvider/me");
        assert_eq!(
            registry.resolve(&locator).map(|table| table.kind),
            Some(EntityKind::Me)
        );
    }

    #[test]
    fn sharing_ddl_keeps_missing_space_in_owner_column() {
        let registry = SchemaRegistry::new();
        let ddl = registry.create_statement(EntityKind::Sharing);
        assert!(ddl.contains("owner_global_idtext,"));
        assert!(registry
            .column_names(EntityKind::Sharing)
            .contains(&columns::OWNER_GLOBAL_ID));
    }
}
