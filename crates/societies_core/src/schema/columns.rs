//! Canonical column-name strings.
//!
//! These strings are the only column names descriptors and the store may
//! use. They double as the keys of the serialized wire format.

/// Storage-assigned local identity column present on every table.
pub const LOCAL_ID: &str = "_id";
/// Cross-device identity column present on every table.
pub const GLOBAL_ID: &str = "global_id";
/// Remote domain/service the row originated from.
pub const ORIGIN: &str = "origin";
/// Opaque synchronization state column.
pub const SYNC_STATUS: &str = "sync_status";

pub const NAME: &str = "name";
pub const EMAIL: &str = "email";
pub const TYPE: &str = "type";
pub const OWNER_ID: &str = "owner_id";
pub const DESCRIPTION: &str = "description";
pub const CREATION_DATE: &str = "creation_date";
pub const LAST_MODIFIED_DATE: &str = "last_modified_date";

// me
pub const DISPLAY_NAME: &str = "display_name";
pub const USER_NAME: &str = "user_name";
pub const PASSWORD: &str = "password";

// services
pub const AVAILABLE: &str = "available";
pub const DEPENDENCY: &str = "dependency";
pub const CONFIG: &str = "config";
pub const URL: &str = "url";

// relationships
pub const GLOBAL_ID_P1: &str = "global_id_p1";
pub const GLOBAL_ID_P2: &str = "global_id_p2";

// memberships and sharings
pub const GLOBAL_ID_MEMBER: &str = "global_id_member";
pub const GLOBAL_ID_COMMUNITY: &str = "global_id_community";
pub const GLOBAL_ID_SERVICE: &str = "global_id_service";
pub const OWNER_GLOBAL_ID: &str = "owner_global_id";

// activity feeds
pub const GLOBAL_ID_FEED_OWNER: &str = "global_id_feed_owner";
pub const GLOBAL_ID_ACTOR: &str = "global_id_actor";
pub const GLOBAL_ID_OBJECT: &str = "global_id_object";
pub const GLOBAL_ID_VERB: &str = "global_id_verb";
pub const GLOBAL_ID_TARGET: &str = "global_id_target";
