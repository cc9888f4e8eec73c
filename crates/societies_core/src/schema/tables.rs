//! Static table definitions for every entity kind.
//!
//! # Invariants
//! - Column lists name the documented columns of each table, `_id` first.
//! - Creation statements are idempotent (`create table if not exists`).
//! - The `sharings` statement keeps its historical missing-space defect:
//!   the live table gets a column named `owner_global_idtext` instead of
//!   `owner_global_id`.

use super::columns::*;
use super::EntityKind;

/// Static description of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub kind: EntityKind,
    pub table_name: &'static str,
    /// Documented column names, local id first.
    pub columns: &'static [&'static str],
    pub create_statement: &'static str,
}

pub const ME: TableSchema = TableSchema {
    kind: EntityKind::Me,
    table_name: "me",
    columns: &[
        LOCAL_ID,
        GLOBAL_ID,
        NAME,
        DISPLAY_NAME,
        USER_NAME,
        PASSWORD,
        ORIGIN,
    ],
    create_statement: "create table if not exists me (\
        _id integer primary key autoincrement, \
        global_id text, \
        name text,\
        display_name text,\
        user_name text,\
        password text,\
        origin text );",
};

pub const PEOPLE: TableSchema = TableSchema {
    kind: EntityKind::Person,
    table_name: "people",
    columns: &[
        LOCAL_ID,
        GLOBAL_ID,
        NAME,
        EMAIL,
        ORIGIN,
        DESCRIPTION,
        CREATION_DATE,
        LAST_MODIFIED_DATE,
        SYNC_STATUS,
    ],
    create_statement: "create table if not exists people (\
        _id integer primary key autoincrement, \
        global_id text, \
        name text,\
        email text,\
        origin text,\
        description text,\
        creation_date text,\
        last_modified_date text,\
        sync_status text );",
};

pub const COMMUNITIES: TableSchema = TableSchema {
    kind: EntityKind::Community,
    table_name: "communities",
    columns: &[
        LOCAL_ID,
        GLOBAL_ID,
        TYPE,
        NAME,
        OWNER_ID,
        ORIGIN,
        DESCRIPTION,
        CREATION_DATE,
        LAST_MODIFIED_DATE,
        SYNC_STATUS,
    ],
    create_statement: "create table if not exists communities (\
        _id integer primary key autoincrement, \
        global_id text, \
        type text,\
        name text,\
        owner_id text,\
        origin text,\
        description text,\
        creation_date text,\
        last_modified_date text,\
        sync_status text );",
};

pub const SERVICES: TableSchema = TableSchema {
    kind: EntityKind::Service,
    table_name: "services",
    columns: &[
        LOCAL_ID,
        GLOBAL_ID,
        TYPE,
        NAME,
        OWNER_ID,
        ORIGIN,
        DESCRIPTION,
        CREATION_DATE,
        LAST_MODIFIED_DATE,
        SYNC_STATUS,
        AVAILABLE,
        DEPENDENCY,
        CONFIG,
        URL,
    ],
    create_statement: "create table if not exists services (\
        _id integer primary key autoincrement, \
        global_id text, \
        type text,\
        name text,\
        owner_id text,\
        origin text,\
        description text,\
        creation_date text,\
        last_modified_date text,\
        sync_status text,\
        available text,\
        dependency text,\
        config text,\
        url text );",
};

pub const RELATIONSHIPS: TableSchema = TableSchema {
    kind: EntityKind::Relationship,
    table_name: "relationships",
    columns: &[LOCAL_ID, GLOBAL_ID, GLOBAL_ID_P1, GLOBAL_ID_P2, TYPE, ORIGIN],
    create_statement: "create table if not exists relationships (\
        _id integer primary key autoincrement, \
        global_id text, \
        global_id_p1 text,\
        global_id_p2 text,\
        type text,\
        origin text );",
};

pub const MEMBERSHIPS: TableSchema = TableSchema {
    kind: EntityKind::Membership,
    table_name: "memberships",
    columns: &[
        LOCAL_ID,
        GLOBAL_ID,
        GLOBAL_ID_MEMBER,
        GLOBAL_ID_COMMUNITY,
        TYPE,
        ORIGIN,
    ],
    create_statement: "create table if not exists memberships (\
        _id integer primary key autoincrement, \
        global_id text, \
        global_id_member text,\
        global_id_community text,\
        type text not null,\
        origin text );",
};

pub const SHARINGS: TableSchema = TableSchema {
    kind: EntityKind::Sharing,
    table_name: "sharings",
    columns: &[
        LOCAL_ID,
        GLOBAL_ID,
        OWNER_GLOBAL_ID,
        GLOBAL_ID_SERVICE,
        GLOBAL_ID_COMMUNITY,
        TYPE,
        ORIGIN,
    ],
    create_statement: "create table if not exists sharings (\
        _id integer primary key autoincrement, \
        global_id text, \
        owner_global_idtext, \
        global_id_service text,\
        global_id_community text,\
        type text,\
        origin text );",
};

pub const PEOPLE_ACTIVITIES: TableSchema = TableSchema {
    kind: EntityKind::PeopleActivity,
    table_name: "people_activities",
    columns: ACTIVITY_COLUMNS,
    create_statement: "create table if not exists people_activities (\
        _id integer primary key autoincrement, \
        global_id text, \
        global_id_feed_owner text,\
        global_id_actor text,\
        global_id_object text,\
        global_id_verb text,\
        global_id_target text,\
        origin text,\
        creation_date text,\
        sync_status text);",
};

pub const COMMUNITIES_ACTIVITIES: TableSchema = TableSchema {
    kind: EntityKind::CommunityActivity,
    table_name: "communities_activities",
    columns: ACTIVITY_COLUMNS,
    create_statement: "create table if not exists communities_activities (\
        _id integer primary key autoincrement, \
        global_id text, \
        global_id_feed_owner text,\
        global_id_actor text,\
        global_id_object text,\
        global_id_verb text,\
        global_id_target text,\
        origin text,\
        creation_date text,\
        sync_status text );",
};

pub const SERVICES_ACTIVITIES: TableSchema = TableSchema {
    kind: EntityKind::ServiceActivity,
    table_name: "services_activities",
    columns: ACTIVITY_COLUMNS,
    create_statement: "create table if not exists services_activities (\
        _id integer primary key autoincrement, \
        global_id text, \
        global_id_feed_owner text,\
        global_id_actor text,\
        global_id_object text,\
        global_id_verb text,\
        global_id_target text,\
        origin text,\
        creation_date text,\
        sync_status text );",
};

const ACTIVITY_COLUMNS: &[&str] = &[
    LOCAL_ID,
    GLOBAL_ID,
    GLOBAL_ID_FEED_OWNER,
    GLOBAL_ID_ACTOR,
    GLOBAL_ID_OBJECT,
    GLOBAL_ID_VERB,
    GLOBAL_ID_TARGET,
    ORIGIN,
    CREATION_DATE,
    SYNC_STATUS,
];

/// Returns the static table definition for one kind.
pub(crate) fn table_for(kind: EntityKind) -> TableSchema {
    match kind {
        EntityKind::Me => ME,
        EntityKind::Person => PEOPLE,
        EntityKind::Community => COMMUNITIES,
        EntityKind::Service => SERVICES,
        EntityKind::Relationship => RELATIONSHIPS,
        EntityKind::Membership => MEMBERSHIPS,
        EntityKind::Sharing => SHARINGS,
        EntityKind::PeopleActivity => PEOPLE_ACTIVITIES,
        EntityKind::CommunityActivity => COMMUNITIES_ACTIVITIES,
        EntityKind::ServiceActivity => SERVICES_ACTIVITIES,
    }
}
