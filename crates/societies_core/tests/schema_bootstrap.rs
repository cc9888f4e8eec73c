use rusqlite::Connection;
use societies_core::db::{current_schema_version, open_db, open_db_in_memory, DbError};
use societies_core::schema::{EntityKind, SchemaRegistry, DB_NAME, SCHEMA_VERSION};

#[test]
fn open_db_in_memory_creates_every_registered_table() {
    let registry = SchemaRegistry::new();
    let conn = open_db_in_memory(&registry).unwrap();

    assert_eq!(current_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    for kind in EntityKind::ALL {
        assert_table_exists(&conn, registry.table_name(kind));
    }
}

#[test]
fn reopening_file_database_keeps_rows_and_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DB_NAME);
    let registry = SchemaRegistry::new();

    let first = open_db(&path, &registry).unwrap();
    first
        .execute(
            "INSERT INTO people (global_id, name) VALUES ('p-1', 'Ada');",
            [],
        )
        .unwrap();
    drop(first);

    let second = open_db(&path, &registry).unwrap();
    assert_eq!(current_schema_version(&second).unwrap(), SCHEMA_VERSION);
    let count: i64 = second
        .query_row("SELECT COUNT(*) FROM people;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path, &SchemaRegistry::new()).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn sharings_table_carries_fused_owner_column() {
    let registry = SchemaRegistry::new();
    let conn = open_db_in_memory(&registry).unwrap();

    let live = table_columns(&conn, "sharings");
    assert!(live.iter().any(|column| column == "owner_global_idtext"));
    assert!(!live.iter().any(|column| column == "owner_global_id"));
    assert!(registry
        .column_names(EntityKind::Sharing)
        .contains(&"owner_global_id"));
}

#[test]
fn every_locator_resolves_back_to_its_table() {
    let registry = SchemaRegistry::global();
    for kind in EntityKind::ALL {
        let locator = kind.content_locator();
        assert!(locator
            .as_str()
            .starts_with("content://org.societies.android.SocialProvider/"));
        let table = registry.resolve(&locator).unwrap();
        assert_eq!(table.kind, kind);
        assert_eq!(table.table_name, registry.table_name(kind));
    }
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "expected table `{table_name}` to exist");
}

fn table_columns(conn: &Connection, table_name: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table_name});"))
        .unwrap();
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    names
}
