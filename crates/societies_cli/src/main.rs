//! CLI smoke entry point.
//!
//! Usage: `societies_cli [DB_DIR [LOG_DIR]]`
//!
//! Without arguments prints the core version only. With a database
//! directory it opens (and if needed bootstraps) `societies.db` there and
//! prints one row count per entity kind through the storage gateway.

use societies_core::schema::columns;
use societies_core::{
    core_version, init_logging, open_db, ping, EntityKind, LoggingConfig, RowQuery,
    SchemaRegistry, SqliteGateway, StorageGateway, StoreConfig,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("societies_core ping={}", ping());
    println!("societies_core version={}", core_version());

    let mut args = std::env::args().skip(1);
    let Some(db_dir) = args.next() else {
        return ExitCode::SUCCESS;
    };
    let mut config = StoreConfig::new(db_dir);
    config.logging = args.next().map(LoggingConfig::new);

    match print_row_counts(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn print_row_counts(config: &StoreConfig) -> Result<(), String> {
    if let Some(logging) = &config.logging {
        init_logging(logging)?;
    }

    let registry = SchemaRegistry::global();
    let conn = open_db(config.db_path(), registry).map_err(|err| err.to_string())?;
    let gateway = SqliteGateway::new(&conn, registry);
    let query = RowQuery::all().project([columns::LOCAL_ID]);

    for kind in EntityKind::ALL {
        let rows = gateway
            .query(&kind.content_locator(), &query)
            .map_err(|err| err.to_string())?;
        println!(
            "kind={} table={} rows={}",
            kind,
            registry.table_name(kind),
            rows.len()
        );
    }
    Ok(())
}
