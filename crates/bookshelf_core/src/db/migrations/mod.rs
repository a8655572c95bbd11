//! Embedded catalog migrations.
//!
//! Each step is a SQL script compiled into the binary. Steps newer than the
//! database's `user_version` run together in one transaction, and the
//! version is bumped after each step.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct CatalogMigration {
    version: u32,
    /// Human-readable step name used in logs.
    name: &'static str,
    sql: &'static str,
}

const CATALOG_MIGRATIONS: &[CatalogMigration] = &[CatalogMigration {
    version: 1,
    name: "authors_books_book_author",
    sql: include_str!("0001_catalog.sql"),
}];

/// Returns the newest catalog layout version this build can produce.
pub fn latest_version() -> u32 {
    CATALOG_MIGRATIONS.last().map_or(0, |step| step.version)
}

/// Brings the catalog tables on `conn` up to [`latest_version`].
///
/// Fails with [`DbError::UnsupportedSchemaVersion`] for a database written by
/// a newer build; nothing is touched in that case.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = stored_version(conn)?;
    let target_version = latest_version();

    if from_version > target_version {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: target_version,
        });
    }

    let pending = CATALOG_MIGRATIONS
        .iter()
        .filter(|step| step.version > from_version)
        .collect::<Vec<_>>();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        info!(
            "event=db_migrate module=db status=applied version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        from_version, target_version
    );
    Ok(())
}

fn stored_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?;
    Ok(version)
}
