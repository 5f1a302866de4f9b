//! SQLite schema management.
//!
//! All tenants share one schema. The `records` table holds every
//! tenant-owned collection, discriminated by the `collection` column:
//!
//! - `(collection, id)` is the primary key; ids are globally unique within
//!   a collection, which is what lets by-key lookups run without a tenant
//!   predicate (the scoping layer owns the ownership check).
//! - `tenant_id` is non-nullable and indexed together with `collection`,
//!   the access path for every scoped read.
//! - per-tenant unique keys (a license number, a user email) are partial
//!   unique indexes over `(tenant_id, json_extract(content, ...))`, so the
//!   same value may appear in different tenants but never twice in one.
//!
//! Schema changes are tracked in `schema_version` and applied stepwise by
//! [`initialize_schema`], which is idempotent.

use chrono::{SecondsFormat, Utc};
use rusqlite::Connection;
use tracing::info;

use crate::core::collections;
use crate::error::StoreResult;

/// Current schema version.
pub const SCHEMA_VERSION: i64 = 1;

/// Initializes or migrates the database schema.
pub fn initialize_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );",
    )?;

    let current = get_schema_version(conn)?;
    if current < 1 {
        create_schema_v1(conn)?;
        set_schema_version(conn, 1)?;
        info!(version = 1, "applied schema migration");
    }

    Ok(())
}

/// Returns the highest applied schema version, 0 for a fresh database.
pub fn get_schema_version(conn: &Connection) -> StoreResult<i64> {
    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i64) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO schema_version (version, applied_at) VALUES (?1, ?2)",
        rusqlite::params![
            version,
            Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
        ],
    )?;
    Ok(())
}

fn create_schema_v1(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS records (
            collection TEXT NOT NULL,
            id TEXT NOT NULL,
            tenant_id TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (collection, id)
        );

        CREATE INDEX IF NOT EXISTS idx_records_tenant
            ON records (tenant_id, collection);

        CREATE TABLE IF NOT EXISTS tenants (
            id TEXT PRIMARY KEY,
            display_name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        );",
    )?;

    // One partial unique index per collection that declares a per-tenant
    // unique field. Names and fields come from the compile-time registry.
    for collection in collections::all() {
        if let Some(field) = collection.unique_field() {
            conn.execute_batch(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS uniq_{name}_{field}
                    ON records (tenant_id, json_extract(content, '$.{field}'))
                    WHERE collection = '{name}';",
                name = collection.name(),
                field = field,
            ))?;
        }
    }

    Ok(())
}
