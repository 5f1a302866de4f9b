//! SQLite backend implementation.
//!
//! A complete [`RecordStore`](crate::core::RecordStore) over SQLite with both
//! in-memory databases (for tests) and file-based databases (for development
//! and small deployments). Record content is stored as JSON text and queried
//! through `json_extract`, so filters work on any content field without
//! per-collection tables.
//!
//! # Example
//!
//! ```no_run
//! use dalali_store::backends::sqlite::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // In-memory, private to this instance
//! let store = SqliteStore::in_memory()?;
//! store.init_schema()?;
//!
//! // Or file-backed
//! let store = SqliteStore::open("./data/dalali.db")?;
//! store.init_schema()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE records (
//!     collection TEXT NOT NULL,
//!     id TEXT NOT NULL,
//!     tenant_id TEXT NOT NULL,
//!     content TEXT NOT NULL,   -- JSON
//!     created_at TEXT NOT NULL,
//!     updated_at TEXT NOT NULL,
//!     PRIMARY KEY (collection, id)
//! );
//!
//! CREATE TABLE tenants (
//!     id TEXT PRIMARY KEY,
//!     display_name TEXT NOT NULL,
//!     slug TEXT NOT NULL UNIQUE,
//!     created_at TEXT NOT NULL
//! );
//! ```
//!
//! The primary key is `(collection, id)` rather than including the tenant:
//! ids are globally unique within a collection, and ownership is enforced by
//! the scoping layer's post-fetch check plus tenant-addressed writes. Every
//! scoped read goes through the `(tenant_id, collection)` index.

mod backend;
mod schema;
mod storage;

pub use backend::{SqliteStore, SqliteStoreConfig};
pub use schema::SCHEMA_VERSION;
