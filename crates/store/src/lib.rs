//! Dalali Tenant-Scoped Data Access Layer
//!
//! This crate is the data core of the Dalali real-estate brokerage platform.
//! Dalali hosts many brokerages ("tenants") on one deployment and one
//! database; this layer guarantees that every read and write is confined to
//! exactly one tenant, resolved from the authenticated principal, with
//! cross-tenant access existing only as an explicit, capability-gated,
//! audited operation.
//!
//! # Features
//!
//! - **Shared-schema multitenancy**: one `records` table, a mandatory
//!   `tenant_id` on every row, per-tenant unique keys enforced in the schema
//! - **Scope as a value**: a [`TenantScope`](tenant::TenantScope) is resolved
//!   once per request and passed explicitly; there is no ambient or global
//!   tenant state to leak between requests
//! - **One choke point**: [`ScopedStore`](core::ScopedStore) injects the
//!   tenant into every filter, stamps it into every payload, and verifies
//!   ownership on every by-key fetch before anything reaches a backend
//! - **Pluggable backends**: storage is the [`RecordStore`](core::RecordStore)
//!   trait; SQLite ships behind the default `sqlite` feature
//!
//! # Architecture
//!
//! - [`tenant`] - tenant identity, capabilities, principals, and scope
//!   resolution
//! - [`core`] - collections, filters, stored records, the storage trait, and
//!   the scoped wrapper
//! - [`error`] - error types for all operations
//! - [`backends`] - backend implementations
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use dalali_store::backends::sqlite::SqliteStore;
//! use dalali_store::core::{Filter, ScopedStore, collections};
//! use dalali_store::tenant::{Principal, resolve_scope};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(SqliteStore::in_memory()?);
//! store.init_schema()?;
//!
//! // Resolve the scope from the authenticated principal, once per request.
//! let principal = Principal::member_of("broker-7", "et-addis");
//! let scope = resolve_scope(&principal, None)?;
//! let scoped = ScopedStore::new(store, scope);
//!
//! // Everything below is confined to et-addis.
//! scoped
//!     .create(&collections::LICENSES, json!({"number": "LIC-1"}))
//!     .await?;
//! let mine = scoped.find(&collections::LICENSES, Filter::new()).await?;
//! assert_eq!(mine.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Multitenancy
//!
//! Every scoped operation requires a [`TenantScope`](tenant::TenantScope);
//! there is no way to construct a [`ScopedStore`](core::ScopedStore) without
//! one, and no scoped operation that skips the tenant filter. Crossing
//! tenants takes the cross-tenant admin capability and an explicit override
//! call:
//!
//! ```
//! use dalali_store::tenant::{Capabilities, Operation, TenantScope};
//!
//! let member = TenantScope::new("et-addis", Capabilities::full());
//! assert!(member.check_operation(Operation::Create).is_ok());
//! assert!(member.for_tenant(&"ke-nairobi".into()).is_err());
//!
//! let admin = TenantScope::new("hq", Capabilities::cross_tenant_admin());
//! let elsewhere = admin.for_tenant(&"ke-nairobi".into()).unwrap();
//! assert_eq!(elsewhere.tenant_id().as_str(), "ke-nairobi");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod tenant;

// Re-export commonly used types at crate root
pub use error::{StoreError, StoreResult};
pub use tenant::{Capabilities, Operation, Principal, TenantId, TenantScope, resolve_scope};

pub use core::{
    Collection, CollectionHandle, Filter, RecordStore, ScopedStore, StoredRecord, TenantRecord,
    collections,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
