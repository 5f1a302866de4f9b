//! Core storage abstractions.
//!
//! Two layers live here, deliberately separated:
//!
//! - [`RecordStore`] - the raw backend trait: translate filters, move rows,
//!   no tenant reasoning.
//! - [`ScopedStore`] - the tenant-scoping wrapper every caller goes through:
//!   injects the scope's tenant into reads, stamps it into writes, runs the
//!   post-fetch ownership check on by-key lookups, and fails fast on scope
//!   violations.
//!
//! Supporting types: [`Filter`] (conjunctive equality conditions),
//! [`StoredRecord`] and [`TenantRecord`], the [`Collection`] registry with
//! its [`collections`] constants, and [`CollectionHandle`] as the
//! per-entity convenience surface.
//!
//! ```text
//! handler code
//!     └── ScopedStore<S>           tenant injection, stamping, guards
//!             └── S: RecordStore   SQL translation, row mapping
//! ```

mod collection;
mod filter;
mod record;
mod scoped;
mod store;

pub use collection::{Collection, collections};
pub use filter::{Condition, Filter, ID_FIELD, TENANT_ID_FIELD};
pub use record::{StoredRecord, TenantRecord};
pub use scoped::{CollectionHandle, ScopedStore};
pub use store::{RecordStore, content_field};
