//! Tenant identity and request scoping.
//!
//! This module holds the types that establish *who a request acts as* before
//! any data access happens:
//!
//! - [`TenantId`] - validated tenant identifier
//! - [`Capabilities`] - what a scope may do, including the explicit
//!   cross-tenant admin capability
//! - [`Principal`] - claims of the authenticated caller
//! - [`TenantScope`] - the per-request scope every storage call is bound to
//! - [`resolve_scope`] - pure resolution from principal + optional
//!   client-supplied tenant
//!
//! # Design Philosophy
//!
//! The scope is an explicit value, not ambient state. Every scoped storage
//! operation takes its tenant from a [`TenantScope`] that was created once
//! at the request boundary and passed down by value; there is no global,
//! thread-local, or task-local tenant anywhere in the crate. With many
//! requests in flight concurrently, ambient tenant state is exactly how one
//! request's tenant leaks into another's queries, so the API shape makes
//! that mistake inexpressible.
//!
//! Resolution fails closed: no claim means no scope, and a conflicting
//! client-supplied tenant is an authorization failure rather than a silent
//! override. The only exception is the cross-tenant admin capability, which
//! is an explicit, audited opt-in.
//!
//! # Examples
//!
//! ```
//! use dalali_store::tenant::{Capabilities, Principal, resolve_scope};
//!
//! // An ordinary broker belongs to exactly one tenant.
//! let principal = Principal::member_of("broker-7", "et-addis");
//! let scope = resolve_scope(&principal, None).unwrap();
//! assert_eq!(scope.tenant_id().as_str(), "et-addis");
//!
//! // A super-admin may target another tenant, and the override is audited.
//! let admin = Principal::new(
//!     "root-admin",
//!     Some("et-addis".into()),
//!     Capabilities::cross_tenant_admin(),
//! );
//! let scope = resolve_scope(&admin, Some("ke-nairobi")).unwrap();
//! assert_eq!(scope.tenant_id().as_str(), "ke-nairobi");
//! ```

mod capabilities;
mod id;
mod principal;
mod resolver;
mod scope;

pub use capabilities::{Capabilities, Operation};
pub use id::{MAX_TENANT_ID_LENGTH, TenantId};
pub use principal::Principal;
pub use resolver::resolve_scope;
pub use scope::TenantScope;
