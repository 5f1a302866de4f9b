//! Multitenancy tests for the scoped store.
//!
//! Tenant isolation, cross-tenant access prevention, and the audited
//! override path.

mod cross_tenant_tests;
mod isolation_tests;
