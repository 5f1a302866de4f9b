//! HTTP request handlers for the Dalali REST API.
//!
//! - [`records`] - CRUD on tenant-owned collections
//! - [`tenants`] - Tenant registry and cross-tenant administration
//! - [`health`] - Health and probe endpoints

pub mod health;
pub mod records;
pub mod tenants;

// Re-export handlers for convenience
pub use health::health_handler;
pub use records::{
    create_record_handler, delete_record_handler, get_record_handler, list_records_handler,
    update_record_handler,
};
pub use tenants::{
    create_tenant_handler, create_tenant_record_handler, get_tenant_handler,
    list_tenant_records_handler, list_tenants_handler,
};
