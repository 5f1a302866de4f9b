//! Authentication gateway contract.
//!
//! Token validation happens upstream; this module only reconstructs the
//! [`Principal`](dalali_store::tenant::Principal) the gateway already
//! verified, from the `X-Auth-*` headers it forwards.

pub mod headers;
pub mod principal;

pub use headers::{X_AUTH_CAPABILITIES, X_AUTH_SUBJECT, X_AUTH_TENANT, X_REQUEST_ID, X_TENANT_ID};
pub use principal::{parse_capabilities, principal_from_headers};
