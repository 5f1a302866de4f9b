//! Axum extractors for the Dalali REST API.
//!
//! - [`Scope`] - the tenant scope resolved by the scope middleware
//! - [`ListParams`] - query-parameter filters and result controls

mod list_params;
mod scope;

pub use list_params::ListParams;
pub use scope::Scope;
