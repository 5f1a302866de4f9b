//! HTTP middleware for the Dalali REST API.
//!
//! This module contains Axum middleware components:
//!
//! - [`scope`] - Per-request tenant scope resolution

pub mod scope;

pub use scope::{resolve_request_scope, scope_middleware};
