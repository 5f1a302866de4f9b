//! Tenant scope extractor.
//!
//! Pulls the [`TenantScope`] the scope middleware attached to the request.

use axum::{extract::FromRequestParts, http::request::Parts};
use dalali_store::tenant::TenantScope;

use crate::error::RestError;

/// Axum extractor for the resolved tenant scope.
///
/// A missing scope means the route was wired without the scope middleware.
/// That is a server bug, not a client error, so the rejection is a 500
/// rather than any attempt to resolve a scope here; resolution happens in
/// exactly one place.
///
/// # Example
///
/// ```rust,ignore
/// use dalali_rest::extractors::Scope;
///
/// async fn handler(Scope(scope): Scope) {
///     println!("Tenant: {}", scope.tenant_id());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Scope(pub TenantScope);

impl Scope {
    /// Returns a reference to the scope.
    pub fn scope(&self) -> &TenantScope {
        &self.0
    }

    /// Consumes the extractor and returns the scope.
    pub fn into_inner(self) -> TenantScope {
        self.0
    }
}

impl<S> FromRequestParts<S> for Scope
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantScope>()
            .cloned()
            .map(Scope)
            .ok_or_else(|| RestError::Internal {
                message: "request reached a handler without a resolved tenant scope".to_string(),
            })
    }
}
