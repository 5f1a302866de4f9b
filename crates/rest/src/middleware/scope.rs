//! Scope resolution middleware.
//!
//! Resolves the tenant scope exactly once per request, before any handler or
//! data access runs, and attaches it as a request extension. Requests that
//! cannot be resolved are rejected here; handlers never see them.

use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use dalali_store::tenant::{TenantScope, resolve_scope};
use tracing::debug;
use uuid::Uuid;

use crate::auth::headers::{X_REQUEST_ID, X_TENANT_ID, header_str};
use crate::auth::principal_from_headers;
use crate::error::RestResult;

/// Resolves the tenant scope from request headers.
///
/// Combines the gateway-verified principal with the client-supplied
/// `X-Tenant-Id` header, if any. Fails closed: a missing claim is 401, a
/// conflicting requested tenant is 403, and neither reaches any data access.
pub fn resolve_request_scope(headers: &HeaderMap) -> RestResult<TenantScope> {
    let principal = principal_from_headers(headers)?;
    let requested = header_str(headers, &X_TENANT_ID);
    let scope = resolve_scope(&principal, requested)?;
    Ok(scope)
}

/// Middleware that attaches the resolved [`TenantScope`] to the request.
///
/// Use with `axum::middleware::from_fn`. The scope travels as a request
/// extension, so it is request-local by construction; nothing here writes
/// to shared state.
pub async fn scope_middleware(mut request: Request, next: Next) -> Response {
    let scope = match resolve_request_scope(request.headers()) {
        Ok(scope) => scope,
        Err(err) => return err.into_response(),
    };

    let request_id = header_str(request.headers(), &X_REQUEST_ID)
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let scope = scope.with_request_id(request_id);

    debug!(
        tenant_id = %scope.tenant_id(),
        principal = scope.principal().unwrap_or("-"),
        request_id = scope.request_id().unwrap_or("-"),
        "resolved tenant scope"
    );

    request.extensions_mut().insert(scope);
    next.run(request).await
}
