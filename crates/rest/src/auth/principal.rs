//! Principal reconstruction from gateway headers.

use axum::http::HeaderMap;
use dalali_store::tenant::{Capabilities, Principal, TenantId};

use crate::auth::headers::{X_AUTH_CAPABILITIES, X_AUTH_SUBJECT, X_AUTH_TENANT, header_str};
use crate::error::RestError;

/// Parses a capability grant token into a capability set.
///
/// Grants are single tokens, not an additive grammar. In particular there is
/// no combination that yields a read-only cross-tenant set; the store's
/// capability constructors are the whole menu.
pub fn parse_capabilities(token: &str) -> Result<Capabilities, RestError> {
    match token {
        "full" => Ok(Capabilities::full()),
        "read-only" => Ok(Capabilities::read_only()),
        "cross-tenant-admin" => Ok(Capabilities::cross_tenant_admin()),
        other => Err(RestError::BadRequest {
            message: format!("unknown capability grant '{}'", other),
        }),
    }
}

/// Reconstructs the authenticated principal from gateway headers.
///
/// The subject header is mandatory: a request without it never passed the
/// gateway and is rejected with 401. The tenant claim is optional here
/// because scope resolution decides what a missing claim means. A missing
/// capability grant means an ordinary member, not an admin.
///
/// # Errors
///
/// * [`RestError::Unauthorized`] - no subject header
/// * [`RestError::BadRequest`] - unknown capability grant
pub fn principal_from_headers(headers: &HeaderMap) -> Result<Principal, RestError> {
    let subject =
        header_str(headers, &X_AUTH_SUBJECT).ok_or_else(|| RestError::Unauthorized {
            message: "no authenticated principal".to_string(),
        })?;

    let tenant_id = header_str(headers, &X_AUTH_TENANT).map(TenantId::new);

    let capabilities = match header_str(headers, &X_AUTH_CAPABILITIES) {
        Some(token) => parse_capabilities(token)?,
        None => Capabilities::full(),
    };

    Ok(Principal::new(subject, tenant_id, capabilities))
}
