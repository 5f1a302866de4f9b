//! Header names for the authentication gateway contract.
//!
//! The API runs behind an authentication gateway that validates tokens and
//! forwards the principal's claims as `X-Auth-*` headers. The gateway strips
//! any inbound values for these headers before forwarding, so their presence
//! means the claims were verified upstream. `X-Tenant-Id` is different: it
//! is client-supplied and therefore untrusted until checked against the
//! principal's claim.

use axum::http::HeaderMap;
use axum::http::header::HeaderName;

/// Header carrying the authenticated subject (user or service account id).
pub static X_AUTH_SUBJECT: HeaderName = HeaderName::from_static("x-auth-subject");

/// Header carrying the principal's tenant claim.
pub static X_AUTH_TENANT: HeaderName = HeaderName::from_static("x-auth-tenant");

/// Header carrying the principal's capability grant.
pub static X_AUTH_CAPABILITIES: HeaderName = HeaderName::from_static("x-auth-capabilities");

/// Header by which a client names the tenant it wants to act on.
pub static X_TENANT_ID: HeaderName = HeaderName::from_static("x-tenant-id");

/// Header carrying the request id for log correlation.
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Reads a header as a UTF-8 string, treating malformed values as absent.
pub(crate) fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
