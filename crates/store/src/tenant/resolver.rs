//! Scope resolution: one trusted tenant per request.
//!
//! [`resolve_scope`] turns an authenticated principal's claims plus an
//! optional client-supplied tenant into a [`TenantScope`]. It is pure: no
//! I/O, no clock, no global state. The request boundary calls it exactly
//! once per request and attaches the result to request-local state.
//!
//! Resolution fails closed. A missing tenant claim rejects the request with
//! [`TenantError::Unresolved`] before any data access. A client-supplied
//! tenant that differs from the principal's claim rejects with
//! [`TenantError::Mismatch`] unless the principal holds the cross-tenant
//! admin capability, in which case the override is honored and audited.

use tracing::{info, warn};

use crate::error::TenantError;
use crate::tenant::{Principal, TenantId, TenantScope};

/// Resolves the tenant scope for one request.
///
/// # Arguments
///
/// * `principal` - claims validated by the upstream authentication layer
/// * `requested_tenant` - the raw client-supplied tenant, if any (for HTTP
///   callers this is the `X-Tenant-Id` header value)
///
/// # Errors
///
/// * [`TenantError::InvalidTenant`] - the requested tenant is syntactically
///   invalid
/// * [`TenantError::Unresolved`] - the principal has no tenant claim and no
///   admissible override
/// * [`TenantError::Mismatch`] - the requested tenant conflicts with the
///   principal's claim and the principal cannot cross tenants
///
/// # Examples
///
/// ```
/// use dalali_store::tenant::{Principal, resolve_scope};
///
/// let principal = Principal::member_of("broker-7", "et-addis");
///
/// let scope = resolve_scope(&principal, None).unwrap();
/// assert_eq!(scope.tenant_id().as_str(), "et-addis");
///
/// // A matching client-supplied tenant is fine; a conflicting one is not.
/// assert!(resolve_scope(&principal, Some("et-addis")).is_ok());
/// assert!(resolve_scope(&principal, Some("ke-nairobi")).is_err());
/// ```
pub fn resolve_scope(
    principal: &Principal,
    requested_tenant: Option<&str>,
) -> Result<TenantScope, TenantError> {
    let requested = match requested_tenant {
        Some(raw) => Some(TenantId::parse(raw)?),
        None => None,
    };

    let tenant_id = match (&principal.tenant_id, requested) {
        // No client-supplied tenant: the principal's own claim decides.
        (Some(claim), None) => claim.clone(),

        // Client-supplied tenant matching the claim: redundant but valid.
        (Some(claim), Some(req)) if req == *claim => claim.clone(),

        // Conflicting tenant: only a cross-tenant admin may proceed.
        (Some(claim), Some(req)) => {
            if principal.capabilities.can_cross_tenants() {
                audit_override(principal, claim.as_str(), &req);
                req
            } else {
                warn!(
                    subject = %principal.subject,
                    claimed = %claim,
                    requested = %req,
                    "tenant mismatch rejected; possible header tampering"
                );
                return Err(TenantError::Mismatch {
                    claimed: claim.to_string(),
                    requested: req.to_string(),
                });
            }
        }

        // No tenant claim: a cross-tenant admin may name an explicit target,
        // anyone else is rejected before data access.
        (None, Some(req)) => {
            if principal.capabilities.can_cross_tenants() {
                audit_override(principal, "<none>", &req);
                req
            } else {
                return Err(TenantError::Unresolved);
            }
        }
        (None, None) => return Err(TenantError::Unresolved),
    };

    Ok(TenantScope::new(tenant_id, principal.capabilities.clone())
        .with_principal(principal.subject.clone()))
}

fn audit_override(principal: &Principal, home: &str, target: &TenantId) {
    info!(
        target: "dalali::audit",
        actor = %principal.subject,
        home_tenant = home,
        target_tenant = %target,
        "cross-tenant scope resolved from explicit override"
    );
}
