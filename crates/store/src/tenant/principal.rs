//! The authenticated principal behind a request.

use crate::tenant::{Capabilities, TenantId};

/// Claims of an authenticated principal, as validated by the upstream
/// authentication layer.
///
/// The store never validates tokens itself; it receives a `Principal` whose
/// claims are already trusted and derives the request scope from them. The
/// tenant claim is optional because token issuance is outside this crate,
/// but a principal without one cannot resolve a scope (see
/// [`resolve_scope`](crate::tenant::resolve_scope)) unless it holds the
/// cross-tenant capability and names an explicit target.
#[derive(Debug, Clone)]
pub struct Principal {
    /// Stable identifier of the user or service account.
    pub subject: String,

    /// The tenant this principal belongs to, when the claims carry one.
    pub tenant_id: Option<TenantId>,

    /// What this principal is allowed to do.
    pub capabilities: Capabilities,
}

impl Principal {
    /// Creates a principal from validated claims.
    pub fn new(
        subject: impl Into<String>,
        tenant_id: Option<TenantId>,
        capabilities: Capabilities,
    ) -> Self {
        Principal {
            subject: subject.into(),
            tenant_id,
            capabilities,
        }
    }

    /// Convenience constructor for an ordinary member of one tenant.
    pub fn member_of(subject: impl Into<String>, tenant_id: impl Into<TenantId>) -> Self {
        Principal {
            subject: subject.into(),
            tenant_id: Some(tenant_id.into()),
            capabilities: Capabilities::full(),
        }
    }
}
