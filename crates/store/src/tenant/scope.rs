//! The per-request tenant scope.

use tracing::info;

use crate::error::TenantError;
use crate::tenant::{Capabilities, Operation, TenantId};

/// The resolved tenant scope for one request.
///
/// A `TenantScope` is created once at the request boundary (see
/// [`resolve_scope`](crate::tenant::resolve_scope)), carried by value through
/// the call chain, and dropped when the request ends. It is immutable after
/// construction: every accessor borrows, and the only way to obtain a scope
/// for a different tenant is [`TenantScope::for_tenant`], which produces a
/// new value and leaves the original untouched.
///
/// Scopes are never stored in globals or task-locals. The process handles
/// many requests concurrently and each one owns its scope, so one request's
/// tenant can never bleed into another's queries.
///
/// # Examples
///
/// ```
/// use dalali_store::tenant::{Capabilities, TenantScope};
///
/// let scope = TenantScope::new("et-addis", Capabilities::full())
///     .with_principal("broker-7")
///     .with_request_id("req-123");
///
/// assert_eq!(scope.tenant_id().as_str(), "et-addis");
/// assert_eq!(scope.principal(), Some("broker-7"));
/// ```
#[derive(Debug, Clone)]
pub struct TenantScope {
    tenant_id: TenantId,
    capabilities: Capabilities,
    principal: Option<String>,
    request_id: Option<String>,
}

impl TenantScope {
    /// Creates a scope bound to one tenant.
    pub fn new(tenant_id: impl Into<TenantId>, capabilities: Capabilities) -> Self {
        TenantScope {
            tenant_id: tenant_id.into(),
            capabilities,
            principal: None,
            request_id: None,
        }
    }

    /// Attaches the acting principal's subject, for audit events.
    pub fn with_principal(mut self, subject: impl Into<String>) -> Self {
        self.principal = Some(subject.into());
        self
    }

    /// Attaches a request id, for log correlation.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// The tenant this scope is bound to.
    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// The scope's capabilities.
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Subject of the acting principal, when known.
    pub fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }

    /// Request id for log correlation, when known.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Returns true when this scope may act on tenants other than its own.
    pub fn can_cross_tenants(&self) -> bool {
        self.capabilities.can_cross_tenants()
    }

    /// Checks that the scope's capabilities allow the operation.
    ///
    /// # Errors
    ///
    /// Returns [`TenantError::OperationNotPermitted`] when the capability set
    /// excludes the operation.
    pub fn check_operation(&self, operation: Operation) -> Result<(), TenantError> {
        if self.capabilities.allows(operation) {
            Ok(())
        } else {
            Err(TenantError::OperationNotPermitted {
                operation: operation.to_string(),
            })
        }
    }

    /// Produces a scope bound to `target`, gated on the cross-tenant
    /// capability.
    ///
    /// The returned scope inherits this scope's capabilities, principal, and
    /// request id. The original scope is not modified; callers that hold it
    /// keep acting on their own tenant. Every successful rebind emits an
    /// audit event naming the actor, home tenant, and target tenant.
    ///
    /// # Errors
    ///
    /// Returns [`TenantError::CrossTenantDenied`] when the scope lacks the
    /// cross-tenant capability.
    pub fn for_tenant(&self, target: &TenantId) -> Result<TenantScope, TenantError> {
        if !self.can_cross_tenants() {
            return Err(TenantError::CrossTenantDenied {
                requested: target.to_string(),
            });
        }

        info!(
            target: "dalali::audit",
            actor = self.principal.as_deref().unwrap_or("<unknown>"),
            home_tenant = %self.tenant_id,
            target_tenant = %target,
            request_id = self.request_id.as_deref().unwrap_or("-"),
            "cross-tenant scope override"
        );

        Ok(TenantScope {
            tenant_id: target.clone(),
            capabilities: self.capabilities.clone(),
            principal: self.principal.clone(),
            request_id: self.request_id.clone(),
        })
    }
}
