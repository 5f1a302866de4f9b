//! Capabilities attached to a request scope.
//!
//! Capabilities answer two questions for every data-access call:
//!
//! 1. May this scope perform this operation at all (read-only inspector
//!    accounts cannot delete)?
//! 2. May this scope act on a tenant other than its own (cross-tenant
//!    administration)?
//!
//! Cross-tenant administration is an explicit opt-in. No constructor other
//! than [`Capabilities::cross_tenant_admin`] grants it, and the scoped store
//! audits every use.

use std::collections::HashSet;
use std::fmt;

/// A data-access operation class, used for capability checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Reading records: `find`, `find_one`, `get`, `count`.
    Read,
    /// Creating records.
    Create,
    /// Updating records.
    Update,
    /// Deleting records.
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Read => "read",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        write!(f, "{}", name)
    }
}

/// What a request scope is allowed to do.
///
/// # Examples
///
/// ```
/// use dalali_store::tenant::{Capabilities, Operation};
///
/// let full = Capabilities::full();
/// assert!(full.allows(Operation::Delete));
/// assert!(!full.can_cross_tenants());
///
/// let inspector = Capabilities::read_only();
/// assert!(inspector.allows(Operation::Read));
/// assert!(!inspector.allows(Operation::Create));
///
/// let admin = Capabilities::cross_tenant_admin();
/// assert!(admin.can_cross_tenants());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    /// Operations this scope may perform. `None` means all operations.
    allowed_operations: Option<HashSet<Operation>>,

    /// Whether this scope may rebind itself to another tenant.
    cross_tenant_admin: bool,
}

impl Capabilities {
    /// Full access within the scope's own tenant.
    pub fn full() -> Self {
        Capabilities {
            allowed_operations: None,
            cross_tenant_admin: false,
        }
    }

    /// Read-only access within the scope's own tenant.
    pub fn read_only() -> Self {
        let mut ops = HashSet::new();
        ops.insert(Operation::Read);
        Capabilities {
            allowed_operations: Some(ops),
            cross_tenant_admin: false,
        }
    }

    /// Full access plus the cross-tenant administration capability.
    pub fn cross_tenant_admin() -> Self {
        Capabilities {
            allowed_operations: None,
            cross_tenant_admin: true,
        }
    }

    /// Access restricted to the given operations, within the scope's own
    /// tenant.
    pub fn restricted(operations: impl IntoIterator<Item = Operation>) -> Self {
        Capabilities {
            allowed_operations: Some(operations.into_iter().collect()),
            cross_tenant_admin: false,
        }
    }

    /// Returns true when this scope may perform the operation.
    pub fn allows(&self, operation: Operation) -> bool {
        match &self.allowed_operations {
            None => true,
            Some(ops) => ops.contains(&operation),
        }
    }

    /// Returns true when this scope may act on tenants other than its own.
    pub fn can_cross_tenants(&self) -> bool {
        self.cross_tenant_admin
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities::full()
    }
}
