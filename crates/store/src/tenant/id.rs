//! Tenant identifier type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TenantError;

/// Maximum accepted length of a tenant identifier, in bytes.
pub const MAX_TENANT_ID_LENGTH: usize = 64;

/// Opaque identifier for a tenant.
///
/// A `TenantId` is a validated string: non-empty, at most
/// [`MAX_TENANT_ID_LENGTH`] bytes, and restricted to ASCII alphanumerics,
/// hyphens, and underscores (e.g. `et-addis`, `ke-nairobi`). Identifiers
/// arriving from untrusted input (headers, URL segments) must go through
/// [`TenantId::parse`]; [`TenantId::new`] is for values already known to be
/// well-formed, such as rows read back from the store.
///
/// # Examples
///
/// ```
/// use dalali_store::tenant::TenantId;
///
/// let id = TenantId::parse("et-addis").unwrap();
/// assert_eq!(id.as_str(), "et-addis");
///
/// assert!(TenantId::parse("").is_err());
/// assert!(TenantId::parse("no spaces allowed").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Creates a tenant id from a trusted source without validation.
    pub fn new(id: impl Into<String>) -> Self {
        TenantId(id.into())
    }

    /// Validates and creates a tenant id from untrusted input.
    ///
    /// # Errors
    ///
    /// Returns [`TenantError::InvalidTenant`] when the input is empty,
    /// longer than [`MAX_TENANT_ID_LENGTH`] bytes, or contains characters
    /// outside `[A-Za-z0-9_-]`.
    pub fn parse(input: &str) -> Result<Self, TenantError> {
        if input.is_empty() {
            return Err(TenantError::InvalidTenant {
                tenant_id: input.to_string(),
                reason: "identifier is empty".to_string(),
            });
        }
        if input.len() > MAX_TENANT_ID_LENGTH {
            return Err(TenantError::InvalidTenant {
                tenant_id: input.to_string(),
                reason: format!("identifier exceeds {} bytes", MAX_TENANT_ID_LENGTH),
            });
        }
        if !input
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(TenantError::InvalidTenant {
                tenant_id: input.to_string(),
                reason: "identifier may only contain ASCII alphanumerics, '-' and '_'"
                    .to_string(),
            });
        }
        Ok(TenantId(input.to_string()))
    }

    /// Returns true when the input would pass [`TenantId::parse`].
    pub fn is_valid(input: &str) -> bool {
        Self::parse(input).is_ok()
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the id, returning the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TenantId({})", self.0)
    }
}

impl FromStr for TenantId {
    type Err = TenantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TenantId::parse(s)
    }
}

impl From<&str> for TenantId {
    fn from(s: &str) -> Self {
        TenantId::new(s)
    }
}

impl From<String> for TenantId {
    fn from(s: String) -> Self {
        TenantId::new(s)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
