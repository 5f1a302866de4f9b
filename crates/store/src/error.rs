//! Error types for the tenant-scoped data access layer.
//!
//! All fallible operations return [`StoreResult`], whose error side is the
//! [`StoreError`] enum. `StoreError` is a transparent wrapper over four
//! domain-specific error families:
//!
//! - [`TenantError`] - scope resolution and isolation failures
//! - [`RecordError`] - record-level outcomes (not found, duplicates)
//! - [`ValidationError`] - malformed payloads and filters
//! - [`BackendError`] - connection pool and database failures
//!
//! Tenant errors are the load-bearing family: a [`TenantError::Mismatch`] or
//! [`TenantError::ScopeViolation`] is never a user error. The first signals
//! possible tampering, the second a bug in calling code; both fail the
//! request closed and are logged at elevated severity by the layers that
//! produce them. [`RecordError::NotFound`] is intentionally identical whether
//! the row is truly absent or owned by another tenant, so the error surface
//! never leaks cross-tenant existence.
//!
//! None of these errors represent transient conditions; nothing in this
//! crate retries automatically.

use thiserror::Error;

/// Result alias used throughout the store.
pub type StoreResult<T> = Result<T, StoreError>;

/// Top-level error for all store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Tenant resolution or isolation failure.
    #[error(transparent)]
    Tenant(#[from] TenantError),

    /// Record-level error.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Payload or filter validation error.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Backend infrastructure error.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors establishing or enforcing the tenant scope.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TenantError {
    /// The authenticated principal carries no tenant claim. The request is
    /// rejected before any data access.
    #[error("no tenant claim present on the authenticated principal")]
    Unresolved,

    /// A client-supplied tenant conflicts with the principal's own tenant
    /// claim and the principal holds no cross-tenant capability.
    #[error("requested tenant '{requested}' does not match principal tenant '{claimed}'")]
    Mismatch {
        /// Tenant from the principal's claims.
        claimed: String,
        /// Tenant the client asked to act on.
        requested: String,
    },

    /// An explicit cross-tenant override was attempted without the
    /// cross-tenant admin capability.
    #[error("cross-tenant access to '{requested}' requires the cross-tenant admin capability")]
    CrossTenantDenied {
        /// Tenant the caller asked to act on.
        requested: String,
    },

    /// A data-access call attempted to bypass scoping, e.g. a filter already
    /// pinned to a different tenant. Always a programming error or a
    /// security incident, never recoverable in place.
    #[error("tenant scope violation on '{collection}': {detail}")]
    ScopeViolation {
        /// Collection the offending call targeted.
        collection: String,
        /// What the caller supplied.
        detail: String,
    },

    /// A tenant identifier failed syntactic validation.
    #[error("invalid tenant id '{tenant_id}': {reason}")]
    InvalidTenant {
        /// The rejected identifier.
        tenant_id: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The scope's capabilities do not allow this operation.
    #[error("operation '{operation}' is not permitted for this scope")]
    OperationNotPermitted {
        /// Name of the denied operation.
        operation: String,
    },
}

/// Record-level errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// No record matches under the resolved tenant scope. Deliberately the
    /// same error whether the record is absent or belongs to another tenant.
    #[error("no matching record in '{collection}'")]
    NotFound {
        /// Collection that was queried.
        collection: String,
    },

    /// A record with this id already exists.
    #[error("record '{id}' already exists in '{collection}'")]
    AlreadyExists {
        /// Collection that was targeted.
        collection: String,
        /// The conflicting id.
        id: String,
    },

    /// A scoped update/delete filter matched more than one record.
    #[error("filter matched {count} records in '{collection}', expected exactly one")]
    MultipleMatches {
        /// Collection that was queried.
        collection: String,
        /// How many records matched.
        count: usize,
    },

    /// A per-tenant unique key is already taken within this tenant.
    #[error("duplicate value '{value}' for unique field '{field}' in '{collection}'")]
    DuplicateKey {
        /// Collection that was targeted.
        collection: String,
        /// The unique field.
        field: String,
        /// The value already present for this tenant.
        value: String,
    },

    /// The collection name does not appear in the registry.
    #[error("unknown collection '{name}'")]
    UnknownCollection {
        /// The unrecognized name.
        name: String,
    },
}

/// Payload and filter validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing from the payload.
    #[error("missing required field: {field}")]
    MissingRequiredField {
        /// Name of the missing field.
        field: String,
    },

    /// A field is present but carries an unusable value.
    #[error("invalid value for field '{field}': {reason}")]
    InvalidFieldValue {
        /// Name of the offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The payload is not a JSON object.
    #[error("payload must be a JSON object")]
    NotAnObject,
}

/// Backend infrastructure errors.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend cannot serve requests.
    #[error("backend unavailable: {reason}")]
    Unavailable {
        /// Why the backend is unavailable.
        reason: String,
    },

    /// The connection pool has no connections to hand out.
    #[error("connection pool exhausted: {message}")]
    PoolExhausted {
        /// Pool error detail.
        message: String,
    },

    /// A query failed to execute.
    #[error("query failed: {message}")]
    QueryFailed {
        /// Database error detail.
        message: String,
    },

    /// Record content could not be serialized or deserialized.
    #[error("serialization failed: {message}")]
    Serialization {
        /// Serializer error detail.
        message: String,
    },

    /// An unexpected internal failure.
    #[error("internal backend error: {message}")]
    Internal {
        /// Failure detail.
        message: String,
    },
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Backend(BackendError::Serialization {
            message: err.to_string(),
        })
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Backend(BackendError::QueryFailed {
            message: err.to_string(),
        })
    }
}

#[cfg(feature = "sqlite")]
impl From<r2d2::Error> for StoreError {
    fn from(err: r2d2::Error) -> Self {
        StoreError::Backend(BackendError::PoolExhausted {
            message: err.to_string(),
        })
    }
}
