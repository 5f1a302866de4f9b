//! Error types for the Dalali REST API.
//!
//! Defines the REST-level error type and its conversions from store errors,
//! with automatic rendering as JSON error responses.
//!
//! # Error Mapping
//!
//! Store errors from the data access layer are mapped to HTTP status codes:
//!
//! | Store Error | HTTP Status | Code |
//! |-------------|-------------|------|
//! | TenantError::Unresolved | 401 | unauthorized |
//! | TenantError::Mismatch | 403 | forbidden |
//! | TenantError::CrossTenantDenied | 403 | forbidden |
//! | TenantError::OperationNotPermitted | 403 | forbidden |
//! | TenantError::InvalidTenant | 400 | invalid |
//! | TenantError::ScopeViolation | 500 | internal |
//! | RecordError::NotFound | 404 | not-found |
//! | RecordError::UnknownCollection | 404 | unknown-collection |
//! | RecordError::AlreadyExists | 409 | conflict |
//! | RecordError::DuplicateKey | 409 | conflict |
//! | RecordError::MultipleMatches | 409 | conflict |
//! | ValidationError | 400 | invalid |
//! | BackendError::Unavailable | 503 | unavailable |
//! | BackendError::PoolExhausted | 503 | unavailable |
//! | other BackendError | 500 | internal |
//!
//! The 404 for a record owned by another tenant is the same 404 as for a
//! record that does not exist; the response body never distinguishes them.
//! A [`TenantError::ScopeViolation`] is a server-side bug or an attack, so
//! its detail is logged where it is raised and *not* echoed to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dalali_store::error::{
    BackendError, RecordError, StoreError, TenantError, ValidationError,
};
use std::fmt;

/// The primary error type for REST API operations.
///
/// Provides semantic error variants that map cleanly to HTTP status codes
/// and stable machine-readable error codes.
#[derive(Debug)]
pub enum RestError {
    /// No authenticated principal or no tenant claim (HTTP 401).
    Unauthorized {
        /// Error message.
        message: String,
    },

    /// The principal may not act on the requested tenant or operation (HTTP 403).
    Forbidden {
        /// Error message.
        message: String,
    },

    /// No matching record under the resolved scope (HTTP 404).
    ///
    /// Deliberately carries only the collection name; whether the record is
    /// absent or owned by another tenant is not observable.
    NotFound {
        /// The collection that was queried.
        collection: String,
    },

    /// The collection name is not in the registry (HTTP 404).
    UnknownCollection {
        /// The unrecognized collection name.
        name: String,
    },

    /// Conflicting state: duplicate id, duplicate unique key, or an
    /// ambiguous match (HTTP 409).
    Conflict {
        /// Error message.
        message: String,
    },

    /// Malformed request (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Internal server error (HTTP 500).
    Internal {
        /// Error message.
        message: String,
    },

    /// The storage backend cannot serve requests (HTTP 503).
    Unavailable {
        /// Error message.
        message: String,
    },
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::Unauthorized { message } => {
                write!(f, "Unauthorized: {}", message)
            }
            RestError::Forbidden { message } => {
                write!(f, "Forbidden: {}", message)
            }
            RestError::NotFound { collection } => {
                write!(f, "No matching record in '{}'", collection)
            }
            RestError::UnknownCollection { name } => {
                write!(f, "Unknown collection '{}'", name)
            }
            RestError::Conflict { message } => {
                write!(f, "Conflict: {}", message)
            }
            RestError::BadRequest { message } => {
                write!(f, "Bad request: {}", message)
            }
            RestError::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
            RestError::Unavailable { message } => {
                write!(f, "Service unavailable: {}", message)
            }
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            RestError::Unauthorized { message } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", message.clone())
            }
            RestError::Forbidden { message } => {
                (StatusCode::FORBIDDEN, "forbidden", message.clone())
            }
            RestError::NotFound { collection } => (
                StatusCode::NOT_FOUND,
                "not-found",
                format!("No matching record in '{}'", collection),
            ),
            RestError::UnknownCollection { name } => (
                StatusCode::NOT_FOUND,
                "unknown-collection",
                format!("Unknown collection '{}'", name),
            ),
            RestError::Conflict { message } => {
                (StatusCode::CONFLICT, "conflict", message.clone())
            }
            RestError::BadRequest { message } => {
                (StatusCode::BAD_REQUEST, "invalid", message.clone())
            }
            RestError::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                message.clone(),
            ),
            RestError::Unavailable { message } => {
                (StatusCode::SERVICE_UNAVAILABLE, "unavailable", message.clone())
            }
        };

        let body = create_error_body(code, &message);
        (status, Json(body)).into_response()
    }
}

/// Creates the JSON error body returned to clients.
///
/// # Arguments
///
/// * `code` - Stable machine-readable error code
/// * `message` - Human-readable detail
fn create_error_body(code: &str, message: &str) -> serde_json::Value {
    serde_json::json!({
        "error": {
            "code": code,
            "message": message
        }
    })
}

// Implement conversions from store errors

impl From<StoreError> for RestError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Tenant(e) => e.into(),
            StoreError::Record(e) => e.into(),
            StoreError::Validation(e) => e.into(),
            StoreError::Backend(e) => e.into(),
        }
    }
}

impl From<TenantError> for RestError {
    fn from(err: TenantError) -> Self {
        match err {
            TenantError::Unresolved => RestError::Unauthorized {
                message: err.to_string(),
            },
            TenantError::Mismatch { .. }
            | TenantError::CrossTenantDenied { .. }
            | TenantError::OperationNotPermitted { .. } => RestError::Forbidden {
                message: err.to_string(),
            },
            TenantError::InvalidTenant { .. } => RestError::BadRequest {
                message: err.to_string(),
            },
            // The detail names the offending filter; it is logged where the
            // violation is raised and withheld from the response.
            TenantError::ScopeViolation { .. } => RestError::Internal {
                message: "tenant isolation check failed".to_string(),
            },
        }
    }
}

impl From<RecordError> for RestError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::NotFound { collection } => RestError::NotFound { collection },
            RecordError::UnknownCollection { name } => RestError::UnknownCollection { name },
            RecordError::AlreadyExists { .. }
            | RecordError::DuplicateKey { .. }
            | RecordError::MultipleMatches { .. } => RestError::Conflict {
                message: err.to_string(),
            },
        }
    }
}

impl From<ValidationError> for RestError {
    fn from(err: ValidationError) -> Self {
        RestError::BadRequest {
            message: err.to_string(),
        }
    }
}

impl From<BackendError> for RestError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unavailable { .. } | BackendError::PoolExhausted { .. } => {
                RestError::Unavailable {
                    message: err.to_string(),
                }
            }
            _ => RestError::Internal {
                message: err.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for RestError {
    fn from(err: serde_json::Error) -> Self {
        RestError::BadRequest {
            message: format!("Invalid JSON: {}", err),
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;
