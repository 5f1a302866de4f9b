//! # dalali-rest - Tenant-Scoped REST API
//!
//! This crate provides the HTTP surface of the Dalali brokerage platform:
//! a JSON REST API over the tenant-scoped data access layer in
//! [`dalali_store`]. Every data route resolves the caller's tenant scope
//! exactly once, at the request boundary, and hands handlers a store that
//! cannot reach outside that tenant.
//!
//! ## Features
//!
//! - **Scoped CRUD**: Create, read, update, delete, list, and count on all
//!   registered collections, isolated per tenant
//! - **Fail-closed resolution**: no tenant claim means 401, a conflicting
//!   requested tenant means 403, and neither touches storage
//! - **Cross-tenant administration**: explicit, audited override endpoints
//!   for platform admins
//! - **Uniform 404s**: another tenant's record and a missing record are
//!   indistinguishable in every response
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dalali_rest::{create_app, ServerConfig};
//! use dalali_store::backends::sqlite::SqliteStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Create a storage backend
//!     let store = SqliteStore::in_memory()?;
//!     store.init_schema()?;
//!
//!     // Create the Axum application
//!     let app = create_app(store);
//!
//!     // Start the server
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Operation | HTTP Method | URL Pattern |
//! |-----------|-------------|-------------|
//! | list / count | GET | `/{collection}` |
//! | create | POST | `/{collection}` |
//! | fetch by id | GET | `/{collection}/{id}` |
//! | replace | PUT | `/{collection}/{id}` |
//! | delete | DELETE | `/{collection}/{id}` |
//! | list tenants | GET | `/admin/tenants` |
//! | register tenant | POST | `/admin/tenants` |
//! | fetch tenant | GET | `/admin/tenants/{tenant_id}` |
//! | list in tenant | GET | `/admin/tenants/{tenant_id}/{collection}` |
//! | create in tenant | POST | `/admin/tenants/{tenant_id}/{collection}` |
//! | health | GET | `/health` |
//!
//! ## HTTP Headers
//!
//! The API sits behind an authentication gateway that forwards verified
//! claims:
//!
//! - `X-Auth-Subject` - the authenticated user or service account (required)
//! - `X-Auth-Tenant` - the principal's tenant claim
//! - `X-Auth-Capabilities` - `full`, `read-only`, or `cross-tenant-admin`
//! - `X-Tenant-Id` - client-supplied tenant; must match the claim unless the
//!   principal is a cross-tenant admin
//! - `X-Request-Id` - request id for log correlation (generated when absent)
//!
//! ## Error Handling
//!
//! Errors are returned as `{"error": {"code", "message"}}` JSON bodies:
//!
//! | HTTP Status | Code | Description |
//! |-------------|------|-------------|
//! | 400 | invalid | Malformed request or filter value |
//! | 401 | unauthorized | No principal or no resolvable tenant |
//! | 403 | forbidden | Tenant mismatch or missing capability |
//! | 404 | not-found | No matching record under this tenant |
//! | 404 | unknown-collection | Collection not in the registry |
//! | 409 | conflict | Duplicate id or per-tenant unique key |
//! | 500 | internal | Server bug, including scope violations |
//! | 503 | unavailable | Storage backend unreachable |
//!
//! ## Configuration
//!
//! The server is configured via environment variables:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DALALI_SERVER_PORT` | 8080 | Server port |
//! | `DALALI_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `DALALI_LOG_LEVEL` | info | Log level (error, warn, info, debug, trace) |
//! | `DALALI_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `DALALI_ENABLE_CORS` | true | Enable CORS |
//! | `DALALI_DATABASE_URL` | (none) | SQLite path; in-memory if unset |
//! | `DALALI_DEFAULT_LIMIT` | 50 | Default list page size |
//! | `DALALI_MAX_LIMIT` | 500 | Maximum list page size |
//!
//! ## Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`auth`] - Gateway header contract and principal reconstruction
//! - [`config`] - Server configuration
//! - [`error`] - Error types and JSON error responses
//! - [`state`] - Application state (storage, configuration)
//! - [`middleware`] - Scope resolution middleware
//! - [`extractors`] - Axum extractors (scope, list parameters)
//! - [`handlers`] - HTTP request handlers
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use dalali_store::RecordStore;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with default configuration.
///
/// This is a convenience function that creates the app with default settings.
/// For more control, use [`create_app_with_config`].
///
/// # Arguments
///
/// * `storage` - The storage backend to use
///
/// # Example
///
/// ```rust,ignore
/// use dalali_rest::create_app;
/// use dalali_store::backends::sqlite::SqliteStore;
///
/// let store = SqliteStore::in_memory()?;
/// store.init_schema()?;
/// let app = create_app(store);
/// ```
pub fn create_app<S>(storage: S) -> Router
where
    S: RecordStore + Send + Sync + 'static,
{
    create_app_with_config(storage, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// Sets up the complete REST API: routes, scope middleware, tracing,
/// timeouts, request ids, and CORS.
///
/// # Arguments
///
/// * `storage` - The storage backend to use
/// * `config` - Server configuration
///
/// # Example
///
/// ```rust,ignore
/// use dalali_rest::{create_app_with_config, ServerConfig};
/// use dalali_store::backends::sqlite::SqliteStore;
///
/// let store = SqliteStore::in_memory()?;
/// let config = ServerConfig {
///     port: 3000,
///     enable_cors: true,
///     ..Default::default()
/// };
/// let app = create_app_with_config(store, config);
/// ```
pub fn create_app_with_config<S>(storage: S, config: ServerConfig) -> Router
where
    S: RecordStore + Send + Sync + 'static,
{
    info!(
        "Creating REST API server with backend: {}",
        storage.backend_name()
    );

    // Create application state
    let state = AppState::new(Arc::new(storage), config.clone());

    // Build the router with all API routes
    let router = routing::create_routes(state);

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    // Add CORS if enabled
    let router = if config.enable_cors {
        let cors = build_cors_layer(&config);
        router.layer(cors)
    } else {
        router
    };

    let router = router.layer(service_builder);

    // Attach request ids last, so they exist before anything else runs
    if config.enable_request_id {
        router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    } else {
        router
    }
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    // Configure origins
    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    // Configure methods
    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    // Configure headers
    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "dalali_rest={level},dalali_store={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
