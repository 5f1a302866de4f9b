//! API route configuration.
//!
//! Defines all routes for the Dalali REST API. Record and admin routes run
//! behind the scope middleware, so every handler in them starts from a
//! resolved tenant scope. Health probes stay outside it: they carry no
//! principal and must keep answering when the gateway is down.

use axum::{
    Router,
    middleware::from_fn,
    routing::{delete, get, post, put},
};
use dalali_store::RecordStore;

use crate::handlers;
use crate::middleware::scope_middleware;
use crate::state::AppState;

/// Creates all REST API routes.
///
/// # Routes
///
/// ## Probes (no scope)
/// - `GET /health` - Health check
/// - `GET /_liveness` - Liveness probe
/// - `GET /_readiness` - Readiness probe
///
/// ## Records (scoped)
/// - `GET /{collection}` - List / count
/// - `POST /{collection}` - Create
/// - `GET /{collection}/{id}` - Fetch by id
/// - `PUT /{collection}/{id}` - Replace content
/// - `DELETE /{collection}/{id}` - Delete
///
/// ## Administration (scoped, cross-tenant admins only)
/// - `GET /admin/tenants` - List tenants
/// - `POST /admin/tenants` - Register tenant
/// - `GET /admin/tenants/{tenant_id}` - Fetch tenant
/// - `GET /admin/tenants/{tenant_id}/{collection}` - List inside a tenant
/// - `POST /admin/tenants/{tenant_id}/{collection}` - Create inside a tenant
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: RecordStore + Send + Sync + 'static,
{
    let scoped = Router::new()
        // Record routes
        .route("/{collection}", get(handlers::list_records_handler::<S>))
        .route("/{collection}", post(handlers::create_record_handler::<S>))
        .route("/{collection}/{id}", get(handlers::get_record_handler::<S>))
        .route(
            "/{collection}/{id}",
            put(handlers::update_record_handler::<S>),
        )
        .route(
            "/{collection}/{id}",
            delete(handlers::delete_record_handler::<S>),
        )
        // Administration routes
        .route("/admin/tenants", get(handlers::list_tenants_handler::<S>))
        .route("/admin/tenants", post(handlers::create_tenant_handler::<S>))
        .route(
            "/admin/tenants/{tenant_id}",
            get(handlers::get_tenant_handler::<S>),
        )
        .route(
            "/admin/tenants/{tenant_id}/{collection}",
            get(handlers::list_tenant_records_handler::<S>),
        )
        .route(
            "/admin/tenants/{tenant_id}/{collection}",
            post(handlers::create_tenant_record_handler::<S>),
        )
        .layer(from_fn(scope_middleware));

    Router::new()
        // Probe routes
        .route("/health", get(handlers::health_handler::<S>))
        .route("/_liveness", get(handlers::health::liveness_handler))
        .route("/_readiness", get(handlers::health::readiness_handler::<S>))
        .merge(scoped)
        // State
        .with_state(state)
}
