//! Tenant administration handlers.
//!
//! The `/admin/tenants` surface manages the tenant registry and gives
//! cross-tenant admins an explicit, audited way to act inside another
//! tenant. Every handler here requires the cross-tenant admin capability;
//! ordinary members get a 403 before anything else happens.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dalali_store::core::{RecordStore, ScopedStore, TenantRecord};
use dalali_store::tenant::{TenantId, TenantScope};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::error::{RestError, RestResult};
use crate::extractors::{ListParams, Scope};
use crate::handlers::records::lookup_collection;
use crate::state::AppState;

/// Request body for registering a tenant.
#[derive(Debug, Deserialize)]
pub struct CreateTenantRequest {
    /// Unique tenant identifier, e.g. `et-addis`.
    pub id: String,
    /// Human-readable name.
    pub display_name: String,
    /// URL-safe short name, unique across tenants.
    pub slug: String,
}

/// Rejects scopes without the cross-tenant admin capability.
fn require_cross_tenant_admin(scope: &TenantScope) -> RestResult<()> {
    if scope.can_cross_tenants() {
        Ok(())
    } else {
        Err(RestError::Forbidden {
            message: "tenant administration requires the cross-tenant admin capability"
                .to_string(),
        })
    }
}

/// Handler for listing registered tenants.
///
/// # HTTP Request
///
/// `GET /admin/tenants`
pub async fn list_tenants_handler<S>(
    State(state): State<AppState<S>>,
    Scope(scope): Scope,
) -> RestResult<Response>
where
    S: RecordStore + Send + Sync,
{
    require_cross_tenant_admin(&scope)?;
    let tenants = state.storage().list_tenants().await?;
    Ok((StatusCode::OK, Json(tenants)).into_response())
}

/// Handler for registering a tenant.
///
/// # HTTP Request
///
/// `POST /admin/tenants`
///
/// # Response
///
/// - `201 Created` - The registered tenant
/// - `400 Bad Request` - Syntactically invalid tenant id
/// - `409 Conflict` - Id or slug already registered
pub async fn create_tenant_handler<S>(
    State(state): State<AppState<S>>,
    Scope(scope): Scope,
    Json(request): Json<CreateTenantRequest>,
) -> RestResult<Response>
where
    S: RecordStore + Send + Sync,
{
    require_cross_tenant_admin(&scope)?;

    let id = TenantId::parse(&request.id)?;
    let tenant = TenantRecord::new(id, request.display_name, request.slug);
    state.storage().create_tenant(&tenant).await?;

    info!(
        target: "dalali::audit",
        actor = scope.principal().unwrap_or("<unknown>"),
        tenant_id = %tenant.id,
        slug = %tenant.slug,
        "tenant registered"
    );
    Ok((StatusCode::CREATED, Json(tenant)).into_response())
}

/// Handler for fetching one tenant registry row.
///
/// # HTTP Request
///
/// `GET /admin/tenants/{tenant_id}`
pub async fn get_tenant_handler<S>(
    State(state): State<AppState<S>>,
    Path(tenant_id): Path<String>,
    Scope(scope): Scope,
) -> RestResult<Response>
where
    S: RecordStore + Send + Sync,
{
    require_cross_tenant_admin(&scope)?;

    let id = TenantId::parse(&tenant_id)?;
    match state.storage().get_tenant(&id).await? {
        Some(tenant) => Ok((StatusCode::OK, Json(tenant)).into_response()),
        None => Err(RestError::NotFound {
            collection: "tenants".to_string(),
        }),
    }
}

/// Handler for listing another tenant's records.
///
/// This is the HTTP face of the cross-tenant override: the scope is rebound
/// to the target tenant for the duration of the call, the rebind is audited,
/// and the caller's own scope is untouched.
///
/// # HTTP Request
///
/// `GET /admin/tenants/{tenant_id}/{collection}`
pub async fn list_tenant_records_handler<S>(
    State(state): State<AppState<S>>,
    Path((tenant_id, collection)): Path<(String, String)>,
    Scope(scope): Scope,
    params: ListParams,
) -> RestResult<Response>
where
    S: RecordStore + Send + Sync,
{
    let collection = lookup_collection(&collection)?;
    let target = TenantId::parse(&tenant_id)?;

    let store = ScopedStore::new(state.storage_arc(), scope);
    let limit = params.effective_limit(state.default_limit(), state.max_limit());
    let filter = params.filter();

    let records = store
        .with_cross_tenant_override(&target, |scoped| async move {
            scoped.find_limited(collection, filter, Some(limit)).await
        })
        .await?;

    Ok((StatusCode::OK, Json(records)).into_response())
}

/// Handler for creating a record inside another tenant.
///
/// The created record is owned by the *target* tenant: stamping happens
/// under the rebound scope, so the stored `tenant_id` is the target's even
/// though the caller's home scope is elsewhere.
///
/// # HTTP Request
///
/// `POST /admin/tenants/{tenant_id}/{collection}`
pub async fn create_tenant_record_handler<S>(
    State(state): State<AppState<S>>,
    Path((tenant_id, collection)): Path<(String, String)>,
    Scope(scope): Scope,
    Json(payload): Json<Value>,
) -> RestResult<Response>
where
    S: RecordStore + Send + Sync,
{
    let collection = lookup_collection(&collection)?;
    let target = TenantId::parse(&tenant_id)?;

    let store = ScopedStore::new(state.storage_arc(), scope);
    let record = store
        .with_cross_tenant_override(&target, |scoped| async move {
            scoped.create(collection, payload).await
        })
        .await?;

    Ok((StatusCode::CREATED, Json(record)).into_response())
}
