//! Record CRUD handlers.
//!
//! All five handlers follow the same shape: resolve the collection from the
//! path, bind the backend to the request's scope, and let the scoped store
//! enforce tenancy. No handler ever touches the backend directly.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use dalali_store::core::{Collection, Filter, ID_FIELD, RecordStore, ScopedStore, collections};
use serde_json::Value;
use tracing::debug;

use crate::error::{RestError, RestResult};
use crate::extractors::{ListParams, Scope};
use crate::state::AppState;

/// Resolves a path segment to a registered collection.
pub(crate) fn lookup_collection(name: &str) -> RestResult<&'static Collection> {
    collections::by_name(name).ok_or_else(|| RestError::UnknownCollection {
        name: name.to_string(),
    })
}

/// Handler for listing records.
///
/// # HTTP Request
///
/// `GET /{collection}`
///
/// Query parameters become equality conditions on content fields;
/// `_limit` caps the page size and `_count=true` returns a count instead.
///
/// # Response
///
/// - `200 OK` - JSON array of records (or `{"count": n}`)
/// - `404 Not Found` - Unknown collection
pub async fn list_records_handler<S>(
    State(state): State<AppState<S>>,
    Path(collection): Path<String>,
    Scope(scope): Scope,
    params: ListParams,
) -> RestResult<Response>
where
    S: RecordStore + Send + Sync,
{
    let collection = lookup_collection(&collection)?;
    let store = ScopedStore::new(state.storage_arc(), scope);

    if params.count_only() {
        let count = store.count(collection, params.filter()).await?;
        return Ok((StatusCode::OK, Json(serde_json::json!({"count": count}))).into_response());
    }

    let limit = params.effective_limit(state.default_limit(), state.max_limit());
    let records = store
        .find_limited(collection, params.filter(), Some(limit))
        .await?;

    debug!(
        collection = collection.name(),
        results = records.len(),
        "list request served"
    );
    Ok((StatusCode::OK, Json(records)).into_response())
}

/// Handler for creating a record.
///
/// The record is owned by the scope's tenant regardless of any `tenant_id`
/// in the payload; the store stamps the authoritative value in.
///
/// # HTTP Request
///
/// `POST /{collection}`
///
/// # Response
///
/// - `201 Created` - The stored record, with a `Location` header
/// - `400 Bad Request` - Payload is not a JSON object
/// - `404 Not Found` - Unknown collection
/// - `409 Conflict` - Id taken, or a per-tenant unique field collides
pub async fn create_record_handler<S>(
    State(state): State<AppState<S>>,
    Path(collection): Path<String>,
    Scope(scope): Scope,
    Json(payload): Json<Value>,
) -> RestResult<Response>
where
    S: RecordStore + Send + Sync,
{
    let collection = lookup_collection(&collection)?;
    let store = ScopedStore::new(state.storage_arc(), scope);

    let record = store.create(collection, payload).await?;

    let location = format!("{}/{}/{}", state.base_url(), collection.name(), record.id());
    let location =
        HeaderValue::from_str(&location).map_err(|_| RestError::Internal {
            message: "failed to build Location header".to_string(),
        })?;

    debug!(
        collection = collection.name(),
        id = record.id(),
        "record created"
    );
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(record),
    )
        .into_response())
}

/// Handler for fetching one record by id.
///
/// A record owned by another tenant produces the same 404 as a record that
/// does not exist.
///
/// # HTTP Request
///
/// `GET /{collection}/{id}`
///
/// # Response
///
/// - `200 OK` - The record
/// - `404 Not Found` - No such record under this tenant
pub async fn get_record_handler<S>(
    State(state): State<AppState<S>>,
    Path((collection, id)): Path<(String, String)>,
    Scope(scope): Scope,
) -> RestResult<Response>
where
    S: RecordStore + Send + Sync,
{
    let collection = lookup_collection(&collection)?;
    let store = ScopedStore::new(state.storage_arc(), scope);

    match store.get(collection, &id).await? {
        Some(record) => Ok((StatusCode::OK, Json(record)).into_response()),
        None => Err(RestError::NotFound {
            collection: collection.name().to_string(),
        }),
    }
}

/// Handler for replacing a record's content.
///
/// # HTTP Request
///
/// `PUT /{collection}/{id}`
///
/// # Response
///
/// - `200 OK` - The updated record
/// - `400 Bad Request` - Payload is not a JSON object
/// - `404 Not Found` - No such record under this tenant
/// - `409 Conflict` - A per-tenant unique field collides
pub async fn update_record_handler<S>(
    State(state): State<AppState<S>>,
    Path((collection, id)): Path<(String, String)>,
    Scope(scope): Scope,
    Json(payload): Json<Value>,
) -> RestResult<Response>
where
    S: RecordStore + Send + Sync,
{
    let collection = lookup_collection(&collection)?;
    let store = ScopedStore::new(state.storage_arc(), scope);

    let record = store
        .update(collection, Filter::new().eq(ID_FIELD, id.as_str()), payload)
        .await?;

    debug!(
        collection = collection.name(),
        id = record.id(),
        "record updated"
    );
    Ok((StatusCode::OK, Json(record)).into_response())
}

/// Handler for deleting a record.
///
/// # HTTP Request
///
/// `DELETE /{collection}/{id}`
///
/// # Response
///
/// - `204 No Content` - Record deleted
/// - `404 Not Found` - No such record under this tenant
pub async fn delete_record_handler<S>(
    State(state): State<AppState<S>>,
    Path((collection, id)): Path<(String, String)>,
    Scope(scope): Scope,
) -> RestResult<Response>
where
    S: RecordStore + Send + Sync,
{
    let collection = lookup_collection(&collection)?;
    let store = ScopedStore::new(state.storage_arc(), scope);

    let record = store
        .delete(collection, Filter::new().eq(ID_FIELD, id.as_str()))
        .await?;

    debug!(
        collection = collection.name(),
        id = record.id(),
        "record deleted"
    );
    Ok(StatusCode::NO_CONTENT.into_response())
}
