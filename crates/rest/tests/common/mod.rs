//! Common test utilities for the REST integration suites.
//!
//! Builds a test server over the real router and a fresh in-memory store,
//! and seeds records through the backend underneath the HTTP layer so tests
//! control exactly which tenant owns what.

use std::sync::Arc;

use axum::http::HeaderName;
use axum_test::TestServer;
use dalali_rest::{AppState, ServerConfig};
use dalali_store::backends::sqlite::SqliteStore;
use dalali_store::core::{RecordStore, StoredRecord, collections};
use dalali_store::tenant::TenantId;
use serde_json::json;

// Identity headers stamped by the upstream gateway.
pub const X_AUTH_SUBJECT: HeaderName = HeaderName::from_static("x-auth-subject");
pub const X_AUTH_TENANT: HeaderName = HeaderName::from_static("x-auth-tenant");
pub const X_AUTH_CAPABILITIES: HeaderName = HeaderName::from_static("x-auth-capabilities");

/// The base URL configured into test servers; Location headers build on it.
pub const BASE_URL: &str = "http://localhost:8080";

/// Creates a test server over a fresh in-memory store, returning the store
/// handle so tests can seed and inspect data underneath the HTTP layer.
pub async fn create_test_server() -> (TestServer, Arc<SqliteStore>) {
    let store = SqliteStore::in_memory().expect("Failed to create SQLite store");
    store.init_schema().expect("Failed to init schema");
    let store = Arc::new(store);

    let config = ServerConfig {
        base_url: BASE_URL.to_string(),
        ..ServerConfig::for_testing()
    };

    // Create app state manually so the test keeps its own handle to the store
    let state = AppState::new(Arc::clone(&store), config);
    let app = dalali_rest::routing::create_routes(state);
    let server = TestServer::new(app).expect("Failed to create test server");

    (server, store)
}

/// Seeds a listing for a specific tenant, bypassing the HTTP layer.
pub async fn seed_listing(store: &SqliteStore, tenant_id: &str, id: &str, title: &str) {
    let record = StoredRecord::new(
        "listings",
        id,
        TenantId::new(tenant_id),
        json!({
            "id": id,
            "tenant_id": tenant_id,
            "title": title,
            "status": "active"
        }),
    );
    store
        .insert(&collections::LISTINGS, &record)
        .await
        .expect("Failed to seed listing");
}
