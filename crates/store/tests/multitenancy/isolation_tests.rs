//! Tests for tenant data isolation.
//!
//! Records created under one tenant's scope must be invisible to every
//! other tenant, through every read and write path.

use std::sync::Arc;

use serde_json::json;

use dalali_store::core::{Filter, ScopedStore, collections};
use dalali_store::error::{RecordError, StoreError};
use dalali_store::tenant::{Capabilities, TenantScope};

#[cfg(feature = "sqlite")]
use dalali_store::backends::sqlite::SqliteStore;

// ============================================================================
// Helper Functions
// ============================================================================

#[cfg(feature = "sqlite")]
fn create_sqlite_store() -> Arc<SqliteStore> {
    let store = SqliteStore::in_memory().expect("Failed to create SQLite store");
    store.init_schema().expect("Failed to initialize schema");
    Arc::new(store)
}

fn create_scope(tenant: &str) -> TenantScope {
    TenantScope::new(tenant, Capabilities::full())
}

#[cfg(feature = "sqlite")]
fn scoped(store: &Arc<SqliteStore>, tenant: &str) -> ScopedStore<SqliteStore> {
    ScopedStore::new(Arc::clone(store), create_scope(tenant))
}

// ============================================================================
// Read Isolation Tests
// ============================================================================

/// Test that finds issued from concurrently running tasks under different
/// scopes never see each other's records.
#[cfg(feature = "sqlite")]
#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_find_isolation() {
    let store = create_sqlite_store();
    let addis = scoped(&store, "et-addis");
    let nairobi = scoped(&store, "ke-nairobi");

    for i in 0..5 {
        addis
            .create(&collections::LISTINGS, json!({"city": "Addis Ababa", "n": i}))
            .await
            .unwrap();
        nairobi
            .create(&collections::LISTINGS, json!({"city": "Nairobi", "n": i}))
            .await
            .unwrap();
    }

    // Several requests in flight at once; each task sees only its own tenant.
    let mut tasks = Vec::new();
    for i in 0..8 {
        let scope = if i % 2 == 0 {
            addis.clone()
        } else {
            nairobi.clone()
        };
        let expected = if i % 2 == 0 { "et-addis" } else { "ke-nairobi" };
        tasks.push(tokio::spawn(async move {
            let records = scope.find(&collections::LISTINGS, Filter::new()).await?;
            assert_eq!(records.len(), 5);
            assert!(records.iter().all(|r| r.tenant_id().as_str() == expected));
            Ok::<_, StoreError>(())
        }));
    }

    for task in tasks {
        task.await.unwrap().unwrap();
    }
}

/// Test the listing scenario: a find under et-addis with listings for two
/// tenants in the store returns only et-addis listings.
#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_find_listing_returns_only_own_tenant() {
    let store = create_sqlite_store();
    let addis = scoped(&store, "et-addis");
    let nairobi = scoped(&store, "ke-nairobi");

    addis
        .create(&collections::LISTINGS, json!({"title": "Bole apartment"}))
        .await
        .unwrap();
    nairobi
        .create(&collections::LISTINGS, json!({"title": "Westlands flat"}))
        .await
        .unwrap();

    let listings = addis
        .find(&collections::LISTINGS, Filter::new())
        .await
        .unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].content()["title"], "Bole apartment");
}

/// Test that a by-key fetch never crosses tenants even though the key is
/// globally unique and the underlying lookup has no tenant predicate.
#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_get_by_key_cannot_cross_tenants() {
    let store = create_sqlite_store();
    let addis = scoped(&store, "et-addis");
    let nairobi = scoped(&store, "ke-nairobi");

    let theirs = nairobi
        .create(&collections::USERS, json!({"email": "jane@nairobi.ke"}))
        .await
        .unwrap();

    // Guessing the key from another tenant's scope yields nothing.
    assert!(addis.get(&collections::USERS, theirs.id()).await.unwrap().is_none());

    // The owner still sees it.
    assert!(
        nairobi
            .get(&collections::USERS, theirs.id())
            .await
            .unwrap()
            .is_some()
    );
}

// ============================================================================
// Write Isolation Tests
// ============================================================================

/// Test that a created record carries the scope's tenant even when the
/// payload claims a different one.
#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_create_overrides_payload_tenant() {
    let store = create_sqlite_store();
    let addis = scoped(&store, "et-addis");

    let created = addis
        .create(
            &collections::LICENSES,
            json!({"number": "LIC-1", "tenant_id": "ke-nairobi"}),
        )
        .await
        .unwrap();

    // Override, not merge: the payload's claim is gone entirely.
    assert_eq!(created.tenant_id().as_str(), "et-addis");
    assert_eq!(created.content()["tenant_id"], "et-addis");

    // And nothing landed where the payload pointed.
    let nairobi = scoped(&store, "ke-nairobi");
    let leaked = nairobi
        .find(&collections::LICENSES, Filter::new())
        .await
        .unwrap();
    assert!(leaked.is_empty());
}

/// Test that updating a record owned by another tenant fails with NotFound
/// and leaves the record untouched.
#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_update_foreign_record_is_not_found() {
    let store = create_sqlite_store();
    let addis = scoped(&store, "et-addis");
    let nairobi = scoped(&store, "ke-nairobi");

    let theirs = nairobi
        .create(&collections::LISTINGS, json!({"status": "published"}))
        .await
        .unwrap();

    let err = addis
        .update(
            &collections::LISTINGS,
            Filter::new().eq("id", theirs.id()),
            json!({"status": "hijacked"}),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Record(RecordError::NotFound { .. })
    ));

    let unchanged = nairobi
        .get(&collections::LISTINGS, theirs.id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.content()["status"], "published");
}

/// Test that deleting a record owned by another tenant fails with NotFound
/// and the record survives.
#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_delete_foreign_record_is_not_found() {
    let store = create_sqlite_store();
    let addis = scoped(&store, "et-addis");
    let nairobi = scoped(&store, "ke-nairobi");

    let theirs = nairobi
        .create(&collections::LISTINGS, json!({}))
        .await
        .unwrap();

    let err = addis
        .delete(&collections::LISTINGS, Filter::new().eq("id", theirs.id()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Record(RecordError::NotFound { .. })
    ));

    assert!(
        nairobi
            .get(&collections::LISTINGS, theirs.id())
            .await
            .unwrap()
            .is_some()
    );
}

/// Test that the NotFound for a foreign record is indistinguishable from
/// the NotFound for a record that does not exist at all.
#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_not_found_is_uniform() {
    let store = create_sqlite_store();
    let addis = scoped(&store, "et-addis");
    let nairobi = scoped(&store, "ke-nairobi");

    let theirs = nairobi
        .create(&collections::LISTINGS, json!({}))
        .await
        .unwrap();

    let foreign = addis
        .delete(&collections::LISTINGS, Filter::new().eq("id", theirs.id()))
        .await
        .unwrap_err();
    let absent = addis
        .delete(&collections::LISTINGS, Filter::new().eq("id", "never-was"))
        .await
        .unwrap_err();

    assert_eq!(foreign.to_string(), absent.to_string());
}

// ============================================================================
// Idempotence Tests
// ============================================================================

/// Test that issuing the same update twice yields the same stored state.
#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_update_is_idempotent() {
    let store = create_sqlite_store();
    let addis = scoped(&store, "et-addis");

    let created = addis
        .create(&collections::LISTINGS, json!({"status": "draft", "price": 100}))
        .await
        .unwrap();

    let payload = json!({"status": "published", "price": 120});
    let first = addis
        .update(
            &collections::LISTINGS,
            Filter::new().eq("id", created.id()),
            payload.clone(),
        )
        .await
        .unwrap();
    let second = addis
        .update(
            &collections::LISTINGS,
            Filter::new().eq("id", created.id()),
            payload,
        )
        .await
        .unwrap();

    assert_eq!(first.content(), second.content());
    assert_eq!(first.created_at(), second.created_at());
}
