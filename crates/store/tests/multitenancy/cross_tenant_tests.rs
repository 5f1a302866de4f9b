//! Tests for cross-tenant access prevention and the audited override path.
//!
//! Crossing tenants must be impossible by accident, denied without the
//! admin capability, and explicitly bounded when granted.

use std::sync::Arc;

use serde_json::json;

use dalali_store::core::{Filter, ScopedStore, collections};
use dalali_store::error::TenantError;
use dalali_store::tenant::{Capabilities, Principal, TenantId, TenantScope, resolve_scope};

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

#[cfg(feature = "sqlite")]
fn scoped_with(
    store: &Arc<SqliteStore>,
    tenant: &str,
    capabilities: Capabilities,
) -> ScopedStore<SqliteStore> {
    ScopedStore::new(Arc::clone(store), TenantScope::new(tenant, capabilities))
}

#[cfg(feature = "sqlite")]
async fn seed_listings(store: &Arc<SqliteStore>) {
    let addis = scoped_with(store, "et-addis", Capabilities::full());
    let nairobi = scoped_with(store, "ke-nairobi", Capabilities::full());

    addis
        .create(&collections::LISTINGS, json!({"title": "Bole apartment"}))
        .await
        .unwrap();
    nairobi
        .create(&collections::LISTINGS, json!({"title": "Westlands flat"}))
        .await
        .unwrap();
    nairobi
        .create(&collections::LISTINGS, json!({"title": "Kilimani office"}))
        .await
        .unwrap();
}

// ============================================================================
// Override Tests
// ============================================================================

/// Test the super-admin scenario: an override over ke-nairobi sees only
/// ke-nairobi listings, and the outer scope is unchanged afterwards.
#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_override_rebinds_and_outer_scope_survives() {
    let store = create_sqlite_store();
    seed_listings(&store).await;

    let admin = scoped_with(&store, "et-addis", Capabilities::cross_tenant_admin());

    let borrowed = admin
        .with_cross_tenant_override(&TenantId::new("ke-nairobi"), |nairobi| async move {
            nairobi.find(&collections::LISTINGS, Filter::new()).await
        })
        .await
        .unwrap();

    assert_eq!(borrowed.len(), 2);
    assert!(
        borrowed
            .iter()
            .all(|r| r.tenant_id().as_str() == "ke-nairobi")
    );

    // The outer scope never moved.
    assert_eq!(admin.scope().tenant_id().as_str(), "et-addis");
    let home = admin
        .find(&collections::LISTINGS, Filter::new())
        .await
        .unwrap();
    assert_eq!(home.len(), 1);
    assert_eq!(home[0].content()["title"], "Bole apartment");
}

/// Test that a write through the override lands in the target tenant.
#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_override_write_lands_in_target_tenant() {
    let store = create_sqlite_store();

    let admin = scoped_with(&store, "et-addis", Capabilities::cross_tenant_admin());
    let created = admin
        .with_cross_tenant_override(&TenantId::new("ke-nairobi"), |nairobi| async move {
            nairobi
                .create(&collections::LISTINGS, json!({"title": "Runda villa"}))
                .await
        })
        .await
        .unwrap();

    assert_eq!(created.tenant_id().as_str(), "ke-nairobi");

    let nairobi = scoped_with(&store, "ke-nairobi", Capabilities::full());
    assert!(
        nairobi
            .get(&collections::LISTINGS, created.id())
            .await
            .unwrap()
            .is_some()
    );

    let addis = scoped_with(&store, "et-addis", Capabilities::full());
    assert!(
        addis
            .find(&collections::LISTINGS, Filter::new())
            .await
            .unwrap()
            .is_empty()
    );
}

/// Test that the override is denied without the admin capability.
#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_override_denied_without_capability() {
    let store = create_sqlite_store();
    let member = scoped_with(&store, "et-addis", Capabilities::full());

    let err = member
        .with_cross_tenant_override(&TenantId::new("ke-nairobi"), |nairobi| async move {
            nairobi.find(&collections::LISTINGS, Filter::new()).await
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        dalali_store::StoreError::Tenant(TenantError::CrossTenantDenied { .. })
    ));
}

/// Test that the capability set follows the scope into the override.
#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_override_carries_capabilities() {
    let store = create_sqlite_store();

    let admin = scoped_with(&store, "et-addis", Capabilities::cross_tenant_admin());
    let carried = admin
        .with_cross_tenant_override(&TenantId::new("ke-nairobi"), |nairobi| async move {
            assert_eq!(nairobi.scope().tenant_id().as_str(), "ke-nairobi");
            assert!(nairobi.scope().can_cross_tenants());
            nairobi.count(&collections::LISTINGS, Filter::new()).await
        })
        .await
        .unwrap();
    assert_eq!(carried, 0);
}

// ============================================================================
// Resolution Tests
// ============================================================================

/// Test the header-mismatch scenario: a principal claimed into et-addis
/// asking for ke-nairobi is rejected during resolution, before any scoped
/// store exists to touch data.
#[test]
fn test_requested_tenant_mismatch_rejected_before_data_access() {
    let principal = Principal::member_of("broker-7", "et-addis");

    let err = resolve_scope(&principal, Some("ke-nairobi")).unwrap_err();
    assert_eq!(
        err,
        TenantError::Mismatch {
            claimed: "et-addis".to_string(),
            requested: "ke-nairobi".to_string(),
        }
    );
}

/// Test that a cross-tenant admin may resolve directly into a requested
/// tenant.
#[test]
fn test_admin_resolves_into_requested_tenant() {
    let principal = Principal::new(
        "ops-1",
        Some(TenantId::new("et-addis")),
        Capabilities::cross_tenant_admin(),
    );

    let scope = resolve_scope(&principal, Some("ke-nairobi")).unwrap();
    assert_eq!(scope.tenant_id().as_str(), "ke-nairobi");
}

/// Test that a principal with no tenant claim cannot resolve a scope.
#[test]
fn test_no_claim_is_unresolved() {
    let principal = Principal::new("ghost", None, Capabilities::full());
    assert_eq!(
        resolve_scope(&principal, None).unwrap_err(),
        TenantError::Unresolved
    );
}
