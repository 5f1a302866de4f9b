//! Integration tests for request-time tenant scope resolution.
//!
//! Every record route sits behind the scope middleware, which turns the
//! gateway's identity headers into a tenant scope before any handler runs:
//! - `X-Auth-Subject` / `X-Auth-Tenant` / `X-Auth-Capabilities` are trusted
//!   claims stamped by the upstream gateway
//! - `X-Tenant-Id` is the client's requested tenant and must agree with the
//!   claim unless the principal holds the cross-tenant admin capability

mod common;

use axum::http::{HeaderName, HeaderValue, StatusCode};

use common::{
    X_AUTH_CAPABILITIES, X_AUTH_SUBJECT, X_AUTH_TENANT, create_test_server, seed_listing,
};

const X_TENANT_ID: HeaderName = HeaderName::from_static("x-tenant-id");

// =============================================================================
// Claim-Based Resolution Tests
// =============================================================================

mod claim_resolution {
    use super::*;

    #[tokio::test]
    async fn test_claim_tenant_scopes_the_request() {
        let (server, store) = create_test_server().await;

        seed_listing(&store, "et-addis", "l-1", "Bole 2BR apartment").await;
        seed_listing(&store, "ke-nairobi", "l-2", "Kilimani office floor").await;

        let response = server
            .get("/listings")
            .add_header(X_AUTH_SUBJECT, HeaderValue::from_static("broker-7"))
            .add_header(X_AUTH_TENANT, HeaderValue::from_static("et-addis"))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        let records = body.as_array().expect("list body should be an array");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["tenant_id"], "et-addis");
        assert_eq!(records[0]["content"]["title"], "Bole 2BR apartment");
    }

    #[tokio::test]
    async fn test_matching_requested_tenant_is_accepted() {
        let (server, store) = create_test_server().await;

        seed_listing(&store, "et-addis", "l-1", "Bole 2BR apartment").await;

        // X-Tenant-Id agreeing with the claim is redundant but valid
        let response = server
            .get("/listings")
            .add_header(X_AUTH_SUBJECT, HeaderValue::from_static("broker-7"))
            .add_header(X_AUTH_TENANT, HeaderValue::from_static("et-addis"))
            .add_header(X_TENANT_ID, HeaderValue::from_static("et-addis"))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_missing_principal_is_unauthorized() {
        let (server, store) = create_test_server().await;

        seed_listing(&store, "et-addis", "l-1", "Bole 2BR apartment").await;

        let response = server.get("/listings").await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"]["code"], "unauthorized");
    }

    #[tokio::test]
    async fn test_subject_without_tenant_claim_is_unauthorized() {
        let (server, _store) = create_test_server().await;

        // Authenticated, but the gateway attached no tenant claim
        let response = server
            .get("/listings")
            .add_header(X_AUTH_SUBJECT, HeaderValue::from_static("broker-7"))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_requested_tenant_does_not_substitute_for_a_claim() {
        let (server, store) = create_test_server().await;

        seed_listing(&store, "et-addis", "l-1", "Bole 2BR apartment").await;

        // A client header alone must never resolve a tenant for an ordinary
        // principal, no matter how plausible the value looks.
        let response = server
            .get("/listings")
            .add_header(X_AUTH_SUBJECT, HeaderValue::from_static("broker-7"))
            .add_header(X_TENANT_ID, HeaderValue::from_static("et-addis"))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}

// =============================================================================
// Requested-Tenant Conflict Tests
// =============================================================================

mod requested_tenant_conflicts {
    use super::*;

    #[tokio::test]
    async fn test_conflicting_requested_tenant_is_forbidden() {
        let (server, _store) = create_test_server().await;

        let response = server
            .get("/listings")
            .add_header(X_AUTH_SUBJECT, HeaderValue::from_static("broker-7"))
            .add_header(X_AUTH_TENANT, HeaderValue::from_static("et-addis"))
            .add_header(X_TENANT_ID, HeaderValue::from_static("ke-nairobi"))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"]["code"], "forbidden");
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.contains("et-addis"));
        assert!(message.contains("ke-nairobi"));
    }

    #[tokio::test]
    async fn test_conflict_is_rejected_before_any_lookup() {
        let (server, store) = create_test_server().await;

        seed_listing(&store, "ke-nairobi", "k-1", "Westlands plot").await;

        // Addressing the other tenant's record by id dies at resolution:
        // forbidden, never a data-shaped not-found or a leaked record.
        let response = server
            .get("/listings/k-1")
            .add_header(X_AUTH_SUBJECT, HeaderValue::from_static("broker-7"))
            .add_header(X_AUTH_TENANT, HeaderValue::from_static("et-addis"))
            .add_header(X_TENANT_ID, HeaderValue::from_static("ke-nairobi"))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        let body: serde_json::Value = response.json();
        assert!(body.get("content").is_none());
    }

    #[tokio::test]
    async fn test_malformed_requested_tenant_is_rejected() {
        let (server, _store) = create_test_server().await;

        let response = server
            .get("/listings")
            .add_header(X_AUTH_SUBJECT, HeaderValue::from_static("broker-7"))
            .add_header(X_AUTH_TENANT, HeaderValue::from_static("et-addis"))
            .add_header(X_TENANT_ID, HeaderValue::from_static("bad tenant!"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"]["code"], "invalid");
    }

    #[tokio::test]
    async fn test_unknown_capability_grant_is_rejected() {
        let (server, _store) = create_test_server().await;

        let response = server
            .get("/listings")
            .add_header(X_AUTH_SUBJECT, HeaderValue::from_static("broker-7"))
            .add_header(X_AUTH_TENANT, HeaderValue::from_static("et-addis"))
            .add_header(X_AUTH_CAPABILITIES, HeaderValue::from_static("superuser"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.contains("superuser"));
    }
}

// =============================================================================
// Cross-Tenant Admin Override Tests
// =============================================================================

mod admin_overrides {
    use super::*;

    #[tokio::test]
    async fn test_admin_resolves_to_the_requested_tenant() {
        let (server, store) = create_test_server().await;

        seed_listing(&store, "et-addis", "l-1", "Bole 2BR apartment").await;
        seed_listing(&store, "ke-nairobi", "k-1", "Westlands plot").await;

        let response = server
            .get("/listings")
            .add_header(X_AUTH_SUBJECT, HeaderValue::from_static("root-admin"))
            .add_header(X_AUTH_TENANT, HeaderValue::from_static("et-addis"))
            .add_header(
                X_AUTH_CAPABILITIES,
                HeaderValue::from_static("cross-tenant-admin"),
            )
            .add_header(X_TENANT_ID, HeaderValue::from_static("ke-nairobi"))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        let records = body.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["tenant_id"], "ke-nairobi");
    }

    #[tokio::test]
    async fn test_admin_without_requested_tenant_uses_own_claim() {
        let (server, store) = create_test_server().await;

        seed_listing(&store, "et-addis", "l-1", "Bole 2BR apartment").await;
        seed_listing(&store, "ke-nairobi", "k-1", "Westlands plot").await;

        let response = server
            .get("/listings")
            .add_header(X_AUTH_SUBJECT, HeaderValue::from_static("root-admin"))
            .add_header(X_AUTH_TENANT, HeaderValue::from_static("et-addis"))
            .add_header(
                X_AUTH_CAPABILITIES,
                HeaderValue::from_static("cross-tenant-admin"),
            )
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        let records = body.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["tenant_id"], "et-addis");
    }

    #[tokio::test]
    async fn test_claimless_admin_names_an_explicit_target() {
        let (server, store) = create_test_server().await;

        seed_listing(&store, "ke-nairobi", "k-1", "Westlands plot").await;

        // Platform operators may have no tenant of their own
        let response = server
            .get("/listings")
            .add_header(X_AUTH_SUBJECT, HeaderValue::from_static("root-admin"))
            .add_header(
                X_AUTH_CAPABILITIES,
                HeaderValue::from_static("cross-tenant-admin"),
            )
            .add_header(X_TENANT_ID, HeaderValue::from_static("ke-nairobi"))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_claimless_admin_without_target_is_unauthorized() {
        let (server, _store) = create_test_server().await;

        let response = server
            .get("/listings")
            .add_header(X_AUTH_SUBJECT, HeaderValue::from_static("root-admin"))
            .add_header(
                X_AUTH_CAPABILITIES,
                HeaderValue::from_static("cross-tenant-admin"),
            )
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}

// =============================================================================
// Probe Tests
// =============================================================================

mod probes {
    use super::*;

    #[tokio::test]
    async fn test_health_needs_no_principal() {
        let (server, _store) = create_test_server().await;

        let response = server.get("/health").await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["backend"], "sqlite");
    }

    #[tokio::test]
    async fn test_liveness_and_readiness_respond() {
        let (server, _store) = create_test_server().await;

        server.get("/_liveness").await.assert_status_ok();

        let response = server.get("/_readiness").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["checks"]["storage"], "ok");
    }
}
