//! Stored record and tenant registry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tenant::TenantId;

/// A tenant-owned record as the store hands it back.
///
/// Every record lives in exactly one collection, is owned by exactly one
/// tenant, and carries its business data as a JSON object in `content`. The
/// owning tenant is authoritative in the `tenant_id` metadata field; the
/// scoped store also stamps the same value into `content.tenant_id` so a
/// serialized record is self-describing.
///
/// # Examples
///
/// ```
/// use dalali_store::core::StoredRecord;
/// use dalali_store::tenant::TenantId;
/// use serde_json::json;
///
/// let record = StoredRecord::new(
///     "licenses",
///     "lic-001",
///     TenantId::new("et-addis"),
///     json!({"number": "LIC-1", "holder": "Abebe Bekele"}),
/// );
///
/// assert_eq!(record.collection(), "licenses");
/// assert_eq!(record.tenant_id().as_str(), "et-addis");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    collection: String,
    id: String,
    tenant_id: TenantId,
    content: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StoredRecord {
    /// Creates a fresh record with both timestamps set to now.
    pub fn new(
        collection: impl Into<String>,
        id: impl Into<String>,
        tenant_id: TenantId,
        content: Value,
    ) -> Self {
        let now = Utc::now();
        StoredRecord {
            collection: collection.into(),
            id: id.into(),
            tenant_id,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reassembles a record from its stored parts. Backends use this when
    /// mapping rows; the timestamps are taken as-is.
    pub fn from_parts(
        collection: impl Into<String>,
        id: impl Into<String>,
        tenant_id: TenantId,
        content: Value,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        StoredRecord {
            collection: collection.into(),
            id: id.into(),
            tenant_id,
            content,
            created_at,
            updated_at,
        }
    }

    /// The collection this record belongs to.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The record id, globally unique within a collection.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The owning tenant.
    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// The record's JSON content.
    pub fn content(&self) -> &Value {
        &self.content
    }

    /// Consumes the record, returning its content.
    pub fn into_content(self) -> Value {
        self.content
    }

    /// When the record was first created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the record was last written.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns a copy with replaced content and a refreshed `updated_at`.
    /// Collection, id, tenant, and `created_at` are preserved.
    pub fn with_content(&self, content: Value) -> Self {
        StoredRecord {
            collection: self.collection.clone(),
            id: self.id.clone(),
            tenant_id: self.tenant_id.clone(),
            content,
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }
}

/// One row of the tenant registry.
///
/// Tenants themselves are not tenant-owned records; they live in a dedicated
/// table and are managed through the super-admin surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantRecord {
    /// Unique tenant identifier.
    pub id: TenantId,
    /// Human-readable name, e.g. "Addis Ababa Brokerage Authority".
    pub display_name: String,
    /// URL-safe short name, unique across tenants.
    pub slug: String,
    /// When the tenant was registered.
    pub created_at: DateTime<Utc>,
}

impl TenantRecord {
    /// Creates a tenant registry row timestamped now.
    pub fn new(
        id: impl Into<TenantId>,
        display_name: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        TenantRecord {
            id: id.into(),
            display_name: display_name.into(),
            slug: slug.into(),
            created_at: Utc::now(),
        }
    }
}
