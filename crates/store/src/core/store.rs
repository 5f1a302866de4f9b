//! The backend storage trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::core::{Collection, Filter, StoredRecord, TenantRecord};
use crate::error::StoreResult;
use crate::tenant::TenantId;

/// Raw record storage primitives implemented by each backend.
///
/// `RecordStore` is the *unscoped* client: its filters are executed exactly
/// as given and its write primitives address rows directly. It performs no
/// tenant reasoning beyond honoring the conditions it receives. Application
/// code must never call it directly for tenant-owned collections; the
/// [`ScopedStore`](crate::core::ScopedStore) wrapper is the single choke
/// point that injects and verifies the tenant on every operation before
/// delegating here.
///
/// The split keeps backends simple (translate filters, move rows) and keeps
/// the isolation logic in one backend-independent place.
///
/// # Implementing a Backend
///
/// ```ignore
/// use async_trait::async_trait;
/// use dalali_store::core::{Collection, Filter, RecordStore, StoredRecord};
/// use dalali_store::error::StoreResult;
///
/// struct MyBackend;
///
/// #[async_trait]
/// impl RecordStore for MyBackend {
///     fn backend_name(&self) -> &'static str {
///         "my-backend"
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short name identifying the backend implementation.
    fn backend_name(&self) -> &'static str;

    /// Returns the records matching `filter`, ordered by creation time then
    /// id, honoring `limit` when given.
    async fn find(
        &self,
        collection: &Collection,
        filter: &Filter,
        limit: Option<usize>,
    ) -> StoreResult<Vec<StoredRecord>>;

    /// Returns the first record matching `filter`, if any.
    async fn find_one(
        &self,
        collection: &Collection,
        filter: &Filter,
    ) -> StoreResult<Option<StoredRecord>> {
        let mut records = self.find(collection, filter, Some(1)).await?;
        Ok(records.pop())
    }

    /// Fetches one record by its id alone, with no tenant predicate. Ids are
    /// globally unique within a collection. Callers own the post-fetch
    /// ownership check; inside this crate that caller is
    /// [`ScopedStore::get`](crate::core::ScopedStore::get).
    async fn get(&self, collection: &Collection, id: &str) -> StoreResult<Option<StoredRecord>>;

    /// Inserts a new record.
    ///
    /// # Errors
    ///
    /// [`RecordError::AlreadyExists`](crate::error::RecordError::AlreadyExists)
    /// when the id is taken;
    /// [`RecordError::DuplicateKey`](crate::error::RecordError::DuplicateKey)
    /// when a per-tenant unique index rejects the row.
    async fn insert(&self, collection: &Collection, record: &StoredRecord) -> StoreResult<()>;

    /// Writes a record's content over the row addressed by its collection,
    /// id, and owning tenant. Returns false when no such row exists.
    async fn update(&self, collection: &Collection, record: &StoredRecord) -> StoreResult<bool>;

    /// Removes the row addressed by collection, id, and owning tenant.
    /// Returns false when no such row exists.
    async fn remove(
        &self,
        collection: &Collection,
        id: &str,
        tenant_id: &TenantId,
    ) -> StoreResult<bool>;

    /// Counts the records matching `filter`.
    async fn count(&self, collection: &Collection, filter: &Filter) -> StoreResult<u64>;

    /// Registers a tenant.
    ///
    /// # Errors
    ///
    /// [`RecordError::AlreadyExists`](crate::error::RecordError::AlreadyExists)
    /// when the id or slug is taken.
    async fn create_tenant(&self, tenant: &TenantRecord) -> StoreResult<()>;

    /// Fetches a tenant registry row.
    async fn get_tenant(&self, id: &TenantId) -> StoreResult<Option<TenantRecord>>;

    /// Lists all registered tenants, ordered by id.
    async fn list_tenants(&self) -> StoreResult<Vec<TenantRecord>>;

    /// Verifies the backend can serve requests.
    async fn health_check(&self) -> StoreResult<()>;
}

/// Blanket convenience: any filter value usable in a content equality check.
///
/// Kept as a free function rather than a trait method so backends share one
/// definition of what "the payload's value for a field" means.
pub fn content_field<'a>(content: &'a Value, field: &str) -> Option<&'a Value> {
    let mut current = content;
    for segment in field.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}
