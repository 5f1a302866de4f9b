//! The tenant-scoping wrapper around a backend store.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::core::filter::{Filter, ID_FIELD, TENANT_ID_FIELD};
use crate::core::store::content_field;
use crate::core::{Collection, RecordStore, StoredRecord};
use crate::error::{RecordError, StoreResult, TenantError, ValidationError};
use crate::tenant::{Operation, TenantId, TenantScope};

/// Tenant-scoped data access: the single choke point for all tenant-owned
/// persistence.
///
/// A `ScopedStore` binds a backend [`RecordStore`] to one request's
/// [`TenantScope`] and intercepts every operation:
///
/// - read filters are intersected with the scope's tenant before any SQL
///   runs, so results can only contain the scope's rows;
/// - write payloads have the scope's tenant stamped in, overriding whatever
///   tenant the caller supplied;
/// - by-key lookups are followed by a mandatory ownership check that turns
///   another tenant's record into `None`;
/// - scoped updates and deletes that match nothing report
///   [`RecordError::NotFound`] whether the row is absent or foreign, so the
///   outcome never leaks cross-tenant existence;
/// - a caller-supplied filter already pinned to a different tenant fails
///   fast with [`TenantError::ScopeViolation`] before reaching the backend.
///   This guard is active in every build profile.
///
/// Crossing tenants requires the explicit, audited
/// [`with_cross_tenant_override`](ScopedStore::with_cross_tenant_override).
///
/// # Examples
///
/// ```ignore
/// use dalali_store::core::{Filter, ScopedStore, collections};
/// use serde_json::json;
///
/// let store = ScopedStore::new(backend, scope);
///
/// // The stored license belongs to the scope's tenant no matter what the
/// // payload says.
/// let license = store
///     .create(&collections::LICENSES, json!({"number": "LIC-1"}))
///     .await?;
///
/// // Only this tenant's listings come back.
/// let listings = store.find(&collections::LISTINGS, Filter::new()).await?;
/// ```
pub struct ScopedStore<S> {
    store: Arc<S>,
    scope: TenantScope,
}

impl<S> Clone for ScopedStore<S> {
    fn clone(&self) -> Self {
        ScopedStore {
            store: Arc::clone(&self.store),
            scope: self.scope.clone(),
        }
    }
}

enum TenantPin {
    Absent,
    Matches,
    Conflict(String),
}

impl<S: RecordStore> ScopedStore<S> {
    /// Binds a backend to one request's scope.
    pub fn new(store: Arc<S>, scope: TenantScope) -> Self {
        ScopedStore { store, scope }
    }

    /// The scope this store is bound to.
    pub fn scope(&self) -> &TenantScope {
        &self.scope
    }

    /// A convenience handle fixing the collection argument.
    pub fn collection<'a>(&'a self, collection: &'a Collection) -> CollectionHandle<'a, S> {
        CollectionHandle {
            store: self,
            collection,
        }
    }

    /// Returns all of the scope tenant's records matching `filter`.
    pub async fn find(
        &self,
        collection: &Collection,
        filter: Filter,
    ) -> StoreResult<Vec<StoredRecord>> {
        self.find_limited(collection, filter, None).await
    }

    /// [`find`](ScopedStore::find) with an upper bound on result size.
    pub async fn find_limited(
        &self,
        collection: &Collection,
        filter: Filter,
        limit: Option<usize>,
    ) -> StoreResult<Vec<StoredRecord>> {
        self.scope.check_operation(Operation::Read)?;
        let filter = self.scoped_filter(collection, filter)?;

        debug!(
            collection = collection.name(),
            tenant = %self.scope.tenant_id(),
            conditions = filter.len(),
            "scoped find"
        );
        self.store.find(collection, &filter, limit).await
    }

    /// Returns the first of the scope tenant's records matching `filter`.
    pub async fn find_one(
        &self,
        collection: &Collection,
        filter: Filter,
    ) -> StoreResult<Option<StoredRecord>> {
        self.scope.check_operation(Operation::Read)?;
        let filter = self.scoped_filter(collection, filter)?;
        self.store.find_one(collection, &filter).await
    }

    /// Fetches a record by id.
    ///
    /// Ids are globally unique, so the lookup itself carries no tenant
    /// predicate; the fetched row then goes through a mandatory ownership
    /// check. A record owned by another tenant is logged and returned as
    /// `None`, indistinguishable from a record that does not exist.
    pub async fn get(
        &self,
        collection: &Collection,
        id: &str,
    ) -> StoreResult<Option<StoredRecord>> {
        self.scope.check_operation(Operation::Read)?;

        match self.store.get(collection, id).await? {
            None => Ok(None),
            Some(record) if record.tenant_id() == self.scope.tenant_id() => Ok(Some(record)),
            Some(record) => {
                warn!(
                    target: "dalali::audit",
                    collection = collection.name(),
                    id = id,
                    owner = %record.tenant_id(),
                    scope = %self.scope.tenant_id(),
                    principal = self.scope.principal().unwrap_or("<unknown>"),
                    "cross-tenant key lookup rejected by ownership check"
                );
                Ok(None)
            }
        }
    }

    /// Creates a record owned by the scope's tenant.
    ///
    /// The scope's tenant is stamped into the stored row and its content,
    /// overriding any `tenant_id` the payload carried. A payload `id` is
    /// honored when present (and free), otherwise a UUID is assigned.
    ///
    /// # Errors
    ///
    /// [`ValidationError::NotAnObject`] for non-object payloads;
    /// [`RecordError::AlreadyExists`] when the id is taken;
    /// [`RecordError::DuplicateKey`] when the collection's per-tenant unique
    /// field is already used within this tenant.
    pub async fn create(
        &self,
        collection: &Collection,
        payload: Value,
    ) -> StoreResult<StoredRecord> {
        self.scope.check_operation(Operation::Create)?;

        let id = Self::choose_id(&payload)?;
        let content = self.stamp_payload(payload, &id)?;
        self.check_unique_field(collection, &content, None).await?;

        let record = StoredRecord::new(
            collection.name(),
            id,
            self.scope.tenant_id().clone(),
            content,
        );
        self.store.insert(collection, &record).await?;

        debug!(
            collection = collection.name(),
            tenant = %self.scope.tenant_id(),
            id = record.id(),
            "record created"
        );
        Ok(record)
    }

    /// Updates the single record matching `filter`, replacing its content
    /// with the stamped payload.
    ///
    /// # Errors
    ///
    /// [`RecordError::NotFound`] when no record matches under the scope's
    /// tenant (absent and foreign rows are indistinguishable);
    /// [`RecordError::MultipleMatches`] when the scoped filter is ambiguous;
    /// [`RecordError::DuplicateKey`] when the new content takes a per-tenant
    /// unique value already held by another record.
    pub async fn update(
        &self,
        collection: &Collection,
        filter: Filter,
        payload: Value,
    ) -> StoreResult<StoredRecord> {
        self.scope.check_operation(Operation::Update)?;

        let current = self.match_exactly_one(collection, filter).await?;
        let content = self.stamp_payload(payload, current.id())?;
        self.check_unique_field(collection, &content, Some(current.id()))
            .await?;

        let updated = current.with_content(content);
        if !self.store.update(collection, &updated).await? {
            // The row vanished between the match and the write.
            return Err(RecordError::NotFound {
                collection: collection.name().to_string(),
            }
            .into());
        }

        debug!(
            collection = collection.name(),
            tenant = %self.scope.tenant_id(),
            id = updated.id(),
            "record updated"
        );
        Ok(updated)
    }

    /// Deletes the single record matching `filter`, returning it.
    ///
    /// # Errors
    ///
    /// Same not-found and ambiguity semantics as
    /// [`update`](ScopedStore::update).
    pub async fn delete(
        &self,
        collection: &Collection,
        filter: Filter,
    ) -> StoreResult<StoredRecord> {
        self.scope.check_operation(Operation::Delete)?;

        let current = self.match_exactly_one(collection, filter).await?;
        if !self
            .store
            .remove(collection, current.id(), self.scope.tenant_id())
            .await?
        {
            return Err(RecordError::NotFound {
                collection: collection.name().to_string(),
            }
            .into());
        }

        debug!(
            collection = collection.name(),
            tenant = %self.scope.tenant_id(),
            id = current.id(),
            "record deleted"
        );
        Ok(current)
    }

    /// Counts the scope tenant's records matching `filter`.
    pub async fn count(&self, collection: &Collection, filter: Filter) -> StoreResult<u64> {
        self.scope.check_operation(Operation::Read)?;
        let filter = self.scoped_filter(collection, filter)?;
        self.store.count(collection, &filter).await
    }

    /// Runs `f` against a store rebound to `target`.
    ///
    /// Only scopes holding the cross-tenant admin capability may call this;
    /// everyone else gets [`TenantError::CrossTenantDenied`]. The rebind is
    /// audited. The store this method is called on is not modified: the
    /// closure receives a separate `ScopedStore` and the original keeps
    /// acting on its own tenant.
    pub async fn with_cross_tenant_override<F, Fut, T>(
        &self,
        target: &TenantId,
        f: F,
    ) -> StoreResult<T>
    where
        F: FnOnce(ScopedStore<S>) -> Fut,
        Fut: Future<Output = StoreResult<T>>,
    {
        let scope = self.scope.for_tenant(target)?;
        let rebound = ScopedStore {
            store: Arc::clone(&self.store),
            scope,
        };
        f(rebound).await
    }

    /// Intersects `filter` with the scope's tenant.
    ///
    /// A filter with no tenant condition gains one. A condition naming the
    /// scope's own tenant is redundant and tolerated. Anything else is a
    /// scope violation: it means calling code tried to address another
    /// tenant's rows around the wrapper, which is a bug or an attack, and it
    /// fails before any SQL executes.
    fn scoped_filter(&self, collection: &Collection, filter: Filter) -> StoreResult<Filter> {
        let pin = match filter.condition_for(TENANT_ID_FIELD) {
            None => TenantPin::Absent,
            Some(Value::String(t)) if t.as_str() == self.scope.tenant_id().as_str() => {
                TenantPin::Matches
            }
            Some(other) => TenantPin::Conflict(match other {
                Value::String(t) => format!("filter pinned to tenant '{}'", t),
                v => format!("non-string tenant condition: {}", v),
            }),
        };

        match pin {
            TenantPin::Absent => {
                Ok(filter.eq(TENANT_ID_FIELD, self.scope.tenant_id().as_str()))
            }
            TenantPin::Matches => Ok(filter),
            TenantPin::Conflict(detail) => {
                error!(
                    target: "dalali::audit",
                    collection = collection.name(),
                    tenant = %self.scope.tenant_id(),
                    principal = self.scope.principal().unwrap_or("<unknown>"),
                    detail = %detail,
                    "tenant scope violation"
                );
                Err(TenantError::ScopeViolation {
                    collection: collection.name().to_string(),
                    detail,
                }
                .into())
            }
        }
    }

    /// Stamps the scope's tenant and the record id into the payload. The
    /// stamp is an override: caller-supplied `tenant_id` and `id` fields are
    /// replaced, never merged.
    fn stamp_payload(&self, payload: Value, id: &str) -> StoreResult<Value> {
        let Value::Object(mut map) = payload else {
            return Err(ValidationError::NotAnObject.into());
        };
        map.insert(
            TENANT_ID_FIELD.to_string(),
            Value::String(self.scope.tenant_id().to_string()),
        );
        map.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        Ok(Value::Object(map))
    }

    /// Picks the record id for a create: the payload's `id` when it carries
    /// a usable one, a fresh UUID otherwise.
    fn choose_id(payload: &Value) -> StoreResult<String> {
        match payload.get(ID_FIELD) {
            None | Some(Value::Null) => Ok(Uuid::new_v4().to_string()),
            Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
            Some(Value::String(_)) => Err(ValidationError::InvalidFieldValue {
                field: ID_FIELD.to_string(),
                reason: "id must not be empty".to_string(),
            }
            .into()),
            Some(_) => Err(ValidationError::InvalidFieldValue {
                field: ID_FIELD.to_string(),
                reason: "id must be a string".to_string(),
            }
            .into()),
        }
    }

    /// Enforces the collection's per-tenant unique field, excluding
    /// `exclude_id` (the record being updated) from the conflict set.
    async fn check_unique_field(
        &self,
        collection: &Collection,
        content: &Value,
        exclude_id: Option<&str>,
    ) -> StoreResult<()> {
        let Some(field) = collection.unique_field() else {
            return Ok(());
        };
        let Some(value) = content_field(content, field) else {
            return Ok(());
        };

        let filter = self.scoped_filter(
            collection,
            Filter::new().eq(field, value.clone()),
        )?;
        if let Some(existing) = self.store.find_one(collection, &filter).await? {
            if exclude_id != Some(existing.id()) {
                return Err(RecordError::DuplicateKey {
                    collection: collection.name().to_string(),
                    field: field.to_string(),
                    value: match value {
                        Value::String(s) => s.clone(),
                        v => v.to_string(),
                    },
                }
                .into());
            }
        }
        Ok(())
    }

    /// Resolves a scoped filter to exactly one record.
    async fn match_exactly_one(
        &self,
        collection: &Collection,
        filter: Filter,
    ) -> StoreResult<StoredRecord> {
        let filter = self.scoped_filter(collection, filter)?;
        let mut matches = self.store.find(collection, &filter, Some(2)).await?;
        match matches.len() {
            0 => Err(RecordError::NotFound {
                collection: collection.name().to_string(),
            }
            .into()),
            1 => Ok(matches.remove(0)),
            n => Err(RecordError::MultipleMatches {
                collection: collection.name().to_string(),
                count: n,
            }
            .into()),
        }
    }
}

/// A [`ScopedStore`] view with the collection argument fixed.
///
/// This is the per-entity convenience surface: the scoping logic lives once
/// in [`ScopedStore`], and handles merely forward to it.
///
/// ```ignore
/// let licenses = store.collection(&collections::LICENSES);
/// let license = licenses.create(json!({"number": "LIC-1"})).await?;
/// let all = licenses.find(Filter::new()).await?;
/// ```
pub struct CollectionHandle<'a, S> {
    store: &'a ScopedStore<S>,
    collection: &'a Collection,
}

impl<'a, S: RecordStore> CollectionHandle<'a, S> {
    /// The collection this handle addresses.
    pub fn collection(&self) -> &Collection {
        self.collection
    }

    /// See [`ScopedStore::find`].
    pub async fn find(&self, filter: Filter) -> StoreResult<Vec<StoredRecord>> {
        self.store.find(self.collection, filter).await
    }

    /// See [`ScopedStore::find_one`].
    pub async fn find_one(&self, filter: Filter) -> StoreResult<Option<StoredRecord>> {
        self.store.find_one(self.collection, filter).await
    }

    /// See [`ScopedStore::get`].
    pub async fn get(&self, id: &str) -> StoreResult<Option<StoredRecord>> {
        self.store.get(self.collection, id).await
    }

    /// See [`ScopedStore::create`].
    pub async fn create(&self, payload: Value) -> StoreResult<StoredRecord> {
        self.store.create(self.collection, payload).await
    }

    /// See [`ScopedStore::update`].
    pub async fn update(&self, filter: Filter, payload: Value) -> StoreResult<StoredRecord> {
        self.store.update(self.collection, filter, payload).await
    }

    /// See [`ScopedStore::delete`].
    pub async fn delete(&self, filter: Filter) -> StoreResult<StoredRecord> {
        self.store.delete(self.collection, filter).await
    }

    /// See [`ScopedStore::count`].
    pub async fn count(&self, filter: Filter) -> StoreResult<u64> {
        self.store.count(self.collection, filter).await
    }
}
