//! RecordStore implementation for SQLite.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter};
use serde_json::Value;

use crate::core::{
    Collection, Filter, ID_FIELD, RecordStore, StoredRecord, TENANT_ID_FIELD, TenantRecord,
    content_field,
};
use crate::error::{BackendError, RecordError, StoreError, StoreResult, ValidationError};
use crate::tenant::TenantId;

use super::SqliteStore;

fn internal_error(message: String) -> StoreError {
    StoreError::Backend(BackendError::Internal { message })
}

fn serialization_error(message: String) -> StoreError {
    StoreError::Backend(BackendError::Serialization { message })
}

fn invalid_filter_value(field: &str, reason: &str) -> StoreError {
    StoreError::Validation(ValidationError::InvalidFieldValue {
        field: field.to_string(),
        reason: reason.to_string(),
    })
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    // Fixed-width UTC so lexicographic string order is chronological order;
    // ORDER BY created_at relies on it.
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| internal_error(format!("Failed to parse stored timestamp '{}': {}", raw, e)))
}

/// Converts a JSON scalar into a bindable SQL value.
///
/// `json_extract` yields TEXT for strings, INTEGER for booleans and whole
/// numbers, REAL otherwise, so these bindings compare correctly against
/// extracted content. Arrays and objects have no equality mapping and are
/// rejected up front.
fn bind_value(field: &str, value: &Value) -> StoreResult<SqlValue> {
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::Bool(b) => Ok(SqlValue::Integer(i64::from(*b))),
        Value::String(s) => Ok(SqlValue::Text(s.clone())),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(SqlValue::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(SqlValue::Real(f))
            } else {
                Err(invalid_filter_value(field, "number out of range"))
            }
        }
        Value::Array(_) | Value::Object(_) => Err(invalid_filter_value(
            field,
            "arrays and objects cannot be matched for equality",
        )),
    }
}

/// Appends `AND ...` predicates for every filter condition.
///
/// `tenant_id` and `id` hit real columns; every other field is looked up in
/// the JSON content. Field names reach SQL only as bound `$.`-path
/// parameters, never by interpolation.
fn push_conditions(
    filter: &Filter,
    sql: &mut String,
    bindings: &mut Vec<SqlValue>,
) -> StoreResult<()> {
    for condition in filter.conditions() {
        match condition.field.as_str() {
            TENANT_ID_FIELD => {
                sql.push_str(" AND tenant_id = ?");
                bindings.push(bind_value(TENANT_ID_FIELD, &condition.value)?);
            }
            ID_FIELD => {
                sql.push_str(" AND id = ?");
                bindings.push(bind_value(ID_FIELD, &condition.value)?);
            }
            field => {
                if condition.value.is_null() {
                    // Matches both an explicit null and an absent field.
                    sql.push_str(" AND json_extract(content, ?) IS NULL");
                    bindings.push(SqlValue::Text(format!("$.{}", field)));
                } else {
                    sql.push_str(" AND json_extract(content, ?) = ?");
                    bindings.push(SqlValue::Text(format!("$.{}", field)));
                    bindings.push(bind_value(field, &condition.value)?);
                }
            }
        }
    }
    Ok(())
}

type RecordRow = (String, String, String, String, String);

fn read_record_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RecordRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn build_record(collection: &str, row: RecordRow) -> StoreResult<StoredRecord> {
    let (id, tenant_id, content, created_at, updated_at) = row;
    let content: Value = serde_json::from_str(&content)
        .map_err(|e| serialization_error(format!("Failed to deserialize record content: {}", e)))?;
    Ok(StoredRecord::from_parts(
        collection,
        id,
        TenantId::new(tenant_id),
        content,
        parse_timestamp(&created_at)?,
        parse_timestamp(&updated_at)?,
    ))
}

/// Maps a constraint failure on the records table to its domain error.
///
/// Per-tenant unique indexes are named `uniq_{collection}_{field}`, so the
/// violated index names the duplicated field. A primary-key collision that
/// slipped past the existence pre-check surfaces as `AlreadyExists`.
fn map_constraint_error(
    collection: &Collection,
    record: &StoredRecord,
    err: rusqlite::Error,
) -> StoreError {
    if let rusqlite::Error::SqliteFailure(inner, Some(message)) = &err {
        if inner.code == rusqlite::ErrorCode::ConstraintViolation {
            if let Some(field) = collection.unique_field() {
                if message.contains(&format!("uniq_{}_{}", collection.name(), field)) {
                    let value = content_field(record.content(), field)
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string();
                    return StoreError::Record(RecordError::DuplicateKey {
                        collection: collection.name().to_string(),
                        field: field.to_string(),
                        value,
                    });
                }
            }
            if message.contains("records.collection") {
                return StoreError::Record(RecordError::AlreadyExists {
                    collection: collection.name().to_string(),
                    id: record.id().to_string(),
                });
            }
        }
    }
    internal_error(format!("Failed to write record: {}", err))
}

#[async_trait]
impl RecordStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn find(
        &self,
        collection: &Collection,
        filter: &Filter,
        limit: Option<usize>,
    ) -> StoreResult<Vec<StoredRecord>> {
        let conn = self.get_connection()?;

        let mut sql = String::from(
            "SELECT id, tenant_id, content, created_at, updated_at \
             FROM records WHERE collection = ?",
        );
        let mut bindings: Vec<SqlValue> = vec![SqlValue::Text(collection.name().to_string())];
        push_conditions(filter, &mut sql, &mut bindings)?;
        sql.push_str(" ORDER BY created_at ASC, id ASC");
        if let Some(limit) = limit {
            sql.push_str(" LIMIT ?");
            bindings.push(SqlValue::Integer(limit as i64));
        }

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| internal_error(format!("Failed to prepare find query: {}", e)))?;
        let rows = stmt
            .query_map(params_from_iter(bindings), read_record_row)
            .map_err(|e| internal_error(format!("Failed to execute find query: {}", e)))?;

        let mut records = Vec::new();
        for row in rows {
            let row = row.map_err(|e| internal_error(format!("Failed to read row: {}", e)))?;
            records.push(build_record(collection.name(), row)?);
        }
        Ok(records)
    }

    async fn get(&self, collection: &Collection, id: &str) -> StoreResult<Option<StoredRecord>> {
        let conn = self.get_connection()?;

        let result = conn.query_row(
            "SELECT id, tenant_id, content, created_at, updated_at \
             FROM records WHERE collection = ?1 AND id = ?2",
            params![collection.name(), id],
            read_record_row,
        );

        match result {
            Ok(row) => Ok(Some(build_record(collection.name(), row)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(internal_error(format!("Failed to read record: {}", e))),
        }
    }

    async fn insert(&self, collection: &Collection, record: &StoredRecord) -> StoreResult<()> {
        let conn = self.get_connection()?;

        let exists: bool = conn
            .query_row(
                "SELECT 1 FROM records WHERE collection = ?1 AND id = ?2",
                params![collection.name(), record.id()],
                |_| Ok(true),
            )
            .unwrap_or(false);
        if exists {
            return Err(StoreError::Record(RecordError::AlreadyExists {
                collection: collection.name().to_string(),
                id: record.id().to_string(),
            }));
        }

        let content = serde_json::to_string(record.content()).map_err(|e| {
            serialization_error(format!("Failed to serialize record content: {}", e))
        })?;

        conn.execute(
            "INSERT INTO records (collection, id, tenant_id, content, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                collection.name(),
                record.id(),
                record.tenant_id().as_str(),
                content,
                format_timestamp(record.created_at()),
                format_timestamp(record.updated_at()),
            ],
        )
        .map_err(|e| map_constraint_error(collection, record, e))?;

        Ok(())
    }

    async fn update(&self, collection: &Collection, record: &StoredRecord) -> StoreResult<bool> {
        let conn = self.get_connection()?;

        let content = serde_json::to_string(record.content()).map_err(|e| {
            serialization_error(format!("Failed to serialize record content: {}", e))
        })?;

        // Addressed by owning tenant as well as id, so a row that changed
        // hands (or never belonged to this tenant) reports no match rather
        // than being overwritten.
        let rows = conn
            .execute(
                "UPDATE records SET content = ?1, updated_at = ?2 \
                 WHERE collection = ?3 AND id = ?4 AND tenant_id = ?5",
                params![
                    content,
                    format_timestamp(record.updated_at()),
                    collection.name(),
                    record.id(),
                    record.tenant_id().as_str(),
                ],
            )
            .map_err(|e| map_constraint_error(collection, record, e))?;

        Ok(rows > 0)
    }

    async fn remove(
        &self,
        collection: &Collection,
        id: &str,
        tenant_id: &TenantId,
    ) -> StoreResult<bool> {
        let conn = self.get_connection()?;

        let rows = conn
            .execute(
                "DELETE FROM records WHERE collection = ?1 AND id = ?2 AND tenant_id = ?3",
                params![collection.name(), id, tenant_id.as_str()],
            )
            .map_err(|e| internal_error(format!("Failed to delete record: {}", e)))?;

        Ok(rows > 0)
    }

    async fn count(&self, collection: &Collection, filter: &Filter) -> StoreResult<u64> {
        let conn = self.get_connection()?;

        let mut sql = String::from("SELECT COUNT(*) FROM records WHERE collection = ?");
        let mut bindings: Vec<SqlValue> = vec![SqlValue::Text(collection.name().to_string())];
        push_conditions(filter, &mut sql, &mut bindings)?;

        let count: i64 = conn
            .query_row(&sql, params_from_iter(bindings), |row| row.get(0))
            .map_err(|e| internal_error(format!("Failed to count records: {}", e)))?;

        Ok(count as u64)
    }

    async fn create_tenant(&self, tenant: &TenantRecord) -> StoreResult<()> {
        let conn = self.get_connection()?;

        let exists: bool = conn
            .query_row(
                "SELECT 1 FROM tenants WHERE id = ?1",
                params![tenant.id.as_str()],
                |_| Ok(true),
            )
            .unwrap_or(false);
        if exists {
            return Err(StoreError::Record(RecordError::AlreadyExists {
                collection: "tenants".to_string(),
                id: tenant.id.as_str().to_string(),
            }));
        }

        conn.execute(
            "INSERT INTO tenants (id, display_name, slug, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                tenant.id.as_str(),
                tenant.display_name,
                tenant.slug,
                format_timestamp(tenant.created_at),
            ],
        )
        .map_err(|e| match &e {
            rusqlite::Error::SqliteFailure(inner, Some(message))
                if inner.code == rusqlite::ErrorCode::ConstraintViolation
                    && message.contains("tenants.slug") =>
            {
                StoreError::Record(RecordError::DuplicateKey {
                    collection: "tenants".to_string(),
                    field: "slug".to_string(),
                    value: tenant.slug.clone(),
                })
            }
            _ => internal_error(format!("Failed to insert tenant: {}", e)),
        })?;

        Ok(())
    }

    async fn get_tenant(&self, id: &TenantId) -> StoreResult<Option<TenantRecord>> {
        let conn = self.get_connection()?;

        let result = conn.query_row(
            "SELECT id, display_name, slug, created_at FROM tenants WHERE id = ?1",
            params![id.as_str()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        );

        match result {
            Ok((id, display_name, slug, created_at)) => Ok(Some(TenantRecord {
                id: TenantId::new(id),
                display_name,
                slug,
                created_at: parse_timestamp(&created_at)?,
            })),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(internal_error(format!("Failed to read tenant: {}", e))),
        }
    }

    async fn list_tenants(&self) -> StoreResult<Vec<TenantRecord>> {
        let conn = self.get_connection()?;

        let mut stmt = conn
            .prepare("SELECT id, display_name, slug, created_at FROM tenants ORDER BY id ASC")
            .map_err(|e| internal_error(format!("Failed to prepare tenant query: {}", e)))?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(|e| internal_error(format!("Failed to list tenants: {}", e)))?;

        let mut tenants = Vec::new();
        for row in rows {
            let (id, display_name, slug, created_at) =
                row.map_err(|e| internal_error(format!("Failed to read tenant row: {}", e)))?;
            tenants.push(TenantRecord {
                id: TenantId::new(id),
                display_name,
                slug,
                created_at: parse_timestamp(&created_at)?,
            });
        }
        Ok(tenants)
    }

    async fn health_check(&self) -> StoreResult<()> {
        let conn = self.get_connection()?;
        conn.query_row("SELECT 1", [], |_| Ok(())).map_err(|e| {
            StoreError::Backend(BackendError::Unavailable {
                reason: format!("health probe failed: {}", e),
            })
        })?;
        Ok(())
    }
}
