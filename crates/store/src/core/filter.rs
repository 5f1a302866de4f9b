//! Conjunctive equality filters over record fields.

use serde_json::Value;

/// Field name that addresses the owning tenant column.
///
/// The scoped store injects a condition on this field into every filter; a
/// caller-supplied condition on it that names a different tenant is a scope
/// violation.
pub const TENANT_ID_FIELD: &str = "tenant_id";

/// Field name that addresses the record id column.
pub const ID_FIELD: &str = "id";

/// One equality condition on a record field.
///
/// `tenant_id` and `id` address dedicated columns; every other field
/// addresses a path inside the record's JSON content (dots descend into
/// nested objects, e.g. `address.city`).
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Field the condition applies to.
    pub field: String,
    /// Value the field must equal. `Null` matches absent fields.
    pub value: Value,
}

/// A conjunction of equality conditions.
///
/// Filters are built by chaining [`Filter::eq`] and hold no tenant knowledge
/// of their own; the scoped store intersects every filter with the request
/// scope's tenant before it reaches a backend.
///
/// # Examples
///
/// ```
/// use dalali_store::core::Filter;
///
/// let filter = Filter::new()
///     .eq("status", "active")
///     .eq("bedrooms", 3);
///
/// assert_eq!(filter.len(), 2);
/// assert!(filter.condition_for("status").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// Creates an empty filter that matches every record.
    pub fn new() -> Self {
        Filter::default()
    }

    /// Adds an equality condition.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// The conditions in insertion order.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Returns the value of the first condition on `field`, if any.
    pub fn condition_for(&self, field: &str) -> Option<&Value> {
        self.conditions
            .iter()
            .find(|c| c.field == field)
            .map(|c| &c.value)
    }

    /// Returns true when the filter has no conditions.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Number of conditions.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }
}
