//! Collection registry for tenant-owned entities.
//!
//! Every tenant-owned entity type is described once here: its collection
//! name and, where the domain requires it, the content field that must be
//! unique *within a tenant* (a license number is unique per tenant, not
//! globally). The registry is the schema's source of truth for per-tenant
//! unique indexes and the REST layer's allowlist for path segments.

/// Descriptor of one tenant-owned collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collection {
    name: &'static str,
    unique_field: Option<&'static str>,
}

impl Collection {
    /// Describes a collection with no per-tenant unique key.
    pub const fn new(name: &'static str) -> Self {
        Collection {
            name,
            unique_field: None,
        }
    }

    /// Describes a collection whose `field` must be unique within a tenant.
    pub const fn with_unique_field(name: &'static str, field: &'static str) -> Self {
        Collection {
            name,
            unique_field: Some(field),
        }
    }

    /// The collection name, used as the discriminator in the shared schema.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The per-tenant unique content field, when the collection has one.
    pub fn unique_field(&self) -> Option<&'static str> {
        self.unique_field
    }
}

/// The tenant-owned collections of the brokerage platform.
pub mod collections {
    use super::Collection;

    /// Platform users: brokers, inspectors, tenant admins.
    pub const USERS: Collection = Collection::with_unique_field("users", "email");

    /// Applications to become a licensed broker.
    pub const BROKER_APPLICATIONS: Collection = Collection::new("broker_applications");

    /// Issued broker licenses. License numbers repeat across tenants but
    /// never within one.
    pub const LICENSES: Collection = Collection::with_unique_field("licenses", "number");

    /// Property listings on the marketplace.
    pub const LISTINGS: Collection = Collection::new("listings");

    /// QR codes attached to licenses and listings for field verification.
    pub const QR_CODES: Collection = Collection::with_unique_field("qr_codes", "code");

    /// Inspection events recorded by the mobile inspector app.
    pub const INSPECTION_EVENTS: Collection = Collection::new("inspection_events");

    /// Application-level audit trail entries.
    pub const AUDIT_LOGS: Collection = Collection::new("audit_logs");

    /// All registered collections, in schema order.
    pub fn all() -> &'static [Collection] {
        const ALL: [Collection; 7] = [
            USERS,
            BROKER_APPLICATIONS,
            LICENSES,
            LISTINGS,
            QR_CODES,
            INSPECTION_EVENTS,
            AUDIT_LOGS,
        ];
        &ALL
    }

    /// Looks a collection up by name.
    pub fn by_name(name: &str) -> Option<&'static Collection> {
        all().iter().find(|c| c.name() == name)
    }
}
