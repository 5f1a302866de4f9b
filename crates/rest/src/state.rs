//! Application state for the Dalali REST API.
//!
//! Defines the shared state available to all request handlers: the storage
//! backend and the server configuration. Note that tenant scope is *not*
//! part of this state; scope is resolved per request and travels as a
//! request extension, never as a process-wide value.

use std::sync::Arc;

use dalali_store::RecordStore;

use crate::config::ServerConfig;

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The storage backend type (must implement [`RecordStore`])
///
/// # Example
///
/// ```rust,ignore
/// use dalali_rest::{AppState, ServerConfig};
/// use dalali_store::backends::sqlite::SqliteStore;
/// use std::sync::Arc;
///
/// let store = SqliteStore::in_memory()?;
/// let config = ServerConfig::default();
/// let state = AppState::new(Arc::new(store), config);
/// ```
pub struct AppState<S> {
    /// The storage backend.
    storage: Arc<S>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: RecordStore> AppState<S> {
    /// Creates a new AppState with the given storage and configuration.
    ///
    /// # Arguments
    ///
    /// * `storage` - The storage backend (wrapped in Arc)
    /// * `config` - Server configuration
    pub fn new(storage: Arc<S>, config: ServerConfig) -> Self {
        Self {
            storage,
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns a clone of the storage Arc.
    pub fn storage_arc(&self) -> Arc<S> {
        Arc::clone(&self.storage)
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the base URL for the server.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Returns the default page size for list results.
    pub fn default_limit(&self) -> usize {
        self.config.default_limit
    }

    /// Returns the maximum page size for list results.
    pub fn max_limit(&self) -> usize {
        self.config.max_limit
    }
}
