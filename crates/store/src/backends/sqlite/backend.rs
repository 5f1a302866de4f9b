//! SQLite backend implementation.

use std::fmt::Debug;
use std::path::Path;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{BackendError, StoreError, StoreResult};

use super::schema;

/// SQLite-backed record store.
///
/// All tenants share one schema: a single `records` table with a
/// non-nullable `tenant_id` column, plus the `tenants` registry table.
/// Connections come from an `r2d2` pool whose init hook applies the
/// per-connection PRAGMAs, so every pooled connection carries the same
/// settings.
///
/// In-memory mode uses a named shared-cache database so that all pooled
/// connections see the same data; each `SqliteStore` instance gets its own
/// name, keeping test instances isolated from one another.
pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
    config: SqliteStoreConfig,
    is_memory: bool,
}

impl Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("config", &self.config)
            .field("is_memory", &self.is_memory)
            .finish_non_exhaustive()
    }
}

/// Configuration for the SQLite backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteStoreConfig {
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of idle connections.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection checkout timeout in milliseconds.
    #[serde(default = "default_connection_timeout_ms")]
    pub connection_timeout_ms: u64,

    /// SQLite busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u32,

    /// Enable WAL mode for better concurrency.
    #[serde(default = "default_true")]
    pub enable_wal: bool,

    /// Enable foreign key constraints.
    #[serde(default = "default_true")]
    pub enable_foreign_keys: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout_ms() -> u64 {
    30000
}

fn default_busy_timeout_ms() -> u32 {
    5000
}

fn default_true() -> bool {
    true
}

impl Default for SqliteStoreConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connection_timeout_ms: default_connection_timeout_ms(),
            busy_timeout_ms: default_busy_timeout_ms(),
            enable_wal: true,
            enable_foreign_keys: true,
        }
    }
}

impl SqliteStore {
    /// Creates a new in-memory store.
    pub fn in_memory() -> StoreResult<Self> {
        // A unique shared-cache name per instance: every pooled connection
        // shares the data, separate instances do not.
        let uri = format!("file:dalali-{}?mode=memory&cache=shared", Uuid::new_v4());
        Self::build(&uri, SqliteStoreConfig::default(), true)
    }

    /// Opens or creates a file-based database.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::with_config(path, SqliteStoreConfig::default())
    }

    /// Opens or creates a file-based database with custom configuration.
    pub fn with_config<P: AsRef<Path>>(path: P, config: SqliteStoreConfig) -> StoreResult<Self> {
        let path = path.as_ref().to_string_lossy().into_owned();
        Self::build(&path, config, false)
    }

    fn build(path: &str, config: SqliteStoreConfig, is_memory: bool) -> StoreResult<Self> {
        let pragmas = Self::connection_pragmas(&config);
        // WAL only applies to file databases; journal_mode returns a row, so
        // it goes through pragma_update rather than the batch.
        let enable_wal = config.enable_wal && !is_memory;
        let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            conn.execute_batch(&pragmas)?;
            if enable_wal {
                conn.pragma_update(None, "journal_mode", "WAL")?;
            }
            Ok(())
        });

        let pool = Pool::builder()
            .max_size(config.max_connections)
            .min_idle(Some(config.min_connections))
            .connection_timeout(std::time::Duration::from_millis(
                config.connection_timeout_ms,
            ))
            .build(manager)
            .map_err(|e| {
                StoreError::Backend(BackendError::Unavailable {
                    reason: format!("failed to build sqlite pool: {}", e),
                })
            })?;

        Ok(Self {
            pool,
            config,
            is_memory,
        })
    }

    /// PRAGMA batch applied to every new pooled connection.
    fn connection_pragmas(config: &SqliteStoreConfig) -> String {
        let mut pragmas = format!("PRAGMA busy_timeout = {};", config.busy_timeout_ms);
        if config.enable_foreign_keys {
            pragmas.push_str("PRAGMA foreign_keys = ON;");
        }
        pragmas
    }

    /// Initializes the database schema, applying any pending migrations.
    /// Idempotent; call once at startup.
    pub fn init_schema(&self) -> StoreResult<()> {
        let conn = self.get_connection()?;
        schema::initialize_schema(&conn)
    }

    /// The active configuration.
    pub fn config(&self) -> &SqliteStoreConfig {
        &self.config
    }

    /// Gets a connection from the pool.
    pub(crate) fn get_connection(&self) -> StoreResult<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(StoreError::from)
    }
}
