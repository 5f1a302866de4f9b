//! Server configuration for the Dalali REST API.
//!
//! Supports programmatic configuration, command line arguments, and
//! environment variable overrides.
//!
//! There is deliberately no "default tenant" setting: a request that cannot
//! be resolved to a tenant is rejected, never silently attributed.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DALALI_SERVER_PORT` | 8080 | Server port |
//! | `DALALI_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `DALALI_LOG_LEVEL` | info | Log level |
//! | `DALALI_MAX_BODY_SIZE` | 1048576 | Max request body (bytes) |
//! | `DALALI_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `DALALI_ENABLE_CORS` | true | Enable CORS |
//! | `DALALI_CORS_ORIGINS` | * | Allowed origins |
//! | `DALALI_CORS_METHODS` | GET,POST,PUT,DELETE,OPTIONS | Allowed methods |
//! | `DALALI_CORS_HEADERS` | Content-Type,... | Allowed headers |
//! | `DALALI_BASE_URL` | http://localhost:8080 | Server base URL |
//! | `DALALI_DATABASE_URL` | (none) | SQLite database path; in-memory if unset |
//! | `DALALI_ENABLE_REQUEST_ID` | true | Attach request IDs |
//! | `DALALI_DEFAULT_LIMIT` | 50 | Default list page size |
//! | `DALALI_MAX_LIMIT` | 500 | Maximum list page size |
//!
//! # Example
//!
//! ```rust
//! use dalali_rest::ServerConfig;
//!
//! // Create from environment
//! let config = ServerConfig::from_env();
//!
//! // Or create programmatically
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     ..Default::default()
//! };
//! ```

use clap::Parser;
use url::Url;

/// Server configuration for the Dalali REST API.
///
/// Constructed from environment variables using [`ServerConfig::from_env`],
/// from command line arguments using [`ServerConfig::parse`], or
/// programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "dalali")]
#[command(about = "Dalali brokerage platform API server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "DALALI_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "DALALI_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "DALALI_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Maximum request body size in bytes.
    #[arg(long, env = "DALALI_MAX_BODY_SIZE", default_value = "1048576")]
    pub max_body_size: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "DALALI_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "DALALI_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "DALALI_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(
        long,
        env = "DALALI_CORS_METHODS",
        default_value = "GET,POST,PUT,DELETE,OPTIONS"
    )]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "DALALI_CORS_HEADERS",
        default_value = "Content-Type,Authorization,Accept,X-Tenant-Id,X-Request-Id"
    )]
    pub cors_headers: String,

    /// Base URL for the server (used in Location headers).
    #[arg(long, env = "DALALI_BASE_URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    /// SQLite database path. Uses an in-memory database when unset.
    #[arg(long, env = "DALALI_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Enable request ID tracking.
    #[arg(long, env = "DALALI_ENABLE_REQUEST_ID", default_value = "true")]
    pub enable_request_id: bool,

    /// Default page size for list results.
    #[arg(long, env = "DALALI_DEFAULT_LIMIT", default_value = "50")]
    pub default_limit: usize,

    /// Maximum page size for list results.
    #[arg(long, env = "DALALI_MAX_LIMIT", default_value = "500")]
    pub max_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            max_body_size: 1024 * 1024, // 1MB
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,PUT,DELETE,OPTIONS".to_string(),
            cors_headers: "Content-Type,Authorization,Accept,X-Tenant-Id,X-Request-Id"
                .to_string(),
            base_url: "http://localhost:8080".to_string(),
            database_url: None,
            enable_request_id: true,
            default_limit: 50,
            max_limit: 500,
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// Convenience method that parses environment variables without
    /// requiring command line arguments.
    pub fn from_env() -> Self {
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.max_body_size == 0 {
            errors.push("Max body size cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.default_limit == 0 {
            errors.push("Default limit cannot be 0".to_string());
        }

        if self.default_limit > self.max_limit {
            errors.push("Default limit cannot exceed max limit".to_string());
        }

        if let Err(e) = Url::parse(&self.base_url) {
            errors.push(format!("Base URL is not a valid URL: {}", e));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// Uses an ephemeral port and disables features that might interfere
    /// with tests.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            host: "127.0.0.1".to_string(),
            log_level: "debug".to_string(),
            max_body_size: 1024 * 1024,
            request_timeout: 5, // Shorter timeout for tests
            enable_cors: false,
            cors_origins: "*".to_string(),
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            base_url: "http://localhost:0".to_string(),
            database_url: None,
            enable_request_id: false,
            default_limit: 10,
            max_limit: 100,
        }
    }
}
