use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use store::{BackendConfig, LookupPolicy};

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB (applies to image uploads)
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Enable permissive CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level / `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Expose Prometheus metrics at `/metrics`
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Directory that receives uploaded images and is served under `/uploads`
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Record database URL. `memory` selects the in-process backend.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Connection pool size
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// A lookup is only found when both the front and the back row exist
    #[serde(default = "default_true")]
    pub require_both: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            metrics_enabled: default_true(),
            upload_dir: default_upload_dir(),
            database_url: default_database_url(),
            db_max_connections: default_db_max_connections(),
            require_both: default_true(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from config files and environment variables.
    ///
    /// Sources, lowest precedence first: `docintake.{toml,yaml,json}` in the
    /// working directory, `DOCINTAKE__*` variables, then a bare `PORT`.
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("docintake").required(false))
            .add_source(config::Environment::with_prefix("DOCINTAKE").separator("__"));

        let mut config: ServerConfig = builder.build()?.try_deserialize()?;

        if let Ok(port) = std::env::var("PORT") {
            config.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid PORT {port:?}: {e}"))?;
        }

        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb.saturating_mul(1024 * 1024)
    }

    /// Record backend selected by `database_url`
    pub fn backend(&self) -> BackendConfig {
        if self.database_url == "memory" {
            BackendConfig::in_memory()
        } else {
            BackendConfig::sqlite(self.database_url.clone(), self.db_max_connections)
        }
    }

    pub fn lookup_policy(&self) -> LookupPolicy {
        LookupPolicy::from_require_both(self.require_both)
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size_mb() -> usize {
    25
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_database_url() -> String {
    "sqlite://docintake.db".to_string()
}

fn default_db_max_connections() -> u32 {
    5
}
