use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use store::{FileStore, LookupPolicy, RecordStore};

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Front/back record tables (pooled)
    pub records: RecordStore,

    /// Uploaded image directory
    pub files: FileStore,

    /// Prometheus render handle, present when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
}

impl ServerState {
    /// Create new server state from configuration.
    ///
    /// The record pool is created lazily, so an unreachable database does not
    /// stop the server from starting; it is reported as a warning and through
    /// `/ready` until it recovers.
    pub async fn new(config: ServerConfig) -> ServerResult<Self> {
        let records = RecordStore::open(&config.backend())
            .await
            .map_err(|e| ServerError::Config(format!("record store: {e}")))?;
        let files = FileStore::open(&config.upload_dir)
            .await
            .map_err(|e| ServerError::Config(format!("upload directory: {e}")))?;

        match records.ping().await {
            Ok(()) => tracing::info!("Connected to the record store"),
            Err(e) => tracing::warn!(error = %e, "Record store not reachable at startup"),
        }

        Ok(Self::with_stores(config, records, files))
    }

    /// Assemble state from already opened stores.
    pub fn with_stores(config: ServerConfig, records: RecordStore, files: FileStore) -> Self {
        Self {
            config: Arc::new(config),
            records,
            files,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn lookup_policy(&self) -> LookupPolicy {
        self.config.lookup_policy()
    }
}
