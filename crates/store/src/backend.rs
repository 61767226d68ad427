use crate::record::{BackRecord, FrontRecord, NewBackRecord, NewFrontRecord};
use crate::StoreError;
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Storage for the front and back record tables.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait RecordBackend: Send + Sync {
    /// Insert a front row, returning the assigned id.
    async fn insert_front(&self, record: &NewFrontRecord) -> Result<i64, StoreError>;
    /// Insert a back row, returning the assigned id.
    async fn insert_back(&self, record: &NewBackRecord) -> Result<i64, StoreError>;
    /// First front row (lowest id) whose document number matches.
    async fn first_front(&self, document_number: &str) -> Result<Option<FrontRecord>, StoreError>;
    /// First back row (lowest id) whose restated document number matches.
    async fn first_back(&self, document_number: &str) -> Result<Option<BackRecord>, StoreError>;
    /// Cheap liveness query against the storage engine.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Selects and builds a record backend.
///
/// ```
/// use store::BackendConfig;
///
/// let config = BackendConfig::in_memory();
/// let config = BackendConfig::sqlite("sqlite://docintake.db", 5);
/// ```
#[derive(Clone, Debug, Default)]
pub enum BackendConfig {
    /// SQLite through a `sqlx` connection pool. The database file is created
    /// if missing.
    Sqlite { url: String, max_connections: u32 },
    /// Process-local vectors; lost on exit.
    #[default]
    InMemory,
}

impl BackendConfig {
    pub fn in_memory() -> Self {
        BackendConfig::InMemory
    }

    pub fn sqlite<S: Into<String>>(url: S, max_connections: u32) -> Self {
        BackendConfig::Sqlite {
            url: url.into(),
            max_connections,
        }
    }

    /// Build the backend.
    ///
    /// The SQLite pool connects lazily, so an unreachable database does not
    /// fail here; it surfaces on the first query (or [`RecordBackend::ping`]).
    pub async fn build(&self) -> Result<Arc<dyn RecordBackend>, StoreError> {
        match self {
            BackendConfig::InMemory => Ok(Arc::new(InMemoryBackend::new())),
            BackendConfig::Sqlite {
                url,
                max_connections,
            } => Ok(Arc::new(SqliteBackend::connect_lazy(url, *max_connections)?)),
        }
    }
}

#[derive(Default)]
struct Tables {
    front: Vec<FrontRecord>,
    back: Vec<BackRecord>,
}

/// An in-memory backend using a `RwLock` around two row vectors.
pub struct InMemoryBackend {
    tables: RwLock<Tables>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordBackend for InMemoryBackend {
    async fn insert_front(&self, record: &NewFrontRecord) -> Result<i64, StoreError> {
        let mut guard = self
            .tables
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        let id = guard.front.len() as i64 + 1;
        guard.front.push(record.clone().into_record(id));
        Ok(id)
    }

    async fn insert_back(&self, record: &NewBackRecord) -> Result<i64, StoreError> {
        let mut guard = self
            .tables
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        let id = guard.back.len() as i64 + 1;
        guard.back.push(record.clone().into_record(id));
        Ok(id)
    }

    async fn first_front(&self, document_number: &str) -> Result<Option<FrontRecord>, StoreError> {
        let guard = self
            .tables
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(guard
            .front
            .iter()
            .find(|row| row.document_number == document_number)
            .cloned())
    }

    async fn first_back(&self, document_number: &str) -> Result<Option<BackRecord>, StoreError> {
        let guard = self
            .tables
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(guard
            .back
            .iter()
            .find(|row| row.document_number_restated == document_number)
            .cloned())
    }
}

mod sqlite;

pub use sqlite::SqliteBackend;
