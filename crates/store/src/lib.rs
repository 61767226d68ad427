//! # docintake store
//!
//! Persistence for identity-document submissions. Two independent pieces live
//! here:
//!
//! - [`RecordStore`]: front and back halves of a document form, kept in two
//!   tables with no foreign key between them. Records are correlated at read
//!   time by the document number the caller supplies.
//! - [`FileStore`]: uploaded images written to a directory under generated,
//!   collision-resistant names.
//!
//! Storage for records is pluggable through the [`RecordBackend`] trait. A
//! SQLite backend (pooled, via `sqlx`) is the default; an in-memory backend is
//! available for tests and throwaway runs.
//!
//! ## Example
//!
//! ```
//! use store::{BackendConfig, NewBackRecord, NewFrontRecord, RecordStore};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), store::StoreError> {
//! let records = RecordStore::open(&BackendConfig::in_memory()).await?;
//!
//! records
//!     .insert_front(&NewFrontRecord {
//!         name: "Asha".into(),
//!         date_of_birth: "1990-01-01".into(),
//!         gender: "F".into(),
//!         document_number: "1234".into(),
//!         image_path: None,
//!     })
//!     .await?;
//! records
//!     .insert_back(&NewBackRecord {
//!         address: "12 Lake Road".into(),
//!         postal_code: "560001".into(),
//!         document_number_restated: "1234".into(),
//!     })
//!     .await?;
//!
//! let details = records.find_by_document_number("1234").await?;
//! assert!(details.is_complete());
//! # Ok(())
//! # }
//! ```

mod backend;
mod error;
mod files;
mod record;

pub use backend::{BackendConfig, InMemoryBackend, RecordBackend, SqliteBackend};
pub use error::StoreError;
pub use files::{FileStore, StoredFile};
pub use record::{BackRecord, DocumentDetails, FrontRecord, LookupPolicy, NewBackRecord, NewFrontRecord};

use std::sync::Arc;

/// Handle to the record tables.
///
/// Cheap to clone; all clones share the same backend (and, for SQLite, the same
/// connection pool).
#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn RecordBackend>,
}

impl RecordStore {
    /// Build the configured backend and wrap it.
    pub async fn open(config: &BackendConfig) -> Result<Self, StoreError> {
        let backend = config.build().await?;
        Ok(Self::with_backend(backend))
    }

    /// Wrap an already constructed backend.
    pub fn with_backend(backend: Arc<dyn RecordBackend>) -> Self {
        Self { backend }
    }

    /// Insert one front-of-document row and return its id.
    pub async fn insert_front(&self, record: &NewFrontRecord) -> Result<i64, StoreError> {
        let id = self.backend.insert_front(record).await?;
        tracing::debug!(id, "front record inserted");
        Ok(id)
    }

    /// Insert one back-of-document row and return its id.
    pub async fn insert_back(&self, record: &NewBackRecord) -> Result<i64, StoreError> {
        let id = self.backend.insert_back(record).await?;
        tracing::debug!(id, "back record inserted");
        Ok(id)
    }

    /// Look up both halves for `document_number`.
    ///
    /// The two queries run concurrently. Each side yields its first match by
    /// id; duplicates are ignored. A failure on either side fails the call.
    pub async fn find_by_document_number(
        &self,
        document_number: &str,
    ) -> Result<DocumentDetails, StoreError> {
        let (front, back) = tokio::try_join!(
            self.backend.first_front(document_number),
            self.backend.first_back(document_number),
        )?;
        Ok(DocumentDetails { front, back })
    }

    /// Check that the backend can serve queries.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.backend.ping().await
    }
}
