//! Workspace umbrella crate for docintake.
//!
//! Re-exports the record and upload stores and, with the `server` feature, the
//! HTTP API, so callers can depend on a single crate.

pub use store::{
    BackRecord, BackendConfig, DocumentDetails, FileStore, FrontRecord, InMemoryBackend,
    LookupPolicy, NewBackRecord, NewFrontRecord, RecordBackend, RecordStore, SqliteBackend,
    StoreError, StoredFile,
};

#[cfg(feature = "server")]
pub use server::{ServerConfig, ServerError, ServerResult, ServerState, build_router, start_server};
