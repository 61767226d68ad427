//! docintake server - HTTP API for identity-document form submissions
//!
//! Clients submit the front of a document (text fields plus an optional
//! image) and the back of the document as two independent requests, then
//! fetch both halves together by document number.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `POST /saveUserDetails` - multipart: `name`, `dob`, `gender`, `adharNumber`, optional `image`
//! - `POST /saveBackDetails` - JSON or form: `address`, `pincode`, `reenterAdhar`
//! - `GET /getAadharDetails/{adharNumber}` - `{frontDetails, backDetails}` or 404
//! - `GET /uploads/*` - stored images
//! - `GET /health`, `GET /ready`, `GET /metrics` - probes and Prometheus metrics
//!
//! Errors are always `{"error": "<message>"}`; causes are logged, not returned.

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
