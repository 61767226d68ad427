//! API route handlers
//!
//! - `front`: front-of-document submission (multipart, optional image)
//! - `back`: back-of-document submission (JSON or urlencoded form)
//! - `details`: combined lookup by document number
//! - `health`: liveness, readiness and metrics

pub mod back;
pub mod details;
pub mod front;
pub mod health;

use crate::error::ServerError;
use serde::{Deserialize, Serialize};

/// Success body for the submission endpoints: `{"message": "..."}`
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Fails with 400 when a form field was not sent at all.
pub(crate) fn required(value: Option<String>, field: &str) -> Result<String, ServerError> {
    value.ok_or_else(|| ServerError::BadRequest(format!("Missing required field: {field}")))
}

/// 404 Not Found handler
///
/// Returns a standardized error response for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
