use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use store::StoreError;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
///
/// Each variant carries the cause for the logs; clients only ever see the
/// fixed message from [`ServerError::public_message`].
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Error saving user details: {0}")]
    SaveFront(#[source] StoreError),

    #[error("Error saving back details: {0}")]
    SaveBack(#[source] StoreError),

    #[error("Error fetching Aadhar details: {0}")]
    Lookup(#[source] StoreError),

    #[error("Aadhar details not found")]
    DetailsNotFound,

    #[error("Record store unavailable: {0}")]
    Unavailable(#[source] StoreError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

/// API error response body: `{"error": "..."}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::DetailsNotFound | ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::SaveFront(_)
            | ServerError::SaveBack(_)
            | ServerError::Lookup(_)
            | ServerError::Internal(_)
            | ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client
    pub fn public_message(&self) -> String {
        match self {
            ServerError::BadRequest(reason) => reason.clone(),
            ServerError::PayloadTooLarge(_) => "Payload too large".to_string(),
            ServerError::SaveFront(_) => "Error saving user details".to_string(),
            ServerError::SaveBack(_) => "Error saving back details".to_string(),
            ServerError::Lookup(_) => "Error fetching Aadhar details".to_string(),
            ServerError::DetailsNotFound => "Aadhar details not found".to_string(),
            ServerError::Unavailable(_) => "Service unavailable".to_string(),
            ServerError::Internal(_) | ServerError::Config(_) => {
                "Internal Server Error".to_string()
            }
            ServerError::NotFound => "Not Found".to_string(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "request rejected");
        }

        let body = Json(ErrorResponse {
            error: self.public_message(),
        });

        (status, body).into_response()
    }
}

impl From<std::net::AddrParseError> for ServerError {
    fn from(err: std::net::AddrParseError) -> Self {
        ServerError::Config(format!("Invalid address: {err}"))
    }
}

impl From<MultipartError> for ServerError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ServerError::PayloadTooLarge(err.body_text())
        } else {
            ServerError::BadRequest(format!("Malformed multipart body: {}", err.body_text()))
        }
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}
