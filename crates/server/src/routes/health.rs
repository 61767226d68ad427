use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use std::time::SystemTime;

/// Global server start time for uptime calculation
static SERVER_START_TIME: once_cell::sync::Lazy<SystemTime> =
    once_cell::sync::Lazy::new(SystemTime::now);

fn uptime_seconds() -> u64 {
    SERVER_START_TIME
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Health check endpoint (liveness)
/// Returns 200 if server is running
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "docintake-server",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
    }))
}

/// Readiness check endpoint
///
/// 200 once the record store answers a query, 503 otherwise.
pub async fn readiness_check(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    state.records.ping().await.map_err(ServerError::Unavailable)?;

    Ok(Json(json!({
        "status": "ready",
        "service": "docintake-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
        "components": {
            "api": "ready",
            "records": "ready",
        }
    })))
}

/// Prometheus metrics endpoint
pub async fn metrics(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    let handle = state.metrics.as_ref().ok_or(ServerError::NotFound)?;
    Ok((
        [(CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    ))
}
