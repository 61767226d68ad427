//! Server initialization and routing
//!
//! This module handles the Axum server setup including:
//! - Router configuration for the submission, lookup and probe endpoints
//! - Middleware stack (logging, request ids, CORS, timeouts, panic catching)
//! - Graceful shutdown handling

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::middleware::{log_requests, request_id};
use crate::routes::{back, details, front, health, not_found};
use crate::state::ServerState;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware
///
/// Middleware stack, outermost first:
/// 1. Panic catching (any handler panic becomes a JSON 500)
/// 2. HTTP tracing
/// 3. Request ID tracking
/// 4. Request logging
/// 5. CORS
/// 6. Compression
/// 7. Timeout handling
/// 8. Body size limit
pub fn build_router(state: Arc<ServerState>) -> Router {
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(AnyOrigin)
            .allow_methods(AnyOrigin)
            .allow_headers(AnyOrigin)
    } else {
        CorsLayer::new()
    };

    let probe_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics));

    let api_routes = Router::new()
        .route("/saveUserDetails", post(front::save_user_details))
        .route("/saveBackDetails", post(back::save_back_details))
        .route(
            "/getAadharDetails/{adhar_number}",
            get(details::get_aadhar_details),
        );

    Router::new()
        .merge(probe_routes)
        .merge(api_routes)
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(state.config.max_body_size()))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.timeout(),
        ))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ServerError::Internal(format!("handler panicked: {detail}")).into_response()
}

/// Start the docintake HTTP server
///
/// Sets up JSON logging, opens the record and file stores, installs the
/// Prometheus recorder when enabled, then serves until SIGTERM or Ctrl+C.
///
/// A record store that cannot be reached at startup is logged and the server
/// keeps running; requests return 500 until the database comes back.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json()
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    let mut state = ServerState::new(config.clone()).await?;
    if config.metrics_enabled {
        let handle = PrometheusBuilder::new().install_recorder()?;
        state = state.with_metrics(handle);
    }

    let app = build_router(Arc::new(state));
    let addr: SocketAddr = config.socket_addr()?;

    tracing::info!("Starting docintake server on {}", addr);
    tracing::info!(
        "Timeout: {}s, Max body: {}MB",
        config.timeout_secs,
        config.max_body_size_mb
    );
    tracing::info!(
        "Uploads: {}, Require both halves: {}",
        config.upload_dir.display(),
        config.require_both
    );
    tracing::info!(
        "CORS: {}, Metrics: {}",
        config.enable_cors,
        config.metrics_enabled
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
