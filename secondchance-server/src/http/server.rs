//! Axum server setup
//!
//! Mounts the item routes at `/secondChanceItems`, the upload directory at
//! `/images`, and `/health`.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::db::ItemStore;
use crate::upload::{UploadDir, DEFAULT_UPLOAD_DIR, PUBLIC_PREFIX};

/// Mount point of the item routes
pub const ITEMS_PATH: &str = "/secondChanceItems";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3060)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    pub cors_permissive: bool,

    /// Where uploaded images are written and served from
    pub upload_dir: PathBuf,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Maximum request body size, which bounds upload size
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3060)),
            cors_permissive: false,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            request_timeout: Duration::from_secs(30),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn ItemStore>,
    pub uploads: UploadDir,
}

/// Build the application router.
pub fn build_router(store: Arc<dyn ItemStore>, config: &ServerConfig) -> Router {
    let state = AppState {
        store,
        uploads: UploadDir::new(config.upload_dir.clone()),
    };

    let cors = if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin([
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("http://localhost:3060"),
                HeaderValue::from_static("http://127.0.0.1:3000"),
                HeaderValue::from_static("http://127.0.0.1:3060"),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(routes::health::router())
        .nest(ITEMS_PATH, routes::items::router())
        .nest_service(PUBLIC_PREFIX, ServeDir::new(&config.upload_dir))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Run the HTTP server until Ctrl+C or SIGTERM.
pub async fn run_server(store: Arc<dyn ItemStore>, config: ServerConfig) -> Result<(), ServerError> {
    tracing::info!(
        upload_dir = %config.upload_dir.display(),
        timeout_secs = config.request_timeout.as_secs(),
        "server config loaded"
    );
    let app = build_router(store, &config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
        _ = ctrl_c => {
            tracing::warn!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::warn!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
