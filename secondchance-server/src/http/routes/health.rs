//! Health check endpoint
//!
//! Reports which store backs the API and whether it answers a ping.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: &'static str,
    pub version: &'static str,
}

/// GET /health - 200 when the store answers, 503 when it does not
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let store = state.store.kind();
    let (code, status) = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::error!(store, error = %e, "store ping failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    (
        code,
        Json(HealthResponse {
            status,
            store,
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::UnreachableStore;
    use crate::db::{ItemStore, MemoryItemStore};
    use crate::upload::UploadDir;
    use tempfile::TempDir;

    fn state(store: Arc<dyn ItemStore>, tmp: &TempDir) -> State<Arc<AppState>> {
        State(Arc::new(AppState {
            store,
            uploads: UploadDir::new(tmp.path().to_path_buf()),
        }))
    }

    #[tokio::test]
    async fn memory_store_is_healthy() {
        let tmp = TempDir::new().unwrap();
        let (code, Json(body)) = health(state(Arc::new(MemoryItemStore::new()), &tmp)).await;

        assert_eq!(code, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.store, "memory");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn unreachable_store_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        let (code, Json(body)) = health(state(Arc::new(UnreachableStore), &tmp)).await;

        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "unavailable");
        assert_eq!(body.store, "postgres");
    }
}
