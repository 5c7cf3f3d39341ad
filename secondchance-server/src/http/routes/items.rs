//! Second-chance item endpoints
//!
//! Mounted under `/secondChanceItems`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::db::{ItemRepo, UpdateOutcome};
use crate::http::error::ApiError;
use crate::http::extractors::{CreateForm, PatchBody};
use crate::http::server::AppState;
use crate::models::{Item, ItemPatch};

/// PUT response
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub uploaded: &'static str,
}

/// DELETE response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: &'static str,
}

/// GET / - every item
async fn list_items(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Item>>, ApiError> {
    tracing::info!("/ called");
    let items = ItemRepo::new(state.store.as_ref()).list().await?;
    Ok(Json(items))
}

/// POST / - create an item, storing the optional image first
async fn create_item(
    State(state): State<Arc<AppState>>,
    form: CreateForm,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let file_path = match form.file {
        Some(file) => Some(state.uploads.store(&file.file_name, &file.bytes).await?),
        None => None,
    };

    let item = ItemRepo::new(state.store.as_ref())
        .create(form.fields, file_path)
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /{id} - a single item
async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    let item = ItemRepo::new(state.store.as_ref())
        .get(&id)
        .await
        .map_err(|e| ApiError::from(e).into_plain_text())?;
    Ok(Json(item))
}

/// PUT /{id} - merge category, condition, age_days, description
async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: PatchBody,
) -> Result<Json<UpdateResponse>, ApiError> {
    let repo = ItemRepo::new(state.store.as_ref());
    // 404 wins over a bad body
    let item = repo.find_existing(&id).await?;
    let patch = ItemPatch::from_fields(body.into_fields()?)?;
    let outcome = repo.apply_update(item, patch).await?;

    let uploaded = match outcome {
        UpdateOutcome::Updated(_) => "success",
        UpdateOutcome::NotReturned => "failed",
    };
    Ok(Json(UpdateResponse { uploaded }))
}

/// DELETE /{id}
async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    ItemRepo::new(state.store.as_ref()).delete(&id).await?;
    Ok(Json(DeleteResponse { deleted: "success" }))
}

/// Item routes, relative to the mount point
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route(
            "/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
}
