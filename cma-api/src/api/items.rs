//! Item store read endpoints
//!
//! The facade performs no normalization. The pipeline guarantees every
//! record it writes has a title; records lacking one can only come from an
//! externally edited store file and are filtered out of responses.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use cma_common::{store, ActivityItem};
use serde::Serialize;

use crate::{ApiError, ApiResult, AppState};

/// Item list response: a flat array under `data` for existing readers
#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub success: bool,
    pub data: Vec<ActivityItem>,
}

/// Single item response
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub success: bool,
    pub data: ActivityItem,
}

/// Read the store fresh on every request; a missing store file is an empty
/// listing, not an error, since the store is a regenerable cache.
async fn read_store(state: &AppState) -> ApiResult<Vec<ActivityItem>> {
    let path = state.store_path.clone();
    let items = tokio::task::spawn_blocking(move || store::load_items(&path))
        .await
        .map_err(|e| ApiError::Internal(format!("store read task failed: {e}")))??;

    let total = items.len();
    let items: Vec<ActivityItem> = items.into_iter().filter(|i| i.has_title()).collect();
    if items.len() < total {
        tracing::warn!(
            filtered = total - items.len(),
            "Store contains records without a title; filtered from response"
        );
    }
    Ok(items)
}

/// GET /api/items
pub async fn list_items(State(state): State<AppState>) -> ApiResult<Json<ItemsResponse>> {
    let items = read_store(&state).await?;
    Ok(Json(ItemsResponse {
        success: true,
        data: items,
    }))
}

/// GET /api/items/:id
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ItemResponse>> {
    let items = read_store(&state).await?;
    let item = items
        .into_iter()
        .find(|i| i.id == id)
        .ok_or_else(|| ApiError::NotFound(format!("no item with id {id}")))?;
    Ok(Json(ItemResponse {
        success: true,
        data: item,
    }))
}

/// Build item routes
pub fn items_routes() -> Router<AppState> {
    Router::new()
        .route("/api/items", get(list_items))
        .route("/api/items/:id", get(get_item))
}
