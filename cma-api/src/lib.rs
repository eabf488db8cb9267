//! cma-api library interface
//!
//! Thin read-side facade over the JSON item store. The import pipeline is
//! the store's only writer; this service only reads, on every request, so a
//! fresh import is visible without a restart.

pub mod api;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Path to the canonical JSON item store
    pub store_path: PathBuf,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(store_path: PathBuf) -> Self {
        Self {
            store_path,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// Permissive CORS: the store is public read-only data served to a static
/// front end on another origin.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::items_routes())
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
