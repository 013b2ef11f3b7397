//! Route handlers - maps HTTP endpoints to browse and annotate operations.
//!
//! Each submodule defines routes for a feature area:
//! - `browse`: Directory listing page (GET /browse/)
//! - `annotate`: File view with overlay and annotation submission
//! - `api`: JSON equivalents under /api/v1
//! - `assets`: Embedded static files and the highlighter stylesheet
//! - `author`: Extractor for the authenticated user's display name

pub mod annotate;
pub mod api;
pub mod assets;
pub mod author;
pub mod browse;

use std::sync::Arc;

use axum::{response::Redirect, routing::get, Router};

use crate::config::Config;
use crate::db::Database;
use crate::error::{AppError, Result};
use crate::highlight::Highlighter;
use crate::views;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub highlighter: Arc<Highlighter>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::temporary(&views::browse_href("/")) }))
        .merge(browse::routes(state.clone()))
        .merge(annotate::routes(state.clone()))
        .merge(api::routes(state.clone()))
        .merge(assets::routes(state))
}

/// Runs filesystem and highlighting work off the async worker threads.
pub(crate) async fn blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("Blocking task failed: {}", e)))?
}

/// Treats a missing or empty `path` query parameter the same way.
pub(crate) fn requested_path(path: Option<String>) -> Option<String> {
    path.filter(|p| !p.is_empty())
}
