//! JSON API mirroring the HTML pages.
//!
//! - GET /api/v1/browse?path=
//!   Directory listing with breadcrumbs. Defaults to the root.
//!
//! - GET /api/v1/annotations?path=
//!   All annotations on one file, oldest first.
//!
//! - POST /api/v1/annotations { path, line_number, annotation }
//!   Creates an annotation by the authenticated author; 201 with the stored
//!   record, 422 with `fields` on validation failure.
//!
//! Every failure, including malformed query strings and bodies, answers with
//! a JSON `{error}` object (plus `fields` on 422).

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::fs::list_directory;
use crate::models::{
    breadcrumbs, Annotation, AnnotationDraft, Breadcrumb, DirectoryEntry, FieldErrors,
};
use crate::routes::author::Author;
use crate::routes::{blocking, requested_path, AppState};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/browse", get(browse))
        .route(
            "/api/v1/annotations",
            get(list_annotations).post(create_annotation),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct BrowseQuery {
    path: Option<String>,
}

#[derive(Debug, Serialize)]
struct BrowseResponse {
    path: String,
    breadcrumbs: Vec<Breadcrumb>,
    files: Vec<DirectoryEntry>,
    directories: Vec<DirectoryEntry>,
}

async fn browse(
    State(state): State<AppState>,
    query: std::result::Result<Query<BrowseQuery>, QueryRejection>,
) -> Result<Json<BrowseResponse>> {
    let Query(query) = query?;
    let path = requested_path(query.path).unwrap_or_else(|| "/".to_string());
    let annotated = state.db.distinct_annotated_paths().await?;
    let config = state.config.clone();

    let (logical, listing) = blocking(move || {
        let dir = config.resolver.resolve_directory(&path)?;
        let listing = list_directory(config.resolver.root(), &dir, &config.ignore, &annotated)?;
        Ok((dir.logical, listing))
    })
    .await?;

    Ok(Json(BrowseResponse {
        breadcrumbs: breadcrumbs(&logical),
        path: logical,
        files: listing.files,
        directories: listing.directories,
    }))
}

#[derive(Debug, Deserialize)]
struct FileQuery {
    path: Option<String>,
}

async fn list_annotations(
    State(state): State<AppState>,
    query: std::result::Result<Query<FileQuery>, QueryRejection>,
) -> Result<Json<Vec<Annotation>>> {
    let Query(query) = query?;
    let path = requested_path(query.path)
        .ok_or_else(|| AppError::Validation(FieldErrors::path_required()))?;

    let config = state.config.clone();
    let file = blocking(move || config.resolver.resolve_file(&path)).await?;
    let annotations = state.db.list_annotations(&file.logical).await?;
    Ok(Json(annotations))
}

async fn create_annotation(
    State(state): State<AppState>,
    Author(author): Author,
    payload: std::result::Result<Json<AnnotationDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Annotation>)> {
    let Json(mut draft) = payload?;
    // Field errors take precedence over an unresolvable path
    draft.validate().map_err(AppError::Validation)?;

    let config = state.config.clone();
    let path = draft.path.clone();
    let file = blocking(move || config.resolver.resolve_file(&path)).await?;

    draft.path = file.logical;
    let annotation = state.db.create_annotation(&draft, &author).await?;
    Ok((StatusCode::CREATED, Json(annotation)))
}
