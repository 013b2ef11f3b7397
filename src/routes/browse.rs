//! Directory browsing page.
//!
//! - GET /browse/?path=<logical path>
//!   Lists the directory's files and subdirectories, hiding ignored names and
//!   flagging entries that carry annotations. A missing or empty `path`
//!   redirects to the root; anything that does not resolve to a directory
//!   inside the root is a 404.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use askama::Template;
use serde::Deserialize;

use crate::error::PageError;
use crate::fs::list_directory;
use crate::routes::{blocking, requested_path, AppState};
use crate::views::{self, BrowsePage};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/browse/", get(browse))
        .route("/browse", get(browse))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct PathQuery {
    pub path: Option<String>,
}

async fn browse(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Response, PageError> {
    let Some(path) = requested_path(query.path) else {
        return Ok(Redirect::temporary(&views::browse_href("/")).into_response());
    };

    let annotated = state.db.distinct_annotated_paths().await?;
    let config = state.config.clone();
    let (logical, listing) = blocking(move || {
        let dir = config.resolver.resolve_directory(&path)?;
        let listing = list_directory(config.resolver.root(), &dir, &config.ignore, &annotated)?;
        Ok((dir.logical, listing))
    })
    .await?;

    let page = BrowsePage::new(&logical, listing);
    Ok(Html(page.render()?).into_response())
}
