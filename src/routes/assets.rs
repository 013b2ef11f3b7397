//! Static assets.
//!
//! - GET /static/highlight.css: the highlighter's global stylesheet
//! - GET /static/{*path}: files embedded from `static/` at compile time

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use rust_embed::Embed;

use crate::routes::AppState;

/// Embedded static files
#[derive(Embed)]
#[folder = "static/"]
struct Assets;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/static/highlight.css", get(highlight_css))
        .route("/static/{*path}", get(serve_static))
        .with_state(state)
}

async fn highlight_css(State(state): State<AppState>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/css")],
        state.highlighter.stylesheet(),
    )
        .into_response()
}

async fn serve_static(Path(path): Path<String>) -> Response {
    let path = path.trim_start_matches('/');

    match Assets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::*;
    use axum::http::{header, StatusCode};

    #[tokio::test]
    async fn test_embedded_stylesheet_is_served() {
        // Arrange
        let app = TestApp::new().await;

        // Act
        let response = app.get("/static/app.css").await;

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(&b"text/css"[..])
        );
    }

    #[tokio::test]
    async fn test_highlight_stylesheet_and_missing_asset() {
        // Arrange
        let app = TestApp::new().await;

        // Act
        let css = app.get("/static/highlight.css").await;
        let missing = app.get("/static/nope.js").await;

        // Assert
        assert_eq!(css.status(), StatusCode::OK);
        assert!(body_text(css).await.contains(".hl-keyword"));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
