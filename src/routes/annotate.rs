//! File view with annotations, and annotation submission.
//!
//! - GET /annotate/?path=<logical path>
//!   Highlights the file, overlays existing annotations as tooltips, lists
//!   them, and shows the submission form. Path rules match /browse/ but the
//!   target must be a regular file.
//!
//! - POST /annotate/submit (form: annotation, line_number, path)
//!   Stores an annotation by the authenticated author and redirects to
//!   `/annotate/?path=<path>#line-<n>`. Invalid input re-renders the page
//!   with per-field messages and status 422.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use askama::Template;
use serde::Deserialize;

use crate::error::{AppError, PageError};
use crate::fs::read_source;
use crate::highlight::overlay;
use crate::models::{AnnotationDraft, FieldErrors};
use crate::routes::author::Author;
use crate::routes::browse::PathQuery;
use crate::routes::{blocking, requested_path, AppState};
use crate::views::{self, AnnotatePage, AnnotatePageParts, FormValues};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/annotate/", get(annotate))
        .route("/annotate", get(annotate))
        .route("/annotate/submit", post(submit))
        .with_state(state)
}

async fn annotate(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Response, PageError> {
    let Some(path) = requested_path(query.path) else {
        return Ok(Redirect::temporary(&views::browse_href("/")).into_response());
    };

    render_file_page(&state, path, FormValues::default(), FieldErrors::default(), StatusCode::OK)
        .await
}

#[derive(Debug, Deserialize)]
struct SubmitForm {
    #[serde(default)]
    annotation: String,
    #[serde(default)]
    line_number: String,
    #[serde(default)]
    path: String,
}

async fn submit(
    State(state): State<AppState>,
    Author(author): Author,
    Form(form): Form<SubmitForm>,
) -> Result<Response, PageError> {
    // Field errors re-render the page of the posted file, so it must resolve first
    let config = state.config.clone();
    let path = form.path.clone();
    let file = blocking(move || config.resolver.resolve_file(&path)).await?;

    let draft = AnnotationDraft {
        path: file.logical.clone(),
        line_number: form.line_number.trim().parse().ok(),
        text: form.annotation.clone(),
    };

    match state.db.create_annotation(&draft, &author).await {
        Ok(annotation) => Ok(Redirect::to(&views::annotate_line_href(
            &annotation.path,
            annotation.line_number,
        ))
        .into_response()),
        Err(AppError::Validation(errors)) => {
            let values = FormValues {
                line_number: form.line_number,
                annotation: form.annotation,
            };
            render_file_page(&state, file.logical, values, errors, StatusCode::UNPROCESSABLE_ENTITY)
                .await
        }
        Err(e) => Err(e.into()),
    }
}

async fn render_file_page(
    state: &AppState,
    path: String,
    form: FormValues,
    errors: FieldErrors,
    status: StatusCode,
) -> Result<Response, PageError> {
    let config = state.config.clone();
    let highlighter = state.highlighter.clone();
    let (file, highlighted) = blocking(move || {
        let file = config.resolver.resolve_file(&path)?;
        let source = read_source(&file)?;
        let highlighted = highlighter.highlight(&file.absolute, &source);
        Ok((file, highlighted))
    })
    .await?;

    let notes = state.db.annotations_for(&file.logical).await?;
    let annotations = state.db.list_annotations(&file.logical).await?;

    let line_count = highlighted.line_count();
    let code = overlay(highlighted.fragments, &notes).fold(String::new(), |mut html, fragment| {
        html.push_str(fragment.html());
        html
    });

    let parts = AnnotatePageParts {
        language: highlighted.language.map(|l| l.name()),
        line_count,
        stylesheet: state.highlighter.stylesheet(),
        code,
        annotations,
    };
    let page = AnnotatePage::new(&file.logical, parts, form, errors);

    Ok((status, Html(page.render()?)).into_response())
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};

    fn submit_request(body: &str, user: Option<&str>) -> Request<Body> {
        let mut builder = Request::post("/annotate/submit")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(user) = user {
            builder = builder.header("x-remote-user", user);
        }
        builder.body(Body::from(body.to_string())).expect("request")
    }

    #[tokio::test]
    async fn test_file_view_highlights_and_anchors_lines() {
        // Arrange
        let app = TestApp::new().await;
        app.write("a/b.py", "def f():\n    return 1\n");

        // Act
        let response = app.get("/annotate/?path=/a/b.py").await;

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("id=\"line-1\""));
        assert!(html.contains("id=\"line-2\""));
        assert!(!html.contains("id=\"line-3\""));
        assert!(html.contains("hl-keyword"));
        assert!(html.contains("No annotations yet."));
    }

    #[tokio::test]
    async fn test_submit_redirects_to_line_and_renders_tooltip() {
        // Arrange
        let app = TestApp::new().await;
        app.write("a/b.py", &"pass\n".repeat(12));

        // Act
        let response = app
            .send(submit_request(
                "annotation=x&line_number=10&path=%2Fa%2Fb.py",
                Some("ana"),
            ))
            .await;

        // Assert
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/annotate/?path=%2Fa%2Fb.py#line-10");

        let notes = app.state.db.annotations_for("/a/b.py").await.expect("read");
        assert_eq!(notes[&10].text, "x");
        assert_eq!(notes[&10].author, "ana");

        let html = body_text(app.get("/annotate/?path=%2Fa%2Fb.py").await).await;
        assert!(html.contains("id=\"annotation-10\""));
        assert!(html.contains("Line 10"));
    }

    #[tokio::test]
    async fn test_submit_with_invalid_fields_returns_form_errors() {
        // Arrange
        let app = TestApp::new().await;
        app.write("main.rs", "fn main() {}\n");

        // Act
        let response = app
            .send(submit_request(
                "annotation=+++&line_number=-4&path=%2Fmain.rs",
                Some("ana"),
            ))
            .await;

        // Assert
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains("Line number must be a positive integer."));
        assert!(html.contains("Annotation text cannot be empty."));
        assert!(html.contains("value=\"-4\""));
        assert!(app.state.db.distinct_annotated_paths().await.expect("read").is_empty());
    }

    #[tokio::test]
    async fn test_submit_without_identity_is_unauthorized() {
        // Arrange
        let app = TestApp::new().await;
        app.write("main.rs", "fn main() {}\n");

        // Act
        let response = app
            .send(submit_request("annotation=x&line_number=1&path=%2Fmain.rs", None))
            .await;

        // Assert
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_submit_for_path_outside_root_is_not_found() {
        // Arrange
        let app = TestApp::new().await;

        // Act
        let response = app
            .send(submit_request(
                "annotation=x&line_number=1&path=%2F..%2Foutside.py",
                Some("ana"),
            ))
            .await;

        // Assert
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_submit_without_path_is_not_found() {
        // Arrange
        let app = TestApp::new().await;

        // Act
        let response = app
            .send(submit_request("annotation=x&line_number=1&path=", Some("ana")))
            .await;

        // Assert
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(app.state.db.distinct_annotated_paths().await.expect("read").is_empty());
    }

    #[tokio::test]
    async fn test_file_view_rejects_escapes_and_directories() {
        // Arrange
        let app = TestApp::new().await;
        app.write("dir/inner.txt", "x\n");

        // Act & Assert
        for uri in [
            "/annotate/?path=/etc/passwd",
            "/annotate/?path=/../outside.py",
            "/annotate/?path=/dir",
            "/annotate/?path=dir/inner.txt",
        ] {
            let response = app.get(uri).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
            assert!(body_text(response).await.contains("Not found"));
        }
    }

    #[tokio::test]
    async fn test_file_view_without_path_redirects() {
        // Arrange
        let app = TestApp::new().await;

        // Act
        let response = app.get("/annotate/").await;

        // Assert
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    }
}
