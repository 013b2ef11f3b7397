//! Application error types and HTTP response mapping.
//!
//! Defines `AppError` enum for all error conditions and implements Axum's
//! `IntoResponse` to automatically convert errors to appropriate HTTP responses
//! with JSON error bodies. HTML routes wrap errors in `PageError` instead,
//! which renders the same status as an error page.
//!
//! Error mappings:
//! - `InvalidPath`, `PathNotFound` → 404 (indistinguishable to the caller)
//! - `Validation` → 422 with per-field messages
//! - `BadRequest` → 400 (malformed query string or JSON body)
//! - `Unauthenticated` → 401
//! - `Database`, `Template`, `Io`, `Internal` → 500

use askama::Template;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::FieldErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("No authenticated user")]
    Unauthenticated,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidPath(_) | AppError::PathNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Database(_)
            | AppError::Template(_)
            | AppError::Io(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the caller. Path failures never reveal which check
    /// rejected them.
    pub fn public_message(&self) -> String {
        match self {
            AppError::InvalidPath(_) | AppError::PathNotFound(_) => "Not found".to_string(),
            AppError::Validation(_) => "Validation failed".to_string(),
            AppError::BadRequest(message) => message.clone(),
            AppError::Unauthenticated => "Authentication required".to_string(),
            _ => "Internal server error".to_string(),
        }
    }

    fn log(&self) {
        if self.status().is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("{}", self);
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status();

        let body = match &self {
            AppError::Validation(fields) => Json(json!({
                "error": self.public_message(),
                "fields": fields,
            })),
            _ => Json(json!({
                "error": self.public_message(),
            })),
        };

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorPage {
    status: u16,
    message: String,
}

/// HTML flavour of `AppError` for the browser-facing routes.
#[derive(Debug)]
pub struct PageError(pub AppError);

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        PageError(err)
    }
}

impl From<askama::Error> for PageError {
    fn from(err: askama::Error) -> Self {
        PageError(AppError::Template(err))
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let err = self.0;
        err.log();
        let status = err.status();

        let page = ErrorPage {
            status: status.as_u16(),
            message: err.public_message(),
        };

        match page.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(render_err) => {
                tracing::error!("Failed to render error page: {}", render_err);
                (status, err.public_message()).into_response()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
