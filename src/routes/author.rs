//! Authenticated author extraction.
//!
//! Authentication happens in front of this service. The proxy passes the
//! user's display name in a configurable header; when it is missing the
//! configured default author is used, and without either the request is
//! rejected with 401.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::routes::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author(pub String);

impl FromRequestParts<AppState> for Author {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let from_header = parts
            .headers
            .get(&state.config.user_header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        from_header
            .or_else(|| state.config.default_author.clone())
            .map(Author)
            .ok_or(AppError::Unauthenticated)
    }
}
