//! Runtime configuration assembled from the command line.
//!
//! Built once in `main` and shared read-only with every handler through
//! `AppState`.

use std::path::Path;

use anyhow::{Context, Result};
use axum::http::HeaderName;

use crate::fs::{IgnoreSet, PathResolver};

pub const DEFAULT_USER_HEADER: &str = "x-remote-user";

#[derive(Debug, Clone)]
pub struct Config {
    /// Resolver bound to the canonical source root
    pub resolver: PathResolver,
    /// Names hidden from directory listings
    pub ignore: IgnoreSet,
    /// Request header carrying the authenticated user's display name
    pub user_header: HeaderName,
    /// Author used when the header is absent
    pub default_author: Option<String>,
}

impl Config {
    pub fn new<P, I, S>(
        root: P,
        ignore_patterns: I,
        user_header: &str,
        default_author: Option<String>,
    ) -> Result<Self>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let root = root.as_ref();
        let resolver = PathResolver::new(root)
            .with_context(|| format!("Invalid source root: {}", root.display()))?;

        let ignore = IgnoreSet::new(ignore_patterns).context("Invalid ignore pattern")?;

        let user_header = HeaderName::from_bytes(user_header.trim().as_bytes())
            .with_context(|| format!("Invalid user header name: {}", user_header))?;

        let default_author = default_author
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());

        Ok(Self {
            resolver,
            ignore,
            user_header,
            default_author,
        })
    }
}
