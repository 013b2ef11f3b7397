//! Logical path resolution confined to the source root.
//!
//! A logical path is what the browser sends (`/src/main.rs`). Resolution joins
//! it onto the root, canonicalizes it (following symlinks and `..`), and
//! refuses anything that lands outside the root. All refusals surface as
//! `PathNotFound` except a missing leading slash, which is `InvalidPath`;
//! both map to the same 404 response.

use std::path::{Component, Path, PathBuf};

use crate::error::{AppError, Result};

/// A path known to exist inside the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Canonical absolute filesystem path
    pub absolute: PathBuf,
    /// Normalized logical path re-derived from `absolute`, e.g. `/src/lib.rs`
    pub logical: String,
}

#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Canonicalizes `root` once so every later containment check compares
    /// canonical paths.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let display = root.as_ref().to_string_lossy().to_string();
        let root = std::fs::canonicalize(root.as_ref())
            .map_err(|_| AppError::PathNotFound(display.clone()))?;
        if !root.is_dir() {
            return Err(AppError::InvalidPath(format!("{} is not a directory", display)));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, logical: &str) -> Result<ResolvedPath> {
        if !logical.starts_with('/') {
            return Err(AppError::InvalidPath(logical.to_string()));
        }

        // Strip the leading slashes so `join` cannot replace the root.
        let joined = self.root.join(logical.trim_start_matches('/'));
        let absolute = std::fs::canonicalize(&joined)
            .map_err(|_| AppError::PathNotFound(logical.to_string()))?;

        if !absolute.starts_with(&self.root) {
            tracing::warn!("Rejected path outside root: {}", logical);
            return Err(AppError::PathNotFound(logical.to_string()));
        }

        let logical = self.logical_path(&absolute);
        Ok(ResolvedPath { absolute, logical })
    }

    pub fn resolve_directory(&self, logical: &str) -> Result<ResolvedPath> {
        let resolved = self.resolve(logical)?;
        if !resolved.absolute.is_dir() {
            return Err(AppError::PathNotFound(resolved.logical));
        }
        Ok(resolved)
    }

    pub fn resolve_file(&self, logical: &str) -> Result<ResolvedPath> {
        let resolved = self.resolve(logical)?;
        if !resolved.absolute.is_file() {
            return Err(AppError::PathNotFound(resolved.logical));
        }
        Ok(resolved)
    }

    fn logical_path(&self, absolute: &Path) -> String {
        let relative = absolute.strip_prefix(&self.root).unwrap_or(Path::new(""));
        let segments: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy().to_string()),
                _ => None,
            })
            .collect();
        format!("/{}", segments.join("/"))
    }
}

/// Appends a child name to a logical directory path.
pub fn join_logical(dir: &str, name: &str) -> String {
    if dir.ends_with('/') {
        format!("{}{}", dir, name)
    } else {
        format!("{}/{}", dir, name)
    }
}
