//! Directory listing for the browse view.
//!
//! Lists immediate children only. Names matching an ignore pattern are hidden,
//! and so are symlinks whose target lies outside the root or does not exist.
//! Each entry is tagged with whether an annotation exists on it (files) or
//! anywhere below it (directories).

use std::collections::HashSet;
use std::path::Path;

use crate::error::Result;
use crate::fs::IgnoreSet;
use crate::fs::resolver::{ResolvedPath, join_logical};
use crate::models::{DirectoryEntry, DirectoryListing, EntryKind};

pub fn list_directory(
    root: &Path,
    dir: &ResolvedPath,
    ignore: &IgnoreSet,
    annotated: &HashSet<String>,
) -> Result<DirectoryListing> {
    let mut listing = DirectoryListing::default();

    for entry in std::fs::read_dir(&dir.absolute)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();

        if ignore.is_ignored(&name) {
            continue;
        }

        // Classify by the canonical target, never by metadata outside the root
        let Ok(target) = std::fs::canonicalize(entry.path()) else {
            continue;
        };
        if !target.starts_with(root) {
            tracing::debug!("Hiding {} which points outside the root", name);
            continue;
        }
        let kind = if target.is_dir() {
            EntryKind::Directory
        } else if target.is_file() {
            EntryKind::File
        } else {
            continue;
        };

        let path = join_logical(&dir.logical, &name);
        let has_annotations = match kind {
            EntryKind::Directory => {
                let prefix = format!("{}/", path);
                annotated.iter().any(|p| p.starts_with(&prefix))
            }
            EntryKind::File => annotated.contains(&path),
        };

        let entry = DirectoryEntry {
            name,
            path,
            kind,
            has_annotations,
        };

        match kind {
            EntryKind::Directory => listing.directories.push(entry),
            EntryKind::File => listing.files.push(entry),
        }
    }

    listing.files.sort_by(|a, b| a.name.cmp(&b.name));
    listing.directories.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(listing)
}
