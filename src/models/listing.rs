//! Directory listing DTOs.
//!
//! - `DirectoryEntry`: Single child of a browsed directory, flagged if any
//!   annotation exists at or below it
//! - `DirectoryListing`: Files and directories as two separately sorted lists
//!
//! Derived per request; never persisted.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    /// Logical path of the entry, e.g. `/src/main.rs`
    pub path: String,
    pub kind: EntryKind,
    pub has_annotations: bool,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct DirectoryListing {
    pub files: Vec<DirectoryEntry>,
    pub directories: Vec<DirectoryEntry>,
}
