//! Source tree access confined to the configured root.
//!
//! - `resolver`: logical path → canonical path with containment checks
//! - `listing`: immediate children of a directory, ignore filtering, and
//!   annotation flags
//! - `ignore`: compiled shell-glob patterns hiding entries from listings
//! - `source`: reading a resolved file into text

pub mod ignore;
pub mod listing;
pub mod resolver;
pub mod source;

pub use ignore::IgnoreSet;
pub use listing::list_directory;
pub use resolver::{PathResolver, ResolvedPath};
pub use source::read_source;
