//! Data transfer objects (DTOs) for pages and API responses.
//!
//! These structs are serialized to JSON for the API and fed to the askama
//! views for HTML pages.
//! - `annotation`: Annotation, AnnotationNote, AnnotationDraft, FieldErrors
//! - `listing`: DirectoryListing, DirectoryEntry, EntryKind
//! - `breadcrumb`: Breadcrumb and the builder for navigation trails

pub mod annotation;
pub mod breadcrumb;
pub mod listing;

pub use annotation::*;
pub use breadcrumb::*;
pub use listing::*;
