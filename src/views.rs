//! Askama view models for the HTML pages.
//!
//! Page structs hold display-ready values (escaped by askama at render time)
//! plus the pre-rendered code block, which is inserted with `|safe`.
//! Link helpers keep URL construction in one place so the routes, the
//! templates, and the post-submit redirect agree on the format.

use askama::Template;

use crate::highlight::line_anchor;
use crate::models::{Annotation, Breadcrumb, DirectoryEntry, DirectoryListing, FieldErrors, breadcrumbs};

fn encode(path: &str) -> String {
    url::form_urlencoded::byte_serialize(path.as_bytes()).collect()
}

pub fn browse_href(path: &str) -> String {
    format!("/browse/?path={}", encode(path))
}

pub fn annotate_href(path: &str) -> String {
    format!("/annotate/?path={}", encode(path))
}

pub fn annotate_line_href(path: &str, line_number: u32) -> String {
    format!("{}#{}", annotate_href(path), line_anchor(line_number))
}

pub struct CrumbLink {
    pub label: String,
    pub href: String,
}

pub struct EntryLink {
    pub name: String,
    pub href: String,
    pub has_annotations: bool,
}

pub struct AnnotationLink {
    pub line_number: u32,
    pub href: String,
    pub author: String,
    pub text: String,
    pub relative_time: String,
}

/// Values echoed back into the submission form.
#[derive(Debug, Clone, Default)]
pub struct FormValues {
    pub line_number: String,
    pub annotation: String,
}

fn crumb_links(path: &str) -> Vec<CrumbLink> {
    breadcrumbs(path)
        .into_iter()
        .map(|Breadcrumb { path, label }| CrumbLink {
            href: browse_href(&path),
            label,
        })
        .collect()
}

#[derive(Template)]
#[template(path = "browse.html")]
pub struct BrowsePage {
    pub path: String,
    pub crumbs: Vec<CrumbLink>,
    pub directories: Vec<EntryLink>,
    pub files: Vec<EntryLink>,
}

impl BrowsePage {
    pub fn new(path: &str, listing: DirectoryListing) -> Self {
        let link = |entry: DirectoryEntry, href: String| EntryLink {
            name: entry.name,
            href,
            has_annotations: entry.has_annotations,
        };

        Self {
            path: path.to_string(),
            crumbs: crumb_links(path),
            directories: listing
                .directories
                .into_iter()
                .map(|e| {
                    let href = browse_href(&e.path);
                    link(e, href)
                })
                .collect(),
            files: listing
                .files
                .into_iter()
                .map(|e| {
                    let href = annotate_href(&e.path);
                    link(e, href)
                })
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "annotate.html")]
pub struct AnnotatePage {
    pub path: String,
    pub crumbs: Vec<CrumbLink>,
    pub language: String,
    pub line_count: usize,
    pub stylesheet: &'static str,
    pub code: String,
    pub annotations: Vec<AnnotationLink>,
    pub form: FormValues,
    pub errors: FieldErrors,
}

pub struct AnnotatePageParts {
    pub language: Option<&'static str>,
    pub line_count: usize,
    pub stylesheet: &'static str,
    pub code: String,
    pub annotations: Vec<Annotation>,
}

impl AnnotatePage {
    pub fn new(path: &str, parts: AnnotatePageParts, form: FormValues, errors: FieldErrors) -> Self {
        let annotations = parts
            .annotations
            .into_iter()
            .map(|a| AnnotationLink {
                href: annotate_line_href(&a.path, a.line_number),
                line_number: a.line_number,
                author: a.author,
                text: a.text,
                relative_time: format_relative_time(a.created_at),
            })
            .collect();

        Self {
            path: path.to_string(),
            crumbs: crumb_links(path),
            language: parts.language.unwrap_or("text").to_string(),
            line_count: parts.line_count,
            stylesheet: parts.stylesheet,
            code: parts.code,
            annotations,
            form,
            errors,
        }
    }
}

pub fn format_relative_time(timestamp: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let diff = now - timestamp;

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        let mins = diff / 60;
        format!("{} minute{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if diff < 86400 {
        let hours = diff / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if diff < 2592000 {
        let days = diff / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else if diff < 31536000 {
        let months = diff / 2592000;
        format!("{} month{} ago", months, if months == 1 { "" } else { "s" })
    } else {
        let years = diff / 31536000;
        format!("{} year{} ago", years, if years == 1 { "" } else { "s" })
    }
}
