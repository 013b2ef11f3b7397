//! Navigation trail for the page header.

use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Breadcrumb {
    pub path: String,
    pub label: String,
}

impl Breadcrumb {
    fn new(path: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
        }
    }
}

/// Splits a normalized logical path into crumbs from the root to the leaf.
///
/// The first crumb is always `Root`; each following crumb's path is the
/// cumulative prefix up to and including its segment.
pub fn breadcrumbs(path: &str) -> Vec<Breadcrumb> {
    let mut trail = vec![Breadcrumb::new("/", "Root")];
    let mut prefix = String::new();

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        prefix.push('/');
        prefix.push_str(segment);
        trail.push(Breadcrumb::new(prefix.clone(), segment));
    }

    trail
}
