//! Shell-glob ignore patterns matched against entry names.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// Patterns hidden from listings when none are configured.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "__pycache__",
    "*.pyc",
    ".DS_Store",
    "node_modules",
];

#[derive(Debug, Clone)]
pub struct IgnoreSet {
    patterns: Vec<String>,
    set: GlobSet,
}

impl IgnoreSet {
    pub fn new<I, S>(patterns: I) -> Result<Self, globset::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(Into::into)
            .filter(|p| !p.trim().is_empty())
            .collect();

        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            builder.add(GlobBuilder::new(pattern).literal_separator(true).build()?);
        }

        Ok(Self {
            patterns,
            set: builder.build()?,
        })
    }

    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }

    /// True if the bare entry name matches any pattern.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.set.is_match(name)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl Default for IgnoreSet {
    fn default() -> Self {
        // The built-in patterns are literal and always compile.
        Self::new(DEFAULT_IGNORE_PATTERNS.iter().copied()).unwrap_or_else(|_| Self::empty())
    }
}
