//! Grammar selection by file name.

use std::path::Path;

use tree_sitter::QueryError;
use tree_sitter_highlight::HighlightConfiguration;

/// Capture names the highlighter recognizes, in the order `Highlight`
/// indices refer to. Each maps to a `hl-*` CSS class.
pub const HIGHLIGHT_NAMES: &[&str] = &[
    "attribute",
    "comment",
    "constant",
    "constant.builtin",
    "constructor",
    "embedded",
    "escape",
    "function",
    "function.builtin",
    "function.macro",
    "function.method",
    "keyword",
    "label",
    "module",
    "number",
    "operator",
    "property",
    "punctuation",
    "punctuation.bracket",
    "punctuation.delimiter",
    "punctuation.special",
    "string",
    "string.special",
    "tag",
    "type",
    "type.builtin",
    "variable",
    "variable.builtin",
    "variable.parameter",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Rust,
    Python,
    JavaScript,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Rust, Language::Python, Language::JavaScript];

    pub fn name(self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::Python => "python",
            Language::JavaScript => "javascript",
        }
    }

    /// Picks a grammar from the extension, then from well-known file names.
    /// `None` means plain text.
    pub fn detect(path: &Path) -> Option<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());

        match extension.as_deref() {
            Some("rs") => return Some(Language::Rust),
            Some("py" | "pyw" | "pyi") => return Some(Language::Python),
            Some("js" | "mjs" | "cjs" | "jsx") => return Some(Language::JavaScript),
            _ => {}
        }

        match path.file_name().and_then(|n| n.to_str()) {
            Some("SConstruct" | "SConscript") => Some(Language::Python),
            _ => None,
        }
    }

    pub(crate) fn configuration(self) -> Result<HighlightConfiguration, QueryError> {
        let mut config = match self {
            Language::Rust => HighlightConfiguration::new(
                tree_sitter_rust::LANGUAGE.into(),
                self.name(),
                tree_sitter_rust::HIGHLIGHTS_QUERY,
                "",
                "",
            )?,
            Language::Python => HighlightConfiguration::new(
                tree_sitter_python::LANGUAGE.into(),
                self.name(),
                tree_sitter_python::HIGHLIGHTS_QUERY,
                "",
                "",
            )?,
            Language::JavaScript => HighlightConfiguration::new(
                tree_sitter_javascript::LANGUAGE.into(),
                self.name(),
                tree_sitter_javascript::HIGHLIGHT_QUERY,
                "",
                tree_sitter_javascript::LOCALS_QUERY,
            )?,
        };
        config.configure(HIGHLIGHT_NAMES);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(Language::detect(Path::new("/src/main.rs")), Some(Language::Rust));
        assert_eq!(Language::detect(Path::new("/a/b.py")), Some(Language::Python));
        assert_eq!(Language::detect(Path::new("/APP.JS")), Some(Language::JavaScript));
        assert_eq!(Language::detect(Path::new("/web/view.jsx")), Some(Language::JavaScript));
    }

    #[test]
    fn test_detect_by_file_name_and_fallback() {
        assert_eq!(Language::detect(Path::new("/SConstruct")), Some(Language::Python));
        assert_eq!(Language::detect(Path::new("/README")), None);
        assert_eq!(Language::detect(Path::new("/notes.txt")), None);
    }

    #[test]
    fn test_every_grammar_configures() {
        for language in Language::ALL {
            assert!(
                language.configuration().is_ok(),
                "{} grammar failed to load",
                language.name()
            );
        }
    }
}
