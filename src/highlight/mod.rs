//! Syntax highlighting adapter over tree-sitter-highlight.
//!
//! Turns file text into a stream of `Fragment`s: structural markup around
//! exactly one `Fragment::Line` per source line. The annotation overlay in
//! `overlay` walks that stream to add per-line anchors and tooltips.
//!
//! Grammar configurations are compiled once in `Highlighter::new` and shared
//! across requests. Files without a grammar, or whose highlighting fails, are
//! rendered as escaped plain text with the same per-line structure.

pub mod languages;
pub mod overlay;

use std::collections::HashMap;
use std::path::Path;

use tree_sitter::QueryError;
use tree_sitter_highlight::{
    Highlight, HighlightConfiguration, Highlighter as TsHighlighter, HtmlRenderer,
};

pub use languages::{HIGHLIGHT_NAMES, Language};
pub use overlay::{line_anchor, overlay};

/// One item of the highlighted HTML stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Structural markup around the code; not a source line
    Markup(String),
    /// HTML for one source line, without the trailing newline
    Line(String),
}

impl Fragment {
    pub fn is_code_line(&self) -> bool {
        matches!(self, Fragment::Line(_))
    }

    pub fn html(&self) -> &str {
        match self {
            Fragment::Markup(html) | Fragment::Line(html) => html,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HighlightedSource {
    pub language: Option<Language>,
    pub fragments: Vec<Fragment>,
}

impl HighlightedSource {
    pub fn line_count(&self) -> usize {
        self.fragments.iter().filter(|f| f.is_code_line()).count()
    }
}

pub struct Highlighter {
    configs: HashMap<Language, HighlightConfiguration>,
    class_attributes: Vec<String>,
}

impl Highlighter {
    pub fn new() -> Result<Self, QueryError> {
        let mut configs = HashMap::new();
        for language in Language::ALL {
            configs.insert(language, language.configuration()?);
        }

        let class_attributes = HIGHLIGHT_NAMES
            .iter()
            .map(|name| format!("class=\"{}\"", css_class(name)))
            .collect();

        Ok(Self {
            configs,
            class_attributes,
        })
    }

    /// Highlights `source`, choosing the grammar from `path`.
    pub fn highlight(&self, path: &Path, source: &str) -> HighlightedSource {
        let language = Language::detect(path);
        let expected = source.lines().count();

        let lines = language
            .and_then(|lang| self.configs.get(&lang).map(|config| (lang, config)))
            .and_then(|(lang, config)| match self.render(config, source) {
                Ok(lines) if lines.len() >= expected => Some(lines),
                Ok(lines) => {
                    tracing::warn!(
                        "{} renderer produced {} of {} lines for {}",
                        lang.name(),
                        lines.len(),
                        expected,
                        path.display()
                    );
                    None
                }
                Err(e) => {
                    tracing::warn!("Highlighting {} failed: {:?}", path.display(), e);
                    None
                }
            });

        let (language, mut lines) = match lines {
            Some(lines) => (language, lines),
            None => (None, plain_lines(source)),
        };
        // The renderer may emit an empty line after a trailing newline
        lines.truncate(expected);

        let open = match language {
            Some(lang) => format!(
                "<pre class=\"highlight\" data-language=\"{}\"><code>",
                lang.name()
            ),
            None => "<pre class=\"highlight\" data-language=\"text\"><code>".to_string(),
        };

        let mut fragments = Vec::with_capacity(lines.len() + 2);
        fragments.push(Fragment::Markup(open));
        fragments.extend(lines.into_iter().map(Fragment::Line));
        fragments.push(Fragment::Markup("</code></pre>".to_string()));

        HighlightedSource {
            language,
            fragments,
        }
    }

    fn render(
        &self,
        config: &HighlightConfiguration,
        source: &str,
    ) -> Result<Vec<String>, tree_sitter_highlight::Error> {
        let mut highlighter = TsHighlighter::new();
        let events = highlighter.highlight(config, source.as_bytes(), None, |_| None)?;

        let mut renderer = HtmlRenderer::new();
        renderer.render(
            events,
            source.as_bytes(),
            &|highlight: Highlight, output: &mut Vec<u8>| {
                if let Some(attr) = self.class_attributes.get(highlight.0) {
                    output.extend_from_slice(attr.as_bytes());
                }
            },
        )?;

        Ok(renderer
            .lines()
            .map(|line| line.trim_end_matches('\n').trim_end_matches('\r').to_string())
            .collect())
    }

    /// CSS for the `hl-*` classes. Global to the highlighter, not per file.
    pub fn stylesheet(&self) -> &'static str {
        STYLESHEET
    }
}

fn plain_lines(source: &str) -> Vec<String> {
    source.lines().map(escape_html).collect()
}

fn css_class(highlight_name: &str) -> String {
    format!("hl-{}", highlight_name.replace('.', "-"))
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const STYLESHEET: &str = r#".highlight { background: #fafafa; color: #383a42; }
.hl-attribute { color: #986801; }
.hl-comment { color: #a0a1a7; font-style: italic; }
.hl-constant, .hl-constant-builtin, .hl-number { color: #986801; }
.hl-constructor, .hl-type, .hl-type-builtin { color: #c18401; }
.hl-embedded, .hl-escape { color: #0184bc; }
.hl-function, .hl-function-builtin, .hl-function-method { color: #4078f2; }
.hl-function-macro { color: #0184bc; }
.hl-keyword { color: #a626a4; }
.hl-label, .hl-tag { color: #e45649; }
.hl-module { color: #c18401; }
.hl-operator { color: #0184bc; }
.hl-property { color: #e45649; }
.hl-punctuation, .hl-punctuation-bracket, .hl-punctuation-delimiter { color: #383a42; }
.hl-punctuation-special { color: #0184bc; }
.hl-string, .hl-string-special { color: #50a14f; }
.hl-variable { color: #383a42; }
.hl-variable-builtin { color: #e45649; }
.hl-variable-parameter { color: #383a42; font-style: italic; }
"#;
