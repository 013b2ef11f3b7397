//! Annotation overlay over the highlighted line stream.
//!
//! A single lazy pass: `Markup` fragments pass through untouched and are not
//! counted; each `Line` advances a 1-based counter and is re-wrapped with a
//! stable `line-N` anchor. Lines present in the annotation map get a tooltip
//! marker, the rest get an empty placeholder with the same footprint so the
//! code column stays aligned.

use std::collections::BTreeMap;

use crate::highlight::{Fragment, escape_html};
use crate::models::AnnotationNote;

pub const LINE_ANCHOR_PREFIX: &str = "line";

pub fn line_anchor(line_number: u32) -> String {
    format!("{}-{}", LINE_ANCHOR_PREFIX, line_number)
}

pub fn overlay<'a, I>(
    fragments: I,
    notes: &'a BTreeMap<u32, AnnotationNote>,
) -> impl Iterator<Item = Fragment> + 'a
where
    I: IntoIterator<Item = Fragment>,
    I::IntoIter: 'a,
{
    fragments
        .into_iter()
        .scan(0u32, move |line_number, fragment| {
            Some(match fragment {
                Fragment::Markup(_) => fragment,
                Fragment::Line(html) => {
                    *line_number += 1;
                    let n = *line_number;
                    Fragment::Line(decorate_line(n, &html, notes.get(&n)))
                }
            })
        })
}

fn decorate_line(line_number: u32, code_html: &str, note: Option<&AnnotationNote>) -> String {
    let anchor = line_anchor(line_number);
    let number = format!(
        "<a class=\"line-number\" href=\"#{anchor}\" data-line=\"{line_number}\">{line_number}</a>"
    );

    match note {
        Some(note) => {
            let author = escape_html(&note.author);
            let text = escape_html(&note.text);
            format!(
                "<span class=\"code-line annotated\" id=\"{anchor}\">{number}\
                 <a class=\"annotation\" id=\"annotation-{line_number}\" href=\"#{anchor}\">\
                 <span class=\"annotation-marker\" title=\"{author}: {text}\">&#9998;\
                 <span class=\"annotation-tooltip\" role=\"tooltip\">\
                 <span class=\"annotation-author\">{author}</span> {text}</span></span>\
                 <span class=\"line-code\">{code_html}</span></a></span>\n"
            )
        }
        None => format!(
            "<span class=\"code-line\" id=\"{anchor}\">{number}\
             <span class=\"annotation-marker placeholder\"></span>\
             <span class=\"line-code\">{code_html}</span></span>\n"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stream(lines: &[&str]) -> Vec<Fragment> {
        let mut fragments = vec![Fragment::Markup("<pre><code>".to_string())];
        fragments.extend(lines.iter().map(|l| Fragment::Line(l.to_string())));
        fragments.push(Fragment::Markup("</code></pre>".to_string()));
        fragments
    }

    fn note(author: &str, text: &str) -> AnnotationNote {
        AnnotationNote {
            author: author.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_overlay_preserves_length_and_order() {
        // Arrange
        let input = stream(&["a", "b", "c"]);
        let notes = BTreeMap::from([(2, note("ana", "why?"))]);

        // Act
        let output: Vec<Fragment> = overlay(input.clone(), &notes).collect();

        // Assert
        assert_eq!(output.len(), input.len());
        assert_eq!(output[0], input[0]);
        assert_eq!(output[4], input[4]);
        for (i, code) in ["a", "b", "c"].iter().enumerate() {
            let html = output[i + 1].html();
            assert!(html.contains(&format!("id=\"line-{}\"", i + 1)));
            assert!(html.contains(&format!("<span class=\"line-code\">{}</span>", code)));
        }
    }

    #[test]
    fn test_only_mapped_lines_get_tooltips() {
        // Arrange
        let input = stream(&["a", "b", "c"]);
        let notes = BTreeMap::from([(2, note("ana", "why?"))]);

        // Act
        let output: Vec<Fragment> = overlay(input, &notes).collect();

        // Assert
        assert!(!output[1].html().contains("annotation-tooltip"));
        assert!(output[1].html().contains("placeholder"));
        assert!(output[2].html().contains("annotation-tooltip"));
        assert!(output[2].html().contains("id=\"annotation-2\""));
        assert!(!output[3].html().contains("annotation-tooltip"));
    }

    #[test]
    fn test_markup_between_lines_is_not_counted() {
        // Arrange
        let input = vec![
            Fragment::Line("one".to_string()),
            Fragment::Markup("<hr>".to_string()),
            Fragment::Line("two".to_string()),
        ];
        let notes = BTreeMap::from([(2, note("bo", "second line"))]);

        // Act
        let output: Vec<Fragment> = overlay(input, &notes).collect();

        // Assert
        assert_eq!(output[1], Fragment::Markup("<hr>".to_string()));
        assert!(output[2].html().contains("id=\"line-2\""));
        assert!(output[2].html().contains("second line"));
    }

    #[test]
    fn test_note_content_is_escaped() {
        // Arrange
        let input = stream(&["x"]);
        let notes = BTreeMap::from([(1, note("<eve>", "\"><script>alert(1)</script>"))]);

        // Act
        let output: Vec<Fragment> = overlay(input, &notes).collect();

        // Assert
        let html = output[1].html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;eve&gt;"));
    }

    #[test]
    fn test_notes_past_the_end_are_ignored() {
        // Arrange
        let input = stream(&["only"]);
        let notes = BTreeMap::from([(5, note("ana", "stale"))]);

        // Act
        let output: Vec<Fragment> = overlay(input, &notes).collect();

        // Assert
        assert_eq!(output.len(), 3);
        assert!(!output[1].html().contains("stale"));
    }

    #[test]
    fn test_line_anchor_format() {
        assert_eq!(line_anchor(42), "line-42");
    }
}
