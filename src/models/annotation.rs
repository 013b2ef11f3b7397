//! Annotation DTOs and submission validation.
//!
//! - `Annotation`: A stored note on one line of one file
//! - `AnnotationNote`: Author and text, keyed by line number for the overlay
//! - `AnnotationDraft`: Unvalidated submission from the form or the JSON API
//! - `FieldErrors`: Per-field messages returned to the submitter

use serde::{Deserialize, Serialize};

const PATH_REQUIRED: &str = "A file path is required.";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Annotation {
    pub id: i64,
    /// Normalized logical path, always starting with `/`
    pub path: String,
    /// 1-indexed line number
    pub line_number: u32,
    pub author: String,
    pub text: String,
    /// Unix timestamp of creation
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AnnotationNote {
    pub author: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnnotationDraft {
    pub path: String,
    pub line_number: Option<i64>,
    #[serde(rename = "annotation")]
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl FieldErrors {
    /// Errors for a request that named no file at all.
    pub fn path_required() -> Self {
        FieldErrors {
            path: Some(PATH_REQUIRED.to_string()),
            ..FieldErrors::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_none() && self.line_number.is_none() && self.annotation.is_none()
    }
}

/// A draft that passed validation, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidAnnotation {
    pub path: String,
    pub line_number: u32,
    pub text: String,
}

impl AnnotationDraft {
    /// Checks every field and reports all failures at once.
    pub fn validate(&self) -> Result<ValidAnnotation, FieldErrors> {
        let mut errors = FieldErrors::default();

        let path = self.path.trim();
        if path.is_empty() {
            errors.path = Some(PATH_REQUIRED.to_string());
        }

        let line_number = self
            .line_number
            .filter(|n| *n >= 1)
            .and_then(|n| u32::try_from(n).ok());
        if line_number.is_none() {
            errors.line_number = Some("Line number must be a positive integer.".to_string());
        }

        let text = self.text.trim();
        if text.is_empty() {
            errors.annotation = Some("Annotation text cannot be empty.".to_string());
        }

        match line_number {
            Some(line_number) if errors.is_empty() => Ok(ValidAnnotation {
                path: path.to_string(),
                line_number,
                text: text.to_string(),
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn draft(path: &str, line_number: Option<i64>, text: &str) -> AnnotationDraft {
        AnnotationDraft {
            path: path.to_string(),
            line_number,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_draft() {
        // Arrange
        let draft = draft("/a/b.py", Some(10), "  needs a guard clause \n");

        // Act
        let valid = draft.validate();

        // Assert
        assert_eq!(
            valid,
            Ok(ValidAnnotation {
                path: "/a/b.py".to_string(),
                line_number: 10,
                text: "needs a guard clause".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_rejects_non_positive_line() {
        // Arrange & Act
        let zero = draft("/a.py", Some(0), "x").validate();
        let negative = draft("/a.py", Some(-3), "x").validate();
        let missing = draft("/a.py", None, "x").validate();

        // Assert
        for result in [zero, negative, missing] {
            let errors = result.expect_err("expected validation failure");
            assert!(errors.line_number.is_some());
            assert!(errors.annotation.is_none());
        }
    }

    #[test]
    fn test_validate_rejects_line_beyond_u32() {
        // Arrange & Act
        let errors = draft("/a.py", Some(i64::from(u32::MAX) + 1), "x")
            .validate()
            .expect_err("expected validation failure");

        // Assert
        assert!(errors.line_number.is_some());
    }

    #[test]
    fn test_validate_reports_every_failing_field() {
        // Arrange & Act
        let errors = draft("", Some(-1), "   ")
            .validate()
            .expect_err("expected validation failure");

        // Assert
        assert!(errors.path.is_some());
        assert!(errors.line_number.is_some());
        assert!(errors.annotation.is_some());
    }
}
