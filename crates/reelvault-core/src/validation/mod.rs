//! Structured validation errors.
//!
//! `validator` derives do the per-field checks; [`collect`] flattens the nested
//! `ValidationErrors` tree into a flat list of field paths so a response can name
//! every violated field at once. Paths use the camelCase wire names.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// A single violated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldViolation {
    /// Field path in request notation, e.g. `title` or `transformations.quality`
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every field that failed validation, sorted by field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationError {
    pub fields: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(mut fields: Vec<FieldViolation>) -> Self {
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        Self { fields }
    }

    /// True when `field` is among the violations.
    pub fn names(&self, field: &str) -> bool {
        self.fields.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.fields.iter().map(|v| v.field.as_str()).collect();
        write!(f, "Validation failed for: {}", names.join(", "))
    }
}

impl std::error::Error for ValidationError {}

/// Run `validator` checks and convert failures into a [`ValidationError`].
pub fn collect<T: Validate>(value: &T) -> Result<(), ValidationError> {
    match value.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let mut fields = Vec::new();
            flatten(&errors, None, &mut fields);
            Err(ValidationError::new(fields))
        }
    }
}

fn flatten(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<FieldViolation>) {
    for (name, kind) in errors.errors() {
        let name = camel_case(&name.to_string());
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, name),
            None => name,
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", path));
                    out.push(FieldViolation::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten(inner, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten(inner, Some(&format!("{}[{}]", path, index)), out);
                }
            }
        }
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Inner {
        #[validate(range(min = 1, max = 10, message = "level must be between 1 and 10"))]
        level: i32,
    }

    #[derive(Validate)]
    struct Outer {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
        #[validate(nested)]
        inner: Inner,
    }

    #[test]
    fn test_collect_flattens_nested_fields() {
        let value = Outer {
            name: String::new(),
            inner: Inner { level: 42 },
        };
        let err = collect(&value).unwrap_err();
        assert!(err.names("name"));
        assert!(err.names("inner.level"));
        assert_eq!(err.fields.len(), 2);
    }

    #[test]
    fn test_camel_case_field_names() {
        assert_eq!(camel_case("video_url"), "videoUrl");
        assert_eq!(camel_case("title"), "title");
    }

    #[test]
    fn test_collect_ok_when_valid() {
        let value = Outer {
            name: "ok".to_string(),
            inner: Inner { level: 3 },
        };
        assert!(collect(&value).is_ok());
    }

    #[test]
    fn test_display_lists_field_names() {
        let err = ValidationError::new(vec![
            FieldViolation::new("videoUrl", "videoUrl is required"),
            FieldViolation::new("title", "title is required"),
        ]);
        assert_eq!(err.to_string(), "Validation failed for: title, videoUrl");
    }
}
