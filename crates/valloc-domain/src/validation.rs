//! Input validation
//!
//! Serde handles the shape of a request body (required fields, types,
//! date parsing). `Validate` adds the field rules serde cannot express.

use valloc_types::{Error, FieldError, Result};

pub trait Validate {
    /// Check field rules, reporting every violation at once
    fn validate(&self) -> Result<()>;
}

/// Collects field violations before turning them into one error
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldError>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject empty or whitespace-only text
    pub fn require_text(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "must not be empty");
        }
    }

    /// Reject text shorter than `min` characters after trimming
    pub fn require_min_chars(&mut self, field: &str, value: &str, min: usize) {
        if value.trim().chars().count() < min {
            self.push(field, format!("must be at least {} characters long", min));
        }
    }

    pub fn check(&mut self, ok: bool, field: &str, message: impl Into<String>) {
        if !ok {
            self.push(field, message);
        }
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn into_result(self) -> Result<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self.0))
        }
    }
}

/// Trim a string, returning `None` when nothing remains
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violations_collect_all_fields() {
        let mut v = Violations::new();
        v.require_text("make", "  ");
        v.require_min_chars("name", "A", 2);
        v.check(true, "year", "unused");

        match v.into_result() {
            Err(Error::Validation(fields)) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].field, "make");
                assert_eq!(fields[1].field, "name");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_violations_pass() {
        assert!(Violations::new().into_result().is_ok());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some(" d-1 ")), Some("d-1".to_string()));
        assert_eq!(non_blank(Some("")), None);
        assert_eq!(non_blank(None), None);
    }
}
