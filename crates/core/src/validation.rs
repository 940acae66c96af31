// Field validation
//
// A Validator collects every violated rule for a request in one pass; it
// never stops at the first failure. Callers turn the collected violations
// into an Error::Validation before touching any state.

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// One violated field rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct FieldError {
    /// Name of the offending field
    pub field: String,
    /// Human-readable reason
    pub message: String,
    /// Offending value, when it is short enough to echo back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Every violation found for one request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError {
                field: field.into(),
                message: message.into(),
                value: None,
            }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether any violation names this field.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Values longer than this are not echoed in a FieldError.
const MAX_ECHOED_VALUE_CHARS: usize = 256;

/// Collects rule violations across fields.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, field: &str, message: &str, value: Option<&str>) {
        let value = value
            .filter(|v| v.chars().count() <= MAX_ECHOED_VALUE_CHARS)
            .map(str::to_string);
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
            value,
        });
    }

    /// Field must contain at least one character.
    pub fn non_empty(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        if value.is_empty() {
            self.push(field, message, Some(value));
        }
        self
    }

    /// Field must contain at least `min` characters.
    pub fn min_chars(&mut self, field: &str, value: &str, min: usize, message: &str) -> &mut Self {
        if value.chars().count() < min {
            self.push(field, message, Some(value));
        }
        self
    }

    /// Field must not exceed `max` bytes.
    pub fn max_bytes(&mut self, field: &str, value: &str, max: usize, message: &str) -> &mut Self {
        if value.len() > max {
            tracing::warn!(
                field,
                size = value.len(),
                max,
                "Field exceeds size limit"
            );
            self.push(field, message, None);
        }
        self
    }

    /// Field must be one of `allowed`.
    pub fn one_of(
        &mut self,
        field: &str,
        value: &str,
        allowed: &[&str],
        message: &str,
    ) -> &mut Self {
        if !allowed.contains(&value) {
            self.push(field, message, Some(value));
        }
        self
    }

    /// Finish validation: Ok when no rule was violated.
    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors {
                errors: self.errors,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_when_valid() {
        let mut v = Validator::new();
        v.non_empty("name", "Helper", "required")
            .min_chars("behavior", "long enough text", 10, "too short")
            .one_of("model", "b", &["a", "b"], "bad model");
        assert!(v.finish().is_ok());
    }

    #[test]
    fn test_collects_all_violations() {
        let mut v = Validator::new();
        v.non_empty("name", "", "required")
            .min_chars("behavior", "short", 10, "too short")
            .one_of("model", "c", &["a", "b"], "bad model");
        let errors = v.finish().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.fields(), vec!["name", "behavior", "model"]);
        assert_eq!(errors.errors[2].value.as_deref(), Some("c"));
    }

    #[test]
    fn test_min_chars_counts_characters_not_bytes() {
        let mut v = Validator::new();
        // 10 multi-byte characters
        v.min_chars("behavior", "éééééééééé", 10, "too short");
        assert!(v.finish().is_ok());
    }

    #[test]
    fn test_oversized_value_is_not_echoed() {
        let big = "x".repeat(1000);
        let mut v = Validator::new();
        v.max_bytes("behavior", &big, 10, "too large")
            .min_chars("other", &big[..3], 10, "too short");
        let errors = v.finish().unwrap_err();
        assert!(errors.errors[0].value.is_none());
        assert_eq!(errors.errors[1].value.as_deref(), Some("xxx"));
    }

    #[test]
    fn test_display_joins_violations() {
        let errors = ValidationErrors::single("message", "Message is required");
        assert_eq!(errors.to_string(), "message: Message is required");
        assert!(errors.has_field("message"));
    }
}
