//! Template schema invariants

use std::collections::HashSet;

use shared::error::{AppError, ErrorCode};
use shared::models::{FieldDescriptor, FieldType};

/// Longest accepted field key
pub const MAX_KEY_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("field #{index}: key '{key}' must match [a-z][a-z0-9_]* (max {MAX_KEY_LEN} chars)")]
    InvalidKey { index: usize, key: String },

    #[error("field '{key}': duplicate key")]
    DuplicateKey { key: String },

    #[error("field '{key}': select needs at least one option")]
    MissingOptions { key: String },

    #[error("field '{key}': option value '{value}' is empty or repeated")]
    InvalidOptionValue { key: String, value: String },

    #[error("field '{key}': only select fields take options")]
    UnexpectedOptions { key: String },

    #[error("field '{key}': min must not exceed max")]
    InvalidRange { key: String },
}

/// `[a-z][a-z0-9_]*`, at most [`MAX_KEY_LEN`] bytes
pub fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    key.len() <= MAX_KEY_LEN
        && chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Check every schema invariant and report all violations.
pub fn validate_schema(fields: &[FieldDescriptor]) -> Result<(), Vec<SchemaError>> {
    let mut errors = Vec::new();
    let mut keys = HashSet::new();

    for (index, field) in fields.iter().enumerate() {
        let key = field.key.clone();

        if !is_valid_key(&field.key) {
            errors.push(SchemaError::InvalidKey {
                index,
                key: key.clone(),
            });
        } else if !keys.insert(field.key.as_str()) {
            errors.push(SchemaError::DuplicateKey { key: key.clone() });
        }

        match field.field_type {
            FieldType::Select => {
                if field.options.is_empty() {
                    errors.push(SchemaError::MissingOptions { key: key.clone() });
                }
                let mut values = HashSet::new();
                for option in &field.options {
                    if option.value.trim().is_empty() || !values.insert(option.value.as_str()) {
                        errors.push(SchemaError::InvalidOptionValue {
                            key: key.clone(),
                            value: option.value.clone(),
                        });
                    }
                }
            }
            _ if !field.options.is_empty() => {
                errors.push(SchemaError::UnexpectedOptions { key: key.clone() });
            }
            _ => {}
        }

        if let (Some(min), Some(max)) = (field.min, field.max)
            && min > max
        {
            errors.push(SchemaError::InvalidRange { key });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// API error carrying every violation as `details.errors`
pub fn schema_error(errors: &[SchemaError]) -> AppError {
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    AppError::with_message(ErrorCode::TemplateSchemaInvalid, messages.join("; "))
        .with_detail("errors", messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::i18n::LocalizedText;

    fn label(s: &str) -> LocalizedText {
        LocalizedText::new().with(shared::i18n::Lang::Tr, s)
    }

    fn text(key: &str) -> FieldDescriptor {
        FieldDescriptor::new(key, label(key), FieldType::Text)
    }

    #[test]
    fn test_key_format() {
        assert!(is_valid_key("paper_size"));
        assert!(is_valid_key("a1"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("1st"));
        assert!(!is_valid_key("_x"));
        assert!(!is_valid_key("Paper"));
        assert!(!is_valid_key("kağıt"));
        assert!(!is_valid_key("with-dash"));
        assert!(is_valid_key(&"k".repeat(MAX_KEY_LEN)));
        assert!(!is_valid_key(&"k".repeat(MAX_KEY_LEN + 1)));
    }

    #[test]
    fn test_valid_schema() {
        let schema = vec![
            text("title"),
            FieldDescriptor::new("size", label("Boyut"), FieldType::Select)
                .with_option("a4", label("A4"))
                .with_option("a5", label("A5")),
            FieldDescriptor::new("paper", label("Kağıt"), FieldType::PaperType),
        ];
        assert!(validate_schema(&schema).is_ok());
        assert!(validate_schema(&[]).is_ok());
    }

    #[test]
    fn test_duplicate_key() {
        let errors = validate_schema(&[text("a"), text("a")]).unwrap_err();
        assert_eq!(errors, vec![SchemaError::DuplicateKey { key: "a".into() }]);
    }

    #[test]
    fn test_select_rules() {
        let empty = FieldDescriptor::new("size", label("Boyut"), FieldType::Select);
        let repeated = FieldDescriptor::new("finish", label("Yüzey"), FieldType::Select)
            .with_option("matte", label("Mat"))
            .with_option("matte", label("Mat 2"))
            .with_option(" ", label("Boş"));

        let errors = validate_schema(&[empty, repeated]).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], SchemaError::MissingOptions { .. }));
        assert!(matches!(errors[1], SchemaError::InvalidOptionValue { .. }));
        assert!(matches!(errors[2], SchemaError::InvalidOptionValue { .. }));
    }

    #[test]
    fn test_options_only_on_select() {
        let field = text("note").with_option("x", label("x"));
        let errors = validate_schema(&[field]).unwrap_err();
        assert_eq!(errors, vec![SchemaError::UnexpectedOptions { key: "note".into() }]);
    }

    #[test]
    fn test_min_max() {
        let mut field = FieldDescriptor::new("qty", label("Adet"), FieldType::Number);
        field.min = Some(10.0);
        field.max = Some(1.0);
        assert_eq!(
            validate_schema(&[field]).unwrap_err(),
            vec![SchemaError::InvalidRange { key: "qty".into() }]
        );
    }

    #[test]
    fn test_schema_error_details() {
        let err = schema_error(&[SchemaError::DuplicateKey { key: "a".into() }]);
        assert_eq!(err.code, ErrorCode::TemplateSchemaInvalid);
        assert!(err.details.is_some());
    }
}
