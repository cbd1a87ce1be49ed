//! Product template schema model
//!
//! A template schema is the ordered list of attribute fields an admin attaches
//! to a product category. Products in that category store their attribute
//! values as a JSON object keyed by [`FieldDescriptor::key`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::i18n::LocalizedText;

/// Field input type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    Select,
    Checkbox,
    /// Options come from the active paper materials, not from the descriptor
    PaperType,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::PaperType => "paper_type",
        }
    }
}

/// Select option (embedded in FieldDescriptor)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: LocalizedText,
    /// Added to the unit price when selected (negative = discount)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_modifier: Option<Decimal>,
}

/// One attribute field of a template schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub key: String,
    pub label: LocalizedText,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    /// Only for `select`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<LocalizedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<LocalizedText>,
    /// Only for `number`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Only for `number`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Only for `text`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl FieldDescriptor {
    /// Minimal descriptor, mostly for builders and tests
    pub fn new(key: impl Into<String>, label: LocalizedText, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            label,
            field_type,
            required: false,
            options: Vec::new(),
            placeholder: None,
            help: None,
            min: None,
            max: None,
            max_length: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_option(mut self, value: impl Into<String>, label: LocalizedText) -> Self {
        self.options.push(FieldOption {
            value: value.into(),
            label,
            price_modifier: None,
        });
        self
    }

    pub fn option(&self, value: &str) -> Option<&FieldOption> {
        self.options.iter().find(|o| o.value == value)
    }
}

/// Ordered field list attached to a category
pub type TemplateSchema = Vec<FieldDescriptor>;

/// Why a field value was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Required,
    NotANumber,
    OutOfRange,
    TooLong,
    InvalidOption,
    NotABoolean,
    UnknownPaper,
    /// Wrong JSON type (object/array where a scalar is expected)
    InvalidValue,
}

impl FieldErrorKind {
    /// UI string key (see [`crate::i18n::t`])
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::Required => "template.required",
            Self::NotANumber => "template.not_a_number",
            Self::OutOfRange => "template.out_of_range",
            Self::TooLong => "template.too_long",
            Self::InvalidOption => "template.invalid_option",
            Self::NotABoolean => "template.not_a_boolean",
            Self::UnknownPaper => "template.unknown_paper",
            Self::InvalidValue => "template.invalid_value",
        }
    }
}

/// Field-level validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub key: String,
    pub kind: FieldErrorKind,
    /// Localized message, filled in by the API layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Form widget for a rendered field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    TextInput,
    NumberInput,
    Dropdown,
    Checkbox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedOption {
    pub value: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_modifier: Option<Decimal>,
}

/// A schema field resolved for one language, ready for a form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedField {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub widget: Widget,
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<RenderedOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Current value (null when unset)
    pub value: serde_json::Value,
}

/// Row of a product detail spec table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecRow {
    pub key: String,
    pub label: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_deserialize_minimal() {
        let json = r#"{"key": "size", "label": "Boyut", "type": "select",
                      "options": [{"value": "a4", "label": {"tr": "A4", "en": "A4"}}]}"#;
        let field: FieldDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(field.field_type, FieldType::Select);
        assert!(!field.required);
        assert_eq!(field.options.len(), 1);
        assert!(field.option("a4").is_some());
        assert!(field.option("a3").is_none());
    }

    #[test]
    fn test_descriptor_serialize_uses_type_key() {
        let field = FieldDescriptor::new("qty", LocalizedText::new(), FieldType::PaperType);
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "paper_type");
        assert!(json.get("options").is_none());
    }
}
