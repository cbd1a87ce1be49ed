//! Validation of attribute values against a template schema

use serde_json::{Map, Number, Value};
use shared::error::{AppError, ErrorCode};
use shared::i18n::{Lang, t};
use shared::models::{FieldDescriptor, FieldError, FieldErrorKind, FieldType, PaperChoice};

pub type Values = Map<String, Value>;

/// Missing, null, or a blank string
fn is_unset(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        _ => false,
    }
}

/// Validate `values` against `schema`.
///
/// On success returns the normalized values: only schema keys, text
/// trimmed, numbers coerced from numeric strings, select and paper codes
/// as strings. On failure returns every field error, in schema order.
pub fn validate_values(
    schema: &[FieldDescriptor],
    values: &Values,
    papers: &[PaperChoice],
) -> Result<Values, Vec<FieldError>> {
    let mut normalized = Map::new();
    let mut errors = Vec::new();

    for field in schema {
        let raw = values.get(&field.key);

        if is_unset(raw) {
            if field.required {
                errors.push(error(field, FieldErrorKind::Required));
            }
            continue;
        }
        let Some(raw) = raw else { continue };

        match check_field(field, raw, papers) {
            Ok(value) => {
                normalized.insert(field.key.clone(), value);
            }
            Err(kind) => errors.push(error(field, kind)),
        }
    }

    if errors.is_empty() {
        Ok(normalized)
    } else {
        Err(errors)
    }
}

fn error(field: &FieldDescriptor, kind: FieldErrorKind) -> FieldError {
    FieldError {
        key: field.key.clone(),
        kind,
        message: None,
    }
}

fn check_field(
    field: &FieldDescriptor,
    raw: &Value,
    papers: &[PaperChoice],
) -> Result<Value, FieldErrorKind> {
    match field.field_type {
        FieldType::Text => {
            let text = scalar_text(raw).ok_or(FieldErrorKind::InvalidValue)?;
            if let Some(max) = field.max_length
                && text.chars().count() > max
            {
                return Err(FieldErrorKind::TooLong);
            }
            Ok(Value::String(text))
        }
        FieldType::Number => {
            let n = match raw {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            }
            .filter(|n| n.is_finite())
            .ok_or(FieldErrorKind::NotANumber)?;

            if field.min.is_some_and(|min| n < min) || field.max.is_some_and(|max| n > max) {
                return Err(FieldErrorKind::OutOfRange);
            }
            Ok(number_value(n))
        }
        FieldType::Select => {
            let choice = scalar_text(raw).ok_or(FieldErrorKind::InvalidOption)?;
            field
                .option(&choice)
                .map(|o| Value::String(o.value.clone()))
                .ok_or(FieldErrorKind::InvalidOption)
        }
        FieldType::Checkbox => match raw {
            Value::Bool(false) if field.required => Err(FieldErrorKind::Required),
            Value::Bool(b) => Ok(Value::Bool(*b)),
            _ => Err(FieldErrorKind::NotABoolean),
        },
        FieldType::PaperType => {
            let code = scalar_text(raw).ok_or(FieldErrorKind::UnknownPaper)?;
            papers
                .iter()
                .find(|p| p.code == code)
                .map(|p| Value::String(p.code.clone()))
                .ok_or(FieldErrorKind::UnknownPaper)
        }
    }
}

/// Trimmed text of a string, number or bool
fn scalar_text(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Integral values are stored as integers (`"5"` → `5`, not `5.0`)
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

/// Fill in localized messages and wrap as an API error
pub fn values_error(mut errors: Vec<FieldError>, lang: Lang) -> AppError {
    for e in &mut errors {
        e.message = Some(t(lang, e.kind.message_key()));
    }
    let summary = errors
        .iter()
        .map(|e| e.key.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let details = serde_json::to_value(&errors).unwrap_or(Value::Null);
    AppError::with_message(
        ErrorCode::TemplateValuesInvalid,
        format!("Invalid attribute values: {summary}"),
    )
    .with_detail("fields", details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;
    use shared::i18n::LocalizedText;

    fn label(s: &str) -> LocalizedText {
        LocalizedText::new().with(Lang::Tr, s)
    }

    fn schema() -> Vec<FieldDescriptor> {
        let mut title = FieldDescriptor::new("title", label("Başlık"), FieldType::Text).required();
        title.max_length = Some(10);
        let mut qty = FieldDescriptor::new("sheets", label("Sayfa"), FieldType::Number);
        qty.min = Some(1.0);
        qty.max = Some(100.0);
        vec![
            title,
            qty,
            FieldDescriptor::new("size", label("Boyut"), FieldType::Select)
                .with_option("a4", label("A4"))
                .with_option("a5", label("A5")),
            FieldDescriptor::new("lamination", label("Selefon"), FieldType::Checkbox),
            FieldDescriptor::new("paper", label("Kağıt"), FieldType::PaperType),
        ]
    }

    fn papers() -> Vec<PaperChoice> {
        vec![PaperChoice {
            code: "coated_350".into(),
            name: "Kuşe 350gr".into(),
            gsm: Some(350),
            unit_price: Decimal::new(5, 2),
        }]
    }

    fn values(v: Value) -> Values {
        v.as_object().cloned().unwrap()
    }

    fn kinds(errors: &[FieldError]) -> Vec<(&str, FieldErrorKind)> {
        errors.iter().map(|e| (e.key.as_str(), e.kind)).collect()
    }

    #[test]
    fn test_valid_values_are_normalized() {
        let input = values(json!({
            "title": "  Kartvizit ",
            "sheets": "12",
            "size": "a5",
            "lamination": true,
            "paper": "coated_350",
            "unknown": "dropped"
        }));
        let out = validate_values(&schema(), &input, &papers()).unwrap();
        assert_eq!(out["title"], "Kartvizit");
        assert_eq!(out["sheets"], json!(12));
        assert_eq!(out["size"], "a5");
        assert_eq!(out["lamination"], true);
        assert_eq!(out["paper"], "coated_350");
        assert!(!out.contains_key("unknown"));
    }

    #[test]
    fn test_optional_blank_fields_are_omitted() {
        let input = values(json!({"title": "x", "sheets": "", "size": null}));
        let out = validate_values(&schema(), &input, &papers()).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_required_missing_or_blank() {
        for v in [json!({}), json!({"title": null}), json!({"title": "   "})] {
            let errors = validate_values(&schema(), &values(v), &papers()).unwrap_err();
            assert_eq!(kinds(&errors), vec![("title", FieldErrorKind::Required)]);
        }
    }

    #[test]
    fn test_collects_every_error_in_schema_order() {
        let input = values(json!({
            "title": "far too long for ten",
            "sheets": "many",
            "size": "a3",
            "lamination": "yes",
            "paper": "gold_leaf"
        }));
        let errors = validate_values(&schema(), &input, &papers()).unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![
                ("title", FieldErrorKind::TooLong),
                ("sheets", FieldErrorKind::NotANumber),
                ("size", FieldErrorKind::InvalidOption),
                ("lamination", FieldErrorKind::NotABoolean),
                ("paper", FieldErrorKind::UnknownPaper),
            ]
        );
    }

    #[test]
    fn test_number_range_and_fraction() {
        let s = schema();
        let err = validate_values(&s, &values(json!({"title": "x", "sheets": 101})), &[]).unwrap_err();
        assert_eq!(kinds(&err), vec![("sheets", FieldErrorKind::OutOfRange)]);

        let out = validate_values(&s, &values(json!({"title": "x", "sheets": "2.5"})), &[]).unwrap();
        assert_eq!(out["sheets"], json!(2.5));

        let err = validate_values(&s, &values(json!({"title": "x", "sheets": true})), &[]).unwrap_err();
        assert_eq!(kinds(&err), vec![("sheets", FieldErrorKind::NotANumber)]);
    }

    #[test]
    fn test_text_length_counts_characters() {
        // 10 characters, more bytes
        let input = values(json!({"title": "ğüşıöçĞÜŞİ"}));
        assert!(validate_values(&schema(), &input, &[]).is_ok());
    }

    #[test]
    fn test_text_rejects_structures_and_accepts_scalars() {
        let err = validate_values(&schema(), &values(json!({"title": ["a"]})), &[]).unwrap_err();
        assert_eq!(kinds(&err), vec![("title", FieldErrorKind::InvalidValue)]);

        let out = validate_values(&schema(), &values(json!({"title": 42})), &[]).unwrap();
        assert_eq!(out["title"], "42");
    }

    #[test]
    fn test_required_checkbox_must_be_checked() {
        let schema = vec![
            FieldDescriptor::new("terms", label("Onay"), FieldType::Checkbox).required(),
        ];
        let err = validate_values(&schema, &values(json!({"terms": false})), &[]).unwrap_err();
        assert_eq!(kinds(&err), vec![("terms", FieldErrorKind::Required)]);
        assert!(validate_values(&schema, &values(json!({"terms": true})), &[]).is_ok());

        // optional checkbox keeps an explicit false
        let optional = vec![FieldDescriptor::new("x", label("x"), FieldType::Checkbox)];
        let out = validate_values(&optional, &values(json!({"x": false})), &[]).unwrap();
        assert_eq!(out["x"], false);
    }

    #[test]
    fn test_paper_requires_active_paper_list() {
        let input = values(json!({"title": "x", "paper": "coated_350"}));
        let err = validate_values(&schema(), &input, &[]).unwrap_err();
        assert_eq!(kinds(&err), vec![("paper", FieldErrorKind::UnknownPaper)]);
    }

    #[test]
    fn test_values_error_is_localized() {
        let err = values_error(
            vec![FieldError {
                key: "title".into(),
                kind: FieldErrorKind::Required,
                message: None,
            }],
            Lang::Tr,
        );
        assert_eq!(err.code, ErrorCode::TemplateValuesInvalid);
        let details = err.details.unwrap();
        assert_eq!(details["fields"][0]["message"], "Bu alan zorunludur.");
    }
}
