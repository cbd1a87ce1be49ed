//! Schema rendering: admin form fields and storefront spec tables

use serde_json::Value;
use shared::i18n::{Lang, t};
use shared::models::{
    FieldDescriptor, FieldType, PaperChoice, RenderedField, RenderedOption, SpecRow, Widget,
};

use super::validate::Values;

fn widget(field_type: FieldType) -> Widget {
    match field_type {
        FieldType::Text => Widget::TextInput,
        FieldType::Number => Widget::NumberInput,
        FieldType::Select | FieldType::PaperType => Widget::Dropdown,
        FieldType::Checkbox => Widget::Checkbox,
    }
}

/// Field label for `lang`, the key when no label text exists
pub fn field_label(field: &FieldDescriptor, lang: Lang) -> String {
    field
        .label
        .get(lang)
        .map_or_else(|| field.key.clone(), str::to_string)
}

/// Resolve the schema into form fields, in schema order, with current values.
pub fn render_form(
    schema: &[FieldDescriptor],
    values: &Values,
    lang: Lang,
    papers: &[PaperChoice],
) -> Vec<RenderedField> {
    schema
        .iter()
        .map(|field| {
            let options = match field.field_type {
                FieldType::Select => field
                    .options
                    .iter()
                    .map(|o| RenderedOption {
                        value: o.value.clone(),
                        label: o.label.get(lang).unwrap_or(o.value.as_str()).to_string(),
                        price_modifier: o.price_modifier,
                    })
                    .collect(),
                FieldType::PaperType => papers
                    .iter()
                    .map(|p| RenderedOption {
                        value: p.code.clone(),
                        label: p.name.clone(),
                        price_modifier: Some(p.unit_price),
                    })
                    .collect(),
                _ => Vec::new(),
            };

            RenderedField {
                key: field.key.clone(),
                label: field_label(field, lang),
                field_type: field.field_type,
                widget: widget(field.field_type),
                required: field.required,
                options,
                placeholder: field
                    .placeholder
                    .as_ref()
                    .and_then(|p| p.get(lang))
                    .map(str::to_string),
                help: field.help.as_ref().and_then(|h| h.get(lang)).map(str::to_string),
                min: field.min,
                max: field.max,
                max_length: field.max_length,
                value: values.get(&field.key).cloned().unwrap_or(Value::Null),
            }
        })
        .collect()
}

/// Label/value rows for a product page. Unset fields are skipped.
pub fn render_display(
    schema: &[FieldDescriptor],
    values: &Values,
    lang: Lang,
    papers: &[PaperChoice],
) -> Vec<SpecRow> {
    schema
        .iter()
        .filter_map(|field| {
            let value = display_value(field, values.get(&field.key)?, lang, papers)?;
            Some(SpecRow {
                key: field.key.clone(),
                label: field_label(field, lang),
                value,
            })
        })
        .collect()
}

fn display_value(
    field: &FieldDescriptor,
    raw: &Value,
    lang: Lang,
    papers: &[PaperChoice],
) -> Option<String> {
    let text = match raw {
        Value::Null => return None,
        Value::String(s) if s.trim().is_empty() => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(_) | Value::Object(_) => return None,
    };

    Some(match field.field_type {
        FieldType::Text | FieldType::Number => text,
        FieldType::Select => field
            .option(&text)
            .and_then(|o| o.label.get(lang))
            .map_or(text.clone(), str::to_string),
        FieldType::Checkbox => {
            let key = if raw.as_bool() == Some(true) {
                "common.yes"
            } else {
                "common.no"
            };
            t(lang, key)
        }
        FieldType::PaperType => papers
            .iter()
            .find(|p| p.code == text)
            .map_or(text.clone(), |p| p.name.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;
    use shared::i18n::LocalizedText;

    fn schema() -> Vec<FieldDescriptor> {
        let mut size = FieldDescriptor::new(
            "size",
            LocalizedText::new().with(Lang::Tr, "Boyut").with(Lang::En, "Size"),
            FieldType::Select,
        )
        .with_option("a4", LocalizedText::new().with(Lang::Tr, "A4 (21x29.7)"))
        .required();
        size.options[0].price_modifier = Some(Decimal::new(250, 2));
        size.help = Some(LocalizedText::new().with(Lang::En, "Final trim size"));

        vec![
            size,
            FieldDescriptor::new("note", LocalizedText::new(), FieldType::Text),
            FieldDescriptor::new(
                "uv",
                LocalizedText::new().with(Lang::De, "UV-Lack"),
                FieldType::Checkbox,
            ),
            FieldDescriptor::new("paper", tr_text("Kağıt"), FieldType::PaperType),
            FieldDescriptor::new("count", tr_text("Adet"), FieldType::Number),
        ]
    }

    fn tr_text(s: &str) -> LocalizedText {
        LocalizedText::new().with(Lang::Tr, s)
    }

    fn papers() -> Vec<PaperChoice> {
        vec![PaperChoice {
            code: "matte_300".into(),
            name: "Mat Kuşe 300gr".into(),
            gsm: Some(300),
            unit_price: Decimal::new(8, 2),
        }]
    }

    #[test]
    fn test_render_form() {
        let values = json!({"size": "a4"}).as_object().cloned().unwrap();
        let form = render_form(&schema(), &values, Lang::En, &papers());

        assert_eq!(form.len(), 5);
        assert_eq!(form[0].label, "Size");
        assert_eq!(form[0].widget, Widget::Dropdown);
        assert_eq!(form[0].options[0].label, "A4 (21x29.7)");
        assert_eq!(form[0].options[0].price_modifier, Some(Decimal::new(250, 2)));
        assert_eq!(form[0].help.as_deref(), Some("Final trim size"));
        assert_eq!(form[0].value, json!("a4"));
        assert!(form[0].required);

        // empty label falls back to the key
        assert_eq!(form[1].label, "note");
        assert_eq!(form[1].value, Value::Null);

        assert_eq!(form[2].widget, Widget::Checkbox);
        assert_eq!(form[3].options[0].value, "matte_300");
        assert_eq!(form[4].widget, Widget::NumberInput);
    }

    #[test]
    fn test_render_display() {
        let values = json!({
            "size": "a4",
            "note": "  ",
            "uv": true,
            "paper": "matte_300",
            "count": 250
        });
        let rows = render_display(&schema(), values.as_object().unwrap(), Lang::De, &papers());
        let flat: Vec<(&str, &str)> = rows.iter().map(|r| (r.label.as_str(), r.value.as_str())).collect();
        assert_eq!(
            flat,
            vec![
                ("Size", "A4 (21x29.7)"),
                ("UV-Lack", "Ja"),
                ("Kağıt", "Mat Kuşe 300gr"),
                ("Adet", "250"),
            ]
        );
    }

    #[test]
    fn test_display_keeps_unknown_codes() {
        let values = json!({"size": "legacy", "paper": "gone", "uv": false});
        let rows = render_display(&schema(), values.as_object().unwrap(), Lang::Tr, &[]);
        let flat: Vec<&str> = rows.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(flat, vec!["legacy", "Hayır", "gone"]);
    }
}
