//! Price quotes for configured products
//!
//! ```text
//! unit     = base_price + Σ select price_modifier + Σ paper unit_price
//! subtotal = unit × quantity
//! discount = subtotal × tier% / 100   (tier: highest min_quantity <= quantity)
//! total    = subtotal - discount
//! ```
//!
//! Money is rounded to 2 decimal places, half away from zero. The subtotal is
//! taken from the unrounded unit; the reported `unit_price` is rounded for display.

use rust_decimal::prelude::*;
use shared::error::{AppError, ErrorCode};
use shared::i18n::Lang;
use shared::models::{FieldDescriptor, FieldType, PaperChoice, PriceTier, Product, Quote, QuoteLine};

use crate::template::Values;
use crate::template::render::field_label;

const DECIMAL_PLACES: u32 = 2;

pub const MIN_QUANTITY: i64 = 1;
pub const MAX_QUANTITY: i64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuoteError {
    #[error("quantity must be between {MIN_QUANTITY} and {MAX_QUANTITY}, got {0}")]
    QuantityOutOfRange(i64),
}

impl From<QuoteError> for AppError {
    fn from(e: QuoteError) -> Self {
        AppError::with_message(ErrorCode::QuoteQuantityInvalid, e.to_string())
    }
}

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Tier with the highest `min_quantity` not above `quantity`
pub fn applicable_tier(tiers: &[PriceTier], quantity: i64) -> Option<&PriceTier> {
    tiers
        .iter()
        .filter(|t| i64::from(t.min_quantity) <= quantity)
        .max_by_key(|t| t.min_quantity)
}

/// Price `quantity` units of `product` configured with already-validated `values`.
pub fn compute_quote(
    product: &Product,
    schema: &[FieldDescriptor],
    values: &Values,
    papers: &[PaperChoice],
    tiers: &[PriceTier],
    quantity: i64,
    lang: Lang,
) -> Result<Quote, QuoteError> {
    if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity) {
        return Err(QuoteError::QuantityOutOfRange(quantity));
    }

    let mut lines = Vec::new();
    for field in schema {
        let Some(selected) = values.get(&field.key).and_then(|v| v.as_str()) else {
            continue;
        };
        match field.field_type {
            FieldType::Select => {
                if let Some(option) = field.option(selected)
                    && let Some(amount) = option.price_modifier
                {
                    lines.push(QuoteLine {
                        key: field.key.clone(),
                        label: field_label(field, lang),
                        value: option.label.get(lang).unwrap_or(selected).to_string(),
                        amount,
                    });
                }
            }
            FieldType::PaperType => {
                if let Some(paper) = papers.iter().find(|p| p.code == selected) {
                    lines.push(QuoteLine {
                        key: field.key.clone(),
                        label: field_label(field, lang),
                        value: paper.name.clone(),
                        amount: paper.unit_price,
                    });
                }
            }
            _ => {}
        }
    }

    let raw_unit =
        (product.base_price + lines.iter().map(|l| l.amount).sum::<Decimal>()).max(Decimal::ZERO);
    let unit_price = round_money(raw_unit);
    let subtotal = round_money(raw_unit * Decimal::from(quantity));
    let discount_percent = applicable_tier(tiers, quantity)
        .map(|t| t.discount_percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO);
    let discount = round_money(subtotal * discount_percent / Decimal::ONE_HUNDRED);

    Ok(Quote {
        product_id: product.id,
        quantity,
        base_price: product.base_price,
        lines,
        unit_price,
        subtotal,
        discount_percent,
        discount,
        total: subtotal - discount,
        values: values.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::i18n::LocalizedText;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn product(base: &str) -> Product {
        Product {
            id: 7,
            category_id: 1,
            slug: "flyer".into(),
            sku: None,
            base_price: dec(base),
            image_url: None,
            gallery: vec![],
            attributes: Default::default(),
            sort_order: 0,
            is_active: true,
            is_featured: false,
            created_at: 0,
            updated_at: 0,
            translations: vec![],
        }
    }

    fn schema() -> Vec<FieldDescriptor> {
        let mut size = FieldDescriptor::new(
            "size",
            LocalizedText::new().with(Lang::En, "Size"),
            FieldType::Select,
        )
        .with_option("a5", LocalizedText::new().with(Lang::En, "A5"))
        .with_option("a4", LocalizedText::new().with(Lang::En, "A4"));
        size.options[1].price_modifier = Some(dec("0.15"));
        vec![
            size,
            FieldDescriptor::new("paper", LocalizedText::new(), FieldType::PaperType),
        ]
    }

    fn papers() -> Vec<PaperChoice> {
        vec![PaperChoice {
            code: "gloss_170".into(),
            name: "Gloss 170g".into(),
            gsm: Some(170),
            unit_price: dec("0.035"),
        }]
    }

    fn tier(min_quantity: i32, pct: &str) -> PriceTier {
        PriceTier {
            id: i64::from(min_quantity),
            category_id: 1,
            min_quantity,
            discount_percent: dec(pct),
        }
    }

    fn values(v: serde_json::Value) -> Values {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_unit_price_sums_modifiers() {
        let q = compute_quote(
            &product("0.20"),
            &schema(),
            &values(json!({"size": "a4", "paper": "gloss_170"})),
            &papers(),
            &[],
            100,
            Lang::En,
        )
        .unwrap();

        // 0.20 + 0.15 + 0.035 = 0.385, shown as 0.39
        assert_eq!(q.unit_price, dec("0.39"));
        assert_eq!(q.subtotal, dec("38.50"));
        assert_eq!(q.discount, Decimal::ZERO);
        assert_eq!(q.total, dec("38.50"));
        assert_eq!(q.lines.len(), 2);
        assert_eq!(q.lines[0].label, "Size");
        assert_eq!(q.lines[0].value, "A4");
        assert_eq!(q.lines[1].label, "paper");
    }

    #[test]
    fn test_fractional_unit_not_rounded_before_quantity() {
        let q = compute_quote(
            &product("0.385"),
            &schema(),
            &values(json!({})),
            &papers(),
            &[],
            1000,
            Lang::En,
        )
        .unwrap();
        assert_eq!(q.unit_price, dec("0.39"));
        assert_eq!(q.subtotal, dec("385.00"));
        assert_eq!(q.total, dec("385.00"));
    }

    #[test]
    fn test_option_without_modifier_adds_no_line() {
        let q = compute_quote(
            &product("1"),
            &schema(),
            &values(json!({"size": "a5"})),
            &papers(),
            &[],
            1,
            Lang::En,
        )
        .unwrap();
        assert!(q.lines.is_empty());
        assert_eq!(q.total, dec("1.00"));
    }

    #[test]
    fn test_highest_applicable_tier_wins() {
        let tiers = vec![tier(1000, "15"), tier(100, "5"), tier(500, "10")];
        assert_eq!(applicable_tier(&tiers, 99), None);
        assert_eq!(applicable_tier(&tiers, 100).map(|t| t.min_quantity), Some(100));
        assert_eq!(applicable_tier(&tiers, 999).map(|t| t.min_quantity), Some(500));
        assert_eq!(applicable_tier(&tiers, 5000).map(|t| t.min_quantity), Some(1000));

        let q = compute_quote(&product("0.50"), &[], &Values::new(), &[], &tiers, 600, Lang::Tr)
            .unwrap();
        assert_eq!(q.subtotal, dec("300.00"));
        assert_eq!(q.discount_percent, dec("10"));
        assert_eq!(q.discount, dec("30.00"));
        assert_eq!(q.total, dec("270.00"));
    }

    #[test]
    fn test_discount_rounds_half_up() {
        // 3 x 0.35 = 1.05, 5% = 0.0525 -> 0.05
        let q = compute_quote(&product("0.35"), &[], &Values::new(), &[], &[tier(1, "5")], 3, Lang::Tr)
            .unwrap();
        assert_eq!(q.discount, dec("0.05"));
        assert_eq!(q.total, dec("1.00"));

        // 1 x 0.25, 10% = 0.025 -> 0.03
        let q = compute_quote(&product("0.25"), &[], &Values::new(), &[], &[tier(1, "10")], 1, Lang::Tr)
            .unwrap();
        assert_eq!(q.discount, dec("0.03"));
    }

    #[test]
    fn test_quantity_bounds() {
        let p = product("1");
        for qty in [0, -5, MAX_QUANTITY + 1] {
            assert_eq!(
                compute_quote(&p, &[], &Values::new(), &[], &[], qty, Lang::En).unwrap_err(),
                QuoteError::QuantityOutOfRange(qty)
            );
        }
        assert!(compute_quote(&p, &[], &Values::new(), &[], &[], MAX_QUANTITY, Lang::En).is_ok());
    }

    #[test]
    fn test_negative_modifiers_never_go_below_zero() {
        let mut s = schema();
        s[0].options[0].price_modifier = Some(dec("-5"));
        let q = compute_quote(&product("1"), &s, &values(json!({"size": "a5"})), &[], &[], 10, Lang::En)
            .unwrap();
        assert_eq!(q.unit_price, Decimal::ZERO);
        assert_eq!(q.total, Decimal::ZERO);
    }
}
