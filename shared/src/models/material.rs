//! Material & pricing models
//!
//! Materials are the paper stocks and finishes the print templates can
//! reference; price tiers give quantity discounts per category.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{default_true, double_option};
use crate::i18n::{Lang, Translation, pick_translation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    Paper,
    Lamination,
    Finish,
}

impl MaterialKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paper => "paper",
            Self::Lamination => "lamination",
            Self::Finish => "finish",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "paper" => Some(Self::Paper),
            "lamination" => Some(Self::Lamination),
            "finish" => Some(Self::Finish),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub id: i64,
    pub kind: MaterialKind,
    /// Stable code referenced from product attributes (e.g. `coated_350`)
    pub code: String,
    /// Surcharge per printed unit
    pub unit_price: Decimal,
    /// Paper weight in g/m²
    pub gsm: Option<i32>,
    pub sort_order: i32,
    pub is_active: bool,
    #[serde(default)]
    pub translations: Vec<MaterialTranslation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MaterialTranslation {
    pub lang_code: String,
    pub name: String,
    pub description: Option<String>,
}

impl Translation for MaterialTranslation {
    fn lang_code(&self) -> &str {
        &self.lang_code
    }
}

impl Material {
    /// Paper choice for template forms and quotes
    pub fn paper_choice(&self, lang: Lang) -> PaperChoice {
        PaperChoice {
            code: self.code.clone(),
            name: pick_translation(&self.translations, lang)
                .map_or_else(|| self.code.clone(), |t| t.name.clone()),
            gsm: self.gsm,
            unit_price: self.unit_price,
        }
    }
}

/// An active paper material, resolved for one language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperChoice {
    pub code: String,
    pub name: String,
    pub gsm: Option<i32>,
    pub unit_price: Decimal,
}

/// Create material payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialCreate {
    pub kind: MaterialKind,
    pub code: String,
    #[serde(default)]
    pub unit_price: Decimal,
    pub gsm: Option<i32>,
    pub sort_order: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub translations: Vec<MaterialTranslation>,
}

/// Update material payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialUpdate {
    pub kind: Option<MaterialKind>,
    pub code: Option<String>,
    pub unit_price: Option<Decimal>,
    #[serde(default, deserialize_with = "double_option")]
    pub gsm: Option<Option<i32>>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
    pub translations: Option<Vec<MaterialTranslation>>,
}

/// Quantity discount for a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PriceTier {
    pub id: i64,
    pub category_id: i64,
    /// Applies from this quantity upwards
    pub min_quantity: i32,
    /// 0..=100
    pub discount_percent: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTierInput {
    pub min_quantity: i32,
    pub discount_percent: Decimal,
}

/// `PUT /api/admin/categories/{id}/price-tiers`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTiersReplace {
    pub tiers: Vec<PriceTierInput>,
}

/// `POST /api/products/{slug}/quote`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub quantity: i64,
    #[serde(default)]
    pub values: serde_json::Map<String, serde_json::Value>,
}

/// Priced component of a quote's unit price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteLine {
    pub key: String,
    pub label: String,
    pub value: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub product_id: i64,
    pub quantity: i64,
    pub base_price: Decimal,
    pub lines: Vec<QuoteLine>,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub discount_percent: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    /// Normalized template values the quote was computed from
    pub values: serde_json::Map<String, serde_json::Value>,
}
