//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{LocalizedCategory, SpecRow, default_true, double_option};
use crate::i18n::{Lang, Translation, pick_translation};
use crate::pagination::PageQuery;

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub category_id: i64,
    pub slug: String,
    pub sku: Option<String>,
    /// Unit price before template modifiers, in the shop currency
    pub base_price: Decimal,
    pub image_url: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    /// Template attribute values, keyed by field key
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
    pub sort_order: i32,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default)]
    pub translations: Vec<ProductTranslation>,
}

/// Per-language product text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductTranslation {
    pub lang_code: String,
    pub name: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
}

impl Translation for ProductTranslation {
    fn lang_code(&self) -> &str {
        &self.lang_code
    }
}

impl Product {
    pub fn card(&self, lang: Lang) -> ProductCard {
        let tr = pick_translation(&self.translations, lang);
        ProductCard {
            id: self.id,
            category_id: self.category_id,
            slug: self.slug.clone(),
            name: tr.map_or_else(|| self.slug.clone(), |t| t.name.clone()),
            short_description: tr.and_then(|t| t.short_description.clone()),
            image_url: self.image_url.clone(),
            base_price: self.base_price,
            is_featured: self.is_featured,
        }
    }

    /// Description of the resolved translation
    pub fn description(&self, lang: Lang) -> Option<String> {
        pick_translation(&self.translations, lang).and_then(|t| t.description.clone())
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub category_id: i64,
    pub slug: Option<String>,
    pub sku: Option<String>,
    pub base_price: Decimal,
    pub image_url: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
    pub sort_order: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    pub translations: Vec<ProductTranslation>,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub category_id: Option<i64>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub sku: Option<Option<String>>,
    pub base_price: Option<Decimal>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
    pub gallery: Option<Vec<String>>,
    /// Re-validated against the (possibly new) category schema
    pub attributes: Option<serde_json::Map<String, serde_json::Value>>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub translations: Option<Vec<ProductTranslation>>,
}

/// Product list item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCard {
    pub id: i64,
    pub category_id: i64,
    pub slug: String,
    pub name: String,
    pub short_description: Option<String>,
    pub image_url: Option<String>,
    pub base_price: Decimal,
    pub is_featured: bool,
}

/// Product page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub card: ProductCard,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub gallery: Vec<String>,
    pub category: LocalizedCategory,
    pub breadcrumb: Vec<LocalizedCategory>,
    /// Template attributes as a spec table
    pub specs: Vec<SpecRow>,
}

/// `GET /api/products` and admin product list filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductListQuery {
    /// Category slug (storefront) - includes descendant categories
    pub category: Option<String>,
    /// Category id (admin)
    pub category_id: Option<i64>,
    pub featured: Option<bool>,
    /// Name search (case-insensitive, any language)
    pub q: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ProductListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_card_falls_back_to_turkish() {
        let product = Product {
            id: 10,
            category_id: 1,
            slug: "premium-kartvizit".into(),
            sku: None,
            base_price: Decimal::from_str("149.90").unwrap(),
            image_url: None,
            gallery: vec![],
            attributes: Default::default(),
            sort_order: 0,
            is_active: true,
            is_featured: false,
            created_at: 0,
            updated_at: 0,
            translations: vec![ProductTranslation {
                lang_code: "tr".into(),
                name: "Premium Kartvizit".into(),
                short_description: Some("350gr kuşe".into()),
                description: None,
            }],
        };

        let card = product.card(Lang::De);
        assert_eq!(card.name, "Premium Kartvizit");
        assert_eq!(card.short_description.as_deref(), Some("350gr kuşe"));
        assert_eq!(product.description(Lang::De), None);
    }

    #[test]
    fn test_update_payload_absent_vs_null() {
        let u: ProductUpdate = serde_json::from_str(r#"{"sku": null}"#).unwrap();
        assert_eq!(u.sku, Some(None));
        assert_eq!(u.image_url, None);
    }
}
