//! Category Model

use serde::{Deserialize, Serialize};

use super::{TemplateSchema, default_true, double_option};
use crate::i18n::{Lang, Translation, pick_translation};

/// Product category entity (with its translation rows)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub slug: String,
    pub image_url: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    /// Root categories with this flag get a mega-menu column
    pub show_in_menu: bool,
    /// Attribute schema for products of this category
    #[serde(default)]
    pub template_schema: TemplateSchema,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default)]
    pub translations: Vec<CategoryTranslation>,
}

/// Per-language category text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CategoryTranslation {
    pub lang_code: String,
    pub name: String,
    pub description: Option<String>,
}

impl Translation for CategoryTranslation {
    fn lang_code(&self) -> &str {
        &self.lang_code
    }
}

impl Category {
    /// Resolve the translation for `lang`; the slug stands in for a missing name.
    pub fn localize(&self, lang: Lang) -> LocalizedCategory {
        let tr = pick_translation(&self.translations, lang);
        LocalizedCategory {
            id: self.id,
            parent_id: self.parent_id,
            slug: self.slug.clone(),
            name: tr.map_or_else(|| self.slug.clone(), |t| t.name.clone()),
            description: tr.and_then(|t| t.description.clone()),
            image_url: self.image_url.clone(),
            icon: self.icon.clone(),
            sort_order: self.sort_order,
        }
    }
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub parent_id: Option<i64>,
    /// Derived from the Turkish (or first) name when absent
    pub slug: Option<String>,
    pub image_url: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub show_in_menu: bool,
    pub translations: Vec<CategoryTranslation>,
}

/// Update category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<i64>>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub icon: Option<Option<String>>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
    pub show_in_menu: Option<bool>,
    /// Replaces all translation rows when present
    pub translations: Option<Vec<CategoryTranslation>>,
}

/// Category resolved for one language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizedCategory {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(translations: Vec<CategoryTranslation>) -> Category {
        Category {
            id: 1,
            parent_id: None,
            slug: "kartvizit".into(),
            image_url: None,
            icon: None,
            sort_order: 0,
            is_active: true,
            show_in_menu: true,
            template_schema: Vec::new(),
            created_at: 0,
            updated_at: 0,
            translations,
        }
    }

    fn tr(lang: &str, name: &str) -> CategoryTranslation {
        CategoryTranslation {
            lang_code: lang.into(),
            name: name.into(),
            description: None,
        }
    }

    #[test]
    fn test_localize_picks_language() {
        let c = category(vec![tr("tr", "Kartvizit"), tr("en", "Business Cards")]);
        assert_eq!(c.localize(Lang::En).name, "Business Cards");
        assert_eq!(c.localize(Lang::Tr).name, "Kartvizit");
        // no German row: English wins over Turkish
        assert_eq!(c.localize(Lang::De).name, "Business Cards");
    }

    #[test]
    fn test_localize_without_translations_uses_slug() {
        let c = category(vec![]);
        assert_eq!(c.localize(Lang::De).name, "kartvizit");
    }

    #[test]
    fn test_update_payload_clears_parent() {
        let u: CategoryUpdate = serde_json::from_str(r#"{"parent_id": null}"#).unwrap();
        assert_eq!(u.parent_id, Some(None));
        assert!(u.translations.is_none());
    }
}
