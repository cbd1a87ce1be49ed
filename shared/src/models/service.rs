//! Service Model (print services shown on the storefront)

use serde::{Deserialize, Serialize};

use super::{default_true, double_option};
use crate::i18n::{Lang, Translation, pick_translation};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub slug: String,
    pub icon: Option<String>,
    pub image_url: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default)]
    pub translations: Vec<ServiceTranslation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ServiceTranslation {
    pub lang_code: String,
    pub title: String,
    pub summary: Option<String>,
    pub content: Option<String>,
}

impl Translation for ServiceTranslation {
    fn lang_code(&self) -> &str {
        &self.lang_code
    }
}

impl Service {
    pub fn localize(&self, lang: Lang) -> LocalizedService {
        let tr = pick_translation(&self.translations, lang);
        LocalizedService {
            id: self.id,
            slug: self.slug.clone(),
            title: tr.map_or_else(|| self.slug.clone(), |t| t.title.clone()),
            summary: tr.and_then(|t| t.summary.clone()),
            content: tr.and_then(|t| t.content.clone()),
            icon: self.icon.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// Create service payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCreate {
    pub slug: Option<String>,
    pub icon: Option<String>,
    pub image_url: Option<String>,
    pub sort_order: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub translations: Vec<ServiceTranslation>,
}

/// Update service payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceUpdate {
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub icon: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
    pub translations: Option<Vec<ServiceTranslation>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedService {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub icon: Option<String>,
    pub image_url: Option<String>,
}
