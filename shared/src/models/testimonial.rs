//! Testimonial Model

use serde::{Deserialize, Serialize};

use super::{default_true, double_option};
use crate::i18n::{Lang, Translation, pick_translation};

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

/// Customer testimonial entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: i64,
    pub author_name: String,
    pub company: Option<String>,
    pub avatar_url: Option<String>,
    /// 1..=5 stars
    pub rating: i16,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: i64,
    #[serde(default)]
    pub translations: Vec<TestimonialTranslation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TestimonialTranslation {
    pub lang_code: String,
    pub content: String,
    /// e.g. "Marketing Manager"
    pub author_title: Option<String>,
}

impl Translation for TestimonialTranslation {
    fn lang_code(&self) -> &str {
        &self.lang_code
    }
}

impl Testimonial {
    pub fn localize(&self, lang: Lang) -> LocalizedTestimonial {
        let tr = pick_translation(&self.translations, lang);
        LocalizedTestimonial {
            id: self.id,
            author_name: self.author_name.clone(),
            author_title: tr.and_then(|t| t.author_title.clone()),
            company: self.company.clone(),
            avatar_url: self.avatar_url.clone(),
            rating: self.rating,
            content: tr.map(|t| t.content.clone()).unwrap_or_default(),
        }
    }
}

/// Create testimonial payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestimonialCreate {
    pub author_name: String,
    pub company: Option<String>,
    pub avatar_url: Option<String>,
    pub rating: Option<i16>,
    pub sort_order: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub translations: Vec<TestimonialTranslation>,
}

/// Update testimonial payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestimonialUpdate {
    pub author_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub company: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub avatar_url: Option<Option<String>>,
    pub rating: Option<i16>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
    pub translations: Option<Vec<TestimonialTranslation>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedTestimonial {
    pub id: i64,
    pub author_name: String,
    pub author_title: Option<String>,
    pub company: Option<String>,
    pub avatar_url: Option<String>,
    pub rating: i16,
    pub content: String,
}
