//! Blog Post Model

use serde::{Deserialize, Serialize};

use super::double_option;
use crate::i18n::{Lang, Translation, pick_translation};

/// Blog post entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: i64,
    pub slug: String,
    pub cover_image: Option<String>,
    pub author: Option<String>,
    pub is_published: bool,
    /// Set the first time the post is published
    pub published_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default)]
    pub translations: Vec<BlogPostTranslation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BlogPostTranslation {
    pub lang_code: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
}

impl Translation for BlogPostTranslation {
    fn lang_code(&self) -> &str {
        &self.lang_code
    }
}

impl BlogPost {
    pub fn summary(&self, lang: Lang) -> BlogPostSummary {
        let tr = pick_translation(&self.translations, lang);
        BlogPostSummary {
            id: self.id,
            slug: self.slug.clone(),
            title: tr.map_or_else(|| self.slug.clone(), |t| t.title.clone()),
            excerpt: tr.and_then(|t| t.excerpt.clone()),
            cover_image: self.cover_image.clone(),
            author: self.author.clone(),
            published_at: self.published_at,
        }
    }

    pub fn view(&self, lang: Lang) -> BlogPostView {
        let content = pick_translation(&self.translations, lang)
            .map(|t| t.content.clone())
            .unwrap_or_default();
        BlogPostView {
            summary: self.summary(lang),
            content,
        }
    }
}

/// Create blog post payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPostCreate {
    pub slug: Option<String>,
    pub cover_image: Option<String>,
    pub author: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    pub translations: Vec<BlogPostTranslation>,
}

/// Update blog post payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogPostUpdate {
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub cover_image: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub author: Option<Option<String>>,
    pub is_published: Option<bool>,
    pub translations: Option<Vec<BlogPostTranslation>>,
}

/// Blog list item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPostSummary {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub author: Option<String>,
    pub published_at: Option<i64>,
}

/// Full blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPostView {
    #[serde(flatten)]
    pub summary: BlogPostSummary,
    pub content: String,
}
