//! Ready-made homepage curation

use serde::{Deserialize, Serialize};

use super::{LocalizedService, LocalizedTestimonial, ProductCard};
use crate::i18n::LocalizedText;

/// Curated homepage slot pointing at a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyMadeItem {
    pub id: i64,
    pub product_id: i64,
    pub sort_order: i32,
    /// Optional ribbon text ("Yeni", "Bestseller", ...)
    #[serde(default)]
    pub badge: LocalizedText,
}

/// Entry of the replace payload; list order becomes sort order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyMadeEntry {
    pub product_id: i64,
    #[serde(default)]
    pub badge: LocalizedText,
}

/// `PUT /api/admin/ready-made`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyMadeReplace {
    pub items: Vec<ReadyMadeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyMadeCard {
    #[serde(flatten)]
    pub product: ProductCard,
    pub badge: Option<String>,
}

/// `GET /api/home`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomePage {
    pub ready_made: Vec<ReadyMadeCard>,
    pub featured: Vec<ProductCard>,
    pub testimonials: Vec<LocalizedTestimonial>,
    pub services: Vec<LocalizedService>,
}
