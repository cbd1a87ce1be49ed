//! Contact Message Model

use serde::{Deserialize, Serialize};

use crate::pagination::PageQuery;

/// Stored contact form submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    /// Product the visitor asked about
    pub product_slug: Option<String>,
    /// Storefront language at submission time
    pub lang_code: String,
    pub ip_address: Option<String>,
    pub is_read: bool,
    pub created_at: i64,
}

/// `POST /api/contact` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSubmit {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
    pub product_slug: Option<String>,
}

/// Localized confirmation returned to the visitor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactReceipt {
    pub id: i64,
    pub message: String,
}

/// Admin list filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactListQuery {
    /// Only unread messages when `true`
    pub unread: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ContactListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Mark read / unread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMarkRead {
    #[serde(default = "super::default_true")]
    pub is_read: bool,
}
