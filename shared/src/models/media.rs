//! Media Asset Model

use serde::{Deserialize, Serialize};

use super::double_option;
use crate::pagination::PageQuery;

/// Uploaded image
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MediaAsset {
    pub id: i64,
    /// Stored file name (`{sha256}.{ext}`)
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub width: i32,
    pub height: i32,
    pub sha256: String,
    pub alt_text: Option<String>,
    pub created_at: i64,
    /// Public URL, filled in by the server
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaUpdate {
    #[serde(default, deserialize_with = "double_option")]
    pub alt_text: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl MediaListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            per_page: self.per_page,
        }
    }
}
