//! Data models
//!
//! Shared between the storefront server and its API clients.
//! Translation rows use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`;
//! entities carrying JSON columns are assembled by the server's db layer.
//! All IDs are snowflake `i64`, all timestamps are epoch milliseconds.

pub mod admin;
pub mod blog;
pub mod category;
pub mod contact;
pub mod material;
pub mod media;
pub mod navigation;
pub mod product;
pub mod ready_made;
pub mod service;
pub mod settings;
pub mod template;
pub mod testimonial;

// Re-exports
pub use admin::*;
pub use blog::*;
pub use category::*;
pub use contact::*;
pub use material::*;
pub use media::*;
pub use navigation::*;
pub use product::*;
pub use ready_made::*;
pub use service::*;
pub use settings::*;
pub use template::*;
pub use testimonial::*;

use serde::{Deserialize, Deserializer};

/// Batch sort order update entry
#[derive(Debug, Clone, Copy, serde::Serialize, Deserialize)]
pub struct SortOrderItem {
    pub id: i64,
    pub sort_order: i32,
}

/// Distinguish "field absent" (`None`) from "field set to null" (`Some(None)`).
///
/// Use with `#[serde(default, deserialize_with = "double_option")]` on update payloads
/// whose nullable columns can be cleared.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        parent_id: Option<Option<i64>>,
    }

    #[test]
    fn test_double_option() {
        let p: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(p.parent_id, None);

        let p: Patch = serde_json::from_str(r#"{"parent_id": null}"#).unwrap();
        assert_eq!(p.parent_id, Some(None));

        let p: Patch = serde_json::from_str(r#"{"parent_id": 7}"#).unwrap();
        assert_eq!(p.parent_id, Some(Some(7)));
    }
}
