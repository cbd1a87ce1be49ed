//! Database access layer
//!
//! Free async functions over `&PgPool`. Entities with translation rows are
//! assembled from the base table plus one `ANY($1)` lookup per translation
//! table; writes replace translations wholesale inside the same transaction.

pub mod admins;
pub mod blog;
pub mod categories;
pub mod contact;
pub mod materials;
pub mod media;
pub mod navigation;
pub mod price_tiers;
pub mod products;
pub mod ready_made;
pub mod services;
pub mod settings;
pub mod testimonials;
pub mod todos;

use std::collections::HashMap;

use shared::models::SortOrderItem;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};

pub use crate::error::BoxError;

/// A translation row tagged with the id of the entity it belongs to.
/// Queries alias the foreign key column as `owner_id`.
struct Owned<T>(i64, T);

impl<'r, T: FromRow<'r, PgRow>> FromRow<'r, PgRow> for Owned<T> {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self(row.try_get("owner_id")?, T::from_row(row)?))
    }
}

/// Load translation rows for `ids`, grouped by owner.
async fn translations_for<T>(
    pool: &PgPool,
    sql: &str,
    ids: &[i64],
) -> Result<HashMap<i64, Vec<T>>, BoxError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<Owned<T>> = sqlx::query_as(sql).bind(ids).fetch_all(pool).await?;

    let mut map: HashMap<i64, Vec<T>> = HashMap::new();
    for Owned(owner, row) in rows {
        map.entry(owner).or_default().push(row);
    }
    Ok(map)
}

/// Batch sort order update on any table with `id` / `sort_order` columns.
/// Returns the number of rows touched.
async fn batch_sort_order(
    pool: &PgPool,
    table: &'static str,
    items: &[SortOrderItem],
) -> Result<u64, BoxError> {
    if items.is_empty() {
        return Ok(0);
    }
    let ids: Vec<i64> = items.iter().map(|i| i.id).collect();
    let orders: Vec<i32> = items.iter().map(|i| i.sort_order).collect();

    let sql = format!(
        "UPDATE {table} SET sort_order = u.sort_order \
         FROM (SELECT * FROM UNNEST($1::bigint[], $2::integer[])) AS u(id, sort_order) \
         WHERE {table}.id = u.id"
    );
    let result = sqlx::query(&sql)
        .bind(&ids)
        .bind(&orders)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// `%term%` for ILIKE, with LIKE wildcards in the term escaped
fn like_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Split an `Option<Option<T>>` patch into (present, value) binds for
/// `CASE WHEN $present THEN $value ELSE col END`.
fn patch<T: Clone>(field: &Option<Option<T>>) -> (bool, Option<T>) {
    match field {
        Some(v) => (true, v.clone()),
        None => (false, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(" kartvizit "), "%kartvizit%");
        assert_eq!(like_pattern("100%_a"), "%100\\%\\_a%");
    }

    #[test]
    fn test_patch() {
        assert_eq!(patch::<i64>(&None), (false, None));
        assert_eq!(patch::<i64>(&Some(None)), (true, None));
        assert_eq!(patch(&Some(Some(3))), (true, Some(3)));
    }
}
