//! Product database operations

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use shared::models::{Product, ProductCreate, ProductTranslation, ProductUpdate};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use super::{BoxError, like_pattern, patch, translations_for};

#[derive(sqlx::FromRow)]
struct Row {
    id: i64,
    category_id: i64,
    slug: String,
    sku: Option<String>,
    base_price: Decimal,
    image_url: Option<String>,
    gallery: Json<Vec<String>>,
    attributes: Json<Map<String, Value>>,
    sort_order: i32,
    is_active: bool,
    is_featured: bool,
    created_at: i64,
    updated_at: i64,
}

const SELECT: &str = r#"
    SELECT p.id, p.category_id, p.slug, p.sku, p.base_price, p.image_url, p.gallery,
           p.attributes, p.sort_order, p.is_active, p.is_featured, p.created_at, p.updated_at
    FROM products p
"#;

const TRANSLATIONS: &str = r#"
    SELECT product_id AS owner_id, lang_code, name, short_description, description
    FROM product_translations
    WHERE product_id = ANY($1)
    ORDER BY lang_code
"#;

/// List filter; `None` fields do not constrain
#[derive(Debug, Default, Clone)]
pub struct ProductFilter {
    pub category_ids: Option<Vec<i64>>,
    pub featured: Option<bool>,
    pub search: Option<String>,
    pub active_only: bool,
}

async fn assemble(pool: &PgPool, rows: Vec<Row>) -> Result<Vec<Product>, BoxError> {
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut translations = translations_for::<ProductTranslation>(pool, TRANSLATIONS, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|r| Product {
            translations: translations.remove(&r.id).unwrap_or_default(),
            id: r.id,
            category_id: r.category_id,
            slug: r.slug,
            sku: r.sku,
            base_price: r.base_price,
            image_url: r.image_url,
            gallery: r.gallery.0,
            attributes: r.attributes.0,
            sort_order: r.sort_order,
            is_active: r.is_active,
            is_featured: r.is_featured,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
        .collect())
}

const FILTER: &str = r#"
    WHERE ($1::bigint[] IS NULL OR p.category_id = ANY($1))
      AND ($2::boolean IS NULL OR p.is_featured = $2)
      AND ($3::text IS NULL
           OR p.slug ILIKE $3
           OR p.sku ILIKE $3
           OR EXISTS (SELECT 1 FROM product_translations t
                      WHERE t.product_id = p.id AND t.name ILIKE $3))
      AND (NOT $4 OR p.is_active)
"#;

/// Paginated list, returns `(page, total)`
pub async fn list(
    pool: &PgPool,
    filter: &ProductFilter,
    limit: i64,
    offset: i64,
) -> Result<(Vec<Product>, u64), BoxError> {
    let search = filter
        .search
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(like_pattern);

    let (total,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM products p {FILTER}"))
        .bind(&filter.category_ids)
        .bind(filter.featured)
        .bind(&search)
        .bind(filter.active_only)
        .fetch_one(pool)
        .await?;

    let rows: Vec<Row> = sqlx::query_as(&format!(
        "{SELECT} {FILTER} ORDER BY p.is_featured DESC, p.sort_order, p.id LIMIT $5 OFFSET $6"
    ))
    .bind(&filter.category_ids)
    .bind(filter.featured)
    .bind(&search)
    .bind(filter.active_only)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok((assemble(pool, rows).await?, total as u64))
}

/// Active products of the given categories (mega-menu aggregation)
pub async fn list_active_in(pool: &PgPool, category_ids: &[i64]) -> Result<Vec<Product>, BoxError> {
    if category_ids.is_empty() {
        return Ok(vec![]);
    }
    let rows: Vec<Row> = sqlx::query_as(&format!(
        "{SELECT} WHERE p.is_active AND p.category_id = ANY($1) ORDER BY p.sort_order, p.id"
    ))
    .bind(category_ids)
    .fetch_all(pool)
    .await?;
    assemble(pool, rows).await
}

/// Products by id, in the order of `ids`; missing ids are skipped
pub async fn list_by_ids(
    pool: &PgPool,
    ids: &[i64],
    active_only: bool,
) -> Result<Vec<Product>, BoxError> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let rows: Vec<Row> = sqlx::query_as(&format!(
        "{SELECT} WHERE p.id = ANY($1) AND (NOT $2 OR p.is_active)"
    ))
    .bind(ids)
    .bind(active_only)
    .fetch_all(pool)
    .await?;

    let mut products = assemble(pool, rows).await?;
    products.sort_by_key(|p| ids.iter().position(|id| *id == p.id));
    Ok(products)
}

/// Active featured products of the given categories
pub async fn list_featured(
    pool: &PgPool,
    category_ids: &[i64],
    limit: i64,
) -> Result<Vec<Product>, BoxError> {
    if category_ids.is_empty() {
        return Ok(vec![]);
    }
    let rows: Vec<Row> = sqlx::query_as(&format!(
        "{SELECT} WHERE p.is_active AND p.is_featured AND p.category_id = ANY($1) \
         ORDER BY p.sort_order, p.id LIMIT $2"
    ))
    .bind(category_ids)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    assemble(pool, rows).await
}

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Product>, BoxError> {
    let rows: Vec<Row> = sqlx::query_as(&format!("{SELECT} WHERE p.id = $1"))
        .bind(id)
        .fetch_all(pool)
        .await?;
    Ok(assemble(pool, rows).await?.pop())
}

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Product>, BoxError> {
    let rows: Vec<Row> = sqlx::query_as(&format!("{SELECT} WHERE p.slug = $1"))
        .bind(slug)
        .fetch_all(pool)
        .await?;
    Ok(assemble(pool, rows).await?.pop())
}

pub async fn count_in_category(pool: &PgPool, category_id: i64) -> Result<i64, BoxError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products WHERE category_id = $1")
        .bind(category_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Any product attribute holding `value` (material in-use check)
pub async fn any_attribute_equals(pool: &PgPool, value: &str) -> Result<bool, BoxError> {
    let (exists,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM products p, jsonb_each_text(p.attributes) a
            WHERE a.value = $1
        )
        "#,
    )
    .bind(value)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

async fn replace_translations(
    conn: &mut PgConnection,
    product_id: i64,
    translations: &[ProductTranslation],
) -> Result<(), BoxError> {
    sqlx::query("DELETE FROM product_translations WHERE product_id = $1")
        .bind(product_id)
        .execute(&mut *conn)
        .await?;

    if translations.is_empty() {
        return Ok(());
    }
    let langs: Vec<&str> = translations.iter().map(|t| t.lang_code.as_str()).collect();
    let names: Vec<&str> = translations.iter().map(|t| t.name.trim()).collect();
    let shorts: Vec<Option<&str>> = translations
        .iter()
        .map(|t| t.short_description.as_deref())
        .collect();
    let descriptions: Vec<Option<&str>> =
        translations.iter().map(|t| t.description.as_deref()).collect();

    sqlx::query(
        r#"
        INSERT INTO product_translations (product_id, lang_code, name, short_description, description)
        SELECT $1::bigint, * FROM UNNEST($2::text[], $3::text[], $4::text[], $5::text[])
        "#,
    )
    .bind(product_id)
    .bind(&langs)
    .bind(&names)
    .bind(&shorts)
    .bind(&descriptions)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// `attributes` must already be normalized against the category schema
pub async fn create(
    pool: &PgPool,
    id: i64,
    slug: &str,
    data: &ProductCreate,
    attributes: &Map<String, Value>,
    now: i64,
) -> Result<(), BoxError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO products (
            id, category_id, slug, sku, base_price, image_url, gallery, attributes,
            sort_order, is_active, is_featured, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
        "#,
    )
    .bind(id)
    .bind(data.category_id)
    .bind(slug)
    .bind(&data.sku)
    .bind(data.base_price)
    .bind(&data.image_url)
    .bind(Json(&data.gallery))
    .bind(Json(attributes))
    .bind(data.sort_order.unwrap_or(0))
    .bind(data.is_active)
    .bind(data.is_featured)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    replace_translations(&mut tx, id, &data.translations).await?;

    tx.commit().await?;
    Ok(())
}

/// `attributes` (when `Some`) must already be normalized against the category schema
pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &ProductUpdate,
    attributes: Option<&Map<String, Value>>,
    now: i64,
) -> Result<bool, BoxError> {
    let (set_sku, sku) = patch(&data.sku);
    let (set_image, image_url) = patch(&data.image_url);

    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE products SET
            category_id = COALESCE($2, category_id),
            slug = COALESCE($3, slug),
            sku = CASE WHEN $4 THEN $5 ELSE sku END,
            base_price = COALESCE($6, base_price),
            image_url = CASE WHEN $7 THEN $8 ELSE image_url END,
            gallery = COALESCE($9, gallery),
            attributes = COALESCE($10, attributes),
            sort_order = COALESCE($11, sort_order),
            is_active = COALESCE($12, is_active),
            is_featured = COALESCE($13, is_featured),
            updated_at = $14
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(data.category_id)
    .bind(&data.slug)
    .bind(set_sku)
    .bind(sku)
    .bind(data.base_price)
    .bind(set_image)
    .bind(image_url)
    .bind(data.gallery.as_ref().map(Json))
    .bind(attributes.map(Json))
    .bind(data.sort_order)
    .bind(data.is_active)
    .bind(data.is_featured)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    if let Some(translations) = &data.translations {
        replace_translations(&mut tx, id, translations).await?;
    }

    tx.commit().await?;
    Ok(true)
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
