//! Category database operations

use shared::models::{
    Category, CategoryCreate, CategoryTranslation, CategoryUpdate, SortOrderItem, TemplateSchema,
};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use super::{BoxError, patch, translations_for};

#[derive(sqlx::FromRow)]
struct Row {
    id: i64,
    parent_id: Option<i64>,
    slug: String,
    image_url: Option<String>,
    icon: Option<String>,
    sort_order: i32,
    is_active: bool,
    show_in_menu: bool,
    template_schema: Json<TemplateSchema>,
    created_at: i64,
    updated_at: i64,
}

const SELECT: &str = r#"
    SELECT id, parent_id, slug, image_url, icon, sort_order, is_active,
           show_in_menu, template_schema, created_at, updated_at
    FROM categories
"#;

const TRANSLATIONS: &str = r#"
    SELECT category_id AS owner_id, lang_code, name, description
    FROM category_translations
    WHERE category_id = ANY($1)
    ORDER BY lang_code
"#;

async fn assemble(pool: &PgPool, rows: Vec<Row>) -> Result<Vec<Category>, BoxError> {
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut translations = translations_for::<CategoryTranslation>(pool, TRANSLATIONS, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|r| Category {
            translations: translations.remove(&r.id).unwrap_or_default(),
            id: r.id,
            parent_id: r.parent_id,
            slug: r.slug,
            image_url: r.image_url,
            icon: r.icon,
            sort_order: r.sort_order,
            is_active: r.is_active,
            show_in_menu: r.show_in_menu,
            template_schema: r.template_schema.0,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
        .collect())
}

/// All categories, active or not, in sibling order
pub async fn list_all(pool: &PgPool) -> Result<Vec<Category>, BoxError> {
    let rows: Vec<Row> = sqlx::query_as(&format!("{SELECT} ORDER BY sort_order, id"))
        .fetch_all(pool)
        .await?;
    assemble(pool, rows).await
}

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Category>, BoxError> {
    let rows: Vec<Row> = sqlx::query_as(&format!("{SELECT} WHERE id = $1"))
        .bind(id)
        .fetch_all(pool)
        .await?;
    Ok(assemble(pool, rows).await?.pop())
}

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Category>, BoxError> {
    let rows: Vec<Row> = sqlx::query_as(&format!("{SELECT} WHERE slug = $1"))
        .bind(slug)
        .fetch_all(pool)
        .await?;
    Ok(assemble(pool, rows).await?.pop())
}

async fn replace_translations(
    conn: &mut PgConnection,
    category_id: i64,
    translations: &[CategoryTranslation],
) -> Result<(), BoxError> {
    sqlx::query("DELETE FROM category_translations WHERE category_id = $1")
        .bind(category_id)
        .execute(&mut *conn)
        .await?;

    if translations.is_empty() {
        return Ok(());
    }
    let langs: Vec<&str> = translations.iter().map(|t| t.lang_code.as_str()).collect();
    let names: Vec<&str> = translations.iter().map(|t| t.name.trim()).collect();
    let descriptions: Vec<Option<&str>> =
        translations.iter().map(|t| t.description.as_deref()).collect();

    sqlx::query(
        r#"
        INSERT INTO category_translations (category_id, lang_code, name, description)
        SELECT $1::bigint, * FROM UNNEST($2::text[], $3::text[], $4::text[])
        "#,
    )
    .bind(category_id)
    .bind(&langs)
    .bind(&names)
    .bind(&descriptions)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn create(
    pool: &PgPool,
    id: i64,
    slug: &str,
    data: &CategoryCreate,
    now: i64,
) -> Result<(), BoxError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO categories (
            id, parent_id, slug, image_url, icon, sort_order,
            is_active, show_in_menu, template_schema, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, '[]'::jsonb, $9, $9)
        "#,
    )
    .bind(id)
    .bind(data.parent_id)
    .bind(slug)
    .bind(&data.image_url)
    .bind(&data.icon)
    .bind(data.sort_order.unwrap_or(0))
    .bind(data.is_active)
    .bind(data.show_in_menu)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    replace_translations(&mut tx, id, &data.translations).await?;

    tx.commit().await?;
    Ok(())
}

/// Returns `false` when the category does not exist
pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &CategoryUpdate,
    now: i64,
) -> Result<bool, BoxError> {
    let (set_parent, parent_id) = patch(&data.parent_id);
    let (set_image, image_url) = patch(&data.image_url);
    let (set_icon, icon) = patch(&data.icon);

    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE categories SET
            parent_id = CASE WHEN $2 THEN $3 ELSE parent_id END,
            slug = COALESCE($4, slug),
            image_url = CASE WHEN $5 THEN $6 ELSE image_url END,
            icon = CASE WHEN $7 THEN $8 ELSE icon END,
            sort_order = COALESCE($9, sort_order),
            is_active = COALESCE($10, is_active),
            show_in_menu = COALESCE($11, show_in_menu),
            updated_at = $12
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(set_parent)
    .bind(parent_id)
    .bind(&data.slug)
    .bind(set_image)
    .bind(image_url)
    .bind(set_icon)
    .bind(icon)
    .bind(data.sort_order)
    .bind(data.is_active)
    .bind(data.show_in_menu)
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

pub async fn set_template_schema(
    pool: &PgPool,
    id: i64,
    schema: &TemplateSchema,
    now: i64,
) -> Result<bool, BoxError> {
    let result =
        sqlx::query("UPDATE categories SET template_schema = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(Json(schema))
            .bind(now)
            .execute(pool)
            .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_children(pool: &PgPool, id: i64) -> Result<i64, BoxError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories WHERE parent_id = $1")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn batch_update_sort_order(
    pool: &PgPool,
    items: &[SortOrderItem],
) -> Result<u64, BoxError> {
    super::batch_sort_order(pool, "categories", items).await
}
