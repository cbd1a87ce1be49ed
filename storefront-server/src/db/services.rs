//! Print service (offering) database operations

use shared::models::{Service, ServiceCreate, ServiceTranslation, ServiceUpdate};
use sqlx::{PgConnection, PgPool};

use super::{BoxError, patch, translations_for};

#[derive(sqlx::FromRow)]
struct Row {
    id: i64,
    slug: String,
    icon: Option<String>,
    image_url: Option<String>,
    sort_order: i32,
    is_active: bool,
    created_at: i64,
    updated_at: i64,
}

const SELECT: &str = r#"
    SELECT id, slug, icon, image_url, sort_order, is_active, created_at, updated_at
    FROM services
"#;

const TRANSLATIONS: &str = r#"
    SELECT service_id AS owner_id, lang_code, title, summary, content
    FROM service_translations
    WHERE service_id = ANY($1)
    ORDER BY lang_code
"#;

async fn assemble(pool: &PgPool, rows: Vec<Row>) -> Result<Vec<Service>, BoxError> {
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut translations = translations_for::<ServiceTranslation>(pool, TRANSLATIONS, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|r| Service {
            translations: translations.remove(&r.id).unwrap_or_default(),
            id: r.id,
            slug: r.slug,
            icon: r.icon,
            image_url: r.image_url,
            sort_order: r.sort_order,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
        .collect())
}

pub async fn list(pool: &PgPool, active_only: bool) -> Result<Vec<Service>, BoxError> {
    let rows: Vec<Row> = sqlx::query_as(&format!(
        "{SELECT} WHERE (NOT $1 OR is_active) ORDER BY sort_order, id"
    ))
    .bind(active_only)
    .fetch_all(pool)
    .await?;
    assemble(pool, rows).await
}

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Service>, BoxError> {
    let rows: Vec<Row> = sqlx::query_as(&format!("{SELECT} WHERE id = $1"))
        .bind(id)
        .fetch_all(pool)
        .await?;
    Ok(assemble(pool, rows).await?.pop())
}

pub async fn find_active_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Service>, BoxError> {
    let rows: Vec<Row> = sqlx::query_as(&format!("{SELECT} WHERE slug = $1 AND is_active"))
        .bind(slug)
        .fetch_all(pool)
        .await?;
    Ok(assemble(pool, rows).await?.pop())
}

async fn replace_translations(
    conn: &mut PgConnection,
    service_id: i64,
    translations: &[ServiceTranslation],
) -> Result<(), BoxError> {
    sqlx::query("DELETE FROM service_translations WHERE service_id = $1")
        .bind(service_id)
        .execute(&mut *conn)
        .await?;

    if translations.is_empty() {
        return Ok(());
    }
    let langs: Vec<&str> = translations.iter().map(|t| t.lang_code.as_str()).collect();
    let titles: Vec<&str> = translations.iter().map(|t| t.title.trim()).collect();
    let summaries: Vec<Option<&str>> = translations.iter().map(|t| t.summary.as_deref()).collect();
    let contents: Vec<Option<&str>> = translations.iter().map(|t| t.content.as_deref()).collect();

    sqlx::query(
        r#"
        INSERT INTO service_translations (service_id, lang_code, title, summary, content)
        SELECT $1::bigint, * FROM UNNEST($2::text[], $3::text[], $4::text[], $5::text[])
        "#,
    )
    .bind(service_id)
    .bind(&langs)
    .bind(&titles)
    .bind(&summaries)
    .bind(&contents)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn create(
    pool: &PgPool,
    id: i64,
    slug: &str,
    data: &ServiceCreate,
    now: i64,
) -> Result<(), BoxError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO services (id, slug, icon, image_url, sort_order, is_active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        "#,
    )
    .bind(id)
    .bind(slug)
    .bind(&data.icon)
    .bind(&data.image_url)
    .bind(data.sort_order.unwrap_or(0))
    .bind(data.is_active)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    replace_translations(&mut tx, id, &data.translations).await?;

    tx.commit().await?;
    Ok(())
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &ServiceUpdate,
    now: i64,
) -> Result<bool, BoxError> {
    let (set_icon, icon) = patch(&data.icon);
    let (set_image, image_url) = patch(&data.image_url);

    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE services SET
            slug = COALESCE($2, slug),
            icon = CASE WHEN $3 THEN $4 ELSE icon END,
            image_url = CASE WHEN $5 THEN $6 ELSE image_url END,
            sort_order = COALESCE($7, sort_order),
            is_active = COALESCE($8, is_active),
            updated_at = $9
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&data.slug)
    .bind(set_icon)
    .bind(icon)
    .bind(set_image)
    .bind(image_url)
    .bind(data.sort_order)
    .bind(data.is_active)
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
    let result = sqlx::query("DELETE FROM services WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
