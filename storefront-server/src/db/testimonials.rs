//! Testimonial database operations

use shared::models::{Testimonial, TestimonialCreate, TestimonialTranslation, TestimonialUpdate};
use sqlx::{PgConnection, PgPool};

use super::{BoxError, patch, translations_for};

#[derive(sqlx::FromRow)]
struct Row {
    id: i64,
    author_name: String,
    company: Option<String>,
    avatar_url: Option<String>,
    rating: i16,
    sort_order: i32,
    is_active: bool,
    created_at: i64,
}

const SELECT: &str = r#"
    SELECT id, author_name, company, avatar_url, rating, sort_order, is_active, created_at
    FROM testimonials
"#;

const TRANSLATIONS: &str = r#"
    SELECT testimonial_id AS owner_id, lang_code, content, author_title
    FROM testimonial_translations
    WHERE testimonial_id = ANY($1)
    ORDER BY lang_code
"#;

async fn assemble(pool: &PgPool, rows: Vec<Row>) -> Result<Vec<Testimonial>, BoxError> {
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut translations =
        translations_for::<TestimonialTranslation>(pool, TRANSLATIONS, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|r| Testimonial {
            translations: translations.remove(&r.id).unwrap_or_default(),
            id: r.id,
            author_name: r.author_name,
            company: r.company,
            avatar_url: r.avatar_url,
            rating: r.rating,
            sort_order: r.sort_order,
            is_active: r.is_active,
            created_at: r.created_at,
        })
        .collect())
}

pub async fn list(pool: &PgPool, active_only: bool) -> Result<Vec<Testimonial>, BoxError> {
    let rows: Vec<Row> = sqlx::query_as(&format!(
        "{SELECT} WHERE (NOT $1 OR is_active) ORDER BY sort_order, id"
    ))
    .bind(active_only)
    .fetch_all(pool)
    .await?;
    assemble(pool, rows).await
}

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Testimonial>, BoxError> {
    let rows: Vec<Row> = sqlx::query_as(&format!("{SELECT} WHERE id = $1"))
        .bind(id)
        .fetch_all(pool)
        .await?;
    Ok(assemble(pool, rows).await?.pop())
}

async fn replace_translations(
    conn: &mut PgConnection,
    testimonial_id: i64,
    translations: &[TestimonialTranslation],
) -> Result<(), BoxError> {
    sqlx::query("DELETE FROM testimonial_translations WHERE testimonial_id = $1")
        .bind(testimonial_id)
        .execute(&mut *conn)
        .await?;

    if translations.is_empty() {
        return Ok(());
    }
    let langs: Vec<&str> = translations.iter().map(|t| t.lang_code.as_str()).collect();
    let contents: Vec<&str> = translations.iter().map(|t| t.content.trim()).collect();
    let titles: Vec<Option<&str>> = translations
        .iter()
        .map(|t| t.author_title.as_deref())
        .collect();

    sqlx::query(
        r#"
        INSERT INTO testimonial_translations (testimonial_id, lang_code, content, author_title)
        SELECT $1::bigint, * FROM UNNEST($2::text[], $3::text[], $4::text[])
        "#,
    )
    .bind(testimonial_id)
    .bind(&langs)
    .bind(&contents)
    .bind(&titles)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn create(
    pool: &PgPool,
    id: i64,
    data: &TestimonialCreate,
    rating: i16,
    now: i64,
) -> Result<(), BoxError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO testimonials (
            id, author_name, company, avatar_url, rating, sort_order, is_active, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(id)
    .bind(data.author_name.trim())
    .bind(&data.company)
    .bind(&data.avatar_url)
    .bind(rating)
    .bind(data.sort_order.unwrap_or(0))
    .bind(data.is_active)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    replace_translations(&mut tx, id, &data.translations).await?;

    tx.commit().await?;
    Ok(())
}

pub async fn update(pool: &PgPool, id: i64, data: &TestimonialUpdate) -> Result<bool, BoxError> {
    let (set_company, company) = patch(&data.company);
    let (set_avatar, avatar_url) = patch(&data.avatar_url);

    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE testimonials SET
            author_name = COALESCE($2, author_name),
            company = CASE WHEN $3 THEN $4 ELSE company END,
            avatar_url = CASE WHEN $5 THEN $6 ELSE avatar_url END,
            rating = COALESCE($7, rating),
            sort_order = COALESCE($8, sort_order),
            is_active = COALESCE($9, is_active)
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(data.author_name.as_deref().map(str::trim))
    .bind(set_company)
    .bind(company)
    .bind(set_avatar)
    .bind(avatar_url)
    .bind(data.rating)
    .bind(data.sort_order)
    .bind(data.is_active)
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
    let result = sqlx::query("DELETE FROM testimonials WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
