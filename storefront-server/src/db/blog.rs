//! Blog post database operations

use shared::models::{BlogPost, BlogPostCreate, BlogPostTranslation, BlogPostUpdate};
use sqlx::{PgConnection, PgPool};

use super::{BoxError, patch, translations_for};

#[derive(sqlx::FromRow)]
struct Row {
    id: i64,
    slug: String,
    cover_image: Option<String>,
    author: Option<String>,
    is_published: bool,
    published_at: Option<i64>,
    created_at: i64,
    updated_at: i64,
}

const SELECT: &str = r#"
    SELECT id, slug, cover_image, author, is_published, published_at, created_at, updated_at
    FROM blog_posts
"#;

const TRANSLATIONS: &str = r#"
    SELECT post_id AS owner_id, lang_code, title, excerpt, content
    FROM blog_post_translations
    WHERE post_id = ANY($1)
    ORDER BY lang_code
"#;

async fn assemble(pool: &PgPool, rows: Vec<Row>) -> Result<Vec<BlogPost>, BoxError> {
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut translations =
        translations_for::<BlogPostTranslation>(pool, TRANSLATIONS, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|r| BlogPost {
            translations: translations.remove(&r.id).unwrap_or_default(),
            id: r.id,
            slug: r.slug,
            cover_image: r.cover_image,
            author: r.author,
            is_published: r.is_published,
            published_at: r.published_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
        .collect())
}

/// Paginated list, newest first. `published_only` hides drafts.
pub async fn list(
    pool: &PgPool,
    published_only: bool,
    limit: i64,
    offset: i64,
) -> Result<(Vec<BlogPost>, u64), BoxError> {
    let (total,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM blog_posts WHERE (NOT $1 OR is_published)")
            .bind(published_only)
            .fetch_one(pool)
            .await?;

    let rows: Vec<Row> = sqlx::query_as(&format!(
        "{SELECT} WHERE (NOT $1 OR is_published) \
         ORDER BY COALESCE(published_at, created_at) DESC, id DESC LIMIT $2 OFFSET $3"
    ))
    .bind(published_only)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok((assemble(pool, rows).await?, total as u64))
}

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<BlogPost>, BoxError> {
    let rows: Vec<Row> = sqlx::query_as(&format!("{SELECT} WHERE id = $1"))
        .bind(id)
        .fetch_all(pool)
        .await?;
    Ok(assemble(pool, rows).await?.pop())
}

pub async fn find_published_by_slug(
    pool: &PgPool,
    slug: &str,
) -> Result<Option<BlogPost>, BoxError> {
    let rows: Vec<Row> = sqlx::query_as(&format!("{SELECT} WHERE slug = $1 AND is_published"))
        .bind(slug)
        .fetch_all(pool)
        .await?;
    Ok(assemble(pool, rows).await?.pop())
}

async fn replace_translations(
    conn: &mut PgConnection,
    post_id: i64,
    translations: &[BlogPostTranslation],
) -> Result<(), BoxError> {
    sqlx::query("DELETE FROM blog_post_translations WHERE post_id = $1")
        .bind(post_id)
        .execute(&mut *conn)
        .await?;

    if translations.is_empty() {
        return Ok(());
    }
    let langs: Vec<&str> = translations.iter().map(|t| t.lang_code.as_str()).collect();
    let titles: Vec<&str> = translations.iter().map(|t| t.title.trim()).collect();
    let excerpts: Vec<Option<&str>> = translations.iter().map(|t| t.excerpt.as_deref()).collect();
    let contents: Vec<&str> = translations.iter().map(|t| t.content.as_str()).collect();

    sqlx::query(
        r#"
        INSERT INTO blog_post_translations (post_id, lang_code, title, excerpt, content)
        SELECT $1::bigint, * FROM UNNEST($2::text[], $3::text[], $4::text[], $5::text[])
        "#,
    )
    .bind(post_id)
    .bind(&langs)
    .bind(&titles)
    .bind(&excerpts)
    .bind(&contents)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn create(
    pool: &PgPool,
    id: i64,
    slug: &str,
    data: &BlogPostCreate,
    now: i64,
) -> Result<(), BoxError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO blog_posts (
            id, slug, cover_image, author, is_published, published_at, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, CASE WHEN $5 THEN $6 END, $6, $6)
        "#,
    )
    .bind(id)
    .bind(slug)
    .bind(&data.cover_image)
    .bind(&data.author)
    .bind(data.is_published)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    replace_translations(&mut tx, id, &data.translations).await?;

    tx.commit().await?;
    Ok(())
}

/// First publication stamps `published_at`; unpublishing keeps it.
pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &BlogPostUpdate,
    now: i64,
) -> Result<bool, BoxError> {
    let (set_cover, cover_image) = patch(&data.cover_image);
    let (set_author, author) = patch(&data.author);

    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE blog_posts SET
            slug = COALESCE($2, slug),
            cover_image = CASE WHEN $3 THEN $4 ELSE cover_image END,
            author = CASE WHEN $5 THEN $6 ELSE author END,
            is_published = COALESCE($7, is_published),
            published_at = CASE
                WHEN COALESCE($7, is_published) AND published_at IS NULL THEN $8
                ELSE published_at
            END,
            updated_at = $8
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&data.slug)
    .bind(set_cover)
    .bind(cover_image)
    .bind(set_author)
    .bind(author)
    .bind(data.is_published)
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
    let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
