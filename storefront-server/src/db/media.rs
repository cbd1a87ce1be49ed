//! Uploaded media asset records

use shared::models::MediaAsset;
use sqlx::PgPool;

use super::BoxError;

const SELECT: &str = r#"
    SELECT id, filename, original_name, mime_type, size_bytes, width, height,
           sha256, alt_text, created_at
    FROM media_assets
"#;

pub async fn insert(pool: &PgPool, asset: &MediaAsset) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO media_assets (
            id, filename, original_name, mime_type, size_bytes, width, height,
            sha256, alt_text, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(asset.id)
    .bind(&asset.filename)
    .bind(&asset.original_name)
    .bind(&asset.mime_type)
    .bind(asset.size_bytes)
    .bind(asset.width)
    .bind(asset.height)
    .bind(&asset.sha256)
    .bind(&asset.alt_text)
    .bind(asset.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<MediaAsset>, BoxError> {
    let row = sqlx::query_as(&format!("{SELECT} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_hash(pool: &PgPool, sha256: &str) -> Result<Option<MediaAsset>, BoxError> {
    let row = sqlx::query_as(&format!("{SELECT} WHERE sha256 = $1"))
        .bind(sha256)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Paginated list, newest first
pub async fn list(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<(Vec<MediaAsset>, u64), BoxError> {
    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM media_assets")
        .fetch_one(pool)
        .await?;
    let rows = sqlx::query_as(&format!(
        "{SELECT} ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok((rows, total as u64))
}

pub async fn update_alt_text(
    pool: &PgPool,
    id: i64,
    alt_text: Option<&str>,
) -> Result<bool, BoxError> {
    let result = sqlx::query("UPDATE media_assets SET alt_text = $2 WHERE id = $1")
        .bind(id)
        .bind(alt_text)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Returns the deleted row so the caller can remove the file
pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<MediaAsset>, BoxError> {
    let row = sqlx::query_as(
        r#"
        DELETE FROM media_assets WHERE id = $1
        RETURNING id, filename, original_name, mime_type, size_bytes, width, height,
                  sha256, alt_text, created_at
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
