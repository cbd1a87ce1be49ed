//! Site settings (key -> JSON value)

use shared::models::SiteSetting;
use sqlx::PgPool;

use super::BoxError;

pub async fn list_all(pool: &PgPool) -> Result<Vec<SiteSetting>, BoxError> {
    let rows = sqlx::query_as("SELECT key, value, updated_at FROM site_settings ORDER BY key")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn get(pool: &PgPool, key: &str) -> Result<Option<SiteSetting>, BoxError> {
    let row = sqlx::query_as("SELECT key, value, updated_at FROM site_settings WHERE key = $1")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn upsert(
    pool: &PgPool,
    key: &str,
    value: &serde_json::Value,
    now: i64,
) -> Result<SiteSetting, BoxError> {
    let row = sqlx::query_as(
        r#"
        INSERT INTO site_settings (key, value, updated_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at
        RETURNING key, value, updated_at
        "#,
    )
    .bind(key)
    .bind(value)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}
