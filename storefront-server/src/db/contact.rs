//! Contact form message storage

use shared::models::{ContactMessage, ContactSubmit};
use sqlx::PgPool;

use super::BoxError;

const SELECT: &str = r#"
    SELECT id, name, email, phone, subject, message, product_slug,
           lang_code, ip_address, is_read, created_at
    FROM contact_messages
"#;

/// Store a validated submission
pub async fn insert(
    pool: &PgPool,
    id: i64,
    form: &ContactSubmit,
    lang_code: &str,
    ip_address: &str,
    now: i64,
) -> Result<(), BoxError> {
    let blank_to_none = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    sqlx::query(
        r#"
        INSERT INTO contact_messages (
            id, name, email, phone, subject, message, product_slug,
            lang_code, ip_address, is_read, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, FALSE, $10)
        "#,
    )
    .bind(id)
    .bind(form.name.trim())
    .bind(form.email.trim())
    .bind(blank_to_none(&form.phone))
    .bind(blank_to_none(&form.subject))
    .bind(form.message.trim())
    .bind(blank_to_none(&form.product_slug))
    .bind(lang_code)
    .bind(ip_address)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Paginated list, newest first. `unread` filters on the read flag.
pub async fn list(
    pool: &PgPool,
    unread: Option<bool>,
    limit: i64,
    offset: i64,
) -> Result<(Vec<ContactMessage>, u64), BoxError> {
    let (total,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM contact_messages WHERE ($1::boolean IS NULL OR is_read <> $1)",
    )
    .bind(unread)
    .fetch_one(pool)
    .await?;

    let rows: Vec<ContactMessage> = sqlx::query_as(&format!(
        "{SELECT} WHERE ($1::boolean IS NULL OR is_read <> $1) \
         ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
    ))
    .bind(unread)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok((rows, total as u64))
}

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<ContactMessage>, BoxError> {
    let row = sqlx::query_as(&format!("{SELECT} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn count_unread(pool: &PgPool) -> Result<i64, BoxError> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM contact_messages WHERE NOT is_read")
            .fetch_one(pool)
            .await?;
    Ok(count)
}

pub async fn set_read(pool: &PgPool, id: i64, is_read: bool) -> Result<bool, BoxError> {
    let result = sqlx::query("UPDATE contact_messages SET is_read = $2 WHERE id = $1")
        .bind(id)
        .bind(is_read)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
