//! Admin account database operations

use shared::models::Admin;
use sqlx::PgPool;

use super::BoxError;

/// Admin row including the password hash (login only)
#[derive(sqlx::FromRow)]
pub struct AdminCredentials {
    #[sqlx(flatten)]
    pub admin: Admin,
    pub password_hash: String,
}

pub async fn find_credentials(
    pool: &PgPool,
    email: &str,
) -> Result<Option<AdminCredentials>, BoxError> {
    let row = sqlx::query_as(
        r#"
        SELECT id, email, display_name, is_active, created_at, last_login_at, password_hash
        FROM admins
        WHERE LOWER(email) = LOWER($1)
        "#,
    )
    .bind(email.trim())
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Admin>, BoxError> {
    let row = sqlx::query_as(
        "SELECT id, email, display_name, is_active, created_at, last_login_at FROM admins WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn count(pool: &PgPool) -> Result<i64, BoxError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admins")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn create(
    pool: &PgPool,
    id: i64,
    email: &str,
    display_name: &str,
    password_hash: &str,
    now: i64,
) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO admins (id, email, display_name, password_hash, is_active, created_at)
        VALUES ($1, $2, $3, $4, TRUE, $5)
        "#,
    )
    .bind(id)
    .bind(email.trim())
    .bind(display_name)
    .bind(password_hash)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn touch_login(pool: &PgPool, id: i64, now: i64) -> Result<(), BoxError> {
    sqlx::query("UPDATE admins SET last_login_at = $2 WHERE id = $1")
        .bind(id)
        .bind(now)
        .execute(pool)
        .await?;
    Ok(())
}
