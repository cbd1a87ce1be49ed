//! Per-admin todo list

use shared::models::{AdminTodo, AdminTodoCreate, AdminTodoUpdate};
use sqlx::PgPool;

use super::{BoxError, patch};

const SELECT: &str = r#"
    SELECT id, admin_id, title, is_done, due_at, created_at, updated_at
    FROM admin_todos
"#;

/// Open todos first, then by due date, newest last
pub async fn list(pool: &PgPool, admin_id: i64) -> Result<Vec<AdminTodo>, BoxError> {
    let rows = sqlx::query_as(&format!(
        "{SELECT} WHERE admin_id = $1 ORDER BY is_done, due_at NULLS LAST, created_at"
    ))
    .bind(admin_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(
    pool: &PgPool,
    id: i64,
    admin_id: i64,
    data: &AdminTodoCreate,
    now: i64,
) -> Result<AdminTodo, BoxError> {
    let row = sqlx::query_as(
        r#"
        INSERT INTO admin_todos (id, admin_id, title, is_done, due_at, created_at, updated_at)
        VALUES ($1, $2, $3, FALSE, $4, $5, $5)
        RETURNING id, admin_id, title, is_done, due_at, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(admin_id)
    .bind(data.title.trim())
    .bind(data.due_at)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Scoped to the owning admin; `None` when the todo is not theirs or missing
pub async fn update(
    pool: &PgPool,
    admin_id: i64,
    id: i64,
    data: &AdminTodoUpdate,
    now: i64,
) -> Result<Option<AdminTodo>, BoxError> {
    let (set_due, due_at) = patch(&data.due_at);

    let row = sqlx::query_as(
        r#"
        UPDATE admin_todos SET
            title = COALESCE($3, title),
            is_done = COALESCE($4, is_done),
            due_at = CASE WHEN $5 THEN $6 ELSE due_at END,
            updated_at = $7
        WHERE id = $1 AND admin_id = $2
        RETURNING id, admin_id, title, is_done, due_at, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(admin_id)
    .bind(data.title.as_deref().map(str::trim))
    .bind(data.is_done)
    .bind(set_due)
    .bind(due_at)
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, admin_id: i64, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM admin_todos WHERE id = $1 AND admin_id = $2")
        .bind(id)
        .bind(admin_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
