//! Per-admin dashboard todo list

use axum::extract::{Extension, Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use shared::error::AppError;
use shared::models::{AdminTodo, AdminTodoCreate, AdminTodoUpdate};
use shared::util::{now_millis, snowflake_id};

use crate::api::{ApiResult, internal};
use crate::auth::admin_auth::AdminIdentity;
use crate::db;
use crate::state::AppState;
use crate::validation::{MAX_SHORT_TEXT_LEN, validate_required_text};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", put(update).delete(delete))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
) -> ApiResult<Vec<AdminTodo>> {
    let todos = db::todos::list(&state.pool, identity.admin_id)
        .await
        .map_err(internal)?;
    Ok(Json(todos))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Json(data): Json<AdminTodoCreate>,
) -> ApiResult<AdminTodo> {
    validate_required_text(&data.title, "title", MAX_SHORT_TEXT_LEN)?;
    let todo = db::todos::create(
        &state.pool,
        snowflake_id(),
        identity.admin_id,
        &data,
        now_millis(),
    )
    .await
    .map_err(internal)?;
    Ok(Json(todo))
}

/// Another admin's todo reads as not found
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(id): Path<i64>,
    Json(data): Json<AdminTodoUpdate>,
) -> ApiResult<AdminTodo> {
    if let Some(title) = &data.title {
        validate_required_text(title, "title", MAX_SHORT_TEXT_LEN)?;
    }
    let todo = db::todos::update(&state.pool, identity.admin_id, id, &data, now_millis())
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::not_found(format!("Todo {id}")))?;
    Ok(Json(todo))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    let deleted = db::todos::delete(&state.pool, identity.admin_id, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(AppError::not_found(format!("Todo {id}")));
    }
    Ok(Json(true))
}
