//! Contact inbox

use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{ContactListQuery, ContactMarkRead, ContactMessage};
use shared::pagination::PaginatedResponse;

use crate::api::{ApiResult, internal};
use crate::db;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/unread-count", get(unread_count))
        .route("/{id}", get(get_by_id).delete(delete))
        .route("/{id}/read", put(mark_read))
}

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub unread: i64,
}

/// GET /api/admin/contact?unread=true - newest first
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ContactListQuery>,
) -> ApiResult<PaginatedResponse<ContactMessage>> {
    let page = query.page_query();
    let (messages, total) =
        db::contact::list(&state.pool, query.unread, page.limit(), page.offset())
            .await
            .map_err(internal)?;
    Ok(Json(PaginatedResponse::new(messages, total, page)))
}

pub async fn unread_count(State(state): State<AppState>) -> ApiResult<UnreadCount> {
    let unread = db::contact::count_unread(&state.pool)
        .await
        .map_err(internal)?;
    Ok(Json(UnreadCount { unread }))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ContactMessage> {
    let message = db::contact::find(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::ContactMessageNotFound))?;
    Ok(Json(message))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(data): Json<ContactMarkRead>,
) -> ApiResult<bool> {
    let updated = db::contact::set_read(&state.pool, id, data.is_read)
        .await
        .map_err(internal)?;
    if !updated {
        return Err(AppError::new(ErrorCode::ContactMessageNotFound));
    }
    Ok(Json(data.is_read))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<bool> {
    let deleted = db::contact::delete(&state.pool, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(AppError::new(ErrorCode::ContactMessageNotFound));
    }
    Ok(Json(true))
}
