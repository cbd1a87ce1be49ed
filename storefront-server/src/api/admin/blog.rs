//! Blog post management

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use shared::error::{AppError, ErrorCode};
use shared::models::{BlogPost, BlogPostCreate, BlogPostTranslation, BlogPostUpdate};
use shared::pagination::{PageQuery, PaginatedResponse};
use shared::util::{now_millis, snowflake_id};

use super::{check_translations, resolve_slug};
use crate::api::{ApiResult, internal};
use crate::db;
use crate::error::write_error;
use crate::state::AppState;
use crate::validation::{
    MAX_CONTENT_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_optional_url, validate_required_text, validate_slug,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_by_id).put(update).delete(delete))
}

fn check_post_translations(rows: &[BlogPostTranslation]) -> Result<(), AppError> {
    check_translations(rows, true, |t| {
        validate_required_text(&t.title, "title", MAX_NAME_LEN)?;
        validate_optional_text(&t.excerpt, "excerpt", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&t.content, "content", MAX_CONTENT_LEN)
    })
}

async fn load(state: &AppState, id: i64) -> Result<BlogPost, AppError> {
    db::blog::find(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::BlogPostNotFound))
}

/// GET /api/admin/blog - drafts included
pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> ApiResult<PaginatedResponse<BlogPost>> {
    let (posts, total) = db::blog::list(&state.pool, false, page.limit(), page.offset())
        .await
        .map_err(internal)?;
    Ok(Json(PaginatedResponse::new(posts, total, page)))
}

pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<BlogPost> {
    Ok(Json(load(&state, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(data): Json<BlogPostCreate>,
) -> ApiResult<BlogPost> {
    check_post_translations(&data.translations)?;
    validate_optional_url(&data.cover_image, "cover_image")?;
    validate_optional_text(&data.author, "author", MAX_NAME_LEN)?;
    let slug = resolve_slug(data.slug.as_deref(), &data.translations, |t| t.title.as_str())?;

    let id = snowflake_id();
    db::blog::create(&state.pool, id, &slug, &data, now_millis())
        .await
        .map_err(|e| write_error(e, ErrorCode::BlogPostSlugExists))?;

    tracing::info!(id, %slug, published = data.is_published, "Blog post created");
    Ok(Json(load(&state, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(data): Json<BlogPostUpdate>,
) -> ApiResult<BlogPost> {
    if let Some(translations) = &data.translations {
        check_post_translations(translations)?;
    }
    if let Some(slug) = &data.slug {
        validate_slug(slug)?;
    }
    if let Some(cover) = &data.cover_image {
        validate_optional_url(cover, "cover_image")?;
    }
    if let Some(author) = &data.author {
        validate_optional_text(author, "author", MAX_NAME_LEN)?;
    }

    let updated = db::blog::update(&state.pool, id, &data, now_millis())
        .await
        .map_err(|e| write_error(e, ErrorCode::BlogPostSlugExists))?;
    if !updated {
        return Err(AppError::new(ErrorCode::BlogPostNotFound));
    }
    Ok(Json(load(&state, id).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<bool> {
    let deleted = db::blog::delete(&state.pool, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(AppError::new(ErrorCode::BlogPostNotFound));
    }
    Ok(Json(true))
}
