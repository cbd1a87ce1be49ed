//! Print service management

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use shared::error::{AppError, ErrorCode};
use shared::models::{Service, ServiceCreate, ServiceTranslation, ServiceUpdate};
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

fn check_service_translations(rows: &[ServiceTranslation]) -> Result<(), AppError> {
    check_translations(rows, true, |t| {
        validate_required_text(&t.title, "title", MAX_NAME_LEN)?;
        validate_optional_text(&t.summary, "summary", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&t.content, "content", MAX_CONTENT_LEN)
    })
}

async fn load(state: &AppState, id: i64) -> Result<Service, AppError> {
    db::services::find(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::ServiceNotFound))
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Service>> {
    let services = db::services::list(&state.pool, false)
        .await
        .map_err(internal)?;
    Ok(Json(services))
}

pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Service> {
    Ok(Json(load(&state, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(data): Json<ServiceCreate>,
) -> ApiResult<Service> {
    check_service_translations(&data.translations)?;
    validate_optional_text(&data.icon, "icon", MAX_SHORT_TEXT_LEN)?;
    validate_optional_url(&data.image_url, "image_url")?;
    let slug = resolve_slug(data.slug.as_deref(), &data.translations, |t| t.title.as_str())?;

    let id = snowflake_id();
    db::services::create(&state.pool, id, &slug, &data, now_millis())
        .await
        .map_err(|e| write_error(e, ErrorCode::ServiceSlugExists))?;

    tracing::info!(id, %slug, "Service created");
    Ok(Json(load(&state, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(data): Json<ServiceUpdate>,
) -> ApiResult<Service> {
    if let Some(translations) = &data.translations {
        check_service_translations(translations)?;
    }
    if let Some(slug) = &data.slug {
        validate_slug(slug)?;
    }
    if let Some(icon) = &data.icon {
        validate_optional_text(icon, "icon", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(url) = &data.image_url {
        validate_optional_url(url, "image_url")?;
    }

    let updated = db::services::update(&state.pool, id, &data, now_millis())
        .await
        .map_err(|e| write_error(e, ErrorCode::ServiceSlugExists))?;
    if !updated {
        return Err(AppError::new(ErrorCode::ServiceNotFound));
    }
    Ok(Json(load(&state, id).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<bool> {
    let deleted = db::services::delete(&state.pool, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(AppError::new(ErrorCode::ServiceNotFound));
    }
    Ok(Json(true))
}
