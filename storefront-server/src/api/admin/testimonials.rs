//! Testimonial management

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    MAX_RATING, MIN_RATING, Testimonial, TestimonialCreate, TestimonialTranslation,
    TestimonialUpdate,
};
use shared::util::{now_millis, snowflake_id};

use super::check_translations;
use crate::api::{ApiResult, internal};
use crate::db;
use crate::state::AppState;
use crate::validation::{
    MAX_CONTENT_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_optional_url, validate_required_text,
};

const DEFAULT_RATING: i16 = MAX_RATING;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_by_id).put(update).delete(delete))
}

fn check_rating(rating: i16) -> Result<(), AppError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("rating must be between {MIN_RATING} and {MAX_RATING}"),
        )
        .with_detail("field", "rating"));
    }
    Ok(())
}

fn check_testimonial_translations(rows: &[TestimonialTranslation]) -> Result<(), AppError> {
    check_translations(rows, true, |t| {
        validate_required_text(&t.content, "content", MAX_CONTENT_LEN)?;
        validate_optional_text(&t.author_title, "author_title", MAX_SHORT_TEXT_LEN)
    })
}

async fn load(state: &AppState, id: i64) -> Result<Testimonial, AppError> {
    db::testimonials::find(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::TestimonialNotFound))
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Testimonial>> {
    let testimonials = db::testimonials::list(&state.pool, false)
        .await
        .map_err(internal)?;
    Ok(Json(testimonials))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Testimonial> {
    Ok(Json(load(&state, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(data): Json<TestimonialCreate>,
) -> ApiResult<Testimonial> {
    validate_required_text(&data.author_name, "author_name", MAX_NAME_LEN)?;
    validate_optional_text(&data.company, "company", MAX_NAME_LEN)?;
    validate_optional_url(&data.avatar_url, "avatar_url")?;
    check_testimonial_translations(&data.translations)?;
    let rating = data.rating.unwrap_or(DEFAULT_RATING);
    check_rating(rating)?;

    let id = snowflake_id();
    db::testimonials::create(&state.pool, id, &data, rating, now_millis())
        .await
        .map_err(internal)?;
    Ok(Json(load(&state, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(data): Json<TestimonialUpdate>,
) -> ApiResult<Testimonial> {
    if let Some(name) = &data.author_name {
        validate_required_text(name, "author_name", MAX_NAME_LEN)?;
    }
    if let Some(company) = &data.company {
        validate_optional_text(company, "company", MAX_NAME_LEN)?;
    }
    if let Some(avatar) = &data.avatar_url {
        validate_optional_url(avatar, "avatar_url")?;
    }
    if let Some(rating) = data.rating {
        check_rating(rating)?;
    }
    if let Some(translations) = &data.translations {
        check_testimonial_translations(translations)?;
    }

    let updated = db::testimonials::update(&state.pool, id, &data)
        .await
        .map_err(internal)?;
    if !updated {
        return Err(AppError::new(ErrorCode::TestimonialNotFound));
    }
    Ok(Json(load(&state, id).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<bool> {
    let deleted = db::testimonials::delete(&state.pool, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(AppError::new(ErrorCode::TestimonialNotFound));
    }
    Ok(Json(true))
}
