//! Product management
//!
//! Attributes are validated against the category's template schema on
//! create, and again on update whenever the attributes or the category change.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::i18n::Lang;
use shared::models::{Product, ProductCreate, ProductListQuery, ProductTranslation, ProductUpdate};
use shared::pagination::PaginatedResponse;
use shared::util::{now_millis, snowflake_id};

use super::{check_translations, resolve_slug};
use crate::api::{ApiResult, ReqLang, internal, load_papers};
use crate::db;
use crate::db::products::ProductFilter;
use crate::error::write_error;
use crate::state::AppState;
use crate::template::{Values, validate_values, values_error};
use crate::validation::{
    MAX_CONTENT_LEN, MAX_NAME_LEN, MAX_PHONE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_optional_url, validate_required_text, validate_slug, validate_url,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_by_id).put(update).delete(delete))
}

fn check_product_translations(rows: &[ProductTranslation]) -> Result<(), AppError> {
    check_translations(rows, true, |t| {
        validate_required_text(&t.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&t.short_description, "short_description", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&t.description, "description", MAX_CONTENT_LEN)
    })
}

fn check_price(price: Decimal) -> Result<(), AppError> {
    if price < Decimal::ZERO {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidPrice,
            format!("base_price must not be negative, got {price}"),
        ));
    }
    Ok(())
}

fn check_gallery(gallery: &[String]) -> Result<(), AppError> {
    gallery.iter().try_for_each(|url| validate_url(url, "gallery"))
}

async fn load(state: &AppState, id: i64) -> Result<Product, AppError> {
    db::products::find(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))
}

/// Normalize `values` against the template of `category_id`
async fn check_attributes(
    state: &AppState,
    category_id: i64,
    values: &Values,
    lang: Lang,
) -> Result<Values, AppError> {
    let category = db::categories::find(&state.pool, category_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;
    let papers = load_papers(state, lang).await?;

    validate_values(&category.template_schema, values, &papers)
        .map_err(|errors| values_error(errors, lang))
}

/// GET /api/admin/products - inactive products included
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> ApiResult<PaginatedResponse<Product>> {
    let filter = ProductFilter {
        category_ids: query.category_id.map(|id| vec![id]),
        featured: query.featured,
        search: query.q.clone(),
        active_only: false,
    };
    let page = query.page_query();
    let (products, total) = db::products::list(&state.pool, &filter, page.limit(), page.offset())
        .await
        .map_err(internal)?;
    Ok(Json(PaginatedResponse::new(products, total, page)))
}

pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Product> {
    Ok(Json(load(&state, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    ReqLang(lang): ReqLang,
    Json(data): Json<ProductCreate>,
) -> ApiResult<Product> {
    check_product_translations(&data.translations)?;
    check_price(data.base_price)?;
    validate_optional_text(&data.sku, "sku", MAX_PHONE_LEN)?;
    validate_optional_url(&data.image_url, "image_url")?;
    check_gallery(&data.gallery)?;
    let slug = resolve_slug(data.slug.as_deref(), &data.translations, |t| t.name.as_str())?;
    let attributes = check_attributes(&state, data.category_id, &data.attributes, lang).await?;

    let id = snowflake_id();
    db::products::create(&state.pool, id, &slug, &data, &attributes, now_millis())
        .await
        .map_err(|e| write_error(e, ErrorCode::ProductSlugExists))?;

    tracing::info!(id, %slug, category_id = data.category_id, "Product created");
    Ok(Json(load(&state, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    ReqLang(lang): ReqLang,
    Path(id): Path<i64>,
    Json(data): Json<ProductUpdate>,
) -> ApiResult<Product> {
    let existing = load(&state, id).await?;

    if let Some(translations) = &data.translations {
        check_product_translations(translations)?;
    }
    if let Some(price) = data.base_price {
        check_price(price)?;
    }
    if let Some(slug) = &data.slug {
        validate_slug(slug)?;
    }
    if let Some(sku) = &data.sku {
        validate_optional_text(sku, "sku", MAX_PHONE_LEN)?;
    }
    if let Some(url) = &data.image_url {
        validate_optional_url(url, "image_url")?;
    }
    if let Some(gallery) = &data.gallery {
        check_gallery(gallery)?;
    }

    let category_id = data.category_id.unwrap_or(existing.category_id);
    let attributes = if data.attributes.is_some() || category_id != existing.category_id {
        let values = data.attributes.as_ref().unwrap_or(&existing.attributes);
        Some(check_attributes(&state, category_id, values, lang).await?)
    } else {
        None
    };

    let updated = db::products::update(&state.pool, id, &data, attributes.as_ref(), now_millis())
        .await
        .map_err(|e| write_error(e, ErrorCode::ProductSlugExists))?;
    if !updated {
        return Err(AppError::new(ErrorCode::ProductNotFound));
    }
    Ok(Json(load(&state, id).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<bool> {
    let deleted = db::products::delete(&state.pool, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(AppError::new(ErrorCode::ProductNotFound));
    }
    tracing::info!(id, "Product deleted");
    Ok(Json(true))
}
