//! Category management, template editing and price tiers
//!
//! Every template field edit loads the stored schema into a
//! [`TemplateBuilder`], applies the change, validates the result and
//! persists it; the response is the new schema.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Category, CategoryCreate, CategoryTranslation, CategoryUpdate, FieldDescriptor, PriceTier,
    PriceTiersReplace, RenderedField, TemplateSchema,
};
use shared::util::{now_millis, snowflake_id};

use super::{BatchSortOrderRequest, BatchSortOrderResult, check_translations, resolve_slug};
use crate::api::{ApiResult, ReqLang, internal, load_papers};
use crate::catalog::{self, ParentError, TreeNode, build_tree};
use crate::db;
use crate::error::write_error;
use crate::pricing::validate_tiers;
use crate::state::AppState;
use crate::template::{TemplateBuilder, Values, render_form, schema_error, validate_schema};
use crate::validation::{
    MAX_CONTENT_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_optional_url, validate_required_text, validate_slug,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/tree", get(tree))
        // Must be before /{id} to avoid path conflicts
        .route("/sort-order", put(batch_update_sort_order))
        .route("/template/suggest-key", post(suggest_key))
        .route("/{id}", get(get_by_id).put(update).delete(delete))
        .route("/{id}/template", get(get_template).put(put_template))
        .route("/{id}/template/form", get(template_form))
        .route("/{id}/template/fields", post(add_field))
        .route("/{id}/template/fields/{key}", put(update_field).delete(remove_field))
        .route("/{id}/template/fields/{key}/move", post(move_field))
        .route("/{id}/price-tiers", get(list_price_tiers).put(replace_price_tiers))
}

fn check_category_translations(rows: &[CategoryTranslation]) -> Result<(), AppError> {
    check_translations(rows, true, |t| {
        validate_required_text(&t.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&t.description, "description", MAX_CONTENT_LEN)
    })
}

async fn load(state: &AppState, id: i64) -> Result<Category, AppError> {
    db::categories::find(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))
}

/// A new parent must exist and must not be the category itself or one of its descendants
async fn check_parent(state: &AppState, id: Option<i64>, parent_id: i64) -> Result<(), AppError> {
    let rows = db::categories::list_all(&state.pool)
        .await
        .map_err(internal)?;
    catalog::check_parent(rows, id, parent_id).map_err(parent_error)
}

fn parent_error(e: ParentError) -> AppError {
    AppError::with_message(ErrorCode::CategoryParentInvalid, e.to_string())
        .with_detail("field", "parent_id")
}

/// Only empty leaf categories can be deleted
fn check_deletable(children: i64, products: i64) -> Result<(), AppError> {
    if children > 0 {
        return Err(AppError::new(ErrorCode::CategoryHasChildren).with_detail("children", children));
    }
    if products > 0 {
        return Err(AppError::new(ErrorCode::CategoryHasProducts).with_detail("products", products));
    }
    Ok(())
}

/// GET /api/admin/categories - flat list with translations
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let categories = db::categories::list_all(&state.pool)
        .await
        .map_err(internal)?;
    Ok(Json(categories))
}

/// GET /api/admin/categories/tree - full tree, inactive categories included
pub async fn tree(State(state): State<AppState>) -> ApiResult<Vec<TreeNode<Category>>> {
    let categories = db::categories::list_all(&state.pool)
        .await
        .map_err(internal)?;
    Ok(Json(build_tree(categories)))
}

pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Category> {
    Ok(Json(load(&state, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(data): Json<CategoryCreate>,
) -> ApiResult<Category> {
    check_category_translations(&data.translations)?;
    validate_optional_url(&data.image_url, "image_url")?;
    validate_optional_text(&data.icon, "icon", MAX_SHORT_TEXT_LEN)?;
    if let Some(parent_id) = data.parent_id {
        check_parent(&state, None, parent_id).await?;
    }
    let slug = resolve_slug(data.slug.as_deref(), &data.translations, |t| t.name.as_str())?;

    let id = snowflake_id();
    db::categories::create(&state.pool, id, &slug, &data, now_millis())
        .await
        .map_err(|e| write_error(e, ErrorCode::CategorySlugExists))?;

    tracing::info!(id, %slug, "Category created");
    Ok(Json(load(&state, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(data): Json<CategoryUpdate>,
) -> ApiResult<Category> {
    load(&state, id).await?;

    if let Some(translations) = &data.translations {
        check_category_translations(translations)?;
    }
    if let Some(slug) = &data.slug {
        validate_slug(slug)?;
    }
    if let Some(url) = &data.image_url {
        validate_optional_url(url, "image_url")?;
    }
    if let Some(icon) = &data.icon {
        validate_optional_text(icon, "icon", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(Some(parent_id)) = data.parent_id {
        check_parent(&state, Some(id), parent_id).await?;
    }

    let updated = db::categories::update(&state.pool, id, &data, now_millis())
        .await
        .map_err(|e| write_error(e, ErrorCode::CategorySlugExists))?;
    if !updated {
        return Err(AppError::new(ErrorCode::CategoryNotFound));
    }
    Ok(Json(load(&state, id).await?))
}

/// Refused while the category still has children or products
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<bool> {
    load(&state, id).await?;

    let children = db::categories::count_children(&state.pool, id)
        .await
        .map_err(internal)?;
    let products = if children > 0 {
        0
    } else {
        db::products::count_in_category(&state.pool, id)
            .await
            .map_err(internal)?
    };
    check_deletable(children, products)?;

    let deleted = db::categories::delete(&state.pool, id)
        .await
        .map_err(internal)?;
    if deleted {
        tracing::info!(id, "Category deleted");
    }
    Ok(Json(deleted))
}

pub async fn batch_update_sort_order(
    State(state): State<AppState>,
    Json(req): Json<BatchSortOrderRequest>,
) -> ApiResult<BatchSortOrderResult> {
    let updated = db::categories::batch_update_sort_order(&state.pool, &req.items)
        .await
        .map_err(internal)?;
    Ok(Json(BatchSortOrderResult { updated }))
}

// ── Template ──

pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<TemplateSchema> {
    Ok(Json(load(&state, id).await?.template_schema))
}

/// PUT /api/admin/categories/{id}/template - replace the whole schema
pub async fn put_template(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(schema): Json<TemplateSchema>,
) -> ApiResult<TemplateSchema> {
    validate_schema(&schema).map_err(|errors| schema_error(&errors))?;
    let saved = db::categories::set_template_schema(&state.pool, id, &schema, now_millis())
        .await
        .map_err(internal)?;
    if !saved {
        return Err(AppError::new(ErrorCode::CategoryNotFound));
    }
    tracing::info!(id, fields = schema.len(), "Category template replaced");
    Ok(Json(schema))
}

#[derive(Debug, Deserialize)]
pub struct TemplateFormQuery {
    pub product_id: Option<i64>,
}

/// GET /api/admin/categories/{id}/template/form - form for a new or existing product
pub async fn template_form(
    State(state): State<AppState>,
    ReqLang(lang): ReqLang,
    Path(id): Path<i64>,
    Query(query): Query<TemplateFormQuery>,
) -> ApiResult<Vec<RenderedField>> {
    let category = load(&state, id).await?;

    let values = match query.product_id {
        Some(product_id) => {
            db::products::find(&state.pool, product_id)
                .await
                .map_err(internal)?
                .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?
                .attributes
        }
        None => Values::new(),
    };

    let papers = load_papers(&state, lang).await?;

    Ok(Json(render_form(&category.template_schema, &values, lang, &papers)))
}

/// Apply one builder step to the stored schema and persist the result
async fn edit_template(
    state: &AppState,
    id: i64,
    edit: impl FnOnce(&mut TemplateBuilder) -> Result<(), AppError>,
) -> Result<TemplateSchema, AppError> {
    let category = load(state, id).await?;
    let mut builder = TemplateBuilder::from_schema(category.template_schema);
    edit(&mut builder)?;
    let schema = builder.build().map_err(|errors| schema_error(&errors))?;

    db::categories::set_template_schema(&state.pool, id, &schema, now_millis())
        .await
        .map_err(internal)?;
    Ok(schema)
}

pub async fn add_field(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(field): Json<FieldDescriptor>,
) -> ApiResult<TemplateSchema> {
    let schema = edit_template(&state, id, |b| {
        b.add_field(field)?;
        Ok(())
    })
    .await?;
    Ok(Json(schema))
}

pub async fn update_field(
    State(state): State<AppState>,
    Path((id, key)): Path<(i64, String)>,
    Json(field): Json<FieldDescriptor>,
) -> ApiResult<TemplateSchema> {
    let schema = edit_template(&state, id, |b| {
        b.update_field(&key, field)?;
        Ok(())
    })
    .await?;
    Ok(Json(schema))
}

pub async fn remove_field(
    State(state): State<AppState>,
    Path((id, key)): Path<(i64, String)>,
) -> ApiResult<TemplateSchema> {
    let schema = edit_template(&state, id, |b| {
        b.remove_field(&key)?;
        Ok(())
    })
    .await?;
    Ok(Json(schema))
}

#[derive(Debug, Deserialize)]
pub struct MoveFieldRequest {
    /// Target index, clamped to the end of the list
    pub to: usize,
}

pub async fn move_field(
    State(state): State<AppState>,
    Path((id, key)): Path<(i64, String)>,
    Json(req): Json<MoveFieldRequest>,
) -> ApiResult<TemplateSchema> {
    let schema = edit_template(&state, id, |b| {
        b.move_field(&key, req.to)?;
        Ok(())
    })
    .await?;
    Ok(Json(schema))
}

#[derive(Debug, Deserialize)]
pub struct SuggestKeyRequest {
    pub label: String,
    /// Avoid the keys already used by this category
    pub category_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SuggestKeyResponse {
    pub key: String,
}

/// POST /api/admin/categories/template/suggest-key
pub async fn suggest_key(
    State(state): State<AppState>,
    Json(req): Json<SuggestKeyRequest>,
) -> ApiResult<SuggestKeyResponse> {
    validate_required_text(&req.label, "label", MAX_NAME_LEN)?;

    let builder = match req.category_id {
        Some(id) => TemplateBuilder::from_schema(load(&state, id).await?.template_schema),
        None => TemplateBuilder::new(),
    };
    Ok(Json(SuggestKeyResponse {
        key: builder.suggest_key(&req.label),
    }))
}

// ── Price tiers ──

pub async fn list_price_tiers(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<PriceTier>> {
    load(&state, id).await?;
    let tiers = db::price_tiers::list_for_category(&state.pool, id)
        .await
        .map_err(internal)?;
    Ok(Json(tiers))
}

pub async fn replace_price_tiers(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<PriceTiersReplace>,
) -> ApiResult<Vec<PriceTier>> {
    load(&state, id).await?;
    validate_tiers(&req.tiers)?;
    let tiers = db::price_tiers::replace(&state.pool, id, &req.tiers)
        .await
        .map_err(internal)?;
    Ok(Json(tiers))
}
