//! Material catalog management
//!
//! Paper codes are stored verbatim in product attributes, so a paper that
//! some product still references cannot be deleted or renamed.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Material, MaterialCreate, MaterialKind, MaterialTranslation, MaterialUpdate};
use shared::util::snowflake_id;

use super::check_translations;
use crate::api::{ApiResult, internal};
use crate::db;
use crate::error::write_error;
use crate::state::AppState;
use crate::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
    validate_slug,
};

const MAX_GSM: i32 = 2000;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_by_id).put(update).delete(delete))
}

#[derive(Debug, Default, Deserialize)]
pub struct MaterialListQuery {
    pub kind: Option<MaterialKind>,
}

/// Codes look like slugs but use `_` (`coated_350`)
fn check_code(code: &str) -> Result<(), AppError> {
    validate_slug(&code.replace('_', "-")).map_err(|_| {
        AppError::with_message(ErrorCode::InvalidFormat, format!("invalid material code '{code}'"))
            .with_detail("field", "code")
    })
}

fn check_price(unit_price: Decimal) -> Result<(), AppError> {
    if unit_price < Decimal::ZERO {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "unit_price must not be negative",
        )
        .with_detail("field", "unit_price"));
    }
    Ok(())
}

fn check_gsm(gsm: Option<i32>) -> Result<(), AppError> {
    if let Some(gsm) = gsm
        && !(1..=MAX_GSM).contains(&gsm)
    {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("gsm must be between 1 and {MAX_GSM}"),
        )
        .with_detail("field", "gsm"));
    }
    Ok(())
}

fn check_material_translations(rows: &[MaterialTranslation]) -> Result<(), AppError> {
    check_translations(rows, true, |t| {
        validate_required_text(&t.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&t.description, "description", MAX_SHORT_TEXT_LEN)
    })
}

async fn load(state: &AppState, id: i64) -> Result<Material, AppError> {
    db::materials::find(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::MaterialNotFound))
}

async fn ensure_unused(state: &AppState, material: &Material) -> Result<(), AppError> {
    if material.kind != MaterialKind::Paper {
        return Ok(());
    }
    let in_use = db::products::any_attribute_equals(&state.pool, &material.code)
        .await
        .map_err(internal)?;
    if in_use {
        return Err(AppError::new(ErrorCode::MaterialInUse).with_detail("code", material.code.as_str()));
    }
    Ok(())
}

/// GET /api/admin/materials?kind=paper - inactive included
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<MaterialListQuery>,
) -> ApiResult<Vec<Material>> {
    let materials = db::materials::list(&state.pool, query.kind, false)
        .await
        .map_err(internal)?;
    Ok(Json(materials))
}

pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Material> {
    Ok(Json(load(&state, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(data): Json<MaterialCreate>,
) -> ApiResult<Material> {
    check_code(&data.code)?;
    check_price(data.unit_price)?;
    check_gsm(data.gsm)?;
    check_material_translations(&data.translations)?;

    let id = snowflake_id();
    db::materials::create(&state.pool, id, &data)
        .await
        .map_err(|e| write_error(e, ErrorCode::MaterialCodeExists))?;

    tracing::info!(id, code = %data.code, kind = data.kind.as_str(), "Material created");
    Ok(Json(load(&state, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(data): Json<MaterialUpdate>,
) -> ApiResult<Material> {
    let existing = load(&state, id).await?;

    if let Some(code) = &data.code {
        check_code(code)?;
    }
    if let Some(price) = data.unit_price {
        check_price(price)?;
    }
    if let Some(gsm) = data.gsm {
        check_gsm(gsm)?;
    }
    if let Some(translations) = &data.translations {
        check_material_translations(translations)?;
    }

    let renamed = data.code.as_deref().is_some_and(|c| c != existing.code);
    let kind_changed = data.kind.is_some_and(|k| k != existing.kind);
    if renamed || kind_changed {
        ensure_unused(&state, &existing).await?;
    }

    let updated = db::materials::update(&state.pool, id, &data)
        .await
        .map_err(|e| write_error(e, ErrorCode::MaterialCodeExists))?;
    if !updated {
        return Err(AppError::new(ErrorCode::MaterialNotFound));
    }
    Ok(Json(load(&state, id).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<bool> {
    let existing = load(&state, id).await?;
    ensure_unused(&state, &existing).await?;

    let deleted = db::materials::delete(&state.pool, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(AppError::new(ErrorCode::MaterialNotFound));
    }
    tracing::info!(id, code = %existing.code, "Material deleted");
    Ok(Json(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_format() {
        assert!(check_code("coated_350").is_ok());
        assert!(check_code("matte-lamination").is_ok());
        assert_eq!(check_code("Coated 350").unwrap_err().code, ErrorCode::InvalidFormat);
        assert!(check_code("").is_err());
    }

    #[test]
    fn test_gsm_and_price() {
        assert!(check_gsm(None).is_ok());
        assert!(check_gsm(Some(350)).is_ok());
        assert!(check_gsm(Some(0)).is_err());
        assert!(check_price(Decimal::ZERO).is_ok());
        assert!(check_price(Decimal::NEGATIVE_ONE).is_err());
    }
}
