//! Homepage ready-made curation

use std::collections::HashSet;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use shared::error::{AppError, ErrorCode};
use shared::i18n::LocalizedText;
use shared::models::{ReadyMadeEntry, ReadyMadeItem, ReadyMadeReplace};

use crate::api::{ApiResult, internal};
use crate::db;
use crate::state::AppState;
use crate::validation::{MAX_NAME_LEN, validate_lang_codes, validate_required_text};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list).put(replace))
}

fn check_badge(badge: &LocalizedText) -> Result<(), AppError> {
    validate_lang_codes(badge.0.keys().map(String::as_str), false)?;
    badge
        .0
        .values()
        .filter(|text| !text.trim().is_empty())
        .try_for_each(|text| validate_required_text(text, "badge", MAX_NAME_LEN))
}

fn check_entries(entries: &[ReadyMadeEntry]) -> Result<(), AppError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.product_id) {
            return Err(AppError::with_message(
                ErrorCode::InvalidRequest,
                format!("product {} is listed twice", entry.product_id),
            )
            .with_detail("product_id", entry.product_id));
        }
        check_badge(&entry.badge)?;
    }
    Ok(())
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<ReadyMadeItem>> {
    let items = db::ready_made::list(&state.pool).await.map_err(internal)?;
    Ok(Json(items))
}

/// PUT /api/admin/ready-made - replaces the whole list
pub async fn replace(
    State(state): State<AppState>,
    Json(data): Json<ReadyMadeReplace>,
) -> ApiResult<Vec<ReadyMadeItem>> {
    check_entries(&data.items)?;

    let ids: Vec<i64> = data.items.iter().map(|e| e.product_id).collect();
    let found = db::products::list_by_ids(&state.pool, &ids, false)
        .await
        .map_err(internal)?;
    if let Some(missing) = ids.iter().find(|id| !found.iter().any(|p| p.id == **id)) {
        return Err(AppError::new(ErrorCode::ProductNotFound).with_detail("product_id", *missing));
    }

    db::ready_made::replace(&state.pool, &data.items)
        .await
        .map_err(internal)?;
    tracing::info!(count = data.items.len(), "Ready-made list replaced");

    let items = db::ready_made::list(&state.pool).await.map_err(internal)?;
    Ok(Json(items))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(product_id: i64) -> ReadyMadeEntry {
        ReadyMadeEntry {
            product_id,
            badge: LocalizedText::default(),
        }
    }

    #[test]
    fn test_duplicate_products_rejected() {
        assert!(check_entries(&[entry(1), entry(2)]).is_ok());
        let err = check_entries(&[entry(1), entry(1)]).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[test]
    fn test_badge_language_checked() {
        let mut e = entry(1);
        e.badge.0.insert("fr".into(), "Nouveau".into());
        assert!(check_entries(&[e]).is_err());
    }
}
