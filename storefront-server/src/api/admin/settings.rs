//! Site settings (one JSON document per key)
//!
//! Known keys are reshaped through their typed form before they are stored.
//! Other keys are accepted as free-form JSON so the frontend can keep its own
//! flags without a server release.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use shared::error::{AppError, ErrorCode};
use shared::models::{SettingKey, SiteSetting};
use shared::util::now_millis;

use crate::api::{ApiResult, internal};
use crate::db;
use crate::state::AppState;

const MAX_KEY_LEN: usize = 64;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{key}", get(get_by_key).put(put_value))
}

fn check_key(key: &str) -> Result<(), AppError> {
    let valid = !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !valid {
        return Err(
            AppError::with_message(ErrorCode::InvalidFormat, format!("invalid setting key '{key}'"))
                .with_detail("field", "key"),
        );
    }
    Ok(())
}

fn normalize(key: &str, value: serde_json::Value) -> Result<serde_json::Value, AppError> {
    match SettingKey::parse(key) {
        Some(known) => known.normalize(value).map_err(|e| {
            AppError::with_message(ErrorCode::SettingInvalid, e.to_string()).with_detail("key", key)
        }),
        None => Ok(value),
    }
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<SiteSetting>> {
    let settings = db::settings::list_all(&state.pool)
        .await
        .map_err(internal)?;
    Ok(Json(settings))
}

pub async fn get_by_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<SiteSetting> {
    check_key(&key)?;
    let setting = db::settings::get(&state.pool, &key)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::SettingNotFound).with_detail("key", key.as_str()))?;
    Ok(Json(setting))
}

/// PUT /api/admin/settings/{key} - body is the raw JSON value
pub async fn put_value(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(value): Json<serde_json::Value>,
) -> ApiResult<SiteSetting> {
    check_key(&key)?;
    let value = normalize(&key, value)?;
    let setting = db::settings::upsert(&state.pool, &key, &value, now_millis())
        .await
        .map_err(internal)?;
    tracing::info!(%key, "Setting updated");
    Ok(Json(setting))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_format() {
        assert!(check_key("general").is_ok());
        assert!(check_key("social_links").is_ok());
        assert!(check_key("Header").is_err());
        assert!(check_key("").is_err());
        assert!(check_key("a/b").is_err());
    }

    #[test]
    fn test_unknown_key_passes_through() {
        let value = json!({"anything": [1, 2]});
        assert_eq!(normalize("banner_flags", value.clone()).unwrap(), value);
    }

    #[test]
    fn test_known_key_rejects_wrong_shape() {
        let err = normalize("social_links", json!("not a list")).unwrap_err();
        assert_eq!(err.code, ErrorCode::SettingInvalid);
    }
}
