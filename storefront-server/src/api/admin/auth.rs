//! Admin login and session info

use axum::extract::State;
use axum::{Extension, Json};
use shared::error::{AppError, ErrorCode};
use shared::models::{Admin, LoginRequest, LoginResponse};
use shared::util::now_millis;

use crate::api::{ApiResult, internal};
use crate::auth::AdminIdentity;
use crate::auth::admin_auth::create_token;
use crate::db;
use crate::state::AppState;
use crate::util::verify_password;
use crate::validation::{MAX_EMAIL_LEN, MAX_PASSWORD_LEN};

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let email = req.email.trim();
    if email.is_empty()
        || email.len() > MAX_EMAIL_LEN
        || req.password.is_empty()
        || req.password.len() > MAX_PASSWORD_LEN
    {
        return Err(AppError::invalid_credentials());
    }

    let credentials = db::admins::find_credentials(&state.pool, email)
        .await
        .map_err(internal)?
        .ok_or_else(|| {
            tracing::warn!(%email, "Login attempt for unknown admin");
            AppError::invalid_credentials()
        })?;

    if !verify_password(&req.password, &credentials.password_hash) {
        tracing::warn!(%email, "Admin login with wrong password");
        return Err(AppError::invalid_credentials());
    }

    let mut admin = credentials.admin;
    if !admin.is_active {
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let (token, expires_at) =
        create_token(admin.id, &admin.email, &state.jwt_secret).map_err(|e| {
            tracing::error!("JWT creation failed: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    let now = now_millis();
    db::admins::touch_login(&state.pool, admin.id, now)
        .await
        .map_err(internal)?;
    admin.last_login_at = Some(now);

    tracing::info!(admin_id = admin.id, "Admin logged in");
    Ok(Json(LoginResponse {
        token,
        expires_at,
        admin,
    }))
}

/// GET /api/admin/me
pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
) -> ApiResult<Admin> {
    let admin = db::admins::find(&state.pool, identity.admin_id)
        .await
        .map_err(internal)?
        .filter(|a| a.is_active)
        .ok_or_else(AppError::not_authenticated)?;
    Ok(Json(admin))
}
