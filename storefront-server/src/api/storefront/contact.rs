//! Contact form submission

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::{Extension, Json};
use http::HeaderMap;
use shared::i18n::t;
use shared::models::{ContactReceipt, ContactSubmit};
use shared::util::{now_millis, snowflake_id};

use crate::api::{ApiResult, ReqLang, internal};
use crate::auth::rate_limit::client_ip;
use crate::db;
use crate::state::AppState;
use crate::validation::validate_contact;

/// POST /api/contact
pub async fn submit(
    State(state): State<AppState>,
    ReqLang(lang): ReqLang,
    peer: Option<Extension<ConnectInfo<SocketAddr>>>,
    headers: HeaderMap,
    Json(form): Json<ContactSubmit>,
) -> ApiResult<ContactReceipt> {
    validate_contact(&form, lang)?;

    let ip = client_ip(&headers, peer.map(|Extension(ConnectInfo(addr))| addr));
    let id = snowflake_id();
    db::contact::insert(&state.pool, id, &form, lang.code(), &ip, now_millis())
        .await
        .map_err(internal)?;

    tracing::info!(id, %ip, product = ?form.product_slug, "Contact message received");

    Ok(Json(ContactReceipt {
        id,
        message: t(lang, "contact.success"),
    }))
}
