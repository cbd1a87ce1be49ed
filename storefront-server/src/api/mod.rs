//! HTTP API
//!
//! - [`health`] - health check
//! - [`storefront`] - public, localized catalog and content endpoints
//! - [`admin`] - JWT-protected back-office endpoints
//! - [`media`] - uploaded file serving

pub mod admin;
pub mod health;
pub mod lang;
pub mod media;
pub mod storefront;

use axum::Router;
use axum::routing::get;
use http::{HeaderName, HeaderValue, Method};
use shared::i18n::Lang;
use shared::models::PaperChoice;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;

pub use crate::error::internal;
pub use lang::ReqLang;

type ApiResult<T> = Result<axum::Json<T>, shared::error::AppError>;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Snowflake-based request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = format!("{:x}", shared::util::snowflake_id());
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

/// Active paper stock, resolved for `lang`
async fn load_papers(state: &AppState, lang: Lang) -> ServiceResult<Vec<PaperChoice>> {
    let papers = db::materials::list_active_papers(&state.pool).await?;
    Ok(papers.iter().map(|m| m.paper_choice(lang)).collect())
}

/// Build the full application router
pub fn create_router(state: AppState, cors_allowed_origins: &[String]) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/health", get(health::health_check))
        .merge(storefront::router(state.clone()))
        .merge(admin::router(state.clone()))
        .merge(media::router())
        .with_state(state)
        .layer(cors_layer(cors_allowed_origins))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, XRequestId))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_is_hex() {
        let req = http::Request::new(());
        let id = XRequestId.make_request_id(&req).unwrap();
        let value = id.header_value().to_str().unwrap();
        assert!(!value.is_empty());
        assert!(value.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
