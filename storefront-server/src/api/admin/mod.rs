//! Back-office API (`/api/admin/*`)
//!
//! Login is public and rate-limited; every other route requires an admin
//! bearer token.

mod auth;
mod blog;
mod categories;
mod contact;
mod materials;
mod media;
mod navigation;
mod products;
mod ready_made;
mod services;
mod settings;
mod testimonials;
mod todos;

use axum::routing::{get, post};
use axum::{Router, middleware};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::i18n::{Lang, Translation, pick_translation};
use shared::models::SortOrderItem;
use shared::util::slugify;

use crate::auth::admin_auth::admin_auth_middleware;
use crate::auth::rate_limit::login_rate_limit;
use crate::state::AppState;
use crate::validation::{validate_lang_codes, validate_slug};

pub fn router(state: AppState) -> Router<AppState> {
    let login = Router::new()
        .route("/api/admin/login", post(auth::login))
        .layer(middleware::from_fn_with_state(state.clone(), login_rate_limit));

    let protected = Router::new()
        .route("/api/admin/me", get(auth::me))
        .nest("/api/admin/categories", categories::routes())
        .nest("/api/admin/products", products::routes())
        .nest("/api/admin/blog", blog::routes())
        .nest("/api/admin/testimonials", testimonials::routes())
        .nest("/api/admin/services", services::routes())
        .nest("/api/admin/contact", contact::routes())
        .nest("/api/admin/settings", settings::routes())
        .nest("/api/admin/navigation", navigation::routes())
        .nest("/api/admin/ready-made", ready_made::routes())
        .nest("/api/admin/materials", materials::routes())
        .nest("/api/admin/media", media::routes())
        .nest("/api/admin/todos", todos::routes())
        .layer(middleware::from_fn_with_state(state, admin_auth_middleware));

    Router::new().merge(login).merge(protected)
}

#[derive(Debug, Deserialize)]
struct BatchSortOrderRequest {
    items: Vec<SortOrderItem>,
}

#[derive(Debug, Serialize)]
struct BatchSortOrderResult {
    updated: u64,
}

/// Explicit slug (validated) or one derived from the Turkish name (then English, German).
fn resolve_slug<T: Translation>(
    explicit: Option<&str>,
    translations: &[T],
    name: impl Fn(&T) -> &str,
) -> Result<String, AppError> {
    if let Some(slug) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        validate_slug(slug)?;
        return Ok(slug.to_string());
    }

    let derived = pick_translation(translations, Lang::Tr)
        .map(|t| slugify(name(t)))
        .unwrap_or_default();
    if derived.is_empty() {
        return Err(
            AppError::with_message(ErrorCode::RequiredField, "slug could not be derived")
                .with_detail("field", "slug"),
        );
    }
    validate_slug(&derived)?;
    Ok(derived)
}

/// Language codes must be supported and distinct, then each row is checked.
fn check_translations<T: Translation>(
    rows: &[T],
    required: bool,
    check: impl Fn(&T) -> Result<(), AppError>,
) -> Result<(), AppError> {
    validate_lang_codes(rows.iter().map(Translation::lang_code), required)?;
    rows.iter().try_for_each(check)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::CategoryTranslation;

    fn tr(lang: &str, name: &str) -> CategoryTranslation {
        CategoryTranslation {
            lang_code: lang.into(),
            name: name.into(),
            description: None,
        }
    }

    #[test]
    fn test_resolve_slug_prefers_explicit() {
        let rows = vec![tr("tr", "Kartvizit")];
        let slug = resolve_slug(Some(" ozel-kart "), &rows, |t| t.name.as_str()).unwrap();
        assert_eq!(slug, "ozel-kart");
    }

    #[test]
    fn test_resolve_slug_from_turkish_name() {
        let rows = vec![tr("en", "Business Cards"), tr("tr", "Kartvizit Baskı")];
        assert_eq!(resolve_slug(None, &rows, |t| t.name.as_str()).unwrap(), "kartvizit-baski");

        let rows = vec![tr("de", "Visitenkarten")];
        assert_eq!(resolve_slug(Some(""), &rows, |t| t.name.as_str()).unwrap(), "visitenkarten");
    }

    #[test]
    fn test_resolve_slug_rejects_invalid() {
        let rows = vec![tr("tr", "Kartvizit")];
        let err = resolve_slug(Some("Not A Slug!"), &rows, |t| t.name.as_str()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);

        let err = resolve_slug(None, &Vec::<CategoryTranslation>::new(), |t| t.name.as_str()).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
    }

    #[test]
    fn test_check_translations() {
        let ok = vec![tr("tr", "A"), tr("en", "B")];
        assert!(check_translations(&ok, true, |_| Ok(())).is_ok());

        let dup = vec![tr("tr", "A"), tr("tr", "B")];
        assert!(check_translations(&dup, true, |_| Ok(())).is_err());

        assert!(check_translations(&Vec::<CategoryTranslation>::new(), true, |_| Ok(())).is_err());
        assert!(check_translations(&Vec::<CategoryTranslation>::new(), false, |_| Ok(())).is_ok());
    }
}
