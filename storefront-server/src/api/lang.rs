//! Request language extraction
//!
//! `?lang=` wins, then the `Accept-Language` header, then the configured
//! default language.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Query};
use http::Uri;
use http::request::Parts;
use serde::Deserialize;
use shared::i18n::Lang;

use crate::state::AppState;

/// Language the response should be localized into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReqLang(pub Lang);

#[derive(Debug, Default, Deserialize)]
struct LangQuery {
    lang: Option<String>,
}

impl FromRequestParts<AppState> for ReqLang {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let accept = parts
            .headers
            .get(http::header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok());
        Ok(Self(resolve_lang(query_lang(&parts.uri), accept, state.default_lang)))
    }
}

/// `?lang=` if present and supported; a malformed query counts as absent
fn query_lang(uri: &Uri) -> Option<Lang> {
    let Query(query) = Query::<LangQuery>::try_from_uri(uri).ok()?;
    query.lang.as_deref().and_then(Lang::parse)
}

pub fn resolve_lang(query: Option<Lang>, accept_language: Option<&str>, default: Lang) -> Lang {
    query
        .or_else(|| accept_language.and_then(Lang::from_accept_language))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lang_of(uri: &str) -> Option<Lang> {
        query_lang(&uri.parse::<Uri>().unwrap())
    }

    #[test]
    fn test_query_lang() {
        assert_eq!(lang_of("/api/menu?page=2&lang=de"), Some(Lang::De));
        assert_eq!(lang_of("/api/menu?lang=%74%72"), Some(Lang::Tr));
        assert_eq!(lang_of("/api/menu?q=a%26lang%3Dde&lang=en"), Some(Lang::En));
        assert_eq!(lang_of("/api/menu?lang=xx"), None);
        assert_eq!(lang_of("/api/menu"), None);
    }

    #[test]
    fn test_query_wins() {
        assert_eq!(resolve_lang(Some(Lang::De), Some("en-US"), Lang::Tr), Lang::De);
    }

    #[test]
    fn test_accept_language_then_default() {
        assert_eq!(resolve_lang(None, Some("fr-FR, en;q=0.8"), Lang::Tr), Lang::En);
        assert_eq!(resolve_lang(lang_of("/?lang=xx"), Some("fr"), Lang::De), Lang::De);
        assert_eq!(resolve_lang(None, None, Lang::Tr), Lang::Tr);
    }
}
