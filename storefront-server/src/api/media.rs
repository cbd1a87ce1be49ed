//! Uploaded media serving (`GET /media/{filename}`)

use axum::Router;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use http::header;
use shared::error::{AppError, ErrorCode};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/media/{filename}", get(serve))
}

/// Stored names are `<id>.<ext>`; anything else never reaches the filesystem
pub fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 128
        && !name.starts_with('.')
        && !name.contains("..")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

async fn serve(State(state): State<AppState>, Path(filename): Path<String>) -> Response {
    if !is_safe_filename(&filename) {
        return AppError::new(ErrorCode::MediaNotFound).into_response();
    }

    let path = state.upload_dir.join(&filename);
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                [
                    (header::CONTENT_TYPE, mime.to_string()),
                    (header::CACHE_CONTROL, "public, max-age=31536000, immutable".to_string()),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            AppError::new(ErrorCode::MediaNotFound).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, %filename, "Failed to read media file");
            AppError::new(ErrorCode::InternalError).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_filename() {
        assert!(is_safe_filename("123456789.jpg"));
        assert!(is_safe_filename("a-b_c.webp"));
        assert!(!is_safe_filename("../etc/passwd"));
        assert!(!is_safe_filename("a/b.jpg"));
        assert!(!is_safe_filename(".env"));
        assert!(!is_safe_filename(""));
        assert!(!is_safe_filename("a..jpg"));
    }

    fn state_with_dir(dir: &std::path::Path) -> AppState {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/storefront_test")
            .unwrap();
        AppState {
            pool,
            jwt_secret: "test".into(),
            rate_limiter: crate::auth::RateLimiter::new(),
            upload_dir: dir.to_path_buf(),
            public_media_base: "/media".into(),
            mega_menu_preview_limit: 6,
            default_lang: shared::i18n::Lang::Tr,
        }
    }

    #[tokio::test]
    async fn test_serve_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("abc.jpg"), b"jpeg-bytes").unwrap();
        let state = state_with_dir(dir.path());

        let resp = serve(State(state), Path("abc.jpg".to_string())).await;
        assert_eq!(resp.status(), http::StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "image/jpeg");
    }

    #[tokio::test]
    async fn test_serve_missing_or_unsafe() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_dir(dir.path());

        let resp = serve(State(state.clone()), Path("nope.jpg".to_string())).await;
        assert_eq!(resp.status(), http::StatusCode::NOT_FOUND);
        let resp = serve(State(state), Path("..secret".to_string())).await;
        assert_eq!(resp.status(), http::StatusCode::NOT_FOUND);
    }
}
