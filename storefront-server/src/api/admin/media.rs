//! Media library: image upload, listing, alt text, delete
//!
//! Uploads are decoded, re-encoded as JPEG and stored as `{sha256}.jpg`
//! under the upload dir. Re-uploading the same picture returns the existing
//! asset instead of writing a second copy.

use std::io::Cursor;
use std::path::Path as FsPath;

use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use image::DynamicImage;
use sha2::{Digest, Sha256};
use shared::error::{AppError, ErrorCode};
use shared::models::{MediaAsset, MediaListQuery, MediaUpdate};
use shared::pagination::PaginatedResponse;
use shared::util::{now_millis, snowflake_id};

use crate::api::{ApiResult, internal};
use crate::db;
use crate::error::is_unique_violation;
use crate::state::AppState;
use crate::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text};

/// Maximum file size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Multipart framing on top of the file itself
const BODY_LIMIT: usize = MAX_FILE_SIZE + 64 * 1024;

const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

const JPEG_QUALITY: u8 = 85;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list)
                .post(upload)
                .layer(DefaultBodyLimit::max(BODY_LIMIT)),
        )
        .route("/{id}", get(get_by_id).put(update).delete(delete))
}

fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn check_upload(data: &[u8], original_name: &str) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!("maximum size is {}MB", MAX_FILE_SIZE / 1024 / 1024),
        )
        .with_detail("max_bytes", MAX_FILE_SIZE));
    }

    let ext = FsPath::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!("unsupported file format '{ext}', expected one of {}", SUPPORTED_FORMATS.join(", ")),
        ));
    }
    Ok(())
}

/// Decode and re-encode as JPEG
fn process_image(data: &[u8]) -> Result<(DynamicImage, Vec<u8>), AppError> {
    let img = image::load_from_memory(data).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidImageFile, format!("invalid image: {e}"))
    })?;

    let mut buffer = Vec::new();
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(Cursor::new(&mut buffer), JPEG_QUALITY);
    img.to_rgb8().write_with_encoder(encoder).map_err(|e| {
        tracing::error!(error = %e, "Failed to encode image");
        AppError::new(ErrorCode::InternalError)
    })?;

    Ok((img, buffer))
}

/// Keep only the final path component of a client-supplied name
fn clean_original_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    base.chars().take(MAX_NAME_LEN).collect()
}

async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::with_message(ErrorCode::InvalidRequest, format!("invalid multipart request: {e}"))
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let original_name = field
            .file_name()
            .map(clean_original_name)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::new(ErrorCode::NoFileProvided))?;
        let bytes = field.bytes().await.map_err(|e| {
            AppError::with_message(ErrorCode::FileTooLarge, format!("multipart error: {e}"))
        })?;
        return Ok((original_name, bytes.to_vec()));
    }
    Err(AppError::new(ErrorCode::NoFileProvided))
}

fn with_url(state: &AppState, mut asset: MediaAsset) -> MediaAsset {
    asset.url = state.media_url(&asset.filename);
    asset
}

/// POST /api/admin/media - multipart, field `file`
pub async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> ApiResult<MediaAsset> {
    let (original_name, data) = read_file_field(&mut multipart).await?;
    check_upload(&data, &original_name)?;

    let (img, compressed) = process_image(&data)?;
    let sha256 = calculate_hash(&compressed);

    if let Some(existing) = db::media::find_by_hash(&state.pool, &sha256)
        .await
        .map_err(internal)?
    {
        tracing::info!(
            original_name = %original_name,
            existing_file = %existing.filename,
            "Duplicate image detected, returning existing asset"
        );
        return Ok(Json(with_url(&state, existing)));
    }

    let filename = format!("{sha256}.jpg");
    let path = state.upload_dir.join(&filename);
    tokio::fs::write(&path, &compressed).await.map_err(|e| {
        tracing::error!(error = %e, path = %path.display(), "Failed to save upload");
        AppError::new(ErrorCode::FileStorageFailed)
    })?;

    let asset = MediaAsset {
        id: snowflake_id(),
        filename,
        original_name,
        mime_type: "image/jpeg".to_string(),
        size_bytes: compressed.len() as i64,
        width: img.width() as i32,
        height: img.height() as i32,
        sha256,
        alt_text: None,
        created_at: now_millis(),
        url: String::new(),
    };
    match db::media::insert(&state.pool, &asset).await {
        Ok(()) => {}
        // Same image committed by a concurrent upload
        Err(e) if is_unique_violation(&e) => {
            let existing = db::media::find_by_hash(&state.pool, &asset.sha256)
                .await
                .map_err(internal)?
                .ok_or_else(|| internal(e))?;
            tracing::info!(
                original_name = %asset.original_name,
                existing_file = %existing.filename,
                "Concurrent duplicate upload, returning existing asset"
            );
            return Ok(Json(with_url(&state, existing)));
        }
        Err(e) => return Err(internal(e)),
    }

    tracing::info!(
        id = asset.id,
        original_name = %asset.original_name,
        size = asset.size_bytes,
        "Image uploaded"
    );
    Ok(Json(with_url(&state, asset)))
}

/// GET /api/admin/media - newest first
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<MediaListQuery>,
) -> ApiResult<PaginatedResponse<MediaAsset>> {
    let page = query.page_query();
    let (assets, total) = db::media::list(&state.pool, page.limit(), page.offset())
        .await
        .map_err(internal)?;
    Ok(Json(
        PaginatedResponse::new(assets, total, page).map(|a| with_url(&state, a)),
    ))
}

pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<MediaAsset> {
    let asset = db::media::find(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::MediaNotFound))?;
    Ok(Json(with_url(&state, asset)))
}

/// PUT /api/admin/media/{id} - alt text only
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(data): Json<MediaUpdate>,
) -> ApiResult<MediaAsset> {
    if let Some(alt) = &data.alt_text {
        validate_optional_text(alt, "alt_text", MAX_SHORT_TEXT_LEN)?;
        let alt = alt.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let updated = db::media::update_alt_text(&state.pool, id, alt)
            .await
            .map_err(internal)?;
        if !updated {
            return Err(AppError::new(ErrorCode::MediaNotFound));
        }
    }
    get_by_id(State(state), Path(id)).await
}

/// Row first, then the file; a missing file is only logged
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<bool> {
    let asset = db::media::delete(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::MediaNotFound))?;

    let path = state.upload_dir.join(&asset.filename);
    if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!(error = %e, path = %path.display(), "Failed to remove media file");
    }
    tracing::info!(id, filename = %asset.filename, "Media deleted");
    Ok(Json(true))
}
