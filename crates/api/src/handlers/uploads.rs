//! Handlers for person image uploads.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use vto_core::naming::{has_allowed_extension, person_image_filename};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Longest edge of a stored person image.
const UPLOAD_THUMBNAIL_EDGE: u32 = 1024;

/// Response for a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub session_id: String,
    pub filename: String,
}

/// POST /api/v1/uploads
///
/// Accepts a multipart `user_image` field, downscales it to 1024px, and
/// stores it as a new session's person image. Camera captures arrive
/// with an empty or `blob` filename, so the part's content type decides
/// whether it is an image when the filename says nothing.
pub async fn create(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    let mut image_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("user_image") {
            continue;
        }

        let named_image = field
            .file_name()
            .is_some_and(|name| name != "blob" && has_allowed_extension(name));
        let typed_image = field
            .content_type()
            .is_some_and(|ct| ct.starts_with("image/"));
        if !named_image && !typed_image {
            return Err(AppError::BadRequest("Invalid file type".to_string()));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
        image_bytes = Some(bytes.to_vec());
    }

    let Some(bytes) = image_bytes else {
        return Err(AppError::BadRequest("No image file provided".to_string()));
    };

    let session_id = uuid::Uuid::new_v4().to_string();
    let filename = person_image_filename(&session_id);
    let path = state.config.uploads_dir.join(&filename);

    let jpeg = encode_person_image(&bytes)?;
    tokio::fs::write(&path, jpeg)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store upload: {e}")))?;

    tracing::info!(session_id = %session_id, filename = %filename, "Person image uploaded");

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            session_id,
            filename,
        }),
    ))
}

/// Decode an uploaded image, bound it to the upload edge, and re-encode
/// as RGB JPEG.
fn encode_person_image(bytes: &[u8]) -> Result<Vec<u8>, AppError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| AppError::BadRequest(format!("Failed to process image: {e}")))?;
    let bounded = decoded.thumbnail(UPLOAD_THUMBNAIL_EDGE, UPLOAD_THUMBNAIL_EDGE);

    let rgb = image::DynamicImage::ImageRgb8(bounded.to_rgb8());
    let mut jpeg = Vec::new();
    rgb.write_to(
        &mut std::io::Cursor::new(&mut jpeg),
        image::ImageFormat::Jpeg,
    )
    .map_err(|e| AppError::InternalError(format!("Failed to encode image: {e}")))?;
    Ok(jpeg)
}
