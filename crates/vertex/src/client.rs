//! Production try-on invoker backed by Vertex AI.
//!
//! [`TryOnClient`] encodes the person and garment images into the
//! documented instance shape, issues one prediction request, and
//! decodes the first prediction into a bounded JPEG. Every "no result"
//! condition maps to a distinct [`TryOnFailure`] variant.

use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use vto_core::invoker::{TryOnFailure, TryOnImage, TryOnInvoker};

use crate::api::{VertexApi, VertexApiError};
use crate::config::VertexConfig;

/// Longest edge of a decoded try-on result.
const RESULT_THUMBNAIL_EDGE: u32 = 640;

/// Safety parameters sent with every prediction request.
const SAFETY_SETTING: &str = "block_low_and_above";
const PERSON_GENERATION: &str = "allow_adult";

/// Client for the Vertex AI virtual try-on publisher model.
pub struct TryOnClient {
    api: VertexApi,
}

impl TryOnClient {
    /// Create a client for the configured endpoint.
    pub fn new(config: &VertexConfig) -> Result<Self, VertexApiError> {
        let api = VertexApi::new(config)?;
        tracing::info!(
            project_id = %config.project_id,
            location = %config.location,
            model_id = %config.model_id,
            "Vertex try-on client initialized",
        );
        Ok(Self { api })
    }
}

#[async_trait]
impl TryOnInvoker for TryOnClient {
    async fn try_on(
        &self,
        person_image: &Path,
        garment_image: &Path,
        sample_count: u8,
    ) -> Result<TryOnImage, TryOnFailure> {
        let person_b64 = image_to_base64(person_image).await?;
        let garment_b64 = image_to_base64(garment_image).await?;

        let instance = serde_json::json!({
            "personImage": { "image": { "bytesBase64Encoded": person_b64 } },
            "productImages": [{ "image": { "bytesBase64Encoded": garment_b64 } }],
        });
        let parameters = serde_json::json!({
            "sampleCount": sample_count,
            "safetySetting": SAFETY_SETTING,
            "personGeneration": PERSON_GENERATION,
        });

        tracing::info!(
            person = %person_image.display(),
            garment = %garment_image.display(),
            "Starting virtual try-on",
        );
        let start = Instant::now();

        let response = self
            .api
            .predict(&[instance], &parameters)
            .await
            .map_err(|e| match e {
                VertexApiError::Api { status, body } => {
                    TryOnFailure::Request(format!("Vertex API error ({status}): {body}"))
                }
                VertexApiError::Request(e) => TryOnFailure::Request(e.to_string()),
            })?;

        let bytes = interpret_prediction(&response.predictions)?;
        let jpeg = to_jpeg_thumbnail(&bytes)?;

        tracing::info!(
            elapsed_secs = start.elapsed().as_secs_f64(),
            "Virtual try-on completed",
        );

        Ok(TryOnImage { jpeg })
    }
}

/// Read an image file and encode it for the request payload.
async fn image_to_base64(path: &Path) -> Result<String, TryOnFailure> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| TryOnFailure::Request(format!("Failed to read {}: {e}", path.display())))?;
    Ok(BASE64.encode(bytes))
}

/// Interpret the first prediction of a response.
///
/// Distinguishes content filtering, an empty prediction list, and a
/// decodable image payload. Extra predictions beyond the first are
/// ignored.
pub fn interpret_prediction(predictions: &[serde_json::Value]) -> Result<Vec<u8>, TryOnFailure> {
    let Some(prediction) = predictions.first() else {
        return Err(TryOnFailure::NoPredictions);
    };

    if let Some(reason) = prediction.get("raiFilteredReason").and_then(|v| v.as_str()) {
        return Err(TryOnFailure::ContentFiltered {
            reason: reason.to_string(),
        });
    }

    let encoded = prediction
        .get("bytesBase64Encoded")
        .and_then(|v| v.as_str())
        .ok_or_else(|| TryOnFailure::Decode("Prediction carries no image bytes".to_string()))?;

    BASE64
        .decode(encoded)
        .map_err(|e| TryOnFailure::Decode(format!("Invalid base64 image payload: {e}")))
}

/// Decode raw image bytes, bound them to the result edge, and re-encode
/// as JPEG.
fn to_jpeg_thumbnail(bytes: &[u8]) -> Result<Vec<u8>, TryOnFailure> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| TryOnFailure::Decode(format!("Failed to decode prediction image: {e}")))?;
    let thumbnail = decoded.thumbnail(RESULT_THUMBNAIL_EDGE, RESULT_THUMBNAIL_EDGE);

    let mut jpeg = Vec::new();
    thumbnail
        .write_to(
            &mut std::io::Cursor::new(&mut jpeg),
            image::ImageFormat::Jpeg,
        )
        .map_err(|e| TryOnFailure::Decode(format!("Failed to encode result JPEG: {e}")))?;
    Ok(jpeg)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
