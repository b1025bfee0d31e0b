//! The try-on invoker seam.
//!
//! The batch coordinator depends only on this trait; the production
//! implementation lives in `vto-vertex` and tests substitute scripted
//! mocks.

use std::path::Path;

use async_trait::async_trait;

/// A generated try-on result, re-encoded as JPEG bytes.
#[derive(Debug, Clone)]
pub struct TryOnImage {
    pub jpeg: Vec<u8>,
}

/// Why a single try-on invocation produced no image.
///
/// The remote service folds several distinct conditions into "no
/// result"; they are kept apart here so recorded item errors say what
/// actually happened.
#[derive(Debug, thiserror::Error)]
pub enum TryOnFailure {
    /// The service refused to generate for safety reasons.
    #[error("Content filtered by the service: {reason}")]
    ContentFiltered { reason: String },

    /// The service answered successfully but returned no predictions.
    #[error("No predictions returned")]
    NoPredictions,

    /// The returned prediction could not be decoded into an image.
    #[error("Failed to decode prediction: {0}")]
    Decode(String),

    /// The request itself failed (I/O, transport, non-2xx response).
    #[error("Try-on request failed: {0}")]
    Request(String),
}

/// One remote try-on call combining a person image with a garment image.
#[async_trait]
pub trait TryOnInvoker: Send + Sync {
    /// Generate a try-on image, or report why none was produced.
    ///
    /// May take seconds to tens of seconds; implementations are expected
    /// to bound the call with their own request timeout.
    async fn try_on(
        &self,
        person_image: &Path,
        garment_image: &Path,
        sample_count: u8,
    ) -> Result<TryOnImage, TryOnFailure>;
}
