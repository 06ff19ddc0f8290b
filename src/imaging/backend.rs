//! Image codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three codec operations the framing
//! pipeline needs: decode, read_metadata, and encode. Compositing itself is
//! backend-independent and lives in [`compose`](super::compose).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend): pure Rust, statically
//! linked. Tests swap in a recording mock to exercise batch logic without
//! real codecs.

use super::params::Quality;
use crate::metadata::CameraMetadata;
use image::{DynamicImage, ImageFormat, RgbImage};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Trait for image codec backends.
///
/// `Sync` so one backend can serve every rayon worker in a batch.
pub trait ImageBackend: Sync {
    /// Decode an encoded photo (format sniffed from the bytes).
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError>;

    /// Read camera metadata from the embedded EXIF block.
    ///
    /// Infallible: a missing or malformed block yields an empty record.
    fn read_metadata(&self, bytes: &[u8]) -> CameraMetadata;

    /// Encode a finished canvas.
    fn encode(
        &self,
        canvas: &RgbImage,
        format: ImageFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, BackendError>;
}
