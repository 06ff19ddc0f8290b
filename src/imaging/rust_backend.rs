//! Pure Rust codec backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::load_from_memory` |
//! | EXIF | `kamadak-exif`, via [`super::exif`] |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with quality |
//! | Encode → PNG, TIFF, WebP | `ImageBuffer::write_to` (lossless) |

use super::backend::{BackendError, ImageBackend};
use super::params::Quality;
use crate::metadata::CameraMetadata;
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError> {
        image::load_from_memory(bytes).map_err(|e| BackendError::Decode(e.to_string()))
    }

    fn read_metadata(&self, bytes: &[u8]) -> CameraMetadata {
        super::exif::extract_metadata(bytes)
    }

    fn encode(
        &self,
        canvas: &RgbImage,
        format: ImageFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, BackendError> {
        let mut buf = Cursor::new(Vec::new());
        let result = match format {
            ImageFormat::Jpeg => {
                let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                    &mut buf,
                    quality.value() as u8,
                );
                canvas.write_with_encoder(encoder)
            }
            other => canvas.write_to(&mut buf, other),
        };
        result.map_err(|e| BackendError::Encode(format!("{format:?}: {e}")))?;
        Ok(buf.into_inner())
    }
}
