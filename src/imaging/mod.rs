//! Image processing: decode, extract EXIF, composite, encode.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** (JPEG, PNG, TIFF, WebP) | `image::load_from_memory` |
//! | **EXIF camera settings** | `kamadak-exif` reader over the raw bytes |
//! | **Scale + paste** | `imageops::resize` (Catmull-Rom) + `imageops::replace` |
//! | **Text** | `imageproc::drawing::draw_text_mut`, or embedded `font8x8` glyphs |
//! | **Encode** | `JpegEncoder` with quality, lossless `write_to` otherwise |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for placement math (unit testable)
//! - **Parameters**: Layout and render settings handed to the compositor
//! - **Compose**: Canvas assembly and the text stack
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
pub mod compose;
pub mod exif;
mod params;
pub mod rust_backend;
pub mod typeface;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{
    MAX_SCALED_EDGE, Placement, checked_scaled_dimensions, place_image, preview_dimensions,
    scaled_dimensions,
};
pub use compose::{compose, render_preview, text_lines};
pub use params::{LayoutParams, Quality, RenderOptions};
pub use rust_backend::RustBackend;
pub use typeface::Typeface;
