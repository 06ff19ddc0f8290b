//! # Photo Framer
//!
//! Frames photos on fixed-size social media canvases. Each photo is scaled
//! onto a white canvas and a short text stack is drawn under it: camera
//! settings read from EXIF, a caption, a filter label, and a date stamp.
//! One photo exports as a single image; several export as a zip archive.
//!
//! # Architecture: One Pipeline Per Photo
//!
//! Every photo runs through the same independent steps:
//!
//! ```text
//! 1. Extract   bytes     →  CameraMetadata   (EXIF, soft failure)
//! 2. Resolve   metadata  →  CameraMetadata   (manual overrides, date policy)
//! 3. Compose   photo     →  RgbImage         (canvas, placement, text)
//! 4. Encode    canvas    →  bytes            (format from the input extension)
//! ```
//!
//! Steps 1 and 2 are pure data transformations, step 3 is a pure function
//! from pixels and parameters to pixels, and only step 4 depends on the
//! output format. The [`export`] module runs the pipeline once per photo
//! and packages the results.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Layered `config.toml` loading, validation, canvas presets |
//! | [`metadata`] | Camera metadata model, display formatting, resolution policy |
//! | [`imaging`] | EXIF extraction, layout math, compositing, codecs |
//! | [`naming`] | Output filenames, encoder formats, mime types |
//! | [`export`] | Per-photo pipeline, parallel batch, zip archive, report |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Soft EXIF, Hard Codecs
//!
//! Missing, truncated, or malformed EXIF never stops a photo from being
//! framed; it only leaves the metadata line empty. A photo that cannot be
//! decoded or encoded does fail. In a batch that failure is isolated to the
//! photo: it is left out of the archive and listed in the [`export::ExportReport`].
//!
//! ## Deterministic Output
//!
//! Given the same bytes and config, the framed pixels are identical, with one
//! deliberate exception: the `from-creation-time` date policy stamps the
//! moment of rendering.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resizing, text, and encoding all use the `image` ecosystem
//! (`image`, `imageproc`, `ab_glyph`), and EXIF is read with `kamadak-exif`.
//! The binary needs no system libraries. When no font file is configured or
//! it fails to load, text is drawn with an embedded 8x8 bitmap font.

pub mod config;
pub mod export;
pub mod imaging;
pub mod metadata;
pub mod naming;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;

/// Canned promotional caption offered to users alongside the framed photos.
pub const PROMO_CAPTION: &str =
    "Shot on my Camp Snap and framed with Camp Snap Framer from [campsnaptools.com] #campsnaptools";
