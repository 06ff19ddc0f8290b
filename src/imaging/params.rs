//! Parameter types for framing.
//!
//! These structs describe *what* to draw, not *how*. They are built once per
//! request from [`FramerConfig`](crate::config::FramerConfig) and shared
//! read-only by every photo in a batch.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`LayoutParams`]: Canvas size, photo scale, and pixel offsets.
//! - [`RenderOptions`]: Caption, filter label, date toggle, and font settings.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Canvas geometry and photo placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Photo width as a fraction of the canvas width.
    pub scale: f64,
    pub x_offset: i64,
    pub y_offset: i64,
}

impl LayoutParams {
    pub fn canvas(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    pub fn offset(&self) -> (i64, i64) {
        (self.x_offset, self.y_offset)
    }
}

/// What to write below the photo.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Free-text caption; skipped when empty.
    pub caption: String,
    /// Filter name, rendered as `Filter: <name>.flt`; skipped when empty.
    pub filter: String,
    /// Draw the `Date:` line when the metadata has a date.
    pub show_date: bool,
    /// Outline font file; `None` selects the built-in bitmap font.
    pub font: Option<PathBuf>,
    /// Glyph height in pixels.
    pub font_size: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            caption: String::new(),
            filter: String::new(),
            show_date: false,
            font: None,
            font_size: 24,
        }
    }
}
