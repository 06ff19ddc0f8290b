//! Fonts for the text stack below the photo.
//!
//! An outline font file (TTF/OTF) is rendered through `imageproc` +
//! `ab_glyph`. When no file is configured, or the file cannot be read or
//! parsed, rendering falls back to the 8×8 bitmap glyphs embedded by
//! `font8x8`, scaled up by whole pixels. Font trouble never fails a render.

use ab_glyph::{FontVec, InvalidFont, PxScale};
use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum FontError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a usable font: {0}")]
    Invalid(#[from] InvalidFont),
}

/// A loaded font, shared read-only across a batch.
pub enum Typeface {
    Outline(FontVec),
    Bitmap,
}

impl Typeface {
    /// Load the configured font, or fall back to the built-in bitmap font.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Typeface::Bitmap;
        };
        match Self::load_outline(path) {
            Ok(font) => {
                debug!(path = %path.display(), "loaded font");
                Typeface::Outline(font)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "font unavailable, using built-in font");
                Typeface::Bitmap
            }
        }
    }

    fn load_outline(path: &Path) -> Result<FontVec, FontError> {
        let data = std::fs::read(path)?;
        Ok(FontVec::try_from_vec(data)?)
    }

    pub fn is_bitmap(&self) -> bool {
        matches!(self, Typeface::Bitmap)
    }

    /// Draw `text` with its top-left corner at `(x, y)`. Pixels outside the
    /// canvas are clipped.
    pub fn draw(&self, canvas: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, size: u32, text: &str) {
        match self {
            Typeface::Outline(font) => {
                imageproc::drawing::draw_text_mut(
                    canvas,
                    color,
                    x,
                    y,
                    PxScale::from(size as f32),
                    font,
                    text,
                );
            }
            Typeface::Bitmap => draw_bitmap_text(canvas, color, x, y, size, text),
        }
    }
}

/// Side of one bitmap "pixel" for a requested glyph height.
///
/// The 8×8 cell is drawn with whole-pixel blocks, so 24px text uses 2×2
/// blocks (16px glyphs) and keeps room between lines.
pub(crate) fn bitmap_cell(size: u32) -> u32 {
    (size / 12).max(1)
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn draw_bitmap_text(canvas: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, size: u32, text: &str) {
    let cell = i64::from(bitmap_cell(size));
    let (width, height) = (i64::from(canvas.width()), i64::from(canvas.height()));
    let mut pen_x = i64::from(x);
    let top = i64::from(y);

    for c in text.chars() {
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..8 {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let block_x = pen_x + col * cell;
                let block_y = top + row as i64 * cell;
                for py in block_y.max(0)..(block_y + cell).min(height) {
                    for px in block_x.max(0)..(block_x + cell).min(width) {
                        canvas.put_pixel(px as u32, py as u32, color);
                    }
                }
            }
        }
        pen_x += 8 * cell;
        if pen_x >= width {
            break;
        }
    }
}
