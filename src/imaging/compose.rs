//! Canvas assembly: scaled photo plus the text stack.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │         (white canvas)       │
//! │   ┌──────────────────────┐   │  photo: canvas width × scale,
//! │   │        photo         │   │  centered, then offset
//! │   └──────────────────────┘   │
//! │  Aperture: 2.8 | ISO: 200.0  │  ← photo bottom + 10
//! │  Day 1                       │  ← +30
//! │  Filter: retro.flt           │  ← +30
//! │  Date: 2024:06:01 09:05:07   │  ← +30
//! └──────────────────────────────┘
//! ```
//!
//! Lines are left-aligned at a fixed margin and each is drawn only when it
//! has content. Text that runs past the canvas edge is clipped.

use super::calculations::{place_image, preview_dimensions, scaled_dimensions};
use super::params::{LayoutParams, RenderOptions};
use super::typeface::Typeface;
use crate::metadata::CameraMetadata;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};

pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
pub const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// Left margin of every text line.
pub const TEXT_MARGIN_X: i32 = 30;
/// Space between the photo's bottom edge and the first line.
pub const TEXT_GAP: i64 = 10;
/// Vertical advance per line.
pub const LINE_HEIGHT: i64 = 30;

/// The lines drawn below the photo, top to bottom.
///
/// 1. camera settings (never the date)
/// 2. caption
/// 3. `Filter: <name>.flt`
/// 4. `Date: <value>`, only when `show_date` is set and a date resolved
pub fn text_lines(metadata: &CameraMetadata, options: &RenderOptions) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(summary) = metadata.summary_line() {
        lines.push(summary);
    }
    if !options.caption.is_empty() {
        lines.push(options.caption.clone());
    }
    if !options.filter.is_empty() {
        lines.push(format!("Filter: {}.flt", options.filter));
    }
    if let (true, Some(date)) = (options.show_date, &metadata.date) {
        lines.push(format!("Date: {date}"));
    }
    lines
}

/// Top edge of the `index`-th text line for a photo ending at `image_bottom`.
pub fn line_top(image_bottom: i64, index: usize) -> i64 {
    image_bottom + TEXT_GAP + index as i64 * LINE_HEIGHT
}

/// Render one framed image.
///
/// The canvas is always exactly the requested size and opaque RGB. The photo
/// may hang off any edge when the scale or offsets are extreme.
pub fn compose(
    source: &DynamicImage,
    layout: &LayoutParams,
    metadata: &CameraMetadata,
    options: &RenderOptions,
    typeface: &Typeface,
) -> RgbImage {
    let (canvas_w, canvas_h) = layout.canvas();
    let mut canvas = RgbImage::from_pixel(canvas_w, canvas_h, BACKGROUND);

    let photo = source.to_rgb8();
    let scaled = scaled_dimensions(canvas_w, layout.scale, photo.dimensions());
    let placement = place_image(layout.canvas(), scaled, layout.offset());
    let resized = imageops::resize(&photo, placement.width, placement.height, FilterType::CatmullRom);
    imageops::replace(&mut canvas, &resized, placement.x, placement.y);

    for (index, line) in text_lines(metadata, options).iter().enumerate() {
        let top = line_top(placement.bottom(), index);
        let Ok(y) = i32::try_from(top) else {
            continue;
        };
        typeface.draw(&mut canvas, TEXT_COLOR, TEXT_MARGIN_X, y, options.font_size, line);
    }

    canvas
}

/// Shrink a framed image to a fixed display width.
pub fn render_preview(framed: &RgbImage, width: u32) -> RgbImage {
    let (w, h) = preview_dimensions(framed.dimensions(), width);
    imageops::resize(framed, w, h, FilterType::Triangle)
}
