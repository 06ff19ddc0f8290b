//! Pure calculation functions for photo placement.
//!
//! All functions here are pure and testable without any I/O or images.

/// Where the scaled photo lands on the canvas.
///
/// `x`/`y` may be negative and `width`/`height` may exceed the canvas: an
/// extreme scale or offset pushes the photo partly off-canvas, which is
/// accepted rather than clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    /// First row below the photo.
    pub fn bottom(&self) -> i64 {
        self.y + i64::from(self.height)
    }
}

/// Scale a photo to a fraction of the canvas width, keeping its aspect ratio.
///
/// Width is `canvas_width × scale`, height follows the source ratio. Both
/// are truncated, and never drop below one pixel.
///
/// # Examples
/// ```
/// # use photo_framer::imaging::scaled_dimensions;
/// // 800x600 on a 1080-wide canvas at full scale → 1080x810
/// assert_eq!(scaled_dimensions(1080, 1.0, (800, 600)), (1080, 810));
/// ```
pub fn scaled_dimensions(canvas_width: u32, scale: f64, source: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let width = ((f64::from(canvas_width) * scale) as u32).max(1);
    let aspect = f64::from(src_h) / f64::from(src_w.max(1));
    let height = ((f64::from(width) * aspect) as u32).max(1);
    (width, height)
}

/// Largest edge, in pixels, of a scaled photo the compositor will allocate.
pub const MAX_SCALED_EDGE: u32 = 16_384;

/// [`scaled_dimensions`], or `None` when either edge exceeds [`MAX_SCALED_EDGE`].
///
/// Width is bounded by the canvas limit, but a very tall source at a large
/// scale can still ask for an enormous height.
pub fn checked_scaled_dimensions(
    canvas_width: u32,
    scale: f64,
    source: (u32, u32),
) -> Option<(u32, u32)> {
    let (width, height) = scaled_dimensions(canvas_width, scale, source);
    (width <= MAX_SCALED_EDGE && height <= MAX_SCALED_EDGE).then_some((width, height))
}

/// Center the scaled photo on the canvas, then shift it by the offsets.
///
/// The centered position is computed in floating point and truncated toward
/// zero after the offset is applied.
pub fn place_image(
    canvas: (u32, u32),
    scaled: (u32, u32),
    offset: (i64, i64),
) -> Placement {
    let axis = |canvas: u32, size: u32, offset: i64| -> i64 {
        ((f64::from(canvas) - f64::from(size)) / 2.0 + offset as f64) as i64
    };
    Placement {
        x: axis(canvas.0, scaled.0, offset.0),
        y: axis(canvas.1, scaled.1, offset.1),
        width: scaled.0,
        height: scaled.1,
    }
}

/// Preview size for a canvas shown at a fixed width.
pub fn preview_dimensions(canvas: (u32, u32), preview_width: u32) -> (u32, u32) {
    let (w, h) = canvas;
    let height = (u64::from(preview_width) * u64::from(h) / u64::from(w.max(1))) as u32;
    (preview_width.max(1), height.max(1))
}
