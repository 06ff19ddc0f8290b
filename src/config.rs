//! Framer configuration.
//!
//! Handles loading, validating, and layering `config.toml`. Settings come
//! from three layers, each overriding the one before:
//!
//! ```text
//! stock defaults  →  config.toml (optional)  →  CLI flags
//! ```
//!
//! Layers are merged as raw TOML values ([`merge_toml`]) and only then
//! deserialized and validated ([`resolve_config`]), so a sparse file or a
//! single flag overrides just the keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! [canvas]
//! preset = "square"          # instagram-landscape | instagram-portrait | instagram-story | square
//! # size = [1200, 1500]      # explicit canvas size (max 8192), overrides preset
//!
//! [layout]
//! scale = 1.0                # 0.2 - 2.0, fraction of the canvas width
//! x_offset = 0               # pixels, within ±canvas width / 2
//! y_offset = 0               # pixels, within ±canvas height / 2
//!
//! [metadata]
//! extract = true             # read EXIF from each photo
//! date_source = "none"       # none | from-metadata | from-creation-time
//!
//! [metadata.manual]          # non-empty entries override EXIF values
//! aperture = ""
//! shutter_speed = ""
//! iso = ""
//! focal_length = ""
//! date = ""                  # YYYY:MM:DD HH:MM:SS
//!
//! [text]
//! caption = ""
//! filter = ""
//! # font = "fonts/Inter.ttf" # omit for the built-in bitmap font
//! font_size = 24
//!
//! [output]
//! jpeg_quality = 90
//!
//! [processing]
//! # max_processes = 4       # omit for auto = CPU cores
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{LayoutParams, Quality, RenderOptions};
use crate::metadata::{DateSource, ManualMetadata, is_valid_timestamp};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

pub const MIN_SCALE: f64 = 0.2;
pub const MAX_SCALE: f64 = 2.0;
/// Largest canvas edge, in pixels.
pub const MAX_CANVAS_EDGE: u32 = 8192;

/// Framer configuration loaded from `config.toml` and CLI flags.
///
/// All fields have defaults matching the stock config. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FramerConfig {
    /// Output canvas size.
    pub canvas: CanvasConfig,
    /// Scale and offset of the photo on the canvas.
    pub layout: LayoutConfig,
    /// EXIF extraction, date policy, and manual overrides.
    pub metadata: MetadataConfig,
    /// Caption, filter label, and font.
    pub text: TextConfig,
    /// Encoder settings.
    pub output: OutputConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl FramerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = self.canvas.dimensions();
        if width == 0 || height == 0 {
            return Err(ConfigError::Validation(
                "canvas.size values must be non-zero".into(),
            ));
        }
        if width > MAX_CANVAS_EDGE || height > MAX_CANVAS_EDGE {
            return Err(ConfigError::Validation(format!(
                "canvas.size values must be at most {MAX_CANVAS_EDGE}, got {width}x{height}"
            )));
        }
        let scale = self.layout.scale;
        if !scale.is_finite() || !(MIN_SCALE..=MAX_SCALE).contains(&scale) {
            return Err(ConfigError::Validation(format!(
                "layout.scale must be between {MIN_SCALE} and {MAX_SCALE}, got {scale}"
            )));
        }
        let half_w = u64::from(width / 2);
        let half_h = u64::from(height / 2);
        if self.layout.x_offset.unsigned_abs() > half_w {
            return Err(ConfigError::Validation(format!(
                "layout.x_offset must be within ±{half_w}"
            )));
        }
        if self.layout.y_offset.unsigned_abs() > half_h {
            return Err(ConfigError::Validation(format!(
                "layout.y_offset must be within ±{half_h}"
            )));
        }
        let date = self.metadata.manual.date.trim();
        if !date.is_empty() && !is_valid_timestamp(date) {
            return Err(ConfigError::Validation(format!(
                "metadata.manual.date must look like YYYY:MM:DD HH:MM:SS, got {date:?}"
            )));
        }
        if !(1..=100).contains(&self.output.jpeg_quality) {
            return Err(ConfigError::Validation(
                "output.jpeg_quality must be 1-100".into(),
            ));
        }
        if self.text.font_size == 0 {
            return Err(ConfigError::Validation(
                "text.font_size must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Canvas size, scale, and offsets for the compositor.
    pub fn layout_params(&self) -> LayoutParams {
        let (canvas_width, canvas_height) = self.canvas.dimensions();
        LayoutParams {
            canvas_width,
            canvas_height,
            scale: self.layout.scale,
            x_offset: self.layout.x_offset,
            y_offset: self.layout.y_offset,
        }
    }

    /// Text lines and font settings for the compositor.
    ///
    /// The date line is shown whenever a date policy other than `none` is
    /// selected, for single and batch exports alike.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            caption: self.text.caption.clone(),
            filter: self.text.filter.clone(),
            show_date: self.metadata.date_source != DateSource::None,
            font: self.text.font.clone(),
            font_size: self.text.font_size,
        }
    }

    pub fn quality(&self) -> Quality {
        Quality::new(self.output.jpeg_quality)
    }
}

// =============================================================================
// Canvas
// =============================================================================

/// Fixed canvas sizes offered for social media posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CanvasPreset {
    InstagramLandscape,
    InstagramPortrait,
    InstagramStory,
    #[default]
    Square,
}

impl CanvasPreset {
    pub const ALL: [CanvasPreset; 4] = [
        CanvasPreset::InstagramLandscape,
        CanvasPreset::InstagramPortrait,
        CanvasPreset::InstagramStory,
        CanvasPreset::Square,
    ];

    /// Canvas size in pixels as `(width, height)`.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            CanvasPreset::InstagramLandscape => (1080, 566),
            CanvasPreset::InstagramPortrait => (1080, 1350),
            CanvasPreset::InstagramStory => (1080, 1920),
            CanvasPreset::Square => (1080, 1080),
        }
    }

    /// Config and CLI name, e.g. `instagram-story`.
    pub fn name(self) -> &'static str {
        match self {
            CanvasPreset::InstagramLandscape => "instagram-landscape",
            CanvasPreset::InstagramPortrait => "instagram-portrait",
            CanvasPreset::InstagramStory => "instagram-story",
            CanvasPreset::Square => "square",
        }
    }

    /// Human label, e.g. `Instagram Story (1080x1920)`.
    pub fn label(self) -> String {
        let title = match self {
            CanvasPreset::InstagramLandscape => "Instagram Landscape",
            CanvasPreset::InstagramPortrait => "Instagram Portrait",
            CanvasPreset::InstagramStory => "Instagram Story",
            CanvasPreset::Square => "Square",
        };
        let (w, h) = self.dimensions();
        format!("{title} ({w}x{h})")
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    /// Named canvas size.
    pub preset: CanvasPreset,
    /// Explicit `[width, height]`; takes precedence over `preset`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<[u32; 2]>,
}

impl CanvasConfig {
    pub fn dimensions(&self) -> (u32, u32) {
        match self.size {
            Some([w, h]) => (w, h),
            None => self.preset.dimensions(),
        }
    }
}

// =============================================================================
// Layout, metadata, text, output
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Photo width as a fraction of the canvas width.
    pub scale: f64,
    /// Horizontal displacement from center, in pixels.
    pub x_offset: i64,
    /// Vertical displacement from center, in pixels.
    pub y_offset: i64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            x_offset: 0,
            y_offset: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetadataConfig {
    /// Read camera settings from each photo's EXIF block.
    pub extract: bool,
    /// Where the date stamp comes from.
    pub date_source: DateSource,
    /// Hand-entered values; non-empty entries beat extracted ones.
    pub manual: ManualMetadata,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            extract: true,
            date_source: DateSource::None,
            manual: ManualMetadata::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextConfig {
    pub caption: String,
    pub filter: String,
    /// TTF/OTF file for the text lines. Falls back to a built-in font.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<PathBuf>,
    /// Glyph height in pixels.
    pub font_size: u32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            caption: String::new(),
            filter: String::new(),
            font: None,
            font_size: 24,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub jpeg_quality: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: Quality::default().value(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel framing workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer that file and CLI overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(FramerConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge overlays in order onto the stock defaults, then deserialize and validate.
pub fn resolve_config(
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<FramerConfig, ConfigError> {
    let merged = overlays
        .into_iter()
        .fold(stock_defaults_value(), merge_toml);
    let config: FramerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a `config.toml` file on top of stock defaults.
pub fn load_config(path: &Path) -> Result<FramerConfig, ConfigError> {
    resolve_config([load_raw_config(path)?])
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Photo Framer Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. CLI flags override this file.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Canvas
# ---------------------------------------------------------------------------
[canvas]
# One of: instagram-landscape (1080x566), instagram-portrait (1080x1350),
# instagram-story (1080x1920), square (1080x1080).
preset = "square"
# Explicit [width, height] in pixels (each 1 - 8192); overrides the preset when set.
# size = [1200, 1500]

# ---------------------------------------------------------------------------
# Photo placement
# ---------------------------------------------------------------------------
[layout]
# Photo width as a fraction of the canvas width (0.2 - 2.0).
# Height follows the photo's aspect ratio.
scale = 1.0
# Displacement from the centered position, in pixels.
# Bounded by half the canvas width / height.
x_offset = 0
y_offset = 0

# ---------------------------------------------------------------------------
# Camera metadata
# ---------------------------------------------------------------------------
[metadata]
# Read aperture, shutter speed, ISO, focal length and capture date from EXIF.
extract = true
# Date stamp source: "none", "from-metadata" (EXIF or manual date),
# or "from-creation-time" (the moment the frame is rendered).
date_source = "none"

# Manual values. Non-empty entries replace whatever EXIF provided.
[metadata.manual]
aperture = ""
shutter_speed = ""
iso = ""
focal_length = ""
# YYYY:MM:DD HH:MM:SS
date = ""

# ---------------------------------------------------------------------------
# Text below the photo
# ---------------------------------------------------------------------------
[text]
caption = ""
# Rendered as "Filter: <name>.flt".
filter = ""
# Path to a TTF/OTF font. Omit to use the built-in bitmap font.
# font = "fonts/Inter-Regular.ttf"
font_size = 24

# ---------------------------------------------------------------------------
# Encoding
# ---------------------------------------------------------------------------
[output]
# JPEG quality (1 = worst, 100 = best). Other formats are lossless.
jpeg_quality = 90

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel framing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_square_full_width() {
        let config = FramerConfig::default();
        assert_eq!(config.canvas.dimensions(), (1080, 1080));
        assert_eq!(config.layout.scale, 1.0);
        assert_eq!(config.layout.x_offset, 0);
        assert!(config.metadata.extract);
        assert_eq!(config.metadata.date_source, DateSource::None);
        assert_eq!(config.text.font_size, 24);
        assert_eq!(config.output.jpeg_quality, 90);
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(FramerConfig::default().validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[canvas]
preset = "instagram-story"

[text]
caption = "Day 1"
"#;
        let config: FramerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.canvas.dimensions(), (1080, 1920));
        assert_eq!(config.text.caption, "Day 1");
        // Unspecified defaults preserved
        assert_eq!(config.layout.scale, 1.0);
        assert!(config.metadata.extract);
    }

    #[test]
    fn explicit_size_overrides_preset() {
        let toml = r#"
[canvas]
preset = "instagram-story"
size = [640, 480]
"#;
        let config: FramerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.canvas.dimensions(), (640, 480));
    }

    #[test]
    fn parse_manual_metadata_and_date_source() {
        let toml = r#"
[metadata]
extract = false
date_source = "from-creation-time"

[metadata.manual]
aperture = "4.0"
iso = "400"
"#;
        let config: FramerConfig = toml::from_str(toml).unwrap();
        assert!(!config.metadata.extract);
        assert_eq!(config.metadata.date_source, DateSource::FromCreationTime);
        assert_eq!(config.metadata.manual.aperture, "4.0");
        assert_eq!(config.metadata.manual.iso, "400");
        assert_eq!(config.metadata.manual.shutter_speed, "");
    }

    // =========================================================================
    // Presets
    // =========================================================================

    #[test]
    fn preset_table() {
        assert_eq!(CanvasPreset::InstagramLandscape.dimensions(), (1080, 566));
        assert_eq!(CanvasPreset::InstagramPortrait.dimensions(), (1080, 1350));
        assert_eq!(CanvasPreset::InstagramStory.dimensions(), (1080, 1920));
        assert_eq!(CanvasPreset::Square.dimensions(), (1080, 1080));
    }

    #[test]
    fn preset_label_includes_size() {
        assert_eq!(CanvasPreset::Square.label(), "Square (1080x1080)");
        assert_eq!(
            CanvasPreset::InstagramLandscape.label(),
            "Instagram Landscape (1080x566)"
        );
    }

    #[test]
    fn preset_names_roundtrip() {
        for preset in CanvasPreset::ALL {
            assert_eq!(CanvasPreset::from_name(preset.name()), Some(preset));
        }
        assert_eq!(CanvasPreset::from_name("panorama"), None);
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_zero_canvas() {
        let mut config = FramerConfig::default();
        config.canvas.size = Some([0, 1080]);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_canvas_upper_bound() {
        let mut config = FramerConfig::default();
        config.canvas.size = Some([MAX_CANVAS_EDGE, MAX_CANVAS_EDGE]);
        assert!(config.validate().is_ok());
        config.canvas.size = Some([100_000, 100_000]);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_scale_bounds() {
        let mut config = FramerConfig::default();
        config.layout.scale = 0.2;
        assert!(config.validate().is_ok());
        config.layout.scale = 2.0;
        assert!(config.validate().is_ok());
        config.layout.scale = 0.1;
        assert!(config.validate().is_err());
        config.layout.scale = 2.5;
        assert!(config.validate().is_err());
        config.layout.scale = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_offsets_bounded_by_half_canvas() {
        let mut config = FramerConfig::default();
        config.layout.x_offset = -540;
        config.layout.y_offset = 540;
        assert!(config.validate().is_ok());
        config.layout.x_offset = 541;
        assert!(config.validate().is_err());

        let mut config = FramerConfig::default();
        config.canvas.preset = CanvasPreset::InstagramLandscape;
        config.layout.y_offset = -284;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_extreme_offsets_rejected() {
        let mut config = FramerConfig::default();
        config.layout.x_offset = i64::MIN;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = FramerConfig::default();
        config.layout.y_offset = i64::MIN;
        assert!(config.validate().is_err());
        config.layout.y_offset = i64::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_manual_date_format() {
        let mut config = FramerConfig::default();
        config.metadata.manual.date = "2024:06:01 12:30:00".into();
        assert!(config.validate().is_ok());
        config.metadata.manual.date = "June 1st".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_jpeg_quality() {
        let mut config = FramerConfig::default();
        config.output.jpeg_quality = 0;
        assert!(config.validate().is_err());
        config.output.jpeg_quality = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<FramerConfig, _> = toml::from_str("[layout]\nzoom = 2.0\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_preset_rejected() {
        let result: Result<FramerConfig, _> = toml::from_str("[canvas]\npreset = \"a4\"\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Derived parameters
    // =========================================================================

    #[test]
    fn show_date_follows_date_source() {
        let mut config = FramerConfig::default();
        assert!(!config.render_options().show_date);
        config.metadata.date_source = DateSource::FromMetadata;
        assert!(config.render_options().show_date);
        config.metadata.date_source = DateSource::FromCreationTime;
        assert!(config.render_options().show_date);
    }

    #[test]
    fn layout_params_from_config() {
        let mut config = FramerConfig::default();
        config.canvas.preset = CanvasPreset::InstagramPortrait;
        config.layout.scale = 0.5;
        config.layout.y_offset = -20;
        let layout = config.layout_params();
        assert_eq!((layout.canvas_width, layout.canvas_height), (1080, 1350));
        assert_eq!(layout.scale, 0.5);
        assert_eq!(layout.y_offset, -20);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        assert_eq!(effective_threads(&config), cores);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }

    // =========================================================================
    // Loading and merging
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str("[layout]\nscale = 1.0\nx_offset = 5").unwrap();
        let overlay: toml::Value = toml::from_str("[layout]\nscale = 0.5").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["layout"]["scale"].as_float(), Some(0.5));
        assert_eq!(merged["layout"]["x_offset"].as_integer(), Some(5));
    }

    #[test]
    fn resolve_config_layers_in_order() {
        let file: toml::Value =
            toml::from_str("[layout]\nscale = 0.5\n[text]\ncaption = \"from file\"").unwrap();
        let flags: toml::Value = toml::from_str("[text]\ncaption = \"from flag\"").unwrap();
        let config = resolve_config([file, flags]).unwrap();
        assert_eq!(config.layout.scale, 0.5);
        assert_eq!(config.text.caption, "from flag");
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let overlay: toml::Value = toml::from_str("[layout]\nscale = 5.0").unwrap();
        assert!(matches!(
            resolve_config([overlay]),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[canvas]\npreset = \"instagram-portrait\"\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.canvas.dimensions(), (1080, 1350));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(&tmp.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let parsed: FramerConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = FramerConfig::default();
        assert_eq!(parsed.canvas.dimensions(), defaults.canvas.dimensions());
        assert_eq!(parsed.layout.scale, defaults.layout.scale);
        assert_eq!(parsed.metadata.extract, defaults.metadata.extract);
        assert_eq!(parsed.metadata.date_source, defaults.metadata.date_source);
        assert_eq!(parsed.metadata.manual, defaults.metadata.manual);
        assert_eq!(parsed.text.font, defaults.text.font);
        assert_eq!(parsed.text.font_size, defaults.text.font_size);
        assert_eq!(parsed.output.jpeg_quality, defaults.output.jpeg_quality);
        assert_eq!(
            parsed.processing.max_processes,
            defaults.processing.max_processes
        );
    }

    #[test]
    fn stock_defaults_value_is_table() {
        let value = stock_defaults_value();
        assert!(value.is_table());
        assert!(value.get("canvas").is_some());
        assert!(value.get("metadata").is_some());
    }
}
