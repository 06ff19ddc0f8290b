//! Camera metadata model and resolution.
//!
//! Each framed photo carries up to five camera attributes: aperture, shutter
//! speed, ISO, focal length, and a capture date. They come from three
//! independent sources:
//!
//! - **Extracted**: the photo's EXIF block (see [`crate::imaging::exif`]).
//! - **Manual**: values typed into `[metadata.manual]` or passed as CLI flags.
//! - **Date policy**: [`DateSource`], which may replace or clear the date.
//!
//! ## Resolution priority
//!
//! [`resolve`] applies the sources in a fixed order, later steps winning:
//!
//! ```text
//! 1. extracted (empty when extraction is disabled)
//! 2. manual    (non-empty entries only)
//! 3. date policy, unconditionally:
//!      from-creation-time → Date = now
//!      none               → Date removed
//!      from-metadata      → Date untouched
//! ```
//!
//! Manual values beat EXIF, but the date policy beats a manual date.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `strftime` pattern of EXIF timestamps: `YYYY:MM:DD HH:MM:SS`.
pub const TIMESTAMP_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Whether `value` is a well-formed `YYYY:MM:DD HH:MM:SS` timestamp.
pub fn is_valid_timestamp(value: &str) -> bool {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).is_ok()
}

/// Format a wall-clock time the way EXIF stores it.
pub fn format_timestamp(time: NaiveDateTime) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// A single non-date metadata value.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    /// Decimal rounded to two places.
    Number(f64),
    /// Ratio that could not be converted (zero denominator), kept as stored.
    Ratio { num: i64, denom: i64 },
    /// Free text, e.g. a manual override.
    Text(String),
}

impl MetaValue {
    /// Convert a ratio to a decimal rounded to two places.
    ///
    /// A zero denominator keeps the raw ratio instead of failing.
    pub fn from_ratio(num: i64, denom: i64) -> Self {
        if denom == 0 {
            return MetaValue::Ratio { num, denom };
        }
        Self::number(num as f64 / denom as f64)
    }

    /// A decimal rounded to two places; non-finite input is kept as text.
    pub fn number(value: f64) -> Self {
        if !value.is_finite() {
            return MetaValue::Text(value.to_string());
        }
        MetaValue::Number(round2(value))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl fmt::Display for MetaValue {
    /// Numbers keep at least one decimal: `2.8`, `100.0`, `0.01`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Number(n) => {
                let text = format!("{n:.2}");
                let trimmed = text.trim_end_matches('0');
                if trimmed.ends_with('.') {
                    write!(f, "{trimmed}0")
                } else {
                    write!(f, "{trimmed}")
                }
            }
            MetaValue::Ratio { num, denom } => write!(f, "{num}/{denom}"),
            MetaValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// The four camera settings shown on the metadata line, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaField {
    Aperture,
    ShutterSpeed,
    Iso,
    FocalLength,
}

impl MetaField {
    pub const ALL: [MetaField; 4] = [
        MetaField::Aperture,
        MetaField::ShutterSpeed,
        MetaField::Iso,
        MetaField::FocalLength,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MetaField::Aperture => "Aperture",
            MetaField::ShutterSpeed => "Shutter Speed",
            MetaField::Iso => "ISO",
            MetaField::FocalLength => "Focal Length",
        }
    }
}

/// Resolved camera attributes for one photo.
///
/// Absent fields are `None`; they are never stored as zero or empty text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraMetadata {
    pub aperture: Option<MetaValue>,
    pub shutter_speed: Option<MetaValue>,
    pub iso: Option<MetaValue>,
    pub focal_length: Option<MetaValue>,
    /// `YYYY:MM:DD HH:MM:SS`, as stored in the source.
    pub date: Option<String>,
}

impl CameraMetadata {
    pub fn get(&self, field: MetaField) -> Option<&MetaValue> {
        match field {
            MetaField::Aperture => self.aperture.as_ref(),
            MetaField::ShutterSpeed => self.shutter_speed.as_ref(),
            MetaField::Iso => self.iso.as_ref(),
            MetaField::FocalLength => self.focal_length.as_ref(),
        }
    }

    pub fn set(&mut self, field: MetaField, value: MetaValue) {
        let slot = match field {
            MetaField::Aperture => &mut self.aperture,
            MetaField::ShutterSpeed => &mut self.shutter_speed,
            MetaField::Iso => &mut self.iso,
            MetaField::FocalLength => &mut self.focal_length,
        };
        *slot = Some(value);
    }

    pub fn is_empty(&self) -> bool {
        MetaField::ALL.iter().all(|f| self.get(*f).is_none()) && self.date.is_none()
    }

    /// `Key: Value` pairs for every present non-date field, joined by ` | `.
    ///
    /// A number that rounds to zero (e.g. a 1/250 exposure) is left out.
    /// Returns `None` when no field remains. The date never appears here; it
    /// has its own line.
    pub fn summary_line(&self) -> Option<String> {
        let pairs: Vec<String> = MetaField::ALL
            .iter()
            .filter_map(|field| {
                self.get(*field)
                    .filter(|value| !matches!(value, MetaValue::Number(n) if *n == 0.0))
                    .map(|value| format!("{}: {}", field.label(), value))
            })
            .collect();
        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join(" | "))
        }
    }
}

/// How the date field is populated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateSource {
    /// No date stamp; any extracted or manual date is dropped.
    #[default]
    None,
    /// Keep the date from EXIF or the manual override.
    #[serde(alias = "exif")]
    FromMetadata,
    /// Stamp the moment the frame is rendered.
    FromCreationTime,
}

/// Hand-entered metadata. Empty strings mean "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManualMetadata {
    pub aperture: String,
    pub shutter_speed: String,
    pub iso: String,
    pub focal_length: String,
    pub date: String,
}

impl ManualMetadata {
    fn get(&self, field: MetaField) -> &str {
        match field {
            MetaField::Aperture => &self.aperture,
            MetaField::ShutterSpeed => &self.shutter_speed,
            MetaField::Iso => &self.iso,
            MetaField::FocalLength => &self.focal_length,
        }
    }
}

/// Merge extracted metadata, manual overrides, and the date policy.
///
/// `now` is only read for [`DateSource::FromCreationTime`].
pub fn resolve(
    extracted: CameraMetadata,
    manual: &ManualMetadata,
    date_source: DateSource,
    now: NaiveDateTime,
) -> CameraMetadata {
    let mut meta = extracted;

    for field in MetaField::ALL {
        let value = manual.get(field).trim();
        if !value.is_empty() {
            meta.set(field, MetaValue::Text(value.to_string()));
        }
    }
    let manual_date = manual.date.trim();
    if !manual_date.is_empty() {
        meta.date = Some(manual_date.to_string());
    }

    match date_source {
        DateSource::FromCreationTime => meta.date = Some(format_timestamp(now)),
        DateSource::None => meta.date = None,
        DateSource::FromMetadata => {}
    }

    meta
}
