//! EXIF camera-settings extraction.
//!
//! Reads the embedded EXIF block of a JPEG, PNG, TIFF, or WebP file with
//! `kamadak-exif` and maps five tags onto [`CameraMetadata`]:
//!
//! | Field | EXIF tag | Conversion |
//! |---|---|---|
//! | Aperture | `FNumber` (0x829D) | ratio → 2-decimal real |
//! | Shutter speed | `ExposureTime` (0x829A) | ratio → 2-decimal real |
//! | ISO | `PhotographicSensitivity` (0x8827) | integer → 2-decimal real |
//! | Focal length | `FocalLength` (0x920A) | ratio → 2-decimal real |
//! | Date | `DateTimeOriginal` (0x9003) | text, unchanged |
//!
//! Extraction never fails the caller. A missing or unreadable block yields an
//! empty record; a single malformed tag is skipped while the rest are kept.

use crate::metadata::{CameraMetadata, MetaField, MetaValue, is_valid_timestamp};
use exif::{Exif, In, Reader, Tag, Value};
use std::io::Cursor;
use thiserror::Error;
use tracing::debug;

/// Why a photo's EXIF block could not be read.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("no EXIF block")]
    MissingBlock,
    #[error("malformed EXIF block: {0}")]
    Malformed(exif::Error),
}

/// Extract camera metadata, degrading to an empty record on any read failure.
pub fn extract_metadata(bytes: &[u8]) -> CameraMetadata {
    match read_camera_metadata(bytes) {
        Ok(meta) => meta,
        Err(err) => {
            debug!(error = %err, "no camera metadata");
            CameraMetadata::default()
        }
    }
}

/// Parse the EXIF block and map the recognized tags.
pub fn read_camera_metadata(bytes: &[u8]) -> Result<CameraMetadata, ExtractError> {
    let exif = Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .map_err(|err| match err {
            exif::Error::NotFound(_) => ExtractError::MissingBlock,
            other => ExtractError::Malformed(other),
        })?;
    Ok(camera_metadata(&exif))
}

const NUMERIC_TAGS: [(MetaField, Tag); 4] = [
    (MetaField::Aperture, Tag::FNumber),
    (MetaField::ShutterSpeed, Tag::ExposureTime),
    (MetaField::Iso, Tag::PhotographicSensitivity),
    (MetaField::FocalLength, Tag::FocalLength),
];

fn camera_metadata(exif: &Exif) -> CameraMetadata {
    let mut meta = CameraMetadata::default();

    for (field, tag) in NUMERIC_TAGS {
        let Some(entry) = exif.get_field(tag, In::PRIMARY) else {
            continue;
        };
        match numeric_value(&entry.value) {
            Some(value) => meta.set(field, value),
            None => debug!(%tag, "skipping malformed tag"),
        }
    }

    if let Some(entry) = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY) {
        match ascii_value(&entry.value).filter(|s| is_valid_timestamp(s)) {
            Some(date) => meta.date = Some(date),
            None => debug!("skipping malformed DateTimeOriginal"),
        }
    }

    meta
}

/// First component of a numeric tag as a rounded decimal.
///
/// Ratios with a zero denominator are kept raw.
fn numeric_value(value: &Value) -> Option<MetaValue> {
    match value {
        Value::Rational(v) => v
            .first()
            .map(|r| MetaValue::from_ratio(i64::from(r.num), i64::from(r.denom))),
        Value::SRational(v) => v
            .first()
            .map(|r| MetaValue::from_ratio(i64::from(r.num), i64::from(r.denom))),
        Value::Short(v) => v.first().map(|n| MetaValue::number(f64::from(*n))),
        Value::Long(v) => v.first().map(|n| MetaValue::number(f64::from(*n))),
        Value::Float(v) => v.first().map(|n| MetaValue::number(f64::from(*n))),
        Value::Double(v) => v.first().map(|n| MetaValue::number(*n)),
        Value::Ascii(_) => {
            let text = ascii_value(value)?;
            Some(match text.parse::<f64>() {
                Ok(n) => MetaValue::number(n),
                Err(_) => MetaValue::Text(text),
            })
        }
        _ => None,
    }
}

fn ascii_value(value: &Value) -> Option<String> {
    let Value::Ascii(parts) = value else {
        return None;
    };
    let text = String::from_utf8_lossy(parts.first()?);
    let text = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{ExifEntry, jpeg_with_exif, solid_image_bytes, tags};
    use image::ImageFormat;

    fn full_entries() -> Vec<ExifEntry> {
        vec![
            ExifEntry::Rational(tags::EXPOSURE_TIME, 1, 125),
            ExifEntry::Rational(tags::F_NUMBER, 28, 10),
            ExifEntry::Short(tags::ISO, 200),
            ExifEntry::Ascii(tags::DATE_TIME_ORIGINAL, "2021:07:04 18:30:00"),
            ExifEntry::Rational(tags::FOCAL_LENGTH, 355, 10),
        ]
    }

    #[test]
    fn extracts_all_five_fields() {
        let bytes = jpeg_with_exif(32, 24, &full_entries());
        let meta = read_camera_metadata(&bytes).unwrap();
        assert_eq!(meta.aperture, Some(MetaValue::Number(2.8)));
        assert_eq!(meta.shutter_speed, Some(MetaValue::Number(0.01)));
        assert_eq!(meta.iso, Some(MetaValue::Number(200.0)));
        assert_eq!(meta.focal_length, Some(MetaValue::Number(35.5)));
        assert_eq!(meta.date.as_deref(), Some("2021:07:04 18:30:00"));
    }

    #[test]
    fn absent_tags_are_omitted() {
        let bytes = jpeg_with_exif(
            16,
            16,
            &[ExifEntry::Rational(tags::F_NUMBER, 4, 1)],
        );
        let meta = extract_metadata(&bytes);
        assert_eq!(meta.aperture, Some(MetaValue::Number(4.0)));
        assert_eq!(meta.shutter_speed, None);
        assert_eq!(meta.iso, None);
        assert_eq!(meta.focal_length, None);
        assert_eq!(meta.date, None);
    }

    #[test]
    fn zero_denominator_kept_raw() {
        let bytes = jpeg_with_exif(
            16,
            16,
            &[ExifEntry::Rational(tags::FOCAL_LENGTH, 50, 0)],
        );
        let meta = extract_metadata(&bytes);
        assert_eq!(
            meta.focal_length,
            Some(MetaValue::Ratio { num: 50, denom: 0 })
        );
    }

    #[test]
    fn malformed_date_is_skipped() {
        let bytes = jpeg_with_exif(
            16,
            16,
            &[
                ExifEntry::Rational(tags::F_NUMBER, 8, 1),
                ExifEntry::Ascii(tags::DATE_TIME_ORIGINAL, "    :  :     :  :  "),
            ],
        );
        let meta = extract_metadata(&bytes);
        assert_eq!(meta.date, None);
        assert_eq!(meta.aperture, Some(MetaValue::Number(8.0)));
    }

    #[test]
    fn missing_block_is_reported_then_softened() {
        let bytes = solid_image_bytes(16, 16, [10, 20, 30], ImageFormat::Png);
        assert!(matches!(
            read_camera_metadata(&bytes),
            Err(ExtractError::MissingBlock)
        ));
        assert!(extract_metadata(&bytes).is_empty());
    }

    #[test]
    fn garbage_bytes_yield_empty_metadata() {
        assert!(read_camera_metadata(b"definitely not an image").is_err());
        assert!(extract_metadata(b"definitely not an image").is_empty());
        assert!(extract_metadata(&[]).is_empty());
    }

    #[test]
    fn numeric_value_conversions() {
        use exif::Rational;
        assert_eq!(
            numeric_value(&Value::Rational(vec![Rational { num: 1, denom: 3 }])),
            Some(MetaValue::Number(0.33))
        );
        assert_eq!(
            numeric_value(&Value::Long(vec![1600])),
            Some(MetaValue::Number(1600.0))
        );
        assert_eq!(
            numeric_value(&Value::Ascii(vec![b"5.6".to_vec()])),
            Some(MetaValue::Number(5.6))
        );
        assert_eq!(numeric_value(&Value::Rational(vec![])), None);
        assert_eq!(numeric_value(&Value::Undefined(vec![1, 2], 0)), None);
    }
}
