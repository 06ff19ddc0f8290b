//! Shared test utilities: synthetic photos, with or without an EXIF block.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let png = solid_image_bytes(16, 16, [10, 20, 30], ImageFormat::Png);
//! let jpeg = jpeg_with_exif(32, 24, &[
//!     ExifEntry::Rational(tags::F_NUMBER, 28, 10),
//!     ExifEntry::Short(tags::ISO, 200),
//! ]);
//! ```

use image::{ImageFormat, RgbImage};
use std::io::Cursor;

/// EXIF tag numbers used by the framer, all in the Exif sub-IFD.
pub mod tags {
    pub const EXPOSURE_TIME: u16 = 0x829A;
    pub const F_NUMBER: u16 = 0x829D;
    pub const ISO: u16 = 0x8827;
    pub const DATE_TIME_ORIGINAL: u16 = 0x9003;
    pub const FOCAL_LENGTH: u16 = 0x920A;
}

const EXIF_IFD_POINTER: u16 = 0x8769;

const TYPE_ASCII: u16 = 2;
const TYPE_SHORT: u16 = 3;
const TYPE_LONG: u16 = 4;
const TYPE_RATIONAL: u16 = 5;

/// One field of a synthetic Exif IFD.
#[derive(Debug, Clone)]
pub enum ExifEntry {
    Rational(u16, u32, u32),
    Short(u16, u16),
    Ascii(u16, &'static str),
}

impl ExifEntry {
    fn tag(&self) -> u16 {
        match self {
            ExifEntry::Rational(tag, ..) | ExifEntry::Short(tag, _) | ExifEntry::Ascii(tag, _) => {
                *tag
            }
        }
    }

    /// `(type, count, payload)`; payloads over 4 bytes go out of line.
    fn encoded(&self) -> (u16, u32, Vec<u8>) {
        match self {
            ExifEntry::Rational(_, num, denom) => {
                let mut data = num.to_le_bytes().to_vec();
                data.extend_from_slice(&denom.to_le_bytes());
                (TYPE_RATIONAL, 1, data)
            }
            ExifEntry::Short(_, value) => (TYPE_SHORT, 1, value.to_le_bytes().to_vec()),
            ExifEntry::Ascii(_, text) => {
                let mut data = text.as_bytes().to_vec();
                data.push(0);
                (TYPE_ASCII, data.len() as u32, data)
            }
        }
    }
}

// =========================================================================
// Image fixtures
// =========================================================================

/// Encode a solid-color image in the given format.
pub fn solid_image_bytes(width: u32, height: u32, rgb: [u8; 3], format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, image::Rgb(rgb));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

/// A JPEG whose APP1 segment carries the given Exif IFD entries.
pub fn jpeg_with_exif(width: u32, height: u32, entries: &[ExifEntry]) -> Vec<u8> {
    let jpeg = solid_image_bytes(width, height, [90, 120, 150], ImageFormat::Jpeg);
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8], "encoder must emit SOI first");

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend(tiff_block(entries));

    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend(payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// Little-endian TIFF: IFD0 holding only the Exif pointer, then the Exif IFD.
fn tiff_block(entries: &[ExifEntry]) -> Vec<u8> {
    let mut sorted = entries.to_vec();
    sorted.sort_by_key(ExifEntry::tag);

    let ifd0_offset = 8u32;
    let exif_ifd_offset = ifd0_offset + ifd_len(1);
    let mut data_offset = exif_ifd_offset + ifd_len(sorted.len());

    let mut tiff = b"II".to_vec();
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&ifd0_offset.to_le_bytes());

    tiff.extend_from_slice(&1u16.to_le_bytes());
    push_entry(&mut tiff, EXIF_IFD_POINTER, TYPE_LONG, 1, &exif_ifd_offset.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());

    let mut data_area = Vec::new();
    tiff.extend_from_slice(&(sorted.len() as u16).to_le_bytes());
    for entry in &sorted {
        let (typ, count, payload) = entry.encoded();
        if payload.len() <= 4 {
            let mut inline = payload.clone();
            inline.resize(4, 0);
            push_entry(&mut tiff, entry.tag(), typ, count, &inline);
        } else {
            push_entry(&mut tiff, entry.tag(), typ, count, &data_offset.to_le_bytes());
            data_area.extend_from_slice(&payload);
            if payload.len() % 2 == 1 {
                data_area.push(0);
            }
            data_offset = exif_ifd_offset + ifd_len(sorted.len()) + data_area.len() as u32;
        }
    }
    tiff.extend_from_slice(&0u32.to_le_bytes());
    tiff.extend(data_area);
    tiff
}

fn ifd_len(entries: usize) -> u32 {
    2 + 12 * entries as u32 + 4
}

fn push_entry(buf: &mut Vec<u8>, tag: u16, typ: u16, count: u32, value: &[u8]) {
    buf.extend_from_slice(&tag.to_le_bytes());
    buf.extend_from_slice(&typ.to_le_bytes());
    buf.extend_from_slice(&count.to_le_bytes());
    buf.extend_from_slice(value);
}

#[test]
fn jpeg_with_exif_still_decodes() {
    let bytes = jpeg_with_exif(10, 8, &[ExifEntry::Short(tags::ISO, 100)]);
    let img = image::load_from_memory(&bytes).unwrap();
    assert_eq!((img.width(), img.height()), (10, 8));
}
