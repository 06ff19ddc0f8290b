//! Output naming: filenames, encoder formats, and mime types.
//!
//! Every framed photo keeps its original filename behind a `framed_` prefix,
//! and the original extension decides how it is encoded:
//!
//! - `photo.JPG`  → `framed_photo.JPG`, JPEG, `image/jpeg`
//! - `scan.png`   → `framed_scan.png`, PNG, `image/png`
//! - `shot.jpeg`  → `framed_shot.jpeg`, JPEG, `image/jpeg`
//! - `notes.txt`  → no encoder, reported as an unsupported format
//!
//! Extensions are matched case-insensitively. A batch is packed into
//! [`ARCHIVE_NAME`]; photos from different folders that share a filename get
//! a ` (2)`, ` (3)`, ... suffix there so every entry stays distinct.

use image::ImageFormat;
use std::collections::HashSet;
use std::path::Path;

/// Prefix added to every output filename.
pub const OUTPUT_PREFIX: &str = "framed_";
/// Filename of the batch archive.
pub const ARCHIVE_NAME: &str = "framed_photos.zip";
pub const ARCHIVE_MIME: &str = "application/zip";

/// How one framed photo is written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    /// `framed_<original filename>`
    pub file_name: String,
    pub mime_type: String,
    pub format: ImageFormat,
}

/// Final path component of `name`; the whole string if it has none.
pub fn base_name(name: &str) -> &str {
    Path::new(name)
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or(name)
}

/// `framed_<original filename>`.
pub fn output_name(original: &str) -> String {
    format!("{OUTPUT_PREFIX}{}", base_name(original))
}

/// Lowercased extension without the dot.
pub fn extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// `image/jpeg` for `jpg`, `image/<ext>` otherwise.
pub fn mime_type(ext: &str) -> String {
    if ext == "jpg" {
        "image/jpeg".to_string()
    } else {
        format!("image/{ext}")
    }
}

/// Resolve the output name, encoder, and mime type for an input filename.
///
/// Returns `None` when the extension has no encoder compiled in.
pub fn export_target(original: &str) -> Option<ExportTarget> {
    let ext = extension(original)?;
    let format = ImageFormat::from_extension(&ext).filter(|f| f.writing_enabled())?;
    Some(ExportTarget {
        file_name: output_name(original),
        mime_type: mime_type(&ext),
        format,
    })
}

/// `name`, or `stem (n).ext` with the smallest `n >= 2` not in `taken`.
pub fn unique_name(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }
    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 => name.split_at(dot),
        _ => (name, ""),
    };
    (2..)
        .map(|n| format!("{stem} ({n}){ext}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}
