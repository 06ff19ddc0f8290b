//! Framing pipeline and export.
//!
//! Drives every input photo through the same four steps, then packages the
//! results:
//!
//! ```text
//! bytes ─► EXIF extract ─► resolve (manual, date policy) ─► compose ─► encode
//! ```
//!
//! ## Output
//!
//! - **One input**: a single encoded image, `framed_<name>`, with the mime
//!   type implied by its extension. Any failure is returned as an error.
//! - **Several inputs**: a deflate-compressed `framed_photos.zip` with one
//!   `framed_<name>` entry per photo, in input order.
//!
//! ## Failure isolation
//!
//! In a batch, a photo that cannot be decoded or encoded is skipped with a
//! warning and recorded as failed in the [`ExportReport`]; the remaining
//! photos still land in the archive. Missing or broken EXIF is never a
//! failure, it only empties that photo's metadata. Photos whose output names
//! collide are all kept, the later ones renamed by [`naming::unique_name`].
//!
//! ## Parallel Processing
//!
//! Photos share nothing but the read-only config and font, so they are
//! framed in parallel using [rayon](https://docs.rs/rayon). Archive entries
//! and events are emitted afterwards in input order.

use crate::config::FramerConfig;
use crate::imaging::{
    BackendError, ImageBackend, MAX_SCALED_EDGE, RustBackend, Typeface,
    checked_scaled_dimensions, compose, render_preview, scaled_dimensions,
};
use crate::metadata::{self, CameraMetadata};
use crate::naming::{self, ARCHIVE_MIME, ARCHIVE_NAME};
use image::RgbImage;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No input photos")]
    NoInputs,
    #[error("{name}: unsupported output format (no encoder for this extension)")]
    UnsupportedFormat { name: String },
    #[error("{name}: {source}")]
    Imaging {
        name: String,
        #[source]
        source: BackendError,
    },
    #[error("{name}: scaled photo would be {width}x{height}, over the {MAX_SCALED_EDGE} px limit")]
    TooLarge { name: String, width: u32, height: u32 },
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

/// One uploaded photo: its original filename and encoded bytes.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a photo from disk, keeping only its filename.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Ok(Self { name, bytes })
    }
}

/// An encoded framed photo ready to be saved or served.
#[derive(Debug, Clone)]
pub struct ExportedImage {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Result of framing one photo.
#[derive(Debug, Clone)]
pub struct FramedPhoto {
    pub image: ExportedImage,
    /// Metadata after manual overrides and the date policy.
    pub metadata: CameraMetadata,
}

/// The deliverable of one export request.
#[derive(Debug, Clone)]
pub enum ExportBundle {
    Single(ExportedImage),
    Archive {
        file_name: String,
        mime_type: String,
        bytes: Vec<u8>,
        /// Entry names, in input order.
        entries: Vec<String>,
    },
}

impl ExportBundle {
    pub fn file_name(&self) -> &str {
        match self {
            ExportBundle::Single(image) => &image.file_name,
            ExportBundle::Archive { file_name, .. } => file_name,
        }
    }

    pub fn mime_type(&self) -> &str {
        match self {
            ExportBundle::Single(image) => &image.mime_type,
            ExportBundle::Archive { mime_type, .. } => mime_type,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            ExportBundle::Single(image) => &image.bytes,
            ExportBundle::Archive { bytes, .. } => bytes,
        }
    }
}

/// Per-photo outcome, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub items: Vec<ItemReport>,
}

impl ExportReport {
    pub fn framed_count(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.outcome, ItemOutcome::Framed { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.items.len() - self.framed_count()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
    pub source: String,
    #[serde(flatten)]
    pub outcome: ItemOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ItemOutcome {
    Framed {
        output: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<String>,
    },
    Failed {
        reason: String,
    },
}

#[derive(Debug)]
pub struct ExportResult {
    pub bundle: ExportBundle,
    pub report: ExportReport,
}

/// Progress events sent during export (for CLI output).
#[derive(Debug, Clone)]
pub enum ExportEvent {
    ImageFramed {
        /// 1-based position in the input list.
        index: usize,
        source: String,
        output: String,
        metadata_line: Option<String>,
    },
    ImageFailed {
        index: usize,
        source: String,
        reason: String,
    },
}

/// Frame one photo: extract, resolve, compose, encode.
#[instrument(skip_all, fields(source = %source.name))]
pub fn frame_photo(
    backend: &impl ImageBackend,
    source: &SourceFile,
    config: &FramerConfig,
    typeface: &Typeface,
) -> Result<FramedPhoto, ExportError> {
    let target = naming::export_target(&source.name).ok_or_else(|| {
        ExportError::UnsupportedFormat {
            name: source.name.clone(),
        }
    })?;

    let (framed, metadata) = render(backend, source, config, typeface)?;
    let bytes = backend
        .encode(&framed, target.format, config.quality())
        .map_err(|source_err| ExportError::Imaging {
            name: source.name.clone(),
            source: source_err,
        })?;

    Ok(FramedPhoto {
        image: ExportedImage {
            file_name: target.file_name,
            mime_type: target.mime_type,
            bytes,
        },
        metadata,
    })
}

/// Extracted metadata (when enabled) merged with manual values and the date policy.
fn resolved_metadata(
    backend: &impl ImageBackend,
    source: &SourceFile,
    config: &FramerConfig,
) -> CameraMetadata {
    let extracted = if config.metadata.extract {
        backend.read_metadata(&source.bytes)
    } else {
        CameraMetadata::default()
    };
    metadata::resolve(
        extracted,
        &config.metadata.manual,
        config.metadata.date_source,
        chrono::Local::now().naive_local(),
    )
}

/// Export with the production backend.
pub fn export(
    sources: &[SourceFile],
    config: &FramerConfig,
    progress: Option<Sender<ExportEvent>>,
) -> Result<ExportResult, ExportError> {
    export_with_backend(&RustBackend::new(), sources, config, progress)
}

/// Export using a specific backend (allows testing with mock).
pub fn export_with_backend(
    backend: &impl ImageBackend,
    sources: &[SourceFile],
    config: &FramerConfig,
    progress: Option<Sender<ExportEvent>>,
) -> Result<ExportResult, ExportError> {
    let typeface = Typeface::load(config.text.font.as_deref());

    match sources {
        [] => Err(ExportError::NoInputs),
        [single] => {
            let framed = frame_photo(backend, single, config, &typeface)?;
            let item = framed_item(single, &framed);
            emit(&progress, framed_event(1, single, &framed));
            Ok(ExportResult {
                bundle: ExportBundle::Single(framed.image),
                report: ExportReport { items: vec![item] },
            })
        }
        _ => export_batch(backend, sources, config, &typeface, &progress),
    }
}

fn export_batch(
    backend: &impl ImageBackend,
    sources: &[SourceFile],
    config: &FramerConfig,
    typeface: &Typeface,
    progress: &Option<Sender<ExportEvent>>,
) -> Result<ExportResult, ExportError> {
    let results: Vec<Result<FramedPhoto, ExportError>> = sources
        .par_iter()
        .map(|source| frame_photo(backend, source, config, typeface))
        .collect();

    let mut entries = Vec::new();
    let mut items = Vec::with_capacity(sources.len());
    let mut taken = HashSet::new();

    for (index, (source, result)) in sources.iter().zip(results).enumerate() {
        match result {
            Ok(mut framed) => {
                let entry_name = naming::unique_name(&framed.image.file_name, &taken);
                if entry_name != framed.image.file_name {
                    debug!(source = %source.name, entry = %entry_name, "renamed duplicate entry");
                    framed.image.file_name = entry_name;
                }
                taken.insert(framed.image.file_name.clone());
                items.push(framed_item(source, &framed));
                emit(progress, framed_event(index + 1, source, &framed));
                entries.push((framed.image.file_name, framed.image.bytes));
            }
            Err(err) => {
                let reason = err.to_string();
                warn!(source = %source.name, error = %reason, "skipping photo");
                emit(
                    progress,
                    ExportEvent::ImageFailed {
                        index: index + 1,
                        source: source.name.clone(),
                        reason: reason.clone(),
                    },
                );
                items.push(ItemReport {
                    source: source.name.clone(),
                    outcome: ItemOutcome::Failed { reason },
                });
            }
        }
    }

    let bytes = write_archive(&entries)?;
    info!(
        entries = entries.len(),
        failed = sources.len() - entries.len(),
        "archive written"
    );

    Ok(ExportResult {
        bundle: ExportBundle::Archive {
            file_name: ARCHIVE_NAME.to_string(),
            mime_type: ARCHIVE_MIME.to_string(),
            bytes,
            entries: entries.into_iter().map(|(name, _)| name).collect(),
        },
        report: ExportReport { items },
    })
}

/// Pack `(name, bytes)` pairs into a deflate-compressed zip, in order.
pub fn write_archive(entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>, ExportError> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, bytes) in entries {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(bytes)?;
    }
    Ok(zip.finish()?.into_inner())
}

/// Frame one photo and shrink it for display.
pub fn preview(
    backend: &impl ImageBackend,
    source: &SourceFile,
    config: &FramerConfig,
    width: u32,
) -> Result<RgbImage, ExportError> {
    let typeface = Typeface::load(config.text.font.as_deref());
    let (framed, _) = render(backend, source, config, &typeface)?;
    Ok(render_preview(&framed, width))
}

/// Decode and compose one photo, refusing layouts too large to allocate.
fn render(
    backend: &impl ImageBackend,
    source: &SourceFile,
    config: &FramerConfig,
    typeface: &Typeface,
) -> Result<(RgbImage, CameraMetadata), ExportError> {
    let metadata = resolved_metadata(backend, source, config);
    let photo = backend
        .decode(&source.bytes)
        .map_err(|source_err| ExportError::Imaging {
            name: source.name.clone(),
            source: source_err,
        })?;

    let layout = config.layout_params();
    let source_dims = (photo.width(), photo.height());
    if checked_scaled_dimensions(layout.canvas_width, layout.scale, source_dims).is_none() {
        let (width, height) = scaled_dimensions(layout.canvas_width, layout.scale, source_dims);
        return Err(ExportError::TooLarge {
            name: source.name.clone(),
            width,
            height,
        });
    }

    let framed = compose(
        &photo,
        &layout,
        &metadata,
        &config.render_options(),
        typeface,
    );
    Ok((framed, metadata))
}

fn framed_item(source: &SourceFile, framed: &FramedPhoto) -> ItemReport {
    ItemReport {
        source: source.name.clone(),
        outcome: ItemOutcome::Framed {
            output: framed.image.file_name.clone(),
            metadata: framed.metadata.summary_line(),
        },
    }
}

fn framed_event(index: usize, source: &SourceFile, framed: &FramedPhoto) -> ExportEvent {
    ExportEvent::ImageFramed {
        index,
        source: source.name.clone(),
        output: framed.image.file_name.clone(),
        metadata_line: framed.metadata.summary_line(),
    }
}

fn emit(progress: &Option<Sender<ExportEvent>>, event: ExportEvent) {
    if let Some(tx) = progress {
        // A dropped receiver only means nobody is listening.
        tx.send(event).ok();
    }
}
