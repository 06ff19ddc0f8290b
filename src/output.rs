//! CLI output formatting.
//!
//! Output is **photo-centric**: each input photo gets a header line with its
//! 1-based position and original filename, followed by indented context lines
//! for the output name and resolved camera settings, or the failure reason.
//!
//! # Output Format
//!
//! ## Frame
//!
//! ```text
//! 001 IMG_0001.jpg → framed_IMG_0001.jpg
//!     Aperture: 2.8 | ISO: 200.0
//! 002 IMG_0002.jpg
//!     Skipped: IMG_0002.jpg: Decode failed: ...
//! Framed 1 of 2 photos → framed_photos.zip
//! ```
//!
//! ## Presets
//!
//! ```text
//! instagram-landscape   Instagram Landscape (1080x566)
//! square                Square (1080x1080) (default)
//! ```
//!
//! # Architecture
//!
//! Each display has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::config::CanvasPreset;
use crate::export::{ExportEvent, ExportReport};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

// ============================================================================
// Frame
// ============================================================================

/// Format a single export event as display lines.
pub fn format_export_event(event: &ExportEvent) -> Vec<String> {
    match event {
        ExportEvent::ImageFramed {
            index,
            source,
            output,
            metadata_line,
        } => {
            let mut lines = vec![format!("{} {} → {}", format_index(*index), source, output)];
            if let Some(meta) = metadata_line {
                lines.push(format!("{}{}", indent(1), meta));
            }
            lines
        }
        ExportEvent::ImageFailed {
            index,
            source,
            reason,
        } => vec![
            format!("{} {}", format_index(*index), source),
            format!("{}Skipped: {}", indent(1), reason),
        ],
    }
}

pub fn print_export_event(event: &ExportEvent) {
    for line in format_export_event(event) {
        println!("{}", line);
    }
}

/// One-line totals after an export.
pub fn format_summary(report: &ExportReport, destination: &str) -> String {
    let total = report.items.len();
    let noun = if total == 1 { "photo" } else { "photos" };
    format!(
        "Framed {} of {} {} → {}",
        report.framed_count(),
        total,
        noun,
        destination
    )
}

// ============================================================================
// Presets
// ============================================================================

/// All canvas presets, default marked.
pub fn format_presets() -> Vec<String> {
    let width = CanvasPreset::ALL
        .iter()
        .map(|p| p.name().len())
        .max()
        .unwrap_or(0);
    CanvasPreset::ALL
        .iter()
        .map(|preset| {
            let marker = if *preset == CanvasPreset::default() {
                " (default)"
            } else {
                ""
            };
            format!(
                "{:<width$}   {}{}",
                preset.name(),
                preset.label(),
                marker,
                width = width
            )
        })
        .collect()
}

pub fn print_presets() {
    for line in format_presets() {
        println!("{}", line);
    }
}
