// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the PDFify conversion pipeline.
//
// All geometry is expressed in PDF points (1/72 inch). Image pixel dimensions
// are taken as points before the fit-to-page scale is applied.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Millimetres per PDF point.
pub const MM_PER_PT: f32 = 25.4 / 72.0;

// -- Source files -------------------------------------------------------------

/// Where the bytes of a [`SourceFile`] come from.
///
/// On-disk content is only materialised when a conversion actually reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceContent {
    InMemory(Vec<u8>),
    OnDisk(PathBuf),
}

/// A user-supplied file, borrowed by the pipeline for one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Original file name including its suffix.
    pub name: String,
    /// Declared media type. May be empty and is never verified against the bytes.
    pub declared_type: String,
    /// Size in bytes as reported by the origin.
    pub size: u64,
    pub content: SourceContent,
}

impl SourceFile {
    /// Build a source file whose bytes are already in memory.
    pub fn from_bytes(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            size: bytes.len() as u64,
            content: SourceContent::InMemory(bytes),
        }
    }

    /// Build a source file that will be read from `path` on demand.
    pub fn on_disk(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        size: u64,
        path: impl AsRef<Path>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            size,
            content: SourceContent::OnDisk(path.as_ref().to_path_buf()),
        }
    }
}

/// Conversion path chosen for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatKind {
    Image,
    PlainText,
    Unsupported,
}

// -- Page geometry ------------------------------------------------------------

/// Standard paper sizes offered as the default page size preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    A4,
    Letter,
    Legal,
}

impl PaperSize {
    /// Portrait dimensions in points (width, height).
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            Self::A4 => (595.28, 841.89),
            Self::Letter => (612.0, 792.0),
            Self::Legal => (612.0, 1008.0),
        }
    }

    /// Portrait dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (f32, f32) {
        let (w, h) = self.dimensions_pt();
        (w * MM_PER_PT, h * MM_PER_PT)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A4 => "a4",
            Self::Letter => "letter",
            Self::Legal => "legal",
        }
    }
}

impl std::fmt::Display for PaperSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaperSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a4" => Ok(Self::A4),
            "letter" => Ok(Self::Letter),
            "legal" => Ok(Self::Legal),
            other => Err(format!("unknown page size '{other}' (expected a4, letter, or legal)")),
        }
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// An oriented page in points.
///
/// Invariant: `width >= height` exactly when `orientation` is `Landscape`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub orientation: Orientation,
    pub width: f32,
    pub height: f32,
}

impl PageGeometry {
    /// Orient `paper` as requested.
    pub fn oriented(paper: PaperSize, orientation: Orientation) -> Self {
        let (short, long) = paper.dimensions_pt();
        let (width, height) = match orientation {
            Orientation::Portrait => (short, long),
            Orientation::Landscape => (long, short),
        };
        Self {
            orientation,
            width,
            height,
        }
    }

    /// Page width in millimetres.
    pub fn width_mm(&self) -> f32 {
        self.width * MM_PER_PT
    }

    /// Page height in millimetres.
    pub fn height_mm(&self) -> f32 {
        self.height * MM_PER_PT
    }
}

/// Where an image is drawn on its page, in points from the page's lower-left
/// corner. The rectangle is centred, so measuring `y` from the top gives the
/// same value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedImage {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Factor applied to the natural dimensions.
    pub scale: f32,
}

/// Wrapped text ready to be placed on pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLayout {
    pub lines: Vec<String>,
    /// Left margin of every line, in points.
    pub margin_left: f32,
    /// Distance from the top edge to the first baseline, in points.
    pub margin_top: f32,
}

// -- Preferences --------------------------------------------------------------

/// Output quality preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PdfQuality {
    Low,
    Medium,
    #[default]
    High,
}

impl PdfQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for PdfQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown quality '{other}' (expected low, medium, or high)")),
        }
    }
}

/// Per-user conversion preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub default_page_size: PaperSize,
    pub pdf_quality: PdfQuality,
    pub auto_download: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            default_page_size: PaperSize::A4,
            pdf_quality: PdfQuality::High,
            auto_download: true,
        }
    }
}

// -- Conversion history -------------------------------------------------------

/// Details of a successful conversion, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConversion {
    pub user_id: String,
    pub original_filename: String,
    pub original_format: String,
    pub file_size: u64,
}

impl NewConversion {
    /// Describe a conversion of `file` performed for `user_id`.
    pub fn for_file(user_id: impl Into<String>, file: &SourceFile) -> Self {
        Self {
            user_id: user_id.into(),
            original_filename: file.name.clone(),
            original_format: infer_original_format(&file.name),
            file_size: file.size,
        }
    }
}

/// A stored conversion history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub id: Uuid,
    pub user_id: String,
    pub original_filename: String,
    pub original_format: String,
    pub file_size: u64,
    pub created_at: DateTime<Utc>,
}

/// Lower-cased suffix of `file_name`, or `"unknown"` when it has none.
pub fn infer_original_format(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "unknown".to_string())
}

/// Human-readable size: bytes below 1 KiB, otherwise one decimal of KB or MB.
pub fn format_file_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    }
}
