// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for PDFify.

use thiserror::Error;

/// Top-level error type for all PDFify operations.
#[derive(Debug, Error)]
pub enum PdfifyError {
    // -- Conversion failures --
    #[error("unsupported format for conversion: {0}")]
    UnsupportedFormat(String),

    #[error("failed to read file: {0}")]
    Read(String),

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: f32, height: f32 },

    #[error("text input is empty")]
    EmptyInput,

    // -- Selection --
    #[error("{0} is not supported yet")]
    UnsupportedSelection(String),

    #[error("{name} is {size} bytes, exceeding the {limit} byte limit")]
    FileTooLarge { name: String, size: u64, limit: u64 },

    // -- Output --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- Storage / persistence --
    #[error("database error: {0}")]
    Database(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PdfifyError {
    /// Whether this error belongs to the conversion failure taxonomy, i.e. it
    /// can be produced by the dispatcher while turning one file into a PDF.
    pub fn is_conversion_failure(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat(_)
                | Self::Read(_)
                | Self::Decode(_)
                | Self::InvalidDimensions { .. }
                | Self::EmptyInput
                | Self::PdfError(_)
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PdfifyError>;
