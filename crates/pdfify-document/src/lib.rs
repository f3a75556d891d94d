// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pdfify-document: The format-to-PDF conversion pipeline.
//
// Provides format classification and the selection filter, the image
// fit-to-page and text pagination layout engines, PDF generation and
// inspection, the asynchronous conversion dispatcher, and the progress ticker
// shown while a conversion runs.

pub mod classify;
pub mod convert;
pub mod data_uri;
pub mod image;
pub mod layout;
pub mod pdf;
pub mod progress;
pub mod selection;

// Re-export the primary items so callers can use `pdfify_document::ConversionDispatcher` etc.
pub use classify::classify;
pub use convert::{Artifact, ArtifactLayout, ConversionDispatcher};
pub use image::processor::ImageProcessor;
pub use layout::{layout_image, layout_text};
pub use pdf::reader::PdfReader;
pub use pdf::writer::PdfWriter;
pub use progress::{ProgressReporter, ProgressTicker};
