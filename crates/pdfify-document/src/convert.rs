// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion dispatcher: route one source file to its engine and produce a PDF.
//
// Image path: read bytes -> data URI -> decode -> fit-to-page layout -> one page.
// Text path:  read bytes -> UTF-8 (lossy) -> wrap -> as many pages as needed.
// Anything else fails with `UnsupportedFormat` before any bytes are read.
//
// Decoding and serialisation are CPU-bound and run on the blocking pool; the
// caller only suspends. Nothing is written to any store here.

use pdfify_core::config::{AppConfig, TextConfig};
use pdfify_core::error::{PdfifyError, Result};
use pdfify_core::{
    FormatKind, Orientation, PageGeometry, PaperSize, PlacedImage, SourceContent, SourceFile,
};
use tracing::{debug, info, instrument};

use crate::classify::classify;
use crate::data_uri::DataUri;
use crate::image::ImageProcessor;
use crate::layout::{layout_image, layout_text};
use crate::pdf::writer::PdfWriter;
use crate::selection::{file_stem, output_file_name};

/// The produced PDF.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Download name, `<original-stem>.pdf`.
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub kind: FormatKind,
    pub layout: ArtifactLayout,
}

impl Artifact {
    pub fn page_count(&self) -> usize {
        match &self.layout {
            ArtifactLayout::Image { .. } => 1,
            ArtifactLayout::Text { pages, .. } => *pages,
        }
    }
}

/// How the artifact's content was laid out.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactLayout {
    Image {
        page: PageGeometry,
        placed: PlacedImage,
    },
    Text {
        page: PageGeometry,
        lines: usize,
        pages: usize,
    },
}

/// Turns a [`SourceFile`] into an [`Artifact`].
#[derive(Debug, Clone)]
pub struct ConversionDispatcher {
    paper_size: PaperSize,
    text: TextConfig,
}

impl ConversionDispatcher {
    pub fn new(paper_size: PaperSize, text: TextConfig) -> Self {
        Self { paper_size, text }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.default_paper_size, config.text.clone())
    }

    /// Same dispatcher targeting another paper size.
    pub fn with_paper_size(mut self, paper_size: PaperSize) -> Self {
        self.paper_size = paper_size;
        self
    }

    pub fn paper_size(&self) -> PaperSize {
        self.paper_size
    }

    /// Convert `file` to PDF.
    #[instrument(skip(self, file), fields(name = %file.name, declared = %file.declared_type, size = file.size))]
    pub async fn convert(&self, file: &SourceFile) -> Result<Artifact> {
        let kind = classify(&file.declared_type, &file.name);
        debug!(?kind, "File classified");

        let artifact = match kind {
            FormatKind::Image => self.convert_image(file).await?,
            FormatKind::PlainText => self.convert_text(file).await?,
            FormatKind::Unsupported => {
                let label = if file.declared_type.is_empty() {
                    file.name.clone()
                } else {
                    file.declared_type.clone()
                };
                return Err(PdfifyError::UnsupportedFormat(label));
            }
        };

        info!(
            output = %artifact.file_name,
            bytes = artifact.bytes.len(),
            pages = artifact.page_count(),
            "Conversion complete"
        );
        Ok(artifact)
    }

    async fn convert_image(&self, file: &SourceFile) -> Result<Artifact> {
        let bytes = read_source(file).await?;
        let uri = DataUri::new(&file.declared_type, bytes).to_string();
        debug!(uri_len = uri.len(), "Image read as data URI");

        let processor = tokio::task::spawn_blocking(move || ImageProcessor::from_data_uri(&uri))
            .await
            .map_err(|err| PdfifyError::Decode(format!("decode task failed: {err}")))??;

        let (natural_w, natural_h) = processor.natural_size();
        let (page, placed) = layout_image(natural_w, natural_h, self.paper_size)?;

        let writer = PdfWriter::new(file_stem(&file.name), self.text.clone());
        let pdf = tokio::task::spawn_blocking(move || writer.render_image(&page, &placed, &processor))
            .await
            .map_err(|err| PdfifyError::PdfError(format!("render task failed: {err}")))?;

        Ok(Artifact {
            file_name: output_file_name(&file.name),
            bytes: pdf,
            kind: FormatKind::Image,
            layout: ArtifactLayout::Image { page, placed },
        })
    }

    async fn convert_text(&self, file: &SourceFile) -> Result<Artifact> {
        let bytes = read_source(file).await?;
        let text = String::from_utf8_lossy(&bytes).into_owned();

        let page = PageGeometry::oriented(self.paper_size, Orientation::Portrait);
        let printable_width = self.text.printable_width_pt(page.width);
        let layout = layout_text(&text, printable_width, &self.text)?;
        let lines = layout.lines.len();

        let writer = PdfWriter::new(file_stem(&file.name), self.text.clone());
        let (pdf, pages) = tokio::task::spawn_blocking(move || writer.render_text(&layout, &page))
            .await
            .map_err(|err| PdfifyError::PdfError(format!("render task failed: {err}")))?;

        Ok(Artifact {
            file_name: output_file_name(&file.name),
            bytes: pdf,
            kind: FormatKind::PlainText,
            layout: ArtifactLayout::Text { page, lines, pages },
        })
    }
}

/// Materialise the bytes of `file`.
pub async fn read_source(file: &SourceFile) -> Result<Vec<u8>> {
    match &file.content {
        SourceContent::InMemory(bytes) => Ok(bytes.clone()),
        SourceContent::OnDisk(path) => tokio::fs::read(path)
            .await
            .map_err(|err| PdfifyError::Read(format!("{}: {err}", path.display()))),
    }
}
