// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader: open and inspect produced documents using the `lopdf` crate.

use std::path::Path;

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object};
use pdfify_core::error::{PdfifyError, Result};
use tracing::{debug, info, instrument};

use crate::layout::winansi;

/// Page-tree depth searched for an inherited /MediaBox.
const MAX_INHERITANCE_DEPTH: usize = 16;

/// Read-only view over an existing PDF.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            PdfifyError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");
        Ok(Self { document })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            PdfifyError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");
        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Width and height in points of page `page_number` (1-indexed), taken
    /// from its /MediaBox or the nearest ancestor's.
    pub fn page_size(&self, page_number: u32) -> Result<(f32, f32)> {
        let mut dict = self.dictionary(self.page_id(page_number)?)?;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Ok(media_box) = dict.get(b"MediaBox") {
                return media_box_size(media_box);
            }
            match dict.get(b"Parent") {
                Ok(Object::Reference(parent)) => dict = self.dictionary(*parent)?,
                _ => break,
            }
        }

        Err(PdfifyError::PdfError(format!(
            "page {page_number} has no /MediaBox"
        )))
    }

    /// The string operands of every `Tj` and `TJ` on page `page_number`, as
    /// raw bytes in content-stream order.
    pub fn shown_strings(&self, page_number: u32) -> Result<Vec<Vec<u8>>> {
        let page_id = self.page_id(page_number)?;
        let data = self
            .document
            .get_page_content(page_id)
            .map_err(|err| PdfifyError::PdfError(format!("page {page_number} content: {err}")))?;
        let content = Content::decode(&data)
            .map_err(|err| PdfifyError::PdfError(format!("page {page_number} content: {err}")))?;

        let mut shown = Vec::new();
        for op in content.operations {
            match (op.operator.as_str(), op.operands.as_slice()) {
                ("Tj", [Object::String(bytes, _)]) => shown.push(bytes.clone()),
                ("TJ", [Object::Array(items)]) => shown.push(
                    items
                        .iter()
                        .filter_map(|item| match item {
                            Object::String(bytes, _) => Some(bytes.as_slice()),
                            _ => None,
                        })
                        .flatten()
                        .copied()
                        .collect(),
                ),
                _ => {}
            }
        }
        Ok(shown)
    }

    /// Text lines on page `page_number`, decoded from WinAnsi.
    pub fn page_text(&self, page_number: u32) -> Result<Vec<String>> {
        Ok(self
            .shown_strings(page_number)?
            .iter()
            .map(|bytes| winansi::decode(bytes))
            .collect())
    }

    fn page_id(&self, page_number: u32) -> Result<lopdf::ObjectId> {
        let pages = self.document.get_pages();
        pages.get(&page_number).copied().ok_or_else(|| {
            PdfifyError::PdfError(format!(
                "page {} out of range (document has {} pages)",
                page_number,
                pages.len()
            ))
        })
    }

    fn dictionary(&self, id: lopdf::ObjectId) -> Result<&Dictionary> {
        self.document
            .get_dictionary(id)
            .map_err(|err| PdfifyError::PdfError(format!("bad page object {id:?}: {err}")))
    }
}

fn media_box_size(obj: &Object) -> Result<(f32, f32)> {
    let number = |obj: &Object| -> Option<f32> {
        match obj {
            Object::Integer(i) => Some(*i as f32),
            Object::Real(r) => Some(*r as f32),
            _ => None,
        }
    };

    let values: Option<Vec<f32>> = match obj {
        Object::Array(items) if items.len() == 4 => items.iter().map(number).collect(),
        _ => None,
    };

    match values.as_deref() {
        Some([x0, y0, x1, y1]) => Ok(((x1 - x0).abs(), (y1 - y0).abs())),
        _ => Err(PdfifyError::PdfError("malformed /MediaBox".into())),
    }
}
