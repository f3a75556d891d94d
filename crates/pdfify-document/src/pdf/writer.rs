// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer: serialise laid-out images and text using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`. Layout decisions are made by `crate::layout`; this
// module only turns them into page operations.
//
// Text is shown with raw `Tj` operators carrying WinAnsi bytes, because
// printpdf copies builtin-font text into the stream as UTF-8.

use pdfify_core::config::TextConfig;
use pdfify_core::{PageGeometry, PlacedImage, TextLayout};
use printpdf::{
    BuiltinFont, DictItem, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt,
    RawImage, RawImageData, RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use crate::image::ImageProcessor;
use crate::layout::{lines_per_page, winansi};

/// Image DPI at which one pixel maps to one point, matching the layout units.
const POINT_DPI: f32 = 72.0;

/// Serialises pages whose layout has already been decided.
pub struct PdfWriter {
    /// Title metadata embedded in the PDF /Info dictionary.
    title: String,
    /// Typography for text pages.
    text: TextConfig,
}

impl PdfWriter {
    /// Create a writer whose documents carry `title`.
    pub fn new(title: impl Into<String>, text: TextConfig) -> Self {
        Self {
            title: title.into(),
            text,
        }
    }

    // -- Image to PDF ---------------------------------------------------------

    /// Create a single-page PDF drawing `image` into `placed` on `page`.
    ///
    /// The pixels are always embedded as raw RGB8, whatever codec the source
    /// used.
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn render_image(
        &self,
        page: &PageGeometry,
        placed: &PlacedImage,
        image: &ImageProcessor,
    ) -> Vec<u8> {
        info!(orientation = ?page.orientation, title = %self.title, "Creating image PDF");

        let rgb = image.to_rgb8();
        let (width, height) = (rgb.width() as usize, rgb.height() as usize);
        let raw = RawImage {
            pixels: RawImageData::U8(rgb.into_raw()),
            width,
            height,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };

        let mut doc = PdfDocument::new(&self.title);
        let xobject_id = doc.add_image(&raw);

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(placed.x)),
                translate_y: Some(Pt(placed.y)),
                scale_x: Some(placed.scale),
                scale_y: Some(placed.scale),
                dpi: Some(POINT_DPI),
                rotate: None,
            },
        }];

        doc.with_pages(vec![PdfPage::new(
            Mm(page.width_mm()),
            Mm(page.height_mm()),
            ops,
        )]);

        debug!(
            x = placed.x,
            y = placed.y,
            rendered_w_pt = placed.width,
            rendered_h_pt = placed.height,
            scale = placed.scale,
            "Image placed on page"
        );

        save(&doc)
    }

    // -- Text to PDF ----------------------------------------------------------

    /// Create a PDF from wrapped lines, starting a new page whenever the
    /// current one is full. Returns the bytes and the number of pages.
    #[instrument(skip(self, layout), fields(lines = layout.lines.len()))]
    pub fn render_text(&self, layout: &TextLayout, page: &PageGeometry) -> (Vec<u8>, usize) {
        info!(title = %self.title, "Creating text PDF");

        let font_size = Pt(self.text.font_size_pt);
        let line_height = self.text.line_height_pt();
        let per_page = lines_per_page(page.height, &self.text);
        let (page_w, page_h) = (Mm(page.width_mm()), Mm(page.height_mm()));

        let mut pages: Vec<PdfPage> = layout
            .lines
            .chunks(per_page)
            .map(|chunk| {
                let mut ops: Vec<Op> = Vec::with_capacity(chunk.len() * 5 + 1);
                // Draws nothing; makes printpdf register Helvetica with
                // /WinAnsiEncoding in the page resources.
                ops.push(Op::WriteTextBuiltinFont {
                    items: Vec::new(),
                    font: BuiltinFont::Helvetica,
                });
                for (line_idx, line) in chunk.iter().enumerate() {
                    // Blank lines still advance the cursor but emit nothing.
                    if line.is_empty() {
                        continue;
                    }

                    // Baselines run down from the top margin.
                    let y_pt = page.height - layout.margin_top - line_idx as f32 * line_height;

                    ops.push(Op::StartTextSection);
                    ops.push(Op::SetTextCursor {
                        pos: Point {
                            x: Pt(layout.margin_left),
                            y: Pt(y_pt),
                        },
                    });
                    ops.push(Op::SetFontSizeBuiltinFont {
                        size: font_size,
                        font: BuiltinFont::Helvetica,
                    });
                    ops.push(show_text(line));
                    ops.push(Op::EndTextSection);
                }
                PdfPage::new(page_w, page_h, ops)
            })
            .collect();

        // If there were no lines at all, add a single blank page.
        if pages.is_empty() {
            pages.push(PdfPage::new(page_w, page_h, Vec::new()));
        }

        let page_count = pages.len();
        let mut doc = PdfDocument::new(&self.title);
        doc.with_pages(pages);

        debug!(
            total_lines = layout.lines.len(),
            lines_per_page = per_page,
            pages = page_count,
            "Text layout complete"
        );

        (save(&doc), page_count)
    }
}

/// A `Tj` operator showing `line` as a hex string of WinAnsi bytes.
fn show_text(line: &str) -> Op {
    Op::Unknown {
        key: "Tj".into(),
        value: vec![DictItem::String {
            data: winansi::encode(line),
            literal: false,
        }],
    }
}

fn save(doc: &PdfDocument) -> Vec<u8> {
    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    // `secure: false` keeps the raw `Tj` operators in the content stream.
    let options = PdfSaveOptions {
        secure: false,
        ..PdfSaveOptions::default()
    };
    let output = doc.save(&options, &mut warnings);
    if !warnings.is_empty() {
        warn!(count = warnings.len(), "printpdf reported warnings while saving");
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{HelveticaMetrics, layout_image, layout_text};
    use crate::pdf::reader::PdfReader;
    use image::{DynamicImage, RgbImage};
    use pdfify_core::{Orientation, PaperSize};

    fn writer() -> PdfWriter {
        PdfWriter::new("test", TextConfig::default())
    }

    #[test]
    fn image_pdf_has_one_landscape_page() {
        let processor = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(RgbImage::new(20, 10)));
        let (page, placed) = layout_image(20.0, 10.0, PaperSize::A4).unwrap();
        let bytes = writer().render_image(&page, &placed, &processor);

        let reader = PdfReader::from_bytes(&bytes).unwrap();
        assert_eq!(reader.page_count(), 1);
        let (w, h) = reader.page_size(1).unwrap();
        assert!(w > h);
        assert!((w - 841.89).abs() < 1.0);
    }

    #[test]
    fn long_text_spills_onto_more_pages() {
        let text = (0..100).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let page = PageGeometry::oriented(PaperSize::A4, Orientation::Portrait);
        let style = TextConfig::default();
        let layout = layout_text(&text, style.printable_width_pt(page.width), &style).unwrap();

        let (bytes, pages) = writer().render_text(&layout, &page);
        // 42 lines per A4 page -> 100 lines need 3 pages
        assert_eq!(pages, 3);
        assert_eq!(PdfReader::from_bytes(&bytes).unwrap().page_count(), 3);
    }

    fn text_pdf(lines: &[&str]) -> PdfReader {
        let layout = TextLayout {
            lines: lines.iter().map(|line| line.to_string()).collect(),
            margin_left: 42.5,
            margin_top: 42.5,
        };
        let page = PageGeometry::oriented(PaperSize::A4, Orientation::Portrait);
        let (bytes, _) = writer().render_text(&layout, &page);
        PdfReader::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn accented_text_is_written_as_winansi() {
        let reader = text_pdf(&["café", "", "naïve — “ok”"]);
        let shown = reader.shown_strings(1).unwrap();
        assert_eq!(shown[0], vec![0x63, 0x61, 0x66, 0xE9]);
        assert_eq!(shown[1], vec![
            0x6E, 0x61, 0xEF, 0x76, 0x65, 0x20, 0x97, 0x20, 0x93, 0x6F, 0x6B, 0x94
        ]);
        assert_eq!(shown.len(), 2);
        assert_eq!(reader.page_text(1).unwrap(), vec!["café", "naïve — “ok”"]);
    }

    #[test]
    fn unmappable_text_is_replaced_not_garbled() {
        let shown = text_pdf(&["日本 🙂 ok"]).shown_strings(1).unwrap();
        assert_eq!(shown, vec![b"?? ? ok".to_vec()]);
    }

    #[test]
    fn rendered_width_matches_measured_width() {
        let metrics = HelveticaMetrics::new(TextConfig::default().font_size_pt);
        let lines = ["Crème brûlée … 12 €", "Ærøskøbing • straße", "plain ascii"];
        let shown = text_pdf(&lines).shown_strings(1).unwrap();
        for (line, bytes) in lines.iter().zip(&shown) {
            assert_eq!(metrics.encoded_width(bytes), metrics.text_width(line), "{line}");
        }
    }

    #[test]
    fn empty_layout_still_yields_a_page() {
        let layout = TextLayout {
            lines: Vec::new(),
            margin_left: 42.5,
            margin_top: 42.5,
        };
        let page = PageGeometry::oriented(PaperSize::Letter, Orientation::Portrait);
        let (bytes, pages) = writer().render_text(&layout, &page);
        assert_eq!(pages, 1);
        assert_eq!(PdfReader::from_bytes(&bytes).unwrap().page_count(), 1);
    }
}
