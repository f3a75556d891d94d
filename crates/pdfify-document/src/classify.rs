// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Format classification for conversion.
//
// Only the declared media type decides the conversion path. The selection
// filter in `crate::selection` is deliberately broader (it also matches by
// file-name suffix), so a file that was accepted for selection may still be
// classified `Unsupported` here.

use pdfify_core::FormatKind;

/// Media-type prefix routed to the image engine, whatever the subtype.
pub const IMAGE_TYPE_PREFIX: &str = "image/";

/// The only media type routed to the text engine.
pub const PLAIN_TEXT_TYPE: &str = "text/plain";

/// Decide which engine converts a file.
///
/// The file name is accepted for symmetry with the selection filter but is not
/// consulted: a `.txt` file with an empty declared type is `Unsupported`.
pub fn classify(declared_type: &str, _file_name: &str) -> FormatKind {
    if declared_type.starts_with(IMAGE_TYPE_PREFIX) {
        FormatKind::Image
    } else if declared_type == PLAIN_TEXT_TYPE {
        FormatKind::PlainText
    } else {
        FormatKind::Unsupported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_image_subtype_takes_the_image_path() {
        for ty in ["image/png", "image/jpeg", "image/gif", "image/webp", "image/tiff"] {
            assert_eq!(classify(ty, "photo"), FormatKind::Image, "{ty}");
        }
    }

    #[test]
    fn plain_text_must_match_exactly() {
        assert_eq!(classify("text/plain", "notes.txt"), FormatKind::PlainText);
        assert_eq!(classify("text/plain; charset=utf-8", "notes.txt"), FormatKind::Unsupported);
        assert_eq!(classify("text/markdown", "notes.md"), FormatKind::Unsupported);
    }

    #[test]
    fn word_processor_types_are_unsupported() {
        assert_eq!(classify("application/msword", "doc.doc"), FormatKind::Unsupported);
        assert_eq!(
            classify(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                "report.docx"
            ),
            FormatKind::Unsupported
        );
    }

    #[test]
    fn suffix_alone_does_not_qualify() {
        assert_eq!(classify("", "photo.png"), FormatKind::Unsupported);
        assert_eq!(classify("", "notes.txt"), FormatKind::Unsupported);
    }

    #[test]
    fn name_never_overrides_the_declared_type() {
        assert_eq!(classify("image/png", "notes.txt"), FormatKind::Image);
        assert_eq!(classify("text/plain", "photo.png"), FormatKind::PlainText);
        assert_eq!(classify("application/pdf", "photo.png"), FormatKind::Unsupported);
    }
}
