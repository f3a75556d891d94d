// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Selection filter: which files a user may pick for conversion.
//
// This allow-list is broader than `crate::classify`: a file passes when its
// declared media type OR its suffix is listed. Word-processor documents pass
// selection but have no conversion engine, so the dispatcher still rejects
// them with `UnsupportedFormat`.

use std::path::Path;

use pdfify_core::SourceFile;
use pdfify_core::error::{PdfifyError, Result};
use tracing::{debug, warn};

/// Media types accepted at selection time.
pub const SELECTION_MEDIA_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "text/plain",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// File-name suffixes accepted at selection time (compared case-insensitively).
pub const SELECTION_SUFFIXES: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "txt", "doc", "docx"];

/// Result of filtering a batch of candidate files.
#[derive(Debug, Default)]
pub struct SelectionOutcome {
    pub accepted: Vec<SourceFile>,
    /// Rejected files with the reason each was turned away.
    pub rejected: Vec<(SourceFile, PdfifyError)>,
}

/// Check one file against the selection allow-lists and the size limit.
pub fn check_selection(file: &SourceFile, max_bytes: u64) -> Result<()> {
    let type_ok = SELECTION_MEDIA_TYPES.contains(&file.declared_type.as_str());
    let suffix_ok = suffix(&file.name)
        .map(|ext| SELECTION_SUFFIXES.contains(&ext.as_str()))
        .unwrap_or(false);

    if !type_ok && !suffix_ok {
        return Err(PdfifyError::UnsupportedSelection(file.name.clone()));
    }

    if file.size > max_bytes {
        return Err(PdfifyError::FileTooLarge {
            name: file.name.clone(),
            size: file.size,
            limit: max_bytes,
        });
    }

    Ok(())
}

/// Split `files` into those accepted for conversion and those rejected.
pub fn select_files(files: impl IntoIterator<Item = SourceFile>, max_bytes: u64) -> SelectionOutcome {
    let mut outcome = SelectionOutcome::default();
    for file in files {
        match check_selection(&file, max_bytes) {
            Ok(()) => outcome.accepted.push(file),
            Err(err) => {
                warn!(name = %file.name, error = %err, "file rejected at selection");
                outcome.rejected.push((file, err));
            }
        }
    }
    debug!(
        accepted = outcome.accepted.len(),
        rejected = outcome.rejected.len(),
        "selection filtered"
    );
    outcome
}

/// Media type a browser would attach to `file_name`, or `""` when unknown.
pub fn guess_declared_type(file_name: &str) -> &'static str {
    match suffix(file_name).as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("tif" | "tiff") => "image/tiff",
        Some("txt") => "text/plain",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("pdf") => "application/pdf",
        _ => "",
    }
}

/// `file_name` without its last suffix. Dotfiles and names ending in a dot
/// are returned whole.
pub fn file_stem(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < file_name.len() && !file_name[idx..].contains('/') => {
            &file_name[..idx]
        }
        _ => file_name,
    }
}

/// Name of the PDF produced from `file_name`: the last suffix is replaced
/// with `.pdf`.
pub fn output_file_name(file_name: &str) -> String {
    format!("{}.pdf", file_stem(file_name))
}

fn suffix(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}
