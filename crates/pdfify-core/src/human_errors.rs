// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// User-facing failure notices.
//
// Every technical error is mapped to a short heading and a plain-English
// description. Severity drives how loudly the notice is presented.

use crate::error::PdfifyError;
use crate::types::format_file_size;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Something on the machine hiccuped; trying again may work.
    Transient,
    /// The user has to pick a different file.
    ActionRequired,
    /// The file can never be converted as-is.
    Permanent,
}

/// A notice with a heading and a description, ready to show to the user.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Short heading.
    pub message: String,
    /// Body text.
    pub suggestion: String,
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `PdfifyError` into a notice the user can act on.
pub fn humanize_error(err: &PdfifyError) -> HumanError {
    match err {
        // -- Selection --
        PdfifyError::UnsupportedSelection(name) => HumanError {
            message: "Unsupported file type".into(),
            suggestion: format!("{name} is not supported yet."),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PdfifyError::FileTooLarge { name, limit, .. } => HumanError {
            message: "File too large".into(),
            suggestion: format!("{name} exceeds the {} limit.", format_file_size(*limit)),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Conversion --
        PdfifyError::UnsupportedFormat(detail) => HumanError {
            message: "Conversion failed".into(),
            suggestion: format!(
                "This file type can be selected but not converted yet. Save it as an image or plain text first. ({detail})"
            ),
            retriable: false,
            severity: Severity::Permanent,
        },

        PdfifyError::Decode(_) | PdfifyError::InvalidDimensions { .. } => HumanError {
            message: "Conversion failed".into(),
            suggestion: "The image looks damaged or empty. Try exporting it again as JPEG or PNG.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        PdfifyError::EmptyInput => HumanError {
            message: "Conversion failed".into(),
            suggestion: "The text file is empty, so there is nothing to put in the PDF.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PdfifyError::Read(_) | PdfifyError::PdfError(_) => HumanError {
            message: "Conversion failed".into(),
            suggestion: "There was an error converting your file. Please try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Storage --
        PdfifyError::Database(_) => HumanError {
            message: "History unavailable".into(),
            suggestion: "Your conversion history could not be loaded or saved. Conversions still work.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        PdfifyError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "File not found".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Permission denied".into(),
                    suggestion: "Check the file permissions, or copy the file somewhere else first.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "File error".into(),
                    suggestion: "There was a problem reading or writing a file. Please try again.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        PdfifyError::Serialization(_) => HumanError {
            message: "Settings error".into(),
            suggestion: "The settings file could not be read or written. Defaults are used instead.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}
