// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pdfify-store: Durable records kept around conversions.
//
// The conversion pipeline itself stores nothing. This crate holds what the
// caller keeps afterwards: an append-only history of successful conversions
// per user, and each user's preferences. Both are SQLite-backed.

pub mod history;
pub mod preferences;

pub use history::ConversionHistory;
pub use preferences::PreferenceStore;

use pdfify_core::PdfifyError;

/// Convert a `rusqlite::Error` into a `PdfifyError::Database`.
pub(crate) fn db_err(e: rusqlite::Error) -> PdfifyError {
    PdfifyError::Database(e.to_string())
}
