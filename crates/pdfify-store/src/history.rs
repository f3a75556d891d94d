// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion history: append-only SQLite log of successful conversions.
//
// Schema:
//   conversions(
//     id                TEXT    PRIMARY KEY,  -- UUID v4
//     user_id           TEXT    NOT NULL,
//     original_filename TEXT    NOT NULL,
//     original_format   TEXT    NOT NULL,     -- lower-cased suffix or "unknown"
//     file_size         INTEGER NOT NULL,     -- bytes
//     created_at        TEXT    NOT NULL      -- RFC 3339, fixed-width UTC
//   )

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use pdfify_core::error::{PdfifyError, Result};
use pdfify_core::{ConversionRecord, NewConversion};
use rusqlite::{Connection, params};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::db_err;

const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS conversions (
        id                TEXT    PRIMARY KEY,
        user_id           TEXT    NOT NULL,
        original_filename TEXT    NOT NULL,
        original_format   TEXT    NOT NULL,
        file_size         INTEGER NOT NULL,
        created_at        TEXT    NOT NULL
    );
    CREATE INDEX IF NOT EXISTS conversions_by_user
        ON conversions (user_id, created_at);
"#;

/// Raw column values, converted to a `ConversionRecord` outside the row callback.
type RawRow = (String, String, String, String, i64, String);

/// Per-user history of successful conversions, backed by SQLite.
pub struct ConversionHistory {
    conn: Connection,
}

impl ConversionHistory {
    /// Open (or create) the history database at `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(db_err)?;

        // WAL survives unclean shutdowns more gracefully.
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(db_err)?;
        conn.execute_batch(CREATE_TABLE_SQL).map_err(db_err)?;

        debug!("conversion history opened");
        Ok(Self { conn })
    }

    /// Open an in-memory database (useful for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        conn.execute_batch(CREATE_TABLE_SQL).map_err(db_err)?;

        debug!("in-memory conversion history opened");
        Ok(Self { conn })
    }

    /// Append a conversion and return the stored record.
    #[instrument(skip(self, entry), fields(user_id = %entry.user_id, file = %entry.original_filename))]
    pub fn record(&self, entry: &NewConversion) -> Result<ConversionRecord> {
        let record = ConversionRecord {
            id: Uuid::new_v4(),
            user_id: entry.user_id.clone(),
            original_filename: entry.original_filename.clone(),
            original_format: entry.original_format.clone(),
            file_size: entry.file_size,
            created_at: Utc::now(),
        };

        self.conn
            .execute(
                "INSERT INTO conversions
                 (id, user_id, original_filename, original_format, file_size, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.id.to_string(),
                    record.user_id,
                    record.original_filename,
                    record.original_format,
                    record.file_size as i64,
                    record.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
                ],
            )
            .map_err(db_err)?;

        debug!(id = %record.id, "conversion recorded");
        Ok(record)
    }

    /// All conversions by `user_id`, newest first.
    pub fn for_user(&self, user_id: &str) -> Result<Vec<ConversionRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, user_id, original_filename, original_format, file_size, created_at
                 FROM conversions
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC",
            )
            .map_err(db_err)?;

        let rows = stmt
            .query_map(params![user_id], |row| -> rusqlite::Result<RawRow> {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                ))
            })
            .map_err(db_err)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(into_record(row.map_err(db_err)?)?);
        }
        Ok(records)
    }

    /// Total number of stored conversions.
    pub fn count(&self) -> Result<u64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM conversions", [], |row| row.get::<_, i64>(0))
            .map(|n| n as u64)
            .map_err(db_err)
    }
}

fn into_record(raw: RawRow) -> Result<ConversionRecord> {
    let (id, user_id, original_filename, original_format, file_size, created_at) = raw;
    let id = Uuid::parse_str(&id)
        .map_err(|e| PdfifyError::Database(format!("bad conversion id {id}: {e}")))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| PdfifyError::Database(format!("bad timestamp {created_at}: {e}")))?
        .with_timezone(&Utc);

    Ok(ConversionRecord {
        id,
        user_id,
        original_filename,
        original_format,
        file_size: file_size.max(0) as u64,
        created_at,
    })
}
