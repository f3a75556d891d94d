// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-user preferences: one row per user, read and written independently of
// any conversion.

use std::path::Path;

use chrono::Utc;
use pdfify_core::error::Result;
use pdfify_core::{PaperSize, PdfQuality, Preferences};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, instrument, warn};

use crate::db_err;

const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS user_preferences (
        user_id           TEXT    PRIMARY KEY,
        default_page_size TEXT    NOT NULL DEFAULT 'a4',
        pdf_quality       TEXT    NOT NULL DEFAULT 'high',
        auto_download     INTEGER NOT NULL DEFAULT 1,
        updated_at        TEXT    NOT NULL
    )
"#;

/// SQLite-backed preference storage.
pub struct PreferenceStore {
    conn: Connection,
}

impl PreferenceStore {
    /// Open (or create) the preferences database at `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(db_err)?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(db_err)?;
        conn.execute_batch(CREATE_TABLE_SQL).map_err(db_err)?;

        debug!("preference store opened");
        Ok(Self { conn })
    }

    /// Open an in-memory database (useful for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        conn.execute_batch(CREATE_TABLE_SQL).map_err(db_err)?;
        Ok(Self { conn })
    }

    /// Stored preferences for `user_id`, if any.
    ///
    /// Unrecognised stored values fall back to their defaults.
    pub fn get(&self, user_id: &str) -> Result<Option<Preferences>> {
        let row = self
            .conn
            .query_row(
                "SELECT default_page_size, pdf_quality, auto_download
                 FROM user_preferences WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .optional()
            .map_err(db_err)?;

        Ok(row.map(|(page_size, quality, auto_download)| Preferences {
            default_page_size: page_size.parse::<PaperSize>().unwrap_or_else(|err| {
                warn!(user_id, %err, "stored page size ignored");
                PaperSize::default()
            }),
            pdf_quality: quality.parse::<PdfQuality>().unwrap_or_else(|err| {
                warn!(user_id, %err, "stored quality ignored");
                PdfQuality::default()
            }),
            auto_download: auto_download != 0,
        }))
    }

    /// Stored preferences, or the defaults for a user who has none.
    pub fn get_or_default(&self, user_id: &str) -> Result<Preferences> {
        Ok(self.get(user_id)?.unwrap_or_default())
    }

    /// Insert or replace the preferences of `user_id`.
    #[instrument(skip(self, prefs), fields(page_size = %prefs.default_page_size))]
    pub fn save(&self, user_id: &str, prefs: &Preferences) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO user_preferences
                 (user_id, default_page_size, pdf_quality, auto_download, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(user_id) DO UPDATE SET
                     default_page_size = excluded.default_page_size,
                     pdf_quality       = excluded.pdf_quality,
                     auto_download     = excluded.auto_download,
                     updated_at        = excluded.updated_at",
                params![
                    user_id,
                    prefs.default_page_size.as_str(),
                    prefs.pdf_quality.as_str(),
                    prefs.auto_download as i64,
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(db_err)?;

        debug!("preferences saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store() -> PreferenceStore {
        PreferenceStore::open_in_memory().expect("open in-memory preference store")
    }

    #[test]
    fn missing_user_gets_defaults() {
        let store = make_store();
        assert!(store.get("nobody").unwrap().is_none());
        assert_eq!(store.get_or_default("nobody").unwrap(), Preferences::default());
    }

    #[test]
    fn save_then_update() {
        let store = make_store();
        let mut prefs = Preferences {
            default_page_size: PaperSize::Letter,
            pdf_quality: PdfQuality::Medium,
            auto_download: false,
        };
        store.save("alice", &prefs).unwrap();
        assert_eq!(store.get("alice").unwrap(), Some(prefs.clone()));

        prefs.default_page_size = PaperSize::Legal;
        store.save("alice", &prefs).unwrap();
        assert_eq!(store.get_or_default("alice").unwrap().default_page_size, PaperSize::Legal);
    }

    #[test]
    fn unknown_stored_values_fall_back() {
        let store = make_store();
        store
            .conn
            .execute(
                "INSERT INTO user_preferences VALUES ('bob', 'tabloid', 'ultra', 0, '')",
                [],
            )
            .unwrap();
        let prefs = store.get("bob").unwrap().unwrap();
        assert_eq!(prefs.default_page_size, PaperSize::A4);
        assert_eq!(prefs.pdf_quality, PdfQuality::High);
        assert!(!prefs.auto_download);
    }

    #[test]
    fn persists_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.db");
        PreferenceStore::open(&path)
            .unwrap()
            .save("alice", &Preferences::default())
            .unwrap();
        assert!(PreferenceStore::open(&path).unwrap().get("alice").unwrap().is_some());
    }
}
