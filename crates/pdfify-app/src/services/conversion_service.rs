// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer: owns the stores and the config, and runs one
// conversion at a time on behalf of the front end.
//
// The SQLite-backed stores are `Send` but not `Sync`, so they live behind
// `Arc<Mutex<>>`. Every query is short; the locks are never held across an
// await point.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pdfify_core::error::Result;
use pdfify_core::{AppConfig, ConversionRecord, NewConversion, PaperSize, Preferences, SourceFile};
use pdfify_document::selection::{SelectionOutcome, select_files};
use pdfify_document::{Artifact, ConversionDispatcher, ProgressReporter};
use pdfify_store::{ConversionHistory, PreferenceStore};
use tracing::{debug, error, info, instrument, warn};

use super::data_dir;

const HISTORY_DB: &str = "history.db";
const PREFERENCES_DB: &str = "preferences.db";
const CONFIG_FILE: &str = "config.json";

/// Shared application services. Cheap to clone.
#[derive(Clone)]
pub struct ConversionService {
    history: Arc<Mutex<ConversionHistory>>,
    preferences: Arc<Mutex<PreferenceStore>>,
    config: Arc<Mutex<AppConfig>>,
    /// `None` when running without persistent storage.
    data_dir: Option<PathBuf>,
}

impl ConversionService {
    /// Open the stores in the platform data directory.
    pub fn init() -> Result<Self> {
        Self::open(data_dir::data_dir())
    }

    /// Open (or create) the stores and config inside `dir`.
    #[instrument(skip_all, fields(path = %dir.as_ref().display()))]
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let history = ConversionHistory::open(dir.join(HISTORY_DB))?;
        let preferences = PreferenceStore::open(dir.join(PREFERENCES_DB))?;
        let config = load_config(dir).unwrap_or_default();

        info!("conversion service initialised");
        Ok(Self {
            history: Arc::new(Mutex::new(history)),
            preferences: Arc::new(Mutex::new(preferences)),
            config: Arc::new(Mutex::new(config)),
            data_dir: Some(dir.to_path_buf()),
        })
    }

    /// In-memory stores; nothing survives the process.
    pub fn in_memory(config: AppConfig) -> Result<Self> {
        Ok(Self {
            history: Arc::new(Mutex::new(ConversionHistory::open_in_memory()?)),
            preferences: Arc::new(Mutex::new(PreferenceStore::open_in_memory()?)),
            config: Arc::new(Mutex::new(config)),
            data_dir: None,
        })
    }

    /// Used when the data directory cannot be opened.
    pub fn fallback() -> Result<Self> {
        Self::in_memory(AppConfig::default())
    }

    // -- Conversion ----------------------------------------------------------

    /// A progress reporter configured from the current config.
    pub fn reporter(&self) -> ProgressReporter {
        ProgressReporter::new(self.config().progress)
    }

    /// Split `files` into those that may be converted and those refused.
    pub fn select(&self, files: impl IntoIterator<Item = SourceFile>) -> SelectionOutcome {
        select_files(files, self.config().max_selection_bytes)
    }

    /// Convert `file`, driving `reporter` from 0 to 100 (or back to 0 on
    /// failure). Successful conversions by a known user are recorded.
    ///
    /// The page size is the user's preference, else the configured default.
    pub async fn convert(
        &self,
        file: &SourceFile,
        user_id: Option<&str>,
        reporter: &ProgressReporter,
    ) -> Result<Artifact> {
        let default = self.config().default_paper_size;
        let paper_size = match user_id {
            Some(user) => self.paper_size_for(user, default),
            None => default,
        };
        self.convert_on(paper_size, file, user_id, reporter).await
    }

    /// [`convert`](Self::convert) with an explicit page size.
    #[instrument(skip(self, file, reporter), fields(name = %file.name))]
    pub async fn convert_on(
        &self,
        paper_size: PaperSize,
        file: &SourceFile,
        user_id: Option<&str>,
        reporter: &ProgressReporter,
    ) -> Result<Artifact> {
        let config = self.config();
        let dispatcher = ConversionDispatcher::from_config(&config).with_paper_size(paper_size);

        let ticker = reporter.start();
        match dispatcher.convert(file).await {
            Ok(artifact) => {
                ticker.complete();
                if let Some(user) = user_id
                    && config.record_history
                {
                    self.record_history(user, file);
                }
                Ok(artifact)
            }
            Err(err) => {
                ticker.fail();
                if err.is_conversion_failure() {
                    warn!(error = %err, "conversion failed");
                } else {
                    error!(error = %err, "conversion aborted");
                }
                Err(err)
            }
        }
    }

    fn paper_size_for(&self, user_id: &str, fallback: PaperSize) -> PaperSize {
        match lock(&self.preferences).get(user_id) {
            Ok(Some(prefs)) => prefs.default_page_size,
            Ok(None) => fallback,
            Err(err) => {
                warn!(user_id, error = %err, "could not read preferences");
                fallback
            }
        }
    }

    /// History is best-effort: the artifact is already produced.
    fn record_history(&self, user_id: &str, file: &SourceFile) {
        match lock(&self.history).record(&NewConversion::for_file(user_id, file)) {
            Ok(record) => debug!(id = %record.id, "history updated"),
            Err(err) => error!(user_id, error = %err, "failed to record conversion"),
        }
    }

    // -- History and preferences ---------------------------------------------

    /// Conversions by `user_id`, newest first.
    pub fn history(&self, user_id: &str) -> Result<Vec<ConversionRecord>> {
        lock(&self.history).for_user(user_id)
    }

    pub fn preferences(&self, user_id: &str) -> Result<Preferences> {
        lock(&self.preferences).get_or_default(user_id)
    }

    pub fn save_preferences(&self, user_id: &str, prefs: &Preferences) -> Result<()> {
        lock(&self.preferences).save(user_id, prefs)
    }

    // -- Config persistence --------------------------------------------------

    pub fn config(&self) -> AppConfig {
        lock(&self.config).clone()
    }

    /// Replace the config and write it to the data directory, if any.
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        *lock(&self.config) = config.clone();
        match &self.data_dir {
            Some(dir) => persist_config(dir, config),
            None => Ok(()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn load_config(dir: &Path) -> Option<AppConfig> {
    let path = dir.join(CONFIG_FILE);
    let data = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&data) {
        Ok(config) => Some(config),
        Err(err) => {
            warn!(path = %path.display(), %err, "ignoring unreadable config");
            None
        }
    }
}

fn persist_config(dir: &Path, config: &AppConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(dir.join(CONFIG_FILE), json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfify_core::PdfifyError;
    use pdfify_document::ArtifactLayout;

    fn service() -> ConversionService {
        ConversionService::in_memory(AppConfig::default()).unwrap()
    }

    fn text_file() -> SourceFile {
        SourceFile::from_bytes("notes.txt", "text/plain", b"line one\nline two".to_vec())
    }

    #[tokio::test]
    async fn success_completes_progress_and_records_history() {
        let svc = service();
        let reporter = svc.reporter();
        let artifact = svc.convert(&text_file(), Some("alice"), &reporter).await.unwrap();

        assert_eq!(artifact.file_name, "notes.pdf");
        assert_eq!(reporter.current(), 100);
        let history = svc.history("alice").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].original_format, "txt");
    }

    #[tokio::test]
    async fn failure_resets_progress_and_records_nothing() {
        let svc = service();
        let reporter = svc.reporter();
        let file = SourceFile::from_bytes("letter.docx", "application/msword", vec![1, 2, 3]);
        let err = svc.convert(&file, Some("alice"), &reporter).await.unwrap_err();

        assert!(matches!(err, PdfifyError::UnsupportedFormat(_)));
        assert_eq!(reporter.current(), 0);
        assert!(svc.history("alice").unwrap().is_empty());
    }

    #[tokio::test]
    async fn anonymous_conversions_are_not_recorded() {
        let svc = service();
        svc.convert(&text_file(), None, &svc.reporter()).await.unwrap();
        assert_eq!(lock(&svc.history).count().unwrap(), 0);
    }

    #[tokio::test]
    async fn history_can_be_switched_off() {
        let svc = ConversionService::in_memory(AppConfig {
            record_history: false,
            ..AppConfig::default()
        })
        .unwrap();
        svc.convert(&text_file(), Some("alice"), &svc.reporter()).await.unwrap();
        assert!(svc.history("alice").unwrap().is_empty());
    }

    #[tokio::test]
    async fn preferred_paper_size_is_used() {
        let svc = service();
        svc.save_preferences(
            "alice",
            &Preferences {
                default_page_size: PaperSize::Letter,
                ..Preferences::default()
            },
        )
        .unwrap();

        let artifact = svc.convert(&text_file(), Some("alice"), &svc.reporter()).await.unwrap();
        let ArtifactLayout::Text { page, .. } = artifact.layout else {
            panic!("expected text layout");
        };
        assert_eq!(page.width, 612.0);

        let anonymous = svc.convert(&text_file(), None, &svc.reporter()).await.unwrap();
        let ArtifactLayout::Text { page, .. } = anonymous.layout else {
            panic!("expected text layout");
        };
        assert!((page.width - 595.28).abs() < 0.01);
    }

    #[test]
    fn oversized_selection_is_rejected() {
        let svc = ConversionService::in_memory(AppConfig {
            max_selection_bytes: 4,
            ..AppConfig::default()
        })
        .unwrap();
        let outcome = svc.select([
            SourceFile::from_bytes("a.txt", "text/plain", b"ok".to_vec()),
            SourceFile::from_bytes("b.txt", "text/plain", b"too long".to_vec()),
        ]);
        assert_eq!(outcome.accepted.len(), 1);
        assert!(matches!(outcome.rejected[0].1, PdfifyError::FileTooLarge { .. }));
    }

    #[test]
    fn config_persists_across_restarts() {
        let dir = tempfile::tempdir().unwrap();
        let svc = ConversionService::open(dir.path()).unwrap();
        assert_eq!(svc.config(), AppConfig::default());

        let config = AppConfig {
            default_paper_size: PaperSize::Legal,
            ..AppConfig::default()
        };
        svc.save_config(&config).unwrap();
        drop(svc);

        let reopened = ConversionService::open(dir.path()).unwrap();
        assert_eq!(reopened.config().default_paper_size, PaperSize::Legal);
    }

    #[test]
    fn corrupt_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        let svc = ConversionService::open(dir.path()).unwrap();
        assert_eq!(svc.config(), AppConfig::default());
    }
}
