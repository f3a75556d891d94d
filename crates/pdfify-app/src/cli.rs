// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line surface: argument parsing and one handler per subcommand.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pdfify_core::human_errors::{Severity, humanize_error};
use pdfify_core::{MM_PER_PT, PaperSize, PdfQuality, PdfifyError, SourceFile, format_file_size};
use pdfify_document::PdfReader;
use pdfify_document::selection::guess_declared_type;
use tracing::{error, info};

use crate::services::conversion_service::ConversionService;

#[derive(Parser, Debug)]
#[command(name = "pdfify")]
#[command(about = "Convert images and plain-text files to PDF")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Directory holding the history and preference databases.
    #[arg(long, env = "PDFIFY_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (trace/debug/info/warn/error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a file to PDF. Only the first acceptable file is converted.
    Convert {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Record the conversion for this user and apply their preferences.
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Page size override (a4, letter, legal).
        #[arg(long)]
        paper: Option<PaperSize>,
    },
    /// List a user's past conversions, newest first.
    History {
        #[arg(long)]
        user: String,
    },
    /// Show or change a user's preferences.
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
    /// Show the configuration, updating any setting given.
    Config {
        #[arg(long)]
        paper: Option<PaperSize>,
        /// Largest accepted file, in bytes.
        #[arg(long)]
        max_bytes: Option<u64>,
        #[arg(long)]
        record_history: Option<bool>,
    },
    /// Print page count and page sizes of a PDF.
    Inspect { path: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum PrefsAction {
    Show {
        #[arg(long)]
        user: String,
    },
    Set {
        #[arg(long)]
        user: String,
        #[arg(long)]
        paper: Option<PaperSize>,
        #[arg(long)]
        quality: Option<PdfQuality>,
        #[arg(long)]
        auto_download: Option<bool>,
    },
}

pub async fn dispatch(args: Args) -> Result<()> {
    let data_dir = args.data_dir.as_deref();
    match args.cmd {
        Command::Convert {
            paths,
            user,
            out_dir,
            paper,
        } => {
            let svc = open_service(data_dir)?;
            convert(&svc, &paths, user.as_deref(), out_dir.as_deref(), paper).await
        }
        Command::History { user } => history(&open_service(data_dir)?, &user),
        Command::Prefs { action } => prefs(&open_service(data_dir)?, action),
        Command::Config {
            paper,
            max_bytes,
            record_history,
        } => config(&open_service(data_dir)?, paper, max_bytes, record_history),
        Command::Inspect { path } => inspect(&path),
    }
}

fn open_service(data_dir: Option<&Path>) -> Result<ConversionService> {
    if let Some(dir) = data_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create data dir: {}", dir.display()))?;
        return ConversionService::open(dir)
            .with_context(|| format!("open data dir: {}", dir.display()));
    }
    match ConversionService::init() {
        Ok(svc) => Ok(svc),
        Err(err) => {
            error!(error = %err, "persistent storage failed, using in-memory fallback");
            Ok(ConversionService::fallback()?)
        }
    }
}

async fn convert(
    svc: &ConversionService,
    paths: &[PathBuf],
    user: Option<&str>,
    out_dir: Option<&Path>,
    paper: Option<PaperSize>,
) -> Result<()> {
    let files = paths
        .iter()
        .map(|p| source_file(p))
        .collect::<Result<Vec<_>>>()?;

    let outcome = svc.select(files);
    for (file, err) in &outcome.rejected {
        report_failure(&file.name, err);
    }

    let mut accepted = outcome.accepted.into_iter();
    let Some(file) = accepted.next() else {
        bail!("no convertible files selected");
    };
    for skipped in accepted {
        eprintln!("skipped {}: one file is converted per run", skipped.name);
    }

    let reporter = svc.reporter();
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}  [{bar:30.cyan/blue}] {pos:>3}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar.set_message(file.name.clone());

    let mut rx = reporter.subscribe();
    let follower = {
        let bar = bar.clone();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let value = *rx.borrow_and_update();
                bar.set_position(u64::from(value));
            }
        })
    };

    let result = match paper {
        Some(paper) => svc.convert_on(paper, &file, user, &reporter).await,
        None => svc.convert(&file, user, &reporter).await,
    };
    follower.abort();
    bar.set_position(u64::from(reporter.current()));
    bar.finish_and_clear();

    let artifact = match result {
        Ok(artifact) => artifact,
        Err(err) => {
            report_failure(&file.name, &err);
            return Err(anyhow!(err));
        }
    };

    let out_dir = out_dir.unwrap_or_else(|| Path::new("."));
    let out_path = out_dir.join(&artifact.file_name);
    tokio::fs::write(&out_path, &artifact.bytes)
        .await
        .with_context(|| format!("write {}", out_path.display()))?;

    info!(path = %out_path.display(), "artifact written");
    println!(
        "{} -> {} ({} page{}, {})",
        file.name,
        out_path.display(),
        artifact.page_count(),
        if artifact.page_count() == 1 { "" } else { "s" },
        format_file_size(artifact.bytes.len() as u64),
    );
    Ok(())
}

fn source_file(path: &Path) -> Result<SourceFile> {
    let meta = std::fs::metadata(path).with_context(|| format!("stat {}", path.display()))?;
    if !meta.is_file() {
        bail!("{} is not a file", path.display());
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("{} has no file name", path.display()))?;
    let declared = guess_declared_type(&name);
    Ok(SourceFile::on_disk(name, declared, meta.len(), path))
}

fn report_failure(name: &str, err: &PdfifyError) {
    let human = humanize_error(err);
    let note = if human.retriable { " (temporary)" } else { "" };
    eprintln!("{name}: {}{note}", human.message);
    eprintln!("  {}", human.suggestion);
}

/// Exit status for a failed command, following sysexits(3): 75 when trying
/// again may help, 65 when the input has to change, 1 otherwise.
pub fn exit_status(err: &anyhow::Error) -> u8 {
    let Some(err) = err.downcast_ref::<PdfifyError>() else {
        return 1;
    };
    match humanize_error(err).severity {
        Severity::Transient => 75,
        Severity::ActionRequired => 65,
        Severity::Permanent => 1,
    }
}

fn history(svc: &ConversionService, user: &str) -> Result<()> {
    let records = svc.history(user)?;
    if records.is_empty() {
        println!("no conversions recorded for {user}");
        return Ok(());
    }
    for record in records {
        println!(
            "{}  {:<8} {:>10}  {}",
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.original_format,
            format_file_size(record.file_size),
            record.original_filename,
        );
    }
    Ok(())
}

fn prefs(svc: &ConversionService, action: PrefsAction) -> Result<()> {
    match action {
        PrefsAction::Show { user } => {
            let prefs = svc.preferences(&user)?;
            println!("{}", serde_json::to_string_pretty(&prefs)?);
        }
        PrefsAction::Set {
            user,
            paper,
            quality,
            auto_download,
        } => {
            let mut prefs = svc.preferences(&user)?;
            if let Some(paper) = paper {
                prefs.default_page_size = paper;
            }
            if let Some(quality) = quality {
                prefs.pdf_quality = quality;
            }
            if let Some(auto_download) = auto_download {
                prefs.auto_download = auto_download;
            }
            svc.save_preferences(&user, &prefs)?;
            println!("{}", serde_json::to_string_pretty(&prefs)?);
        }
    }
    Ok(())
}

fn config(
    svc: &ConversionService,
    paper: Option<PaperSize>,
    max_bytes: Option<u64>,
    record_history: Option<bool>,
) -> Result<()> {
    let mut config = svc.config();
    let changed = paper.is_some() || max_bytes.is_some() || record_history.is_some();
    if let Some(paper) = paper {
        config.default_paper_size = paper;
    }
    if let Some(max_bytes) = max_bytes {
        config.max_selection_bytes = max_bytes;
    }
    if let Some(record_history) = record_history {
        config.record_history = record_history;
    }
    if changed {
        svc.save_config(&config)?;
    }
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let reader = PdfReader::open(path)?;
    let pages = reader.page_count();
    println!("{}: {pages} page(s)", path.display());
    for n in 1..=pages as u32 {
        let (w, h) = reader.page_size(n)?;
        let lines = reader.page_text(n)?;
        println!(
            "  page {n}: {w:.2} x {h:.2} pt ({:.1} x {:.1} mm), {} text line(s)",
            w * MM_PER_PT,
            h * MM_PER_PT,
            lines.len()
        );
        if let Some(first) = lines.first() {
            println!("    {first}");
        }
    }
    Ok(())
}
