// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Where PDFify keeps its databases and config file.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "pdfify";

/// Return the application data directory, creating it if needed.
pub fn data_dir() -> PathBuf {
    let dir = base_dir(
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
    .join(APP_DIR);
    if let Err(err) = std::fs::create_dir_all(&dir) {
        tracing::warn!(path = %dir.display(), %err, "could not create data directory");
    }
    dir
}

/// XDG data home, then `~/.local/share`, then `/tmp`.
fn base_dir(xdg_data_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    if let Some(xdg) = xdg_data_home.filter(|p| !p.as_os_str().is_empty()) {
        return xdg;
    }
    if let Some(home) = home.filter(|p| !p.as_os_str().is_empty()) {
        return home.join(".local").join("share");
    }
    Path::new("/tmp").to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_xdg() {
        let base = base_dir(Some("/xdg".into()), Some("/home/u".into()));
        assert_eq!(base, PathBuf::from("/xdg"));
    }

    #[test]
    fn falls_back_to_home_then_tmp() {
        assert_eq!(
            base_dir(None, Some("/home/u".into())),
            PathBuf::from("/home/u/.local/share")
        );
        assert_eq!(base_dir(Some("".into()), None), PathBuf::from("/tmp"));
    }
}
