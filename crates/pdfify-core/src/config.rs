// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::MM_PER_PT;

/// Largest file accepted for selection: 10 MiB.
pub const DEFAULT_MAX_SELECTION_BYTES: u64 = 10 * 1024 * 1024;

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Paper size used when no user preference applies.
    pub default_paper_size: crate::PaperSize,
    /// Upper bound on selected file size in bytes.
    pub max_selection_bytes: u64,
    /// Record successful conversions in the history database.
    pub record_history: bool,
    pub text: TextConfig,
    pub progress: ProgressConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_paper_size: crate::PaperSize::A4,
            max_selection_bytes: DEFAULT_MAX_SELECTION_BYTES,
            record_history: true,
            text: TextConfig::default(),
            progress: ProgressConfig::default(),
        }
    }
}

/// Typography for plain-text conversion (built-in Helvetica).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub font_size_pt: f32,
    /// Line height as a multiple of the font size.
    pub line_height_factor: f32,
    /// Margin applied on every side, in millimetres.
    pub margin_mm: f32,
}

impl TextConfig {
    pub fn margin_pt(&self) -> f32 {
        self.margin_mm / MM_PER_PT
    }

    pub fn line_height_pt(&self) -> f32 {
        self.font_size_pt * self.line_height_factor
    }

    /// Wrap boundary for a page `page_width_pt` wide.
    pub fn printable_width_pt(&self, page_width_pt: f32) -> f32 {
        page_width_pt - 2.0 * self.margin_pt()
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_size_pt: 16.0,
            line_height_factor: 1.15,
            margin_mm: 15.0,
        }
    }
}

/// Cadence of the progress ticker shown while a conversion runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Percentage added per tick.
    pub step: u8,
    pub interval_ms: u64,
    /// Highest value the ticker may reach. Clamped below 100.
    pub cap: u8,
}

impl ProgressConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }

    /// The cap actually enforced: never 100, since only completion may report it.
    pub fn effective_cap(&self) -> u8 {
        self.cap.min(99)
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            step: 10,
            interval_ms: 200,
            cap: 90,
        }
    }
}
