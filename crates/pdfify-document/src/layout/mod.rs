// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout engines: fit an image onto a page, wrap text into lines.
// Text is measured in the WinAnsi encoding it is written in.
//
// Both engines are pure functions of their inputs. Units are PDF points.

pub mod image;
pub mod metrics;
pub mod text;
pub mod winansi;

pub use image::layout_image;
pub use metrics::HelveticaMetrics;
pub use text::{layout_text, lines_per_page, wrap_text};
