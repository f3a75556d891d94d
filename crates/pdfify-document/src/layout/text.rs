// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text wrapping and pagination.
//
// Lines are broken only at spaces, and the run of spaces at a break is
// dropped. Elsewhere spacing is kept as written, leading indentation included;
// tabs count as one space. A token wider than the printable width is placed on
// its own line unsplit. Hard newlines are kept and blank lines survive as
// empty strings.

use pdfify_core::config::TextConfig;
use pdfify_core::error::{PdfifyError, Result};
use pdfify_core::TextLayout;
use tracing::debug;

use super::metrics::HelveticaMetrics;

/// Wrap `text` to `printable_width` points and attach the configured margins.
///
/// Fails with `EmptyInput` when `text` is empty.
pub fn layout_text(text: &str, printable_width: f32, style: &TextConfig) -> Result<TextLayout> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.is_empty() {
        return Err(PdfifyError::EmptyInput);
    }

    let metrics = HelveticaMetrics::new(style.font_size_pt);
    let lines = wrap_text(text, printable_width, &metrics);
    debug!(lines = lines.len(), printable_width, "Text wrapped");

    let margin = style.margin_pt();
    Ok(TextLayout {
        lines,
        margin_left: margin,
        margin_top: margin,
    })
}

/// Greedy word wrap under `metrics`.
pub fn wrap_text(text: &str, printable_width: f32, metrics: &HelveticaMetrics) -> Vec<String> {
    let space = metrics.char_width(' ');
    let mut result = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph).replace('\t', " ");

        let mut current = String::new();
        let mut current_width = 0.0_f32;
        let mut wrapped = false;
        // Set after a break until the next word: the rest of the space run is dropped.
        let mut at_break = false;

        // Consecutive spaces show up as empty words.
        for (idx, word) in paragraph.split(' ').enumerate() {
            if at_break && word.is_empty() {
                continue;
            }
            let word_width = metrics.text_width(word);

            if idx == 0 || at_break {
                current.push_str(word);
                current_width = word_width;
                at_break = false;
            } else if current_width + space + word_width <= printable_width {
                current.push(' ');
                current.push_str(word);
                current_width += space + word_width;
            } else {
                let kept = current.trim_end_matches(' ');
                if !kept.is_empty() {
                    result.push(kept.to_string());
                    wrapped = true;
                }
                current.clear();
                current.push_str(word);
                current_width = word_width;
                at_break = word.is_empty();
            }
        }

        // An empty paragraph still occupies a line; a break at the very end
        // leaves nothing to add.
        if !(at_break && wrapped) {
            result.push(current);
        }
    }

    result
}

/// How many baselines fit between the top and bottom margins of a page
/// `page_height` points tall. Always at least one.
pub fn lines_per_page(page_height: f32, style: &TextConfig) -> usize {
    let usable = page_height - 2.0 * style.margin_pt();
    let line_height = style.line_height_pt();
    if usable <= 0.0 || line_height <= 0.0 {
        return 1;
    }
    (usable / line_height).floor() as usize + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> TextConfig {
        TextConfig::default()
    }

    #[test]
    fn tiny_width_puts_each_word_on_its_own_line() {
        let layout = layout_text("hello world", 1.0, &style()).unwrap();
        assert_eq!(layout.lines, vec!["hello", "world"]);
    }

    #[test]
    fn wide_enough_keeps_one_line() {
        let layout = layout_text("hello world", 500.0, &style()).unwrap();
        assert_eq!(layout.lines, vec!["hello world"]);
    }

    #[test]
    fn overlong_token_is_not_split() {
        let word = "pneumonoultramicroscopicsilicovolcanoconiosis";
        let layout = layout_text(word, 50.0, &style()).unwrap();
        assert_eq!(layout.lines, vec![word]);

        let layout = layout_text(&format!("a {word} b"), 50.0, &style()).unwrap();
        assert_eq!(layout.lines, vec!["a", word, "b"]);
    }

    #[test]
    fn no_line_exceeds_width_unless_single_token() {
        let metrics = HelveticaMetrics::new(16.0);
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(40);
        for width in [60.0, 150.0, 510.0] {
            for line in wrap_text(&text, width, &metrics) {
                assert!(
                    metrics.text_width(&line) <= width || !line.contains(' '),
                    "{line:?} exceeds {width}"
                );
            }
        }
    }

    #[test]
    fn newlines_and_blank_lines_are_kept() {
        let layout = layout_text("first\r\n\r\nsecond\n", 500.0, &style()).unwrap();
        assert_eq!(layout.lines, vec!["first", "", "second", ""]);
    }

    #[test]
    fn spacing_and_indentation_are_kept() {
        let layout = layout_text("    indented  twice", 500.0, &style()).unwrap();
        assert_eq!(layout.lines, vec!["    indented  twice"]);

        let layout = layout_text("a\tb", 500.0, &style()).unwrap();
        assert_eq!(layout.lines, vec!["a b"]);
    }

    #[test]
    fn space_run_at_a_break_is_dropped() {
        let metrics = HelveticaMetrics::new(16.0);
        // "aaa" is 26.7 pt and each space 4.4 pt.
        assert_eq!(wrap_text("aaa   bbb", 40.0, &metrics), vec!["aaa", "bbb"]);
        assert_eq!(wrap_text("  aaa bbb", 40.0, &metrics), vec!["  aaa", "bbb"]);
        assert_eq!(wrap_text("aaa bbb     ", 40.0, &metrics), vec!["aaa", "bbb"]);
    }

    #[test]
    fn blank_indentation_does_not_become_its_own_line() {
        let metrics = HelveticaMetrics::new(16.0);
        assert_eq!(wrap_text("  hello", 1.0, &metrics), vec!["hello"]);
        assert_eq!(wrap_text("   ", 1.0, &metrics), vec![""]);
    }

    #[test]
    fn margins_come_from_config() {
        let layout = layout_text("x", 500.0, &style()).unwrap();
        assert!((layout.margin_left - 42.52).abs() < 0.01);
        assert_eq!(layout.margin_left, layout.margin_top);
    }

    #[test]
    fn empty_text_is_rejected() {
        assert!(matches!(layout_text("", 500.0, &style()), Err(PdfifyError::EmptyInput)));
        assert!(matches!(layout_text("\u{feff}", 500.0, &style()), Err(PdfifyError::EmptyInput)));
    }

    #[test]
    fn deterministic() {
        let text = "lorem ipsum dolor sit amet ".repeat(100);
        let a = layout_text(&text, 200.0, &style()).unwrap();
        let b = layout_text(&text, 200.0, &style()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn a4_page_capacity() {
        // (841.89 - 2 * 42.52) / 18.4 = 41.1 -> 41 gaps, 42 baselines
        assert_eq!(lines_per_page(841.89, &style()), 42);
        assert_eq!(lines_per_page(10.0, &style()), 1);
    }
}
