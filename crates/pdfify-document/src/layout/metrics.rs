// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Glyph advance widths for the built-in Helvetica font, used to measure
// rendered line width during text wrapping.
//
// Widths are looked up by WinAnsi byte, so a character is measured as the
// glyph the writer will actually draw for it.

use super::winansi;

/// Advance widths in 1/1000 em for bytes 0x20..=0x7E (Helvetica AFM).
const ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

/// Advance widths for bytes 0x80..=0xFF. Unassigned slots are zero and never
/// produced by the encoder.
const HIGH_WIDTHS: [u16; 128] = [
    556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0, // 0x80
    0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667, // 0x90
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // 0xA0
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // 0xB0
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // 0xC0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // 0xD0
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // 0xE0
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500, // 0xF0
];

/// Width of the glyph at WinAnsi `byte`, in 1/1000 em.
fn glyph_units(byte: u8) -> u16 {
    match byte {
        0x20..=0x7E => ASCII_WIDTHS[usize::from(byte - 0x20)],
        0x80..=0xFF => HIGH_WIDTHS[usize::from(byte - 0x80)],
        _ => ASCII_WIDTHS[usize::from(winansi::REPLACEMENT - 0x20)],
    }
}

/// Measures strings set in Helvetica at a fixed size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelveticaMetrics {
    font_size_pt: f32,
}

impl HelveticaMetrics {
    pub fn new(font_size_pt: f32) -> Self {
        Self { font_size_pt }
    }

    pub fn font_size_pt(&self) -> f32 {
        self.font_size_pt
    }

    /// Advance width of one character in points. Characters outside
    /// WinAnsi are measured as the `?` drawn in their place.
    pub fn char_width(&self, ch: char) -> f32 {
        let byte = winansi::encode_char(ch).unwrap_or(winansi::REPLACEMENT);
        self.units_to_pt(glyph_units(byte))
    }

    /// Rendered width of `text` in points.
    pub fn text_width(&self, text: &str) -> f32 {
        text.chars().map(|ch| self.char_width(ch)).sum()
    }

    /// Width of already-encoded WinAnsi bytes in points.
    pub fn encoded_width(&self, bytes: &[u8]) -> f32 {
        bytes.iter().map(|&byte| self.units_to_pt(glyph_units(byte))).sum()
    }

    fn units_to_pt(&self, units: u16) -> f32 {
        f32::from(units) * self.font_size_pt / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_widths() {
        let metrics = HelveticaMetrics::new(1000.0);
        assert_eq!(metrics.char_width(' '), 278.0);
        assert_eq!(metrics.char_width('@'), 1015.0);
        assert_eq!(metrics.char_width('W'), 944.0);
        assert_eq!(metrics.char_width('i'), 222.0);
        assert_eq!(metrics.char_width('~'), 584.0);
    }

    #[test]
    fn width_scales_with_font_size() {
        let small = HelveticaMetrics::new(10.0).text_width("hello");
        let large = HelveticaMetrics::new(20.0).text_width("hello");
        assert!((large - 2.0 * small).abs() < 1e-4);
        // h e l l o = 556 + 556 + 222 + 222 + 556
        assert!((small - 21.12).abs() < 1e-4);
    }

    #[test]
    fn latin1_and_punctuation_use_their_own_widths() {
        let metrics = HelveticaMetrics::new(1000.0);
        assert_eq!(metrics.char_width('é'), 556.0);
        assert_eq!(metrics.char_width('©'), 737.0);
        assert_eq!(metrics.char_width('Æ'), 1000.0);
        assert_eq!(metrics.char_width('ß'), 611.0);
        assert_eq!(metrics.char_width('—'), 1000.0);
        assert_eq!(metrics.char_width('•'), 350.0);
        assert_eq!(metrics.char_width('\u{2019}'), 222.0);
    }

    #[test]
    fn unmappable_characters_measure_as_question_mark() {
        let metrics = HelveticaMetrics::new(1000.0);
        assert_eq!(metrics.char_width('日'), metrics.char_width('?'));
        assert_eq!(metrics.char_width('🙂'), 556.0);
    }

    #[test]
    fn measured_width_matches_encoded_bytes() {
        let metrics = HelveticaMetrics::new(16.0);
        for text in ["café au lait", "“Smart” — quotes…", "mixed 日本 text ©"] {
            let encoded = winansi::encode(text);
            assert_eq!(metrics.text_width(text), metrics.encoded_width(&encoded), "{text}");
        }
    }
}
