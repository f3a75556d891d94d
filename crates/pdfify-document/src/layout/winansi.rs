// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// WinAnsiEncoding, the single-byte encoding of the built-in PDF fonts.
//
// Text is transcoded here once, so the bytes measured during wrapping are the
// bytes written to the page.

/// Byte written for characters the encoding cannot represent (`?`).
pub const REPLACEMENT: u8 = 0x3F;

/// Code points of 0x80..=0x9F, the range where WinAnsi departs from Latin-1.
const CP1252_HIGH: [(char, u8); 27] = [
    ('\u{20AC}', 0x80), // euro
    ('\u{201A}', 0x82), // quotesinglbase
    ('\u{0192}', 0x83), // florin
    ('\u{201E}', 0x84), // quotedblbase
    ('\u{2026}', 0x85), // ellipsis
    ('\u{2020}', 0x86), // dagger
    ('\u{2021}', 0x87), // daggerdbl
    ('\u{02C6}', 0x88), // circumflex
    ('\u{2030}', 0x89), // perthousand
    ('\u{0160}', 0x8A), // Scaron
    ('\u{2039}', 0x8B), // guilsinglleft
    ('\u{0152}', 0x8C), // OE
    ('\u{017D}', 0x8E), // Zcaron
    ('\u{2018}', 0x91), // quoteleft
    ('\u{2019}', 0x92), // quoteright
    ('\u{201C}', 0x93), // quotedblleft
    ('\u{201D}', 0x94), // quotedblright
    ('\u{2022}', 0x95), // bullet
    ('\u{2013}', 0x96), // endash
    ('\u{2014}', 0x97), // emdash
    ('\u{02DC}', 0x98), // tilde
    ('\u{2122}', 0x99), // trademark
    ('\u{0161}', 0x9A), // scaron
    ('\u{203A}', 0x9B), // guilsinglright
    ('\u{0153}', 0x9C), // oe
    ('\u{017E}', 0x9E), // zcaron
    ('\u{0178}', 0x9F), // Ydieresis
];

/// The WinAnsi byte for `ch`, or `None` if the encoding has no glyph for it.
///
/// Control characters have no glyph either.
pub fn encode_char(ch: char) -> Option<u8> {
    match ch as u32 {
        code @ (0x20..=0x7E | 0xA0..=0xFF) => Some(code as u8),
        _ => CP1252_HIGH
            .iter()
            .find(|(mapped, _)| *mapped == ch)
            .map(|(_, byte)| *byte),
    }
}

/// Transcode `text`, one byte per character. Unmappable characters become
/// [`REPLACEMENT`].
pub fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| encode_char(ch).unwrap_or(REPLACEMENT))
        .collect()
}

/// Inverse of [`encode`]. Bytes with no glyph come back as U+FFFD.
pub fn decode(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&byte| match byte {
            0x20..=0x7E | 0xA0..=0xFF => char::from(byte),
            _ => CP1252_HIGH
                .iter()
                .find(|(_, mapped)| *mapped == byte)
                .map_or(char::REPLACEMENT_CHARACTER, |(ch, _)| *ch),
        })
        .collect()
}
