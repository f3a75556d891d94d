// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the layout engines in the pdfify-document crate.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use pdfify_core::PaperSize;
use pdfify_core::config::TextConfig;
use pdfify_document::{layout_image, layout_text};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Wrap roughly 60 KB of prose at the default A4 printable width. This is
/// about the size of a long plain-text file and exercises the per-character
/// width lookup on every word.
fn bench_text_wrap(c: &mut Criterion) {
    let style = TextConfig::default();
    let (a4_w, _) = PaperSize::A4.dimensions_pt();
    let width = style.printable_width_pt(a4_w);
    let text = "The quick brown fox jumps over the lazy dog.\n".repeat(1400);

    c.bench_function("layout_text (60 KB, A4)", |b| {
        b.iter(|| {
            let layout = layout_text(black_box(&text), width, &style).unwrap();
            black_box(layout.lines.len());
        });
    });
}

fn bench_image_fit(c: &mut Criterion) {
    c.bench_function("layout_image (4032x3024)", |b| {
        b.iter(|| layout_image(black_box(4032.0), black_box(3024.0), PaperSize::A4).unwrap());
    });
}

criterion_group!(benches, bench_text_wrap, bench_image_fit);
criterion_main!(benches);
