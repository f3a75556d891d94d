// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image fit-to-page layout.

use pdfify_core::error::{PdfifyError, Result};
use pdfify_core::{Orientation, PageGeometry, PaperSize, PlacedImage};

/// Choose the page for an image of `natural_width` x `natural_height` and the
/// centred rectangle it is drawn into.
///
/// Wider-than-tall images get a landscape page; square and tall images get a
/// portrait one. The image is scaled by the largest factor that keeps it
/// inside the page, which enlarges images smaller than the page.
pub fn layout_image(
    natural_width: f32,
    natural_height: f32,
    paper: PaperSize,
) -> Result<(PageGeometry, PlacedImage)> {
    let valid = |v: f32| v.is_finite() && v > 0.0;
    if !valid(natural_width) || !valid(natural_height) {
        return Err(PdfifyError::InvalidDimensions {
            width: natural_width,
            height: natural_height,
        });
    }

    let orientation = if natural_width > natural_height {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    };
    let page = PageGeometry::oriented(paper, orientation);

    let scale_x = page.width / natural_width;
    let scale_y = page.height / natural_height;

    // The limiting side is pinned to the page edge so rounding in the product
    // can never push it past the bounds.
    let (scale, width, height) = if scale_x <= scale_y {
        (scale_x, page.width, (natural_height * scale_x).min(page.height))
    } else {
        (scale_y, (natural_width * scale_y).min(page.width), page.height)
    };

    let placed = PlacedImage {
        x: (page.width - width) / 2.0,
        y: (page.height - height) / 2.0,
        width,
        height,
        scale,
    };

    Ok((page, placed))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZES: &[(f32, f32)] = &[
        (200.0, 100.0),
        (100.0, 200.0),
        (512.0, 512.0),
        (1.0, 4000.0),
        (6000.0, 3.0),
        (3024.0, 4032.0),
        (0.5, 0.25),
        (1920.0, 1080.0),
    ];

    #[test]
    fn orientation_follows_aspect() {
        for &(w, h) in SIZES {
            let (page, _) = layout_image(w, h, PaperSize::A4).unwrap();
            let expected = if w > h { Orientation::Landscape } else { Orientation::Portrait };
            assert_eq!(page.orientation, expected, "{w}x{h}");
            assert_eq!(page.width >= page.height, expected == Orientation::Landscape);
        }
    }

    #[test]
    fn placement_preserves_aspect_and_stays_on_page() {
        for paper in [PaperSize::A4, PaperSize::Letter, PaperSize::Legal] {
            for &(w, h) in SIZES {
                let (page, placed) = layout_image(w, h, paper).unwrap();
                let ratio = placed.width / placed.height;
                assert!(((ratio - w / h) / (w / h)).abs() < 1e-4, "{w}x{h} ratio {ratio}");
                assert!(placed.x >= 0.0 && placed.y >= 0.0);
                assert!(placed.x + placed.width <= page.width + 1e-3);
                assert!(placed.y + placed.height <= page.height + 1e-3);
            }
        }
    }

    #[test]
    fn image_is_centred() {
        let (page, placed) = layout_image(200.0, 100.0, PaperSize::A4).unwrap();
        let right_margin = page.width - placed.x - placed.width;
        let bottom_margin = page.height - placed.y - placed.height;
        assert!((placed.x - right_margin).abs() < 1e-3);
        assert!((placed.y - bottom_margin).abs() < 1e-3);
    }

    #[test]
    fn small_images_are_enlarged() {
        let (_, placed) = layout_image(10.0, 10.0, PaperSize::A4).unwrap();
        assert!(placed.scale > 1.0);
        assert!((placed.width - 595.28).abs() < 1e-3);
    }

    #[test]
    fn square_images_are_portrait() {
        let (page, _) = layout_image(300.0, 300.0, PaperSize::Letter).unwrap();
        assert_eq!(page.orientation, Orientation::Portrait);
    }

    #[test]
    fn degenerate_dimensions_are_rejected() {
        for (w, h) in [(0.0, 100.0), (100.0, -5.0), (f32::NAN, 10.0), (10.0, f32::INFINITY)] {
            let err = layout_image(w, h, PaperSize::A4).unwrap_err();
            assert!(matches!(err, PdfifyError::InvalidDimensions { .. }), "{w}x{h}");
        }
    }
}
