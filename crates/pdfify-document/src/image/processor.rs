// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: decodes source images and re-encodes them through one
// canonical RGB8 path before they are embedded, so the PDF never carries bytes
// tagged with a codec they were not encoded in.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba};
use pdfify_core::error::{PdfifyError, Result};
use tracing::{debug, instrument};

use crate::data_uri::DataUri;

/// Raster formats the image engine converts. Anything else that the decoder
/// recognises is reported as `UnsupportedFormat`.
pub const SUPPORTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// A decoded source image.
///
/// ```ignore
/// let processor = ImageProcessor::from_data_uri("data:image/png;base64,iVBORw0KGgo...")?;
/// let (width, height) = processor.natural_size();
/// let pixels = processor.to_rgb8();
/// ```
#[derive(Debug)]
pub struct ImageProcessor {
    /// The decoded image.
    image: DynamicImage,
    /// Format detected from the bytes, not the declared label.
    format: ImageFormat,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Decode raw encoded bytes (JPEG, PNG, GIF, WebP).
    ///
    /// The format is sniffed from the bytes themselves; the declared media
    /// type is never trusted.
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let format = image::guess_format(data).map_err(|err| {
            PdfifyError::Decode(format!("unrecognised image data: {err}"))
        })?;

        if !SUPPORTED_FORMATS.contains(&format) {
            return Err(PdfifyError::UnsupportedFormat(format!(
                "{format:?} images cannot be converted"
            )));
        }

        let image = image::load_from_memory_with_format(data, format).map_err(|err| {
            PdfifyError::Decode(format!("failed to decode {format:?} image: {err}"))
        })?;

        debug!(
            ?format,
            width = image.width(),
            height = image.height(),
            "Image decoded"
        );
        Ok(Self { image, format })
    }

    /// Decode the image carried by a textual `data:` URI.
    ///
    /// A malformed URI or payload is a `Decode` error.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let uri = DataUri::parse(uri)?;
        debug!(media_type = uri.media_type(), payload_len = uri.data().len(), "Data URI parsed");
        Self::from_bytes(uri.data())
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self {
            image,
            format: ImageFormat::Png,
        }
    }

    // -- Accessors ------------------------------------------------------------

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Natural dimensions as layout inputs.
    pub fn natural_size(&self) -> (f32, f32) {
        (self.image.width() as f32, self.image.height() as f32)
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    // -- Output ---------------------------------------------------------------

    /// Canonical RGB8 pixels. Transparent areas are composited onto white,
    /// which is what they look like on a printed page.
    pub fn to_rgb8(&self) -> RgbImage {
        if !self.image.color().has_alpha() {
            return self.image.to_rgb8();
        }

        let rgba = self.image.to_rgba8();
        RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
            let blend = |channel: u8| -> u8 {
                let alpha = a as u16;
                ((channel as u16 * alpha + 255 * (255 - alpha)) / 255) as u8
            };
            Rgb([blend(r), blend(g), blend(b)])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use std::io::Cursor;

    fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buffer = Vec::new();
        image.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
        buffer
    }

    #[test]
    fn decodes_png_dimensions() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(40, 10));
        let processor = ImageProcessor::from_bytes(&encode(&img, ImageFormat::Png)).unwrap();
        assert_eq!(processor.natural_size(), (40.0, 10.0));
        assert_eq!(processor.format(), ImageFormat::Png);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = ImageProcessor::from_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, PdfifyError::Decode(_)));
    }

    #[test]
    fn truncated_png_is_a_decode_error() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(64, 64));
        let bytes = encode(&img, ImageFormat::Png);
        let err = ImageProcessor::from_bytes(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, PdfifyError::Decode(_)));
    }

    #[test]
    fn recognised_but_unsupported_format() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let err = ImageProcessor::from_bytes(&encode(&img, ImageFormat::Bmp)).unwrap_err();
        assert!(matches!(err, PdfifyError::UnsupportedFormat(_)));
    }

    #[test]
    fn decodes_from_data_uri_text() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(12, 30));
        let uri = DataUri::new("image/png", encode(&img, ImageFormat::Png)).to_string();
        assert!(uri.starts_with("data:image/png;base64,iVBORw0KGgo"));

        let processor = ImageProcessor::from_data_uri(&uri).unwrap();
        assert_eq!(processor.natural_size(), (12.0, 30.0));
    }

    #[test]
    fn corrupt_data_uri_is_a_decode_error() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let mut uri = DataUri::new("image/png", encode(&img, ImageFormat::Png)).to_string();
        uri.push('!');
        assert!(matches!(ImageProcessor::from_data_uri(&uri), Err(PdfifyError::Decode(_))));
        assert!(matches!(
            ImageProcessor::from_data_uri("image/png;base64,AAAA"),
            Err(PdfifyError::Decode(_))
        ));
    }

    #[test]
    fn transparency_becomes_white() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0])));
        let rgb = ImageProcessor::from_dynamic(img).to_rgb8();
        assert_eq!(*rgb.get_pixel(0, 0), Rgb([255, 255, 255]));
    }
}
