// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `data:` URIs: the textual form image bytes take between reading and decoding.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use pdfify_core::error::{PdfifyError, Result};

/// Media type used when the source carries no declared type.
pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// A parsed base64 `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    media_type: String,
    data: Vec<u8>,
}

impl DataUri {
    /// Wrap raw bytes under `media_type`.
    pub fn new(media_type: &str, data: Vec<u8>) -> Self {
        let media_type = if media_type.is_empty() {
            FALLBACK_MEDIA_TYPE
        } else {
            media_type
        };
        Self {
            media_type: media_type.to_string(),
            data,
        }
    }

    /// Parse `data:<type>;base64,<payload>`.
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| PdfifyError::Decode("not a data URI".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| PdfifyError::Decode("data URI has no payload separator".into()))?;
        let media_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| PdfifyError::Decode("data URI is not base64-encoded".into()))?;
        let data = STANDARD
            .decode(payload)
            .map_err(|err| PdfifyError::Decode(format!("invalid base64 payload: {err}")))?;
        Ok(Self::new(media_type, data))
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl std::fmt::Display for DataUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "data:{};base64,{}", self.media_type, STANDARD.encode(&self.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_then_parse() {
        let uri = DataUri::new("image/png", vec![0x89, b'P', b'N', b'G']);
        let text = uri.to_string();
        assert!(text.starts_with("data:image/png;base64,"));
        assert_eq!(DataUri::parse(&text).unwrap(), uri);
    }

    #[test]
    fn empty_type_falls_back() {
        let uri = DataUri::new("", vec![1, 2, 3]);
        assert_eq!(uri.media_type(), FALLBACK_MEDIA_TYPE);
    }

    #[test]
    fn rejects_malformed_uris() {
        assert!(matches!(DataUri::parse("image/png;base64,AAAA"), Err(PdfifyError::Decode(_))));
        assert!(matches!(DataUri::parse("data:image/png,AAAA"), Err(PdfifyError::Decode(_))));
        assert!(matches!(DataUri::parse("data:image/png;base64,@@@"), Err(PdfifyError::Decode(_))));
    }
}
