//! Content validation for fetched payloads.
//!
//! A payload is accepted only when its bytes begin with the magic signature
//! of a format on the explicit allow-list. The declared `Content-Type` is
//! attacker-controlled and never overrides the bytes: a misleading header on
//! a valid image is accepted (with a warning), and a correct-looking header
//! on a non-image payload is rejected.

use thiserror::Error;
use tracing::warn;

use crate::fetch::Payload;

/// Image formats the pipeline accepts, identified by byte signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG (`FF D8 FF`)
    Jpeg,
    /// PNG (8-byte signature)
    Png,
    /// GIF (`GIF87a` / `GIF89a`)
    Gif,
    /// WebP (`RIFF....WEBP`)
    Webp,
    /// BMP (`BM`)
    Bmp,
}

/// All allowed formats, in sniffing order.
pub const ALLOWED_FORMATS: [ImageFormat; 5] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::Webp,
    ImageFormat::Bmp,
];

impl ImageFormat {
    /// Canonical on-disk extension for this format (with leading dot).
    #[must_use]
    pub fn canonical_extension(self) -> &'static str {
        match self {
            Self::Jpeg => ".jpg",
            Self::Png => ".png",
            Self::Gif => ".gif",
            Self::Webp => ".webp",
            Self::Bmp => ".bmp",
        }
    }

    /// Extensions accepted as already-canonical for this format.
    #[must_use]
    pub fn extension_aliases(self) -> &'static [&'static str] {
        match self {
            Self::Jpeg => &[".jpeg"],
            _ => &[],
        }
    }

    /// Maps a normalized MIME type to an allowed format.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::Webp),
            "image/bmp" | "image/x-bmp" | "image/x-ms-bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    /// Returns true when `bytes` begins with this format's magic signature.
    #[must_use]
    pub fn matches_signature(self, bytes: &[u8]) -> bool {
        match self {
            Self::Jpeg => bytes.starts_with(&[0xFF, 0xD8, 0xFF]),
            Self::Png => bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
            Self::Gif => bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a"),
            Self::Webp => {
                bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP"
            }
            Self::Bmp => bytes.starts_with(b"BM"),
        }
    }

    /// Detects the format of `bytes` by magic signature, if any matches.
    #[must_use]
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        ALLOWED_FORMATS
            .into_iter()
            .find(|format| format.matches_signature(bytes))
    }
}

/// Reasons a payload is rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The payload is zero bytes long.
    #[error("empty response body")]
    Empty,

    /// The bytes match no allowed image signature.
    #[error("unsupported content (declared type: {})", declared.as_deref().unwrap_or("none"))]
    UnsupportedType {
        /// The declared `Content-Type`, for the report line.
        declared: Option<String>,
    },
}

/// Validates a fetched payload against the image allow-list.
///
/// Pure function of its input apart from a diagnostic warning when the
/// declared content-type disagrees with the sniffed format.
///
/// # Errors
///
/// Returns [`ValidationError::Empty`] for a zero-length body and
/// [`ValidationError::UnsupportedType`] when no allowed signature matches.
pub fn validate(payload: &Payload) -> Result<ImageFormat, ValidationError> {
    if payload.bytes.is_empty() {
        return Err(ValidationError::Empty);
    }

    let Some(detected) = ImageFormat::sniff(&payload.bytes) else {
        return Err(ValidationError::UnsupportedType {
            declared: payload.content_type.clone(),
        });
    };

    if let Some(declared) = payload.content_type.as_deref()
        && let Some(declared_format) = ImageFormat::from_mime(declared)
        && declared_format != detected
    {
        warn!(
            url = %payload.url,
            declared,
            detected = ?detected,
            "declared content-type disagrees with byte signature; trusting bytes"
        );
    }

    Ok(detected)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Minimal valid-looking prefixes per format.
    const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
    const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
    const GIF_BYTES: &[u8] = b"GIF89a\x01\x00\x01\x00";
    const WEBP_BYTES: &[u8] = b"RIFF\x24\x00\x00\x00WEBPVP8 ";
    const BMP_BYTES: &[u8] = b"BM\x3a\x00\x00\x00";

    fn payload(bytes: &[u8], content_type: Option<&str>) -> Payload {
        Payload {
            url: "https://example.com/img".to_string(),
            bytes: bytes.to_vec(),
            content_type: content_type.map(str::to_string),
            filename_hint: None,
        }
    }

    #[test]
    fn test_sniff_detects_each_allowed_format() {
        assert_eq!(ImageFormat::sniff(PNG_BYTES), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::sniff(JPEG_BYTES), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::sniff(GIF_BYTES), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::sniff(WEBP_BYTES), Some(ImageFormat::Webp));
        assert_eq!(ImageFormat::sniff(BMP_BYTES), Some(ImageFormat::Bmp));
    }

    #[test]
    fn test_sniff_rejects_html() {
        assert_eq!(ImageFormat::sniff(b"<!DOCTYPE html><html>"), None);
    }

    #[test]
    fn test_sniff_rejects_riff_without_webp_tag() {
        // A WAV file is RIFF but not WEBP
        assert_eq!(ImageFormat::sniff(b"RIFF\x24\x00\x00\x00WAVEfmt "), None);
    }

    #[test]
    fn test_sniff_rejects_truncated_png_signature() {
        assert_eq!(ImageFormat::sniff(&[0x89, b'P', b'N', b'G']), None);
    }

    #[test]
    fn test_validate_accepts_png_with_matching_type() {
        let result = validate(&payload(PNG_BYTES, Some("image/png")));
        assert_eq!(result, Ok(ImageFormat::Png));
    }

    #[test]
    fn test_validate_accepts_image_despite_misleading_type() {
        // Signature is authoritative; a text/html header on PNG bytes is accepted
        let result = validate(&payload(PNG_BYTES, Some("text/html")));
        assert_eq!(result, Ok(ImageFormat::Png));
    }

    #[test]
    fn test_validate_accepts_image_with_absent_type() {
        let result = validate(&payload(JPEG_BYTES, None));
        assert_eq!(result, Ok(ImageFormat::Jpeg));
    }

    #[test]
    fn test_validate_accepts_mismatched_declared_image_type() {
        // image/png header on JPEG bytes: bytes win
        let result = validate(&payload(JPEG_BYTES, Some("image/png")));
        assert_eq!(result, Ok(ImageFormat::Jpeg));
    }

    #[test]
    fn test_validate_rejects_html_despite_image_type() {
        let result = validate(&payload(b"<html>not an image</html>", Some("image/png")));
        assert_eq!(
            result,
            Err(ValidationError::UnsupportedType {
                declared: Some("image/png".to_string())
            })
        );
    }

    #[test]
    fn test_validate_rejects_script_content() {
        let result = validate(&payload(b"#!/bin/sh\nrm -rf /", None));
        assert!(matches!(result, Err(ValidationError::UnsupportedType { .. })));
    }

    #[test]
    fn test_validate_rejects_empty_body() {
        let result = validate(&payload(b"", Some("image/png")));
        assert_eq!(result, Err(ValidationError::Empty));
    }

    #[test]
    fn test_canonical_extensions() {
        assert_eq!(ImageFormat::Jpeg.canonical_extension(), ".jpg");
        assert_eq!(ImageFormat::Png.canonical_extension(), ".png");
        assert_eq!(ImageFormat::Gif.canonical_extension(), ".gif");
        assert_eq!(ImageFormat::Webp.canonical_extension(), ".webp");
        assert_eq!(ImageFormat::Bmp.canonical_extension(), ".bmp");
    }

    #[test]
    fn test_from_mime_allow_list() {
        assert_eq!(ImageFormat::from_mime("image/jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_mime("image/jpg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_mime("image/webp"), Some(ImageFormat::Webp));
        assert_eq!(ImageFormat::from_mime("image/svg+xml"), None);
        assert_eq!(ImageFormat::from_mime("text/html"), None);
        assert_eq!(ImageFormat::from_mime("application/octet-stream"), None);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(ValidationError::Empty.to_string(), "empty response body");
        let err = ValidationError::UnsupportedType {
            declared: Some("text/html".to_string()),
        };
        assert!(err.to_string().contains("text/html"));
        let err = ValidationError::UnsupportedType { declared: None };
        assert!(err.to_string().contains("none"));
    }
}
