//! Normalizes raw files into `EncodedImage`s.
//!
//! The codec never rejects input by extension or format; only a failed or
//! empty read is an error. Media types are sniffed from magic bytes, then
//! taken from the caller's declared type, then default to JPEG.

use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

use crate::models::error::RestyleError;
use crate::models::image_models::EncodedImage;

/// Media type used when none can be detected.
pub const DEFAULT_MEDIA_TYPE: &str = "image/jpeg";

pub struct ImageCodec;

impl ImageCodec {
    /// Read `reader` fully and produce an encoded image.
    pub fn encode<R: Read>(reader: R) -> Result<EncodedImage, RestyleError> {
        Self::encode_with_hint(reader, None)
    }

    /// Like `encode`, falling back to `declared_type` when sniffing fails.
    pub fn encode_with_hint<R: Read>(mut reader: R, declared_type: Option<&str>) -> Result<EncodedImage, RestyleError> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| RestyleError::Decode(format!("read failed: {}", e)))?;
        if bytes.is_empty() {
            return Err(RestyleError::Decode("input is empty".into()));
        }

        let media_type = Self::detect_media_type(&bytes)
            .or_else(|| declared_type.filter(|t| t.starts_with("image/")))
            .unwrap_or(DEFAULT_MEDIA_TYPE)
            .to_string();

        log::debug!("codec: encoded {} bytes as {}", bytes.len(), media_type);
        Ok(EncodedImage::new(bytes, media_type))
    }

    pub fn encode_file(path: &Path) -> Result<EncodedImage, RestyleError> {
        let file = File::open(path)
            .map_err(|e| RestyleError::Decode(format!("failed to open {}: {}", path.display(), e)))?;
        Self::encode(BufReader::new(file))
    }

    /// Sniff the media type from magic bytes.
    pub fn detect_media_type(bytes: &[u8]) -> Option<&'static str> {
        image::guess_format(bytes).ok().map(|format| format.to_mime_type())
    }

    /// Intrinsic pixel size, if the header can be parsed.
    pub fn dimensions(image: &EncodedImage) -> Option<(u32, u32)> {
        image::ImageReader::new(Cursor::new(image.payload()))
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::test_support::{jpeg_bytes, png_bytes};

    struct BrokenReader;

    impl Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stream truncated"))
        }
    }

    #[test]
    fn detects_png_and_jpeg() {
        let png = ImageCodec::encode(Cursor::new(png_bytes(4, 3))).unwrap();
        assert_eq!(png.media_type(), "image/png");

        let jpeg = ImageCodec::encode(Cursor::new(jpeg_bytes(4, 3))).unwrap();
        assert_eq!(jpeg.media_type(), "image/jpeg");
    }

    #[test]
    fn unknown_bytes_default_to_jpeg() {
        let image = ImageCodec::encode(Cursor::new(b"not an image".to_vec())).unwrap();
        assert_eq!(image.media_type(), DEFAULT_MEDIA_TYPE);
        assert_eq!(image.payload(), b"not an image");
    }

    #[test]
    fn declared_type_used_when_sniffing_fails() {
        let image = ImageCodec::encode_with_hint(Cursor::new(b"????".to_vec()), Some("image/heic")).unwrap();
        assert_eq!(image.media_type(), "image/heic");

        let image = ImageCodec::encode_with_hint(Cursor::new(b"????".to_vec()), Some("text/plain")).unwrap();
        assert_eq!(image.media_type(), DEFAULT_MEDIA_TYPE);
    }

    #[test]
    fn sniffed_type_wins_over_declared() {
        let image = ImageCodec::encode_with_hint(Cursor::new(png_bytes(2, 2)), Some("image/jpeg")).unwrap();
        assert_eq!(image.media_type(), "image/png");
    }

    #[test]
    fn read_failure_is_decode_error() {
        let err = ImageCodec::encode(BrokenReader).unwrap_err();
        assert!(matches!(err, RestyleError::Decode(ref msg) if msg.contains("truncated")));
    }

    #[test]
    fn empty_input_is_decode_error() {
        assert!(matches!(
            ImageCodec::encode(Cursor::new(Vec::new())),
            Err(RestyleError::Decode(_))
        ));
    }

    #[test]
    fn missing_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImageCodec::encode_file(&dir.path().join("missing.jpg")).unwrap_err();
        assert_eq!(err.kind(), crate::models::error::ErrorKind::Decode);
    }

    #[test]
    fn dimensions_from_header() {
        let image = ImageCodec::encode(Cursor::new(jpeg_bytes(16, 9))).unwrap();
        assert_eq!(ImageCodec::dimensions(&image), Some((16, 9)));

        let junk = EncodedImage::new(b"junk".to_vec(), "image/jpeg");
        assert_eq!(ImageCodec::dimensions(&junk), None);
    }
}
