use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// Encoded image bytes plus their media type.
///
/// The payload is reference-counted so session snapshots handed to the UI
/// do not copy image data.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    payload: Arc<[u8]>,
    media_type: String,
}

impl EncodedImage {
    pub fn new(payload: impl Into<Arc<[u8]>>, media_type: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            media_type: media_type.into(),
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.payload)
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.to_base64())
    }
}

impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedImage")
            .field("media_type", &self.media_type)
            .field("len", &self.payload.len())
            .finish()
    }
}

/// The photo the user supplied, normalized and owned by the current session.
///
/// Immutable after creation. The display URL is revoked by the controller
/// when the image is replaced or discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    id: String,
    display_url: String,
    image: EncodedImage,
}

impl SourceImage {
    pub fn new(display_url: String, image: EncodedImage) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            display_url,
            image,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_url(&self) -> &str {
        &self.display_url
    }

    pub fn encoded(&self) -> &EncodedImage {
        &self.image
    }

    pub fn payload(&self) -> &[u8] {
        self.image.payload()
    }

    pub fn media_type(&self) -> &str {
        self.image.media_type()
    }
}

/// Output of a successful style transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledResult {
    image: EncodedImage,
}

impl StyledResult {
    pub fn new(image: EncodedImage) -> Self {
        Self { image }
    }

    pub fn encoded(&self) -> &EncodedImage {
        &self.image
    }

    pub fn payload(&self) -> &[u8] {
        self.image.payload()
    }

    pub fn media_type(&self) -> &str {
        self.image.media_type()
    }

    pub fn to_data_url(&self) -> String {
        self.image.to_data_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_carries_media_type() {
        let image = EncodedImage::new(vec![1u8, 2, 3], "image/png");
        assert_eq!(image.to_data_url(), "data:image/png;base64,AQID");
    }

    #[test]
    fn source_images_get_distinct_ids() {
        let image = EncodedImage::new(vec![0u8; 4], "image/jpeg");
        let a = SourceImage::new("blob:a".into(), image.clone());
        let b = SourceImage::new("blob:a".into(), image);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn debug_omits_payload_bytes() {
        let image = EncodedImage::new(vec![7u8; 1024], "image/jpeg");
        let rendered = format!("{:?}", image);
        assert!(rendered.contains("len: 1024"));
        assert!(!rendered.contains("7, 7"));
    }
}
