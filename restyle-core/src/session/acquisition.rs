use std::io::{Cursor, Read};
use std::path::PathBuf;
use std::sync::Arc;

use crate::models::error::RestyleError;
use crate::models::image_models::{EncodedImage, SourceImage};
use crate::processing::codec::ImageCodec;
use crate::traits::url_store::ObjectUrlStore;

/// Where a new source image comes from.
pub enum AcquisitionSource {
    /// A dropped or picked file, read through the codec.
    File {
        name: String,
        declared_type: Option<String>,
        reader: Box<dyn Read + Send>,
    },
    /// A file on disk.
    Path(PathBuf),
    /// A still produced by the capture view.
    Capture(EncodedImage),
}

impl AcquisitionSource {
    pub fn bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::File {
            name: name.into(),
            declared_type: None,
            reader: Box::new(Cursor::new(bytes)),
        }
    }

    pub fn reader(name: impl Into<String>, declared_type: Option<String>, reader: impl Read + Send + 'static) -> Self {
        Self::File {
            name: name.into(),
            declared_type,
            reader: Box::new(reader),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::File { name, .. } => format!("file {}", name),
            Self::Path(path) => format!("path {}", path.display()),
            Self::Capture(_) => "camera capture".to_string(),
        }
    }
}

/// Single producer of normalized source images.
///
/// Routes files and camera stills through the codec and mints a display
/// URL for the result. The controller decides whether the image becomes
/// current; a discarded image must be handed back to `release`.
pub struct ImageAcquisition {
    urls: Arc<dyn ObjectUrlStore>,
}

impl ImageAcquisition {
    pub fn new(urls: Arc<dyn ObjectUrlStore>) -> Self {
        Self { urls }
    }

    pub fn produce(&self, source: AcquisitionSource) -> Result<SourceImage, RestyleError> {
        let label = source.describe();
        let encoded = match source {
            AcquisitionSource::File {
                declared_type, reader, ..
            } => ImageCodec::encode_with_hint(reader, declared_type.as_deref()),
            AcquisitionSource::Path(path) => ImageCodec::encode_file(&path),
            AcquisitionSource::Capture(image) if image.is_empty() => {
                Err(RestyleError::Decode("camera capture is empty".into()))
            }
            AcquisitionSource::Capture(image) => Ok(image),
        }
        .inspect_err(|e| log::warn!("acquisition: {} failed: {}", label, e))?;

        let url = self.urls.create(&encoded);
        log::info!("acquisition: {} ({}, {} bytes)", label, encoded.media_type(), encoded.len());
        Ok(SourceImage::new(url, encoded))
    }

    /// Revoke the display URL of a source that is no longer shown.
    pub fn release(&self, source: &SourceImage) {
        self.urls.revoke(source.display_url());
    }
}
