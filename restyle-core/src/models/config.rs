use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which camera to prefer when opening a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    /// Front-facing ("selfie") camera.
    User,
    /// Rear camera.
    Environment,
}

/// Constraints passed to `CameraDevice::request_stream`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConstraints {
    pub facing: CameraFacing,
    pub audio: bool,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            facing: CameraFacing::User,
            audio: false,
        }
    }
}

/// Encoding used for camera stills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "format")]
pub enum CaptureFormat {
    Jpeg { quality: u8 },
    Png,
}

impl CaptureFormat {
    pub fn media_type(&self) -> &'static str {
        match self {
            Self::Jpeg { .. } => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

impl Default for CaptureFormat {
    fn default() -> Self {
        Self::Jpeg { quality: 92 }
    }
}

/// Configuration for a restyle session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfiguration {
    /// Stream constraints for the capture view (default: front camera, no audio).
    pub camera: CameraConstraints,

    /// Encoding for camera stills (default: JPEG, quality 92).
    pub capture_format: CaptureFormat,

    /// File name stem for downloads; the extension follows the result media type.
    pub download_base_name: String,

    /// Fixed title attached to shared files.
    pub share_title: String,

    /// Fixed description attached to shared files.
    pub share_text: String,

    /// Directory where downloads are written.
    pub export_directory: PathBuf,

    /// Write a JSON metadata sidecar next to each download (default: false).
    pub write_export_metadata: bool,
}

impl SessionConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if let CaptureFormat::Jpeg { quality } = self.capture_format {
            if !(1..=100).contains(&quality) {
                return Err(format!("unsupported jpeg quality: {}", quality));
            }
        }
        let base = self.download_base_name.trim();
        if base.is_empty() {
            return Err("download base name must not be empty".into());
        }
        if base.contains(['/', '\\']) {
            return Err(format!("download base name contains a path separator: {}", base));
        }
        if self.share_title.trim().is_empty() {
            return Err("share title must not be empty".into());
        }
        Ok(())
    }
}

impl Default for SessionConfiguration {
    fn default() -> Self {
        Self {
            camera: CameraConstraints::default(),
            capture_format: CaptureFormat::default(),
            download_base_name: "restyled-photo".into(),
            share_title: "My new look".into(),
            share_text: "Check out my new hairstyle!".into(),
            export_directory: PathBuf::from("."),
            write_export_metadata: false,
        }
    }
}
