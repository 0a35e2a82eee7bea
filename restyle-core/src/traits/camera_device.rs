use image::RgbaImage;

use crate::models::config::CameraConstraints;
use crate::models::error::RestyleError;

/// A platform camera that can hand out live video streams.
///
/// Implemented by platform backends (browser `getUserMedia`, desktop
/// capture APIs). Requests are video-only; `constraints.audio` is always
/// false for the capture view.
pub trait CameraDevice: Send + Sync {
    /// Whether any camera is present.
    fn is_available(&self) -> bool;

    /// Request a live stream.
    ///
    /// Permission denial or a missing device must be reported as
    /// `RestyleError::CameraUnavailable` with a human-readable cause.
    fn request_stream(&self, constraints: &CameraConstraints) -> Result<Box<dyn CameraStream>, RestyleError>;
}

/// An open, exclusively-held video stream.
pub trait CameraStream: Send {
    /// Negotiated native resolution of the stream.
    fn resolution(&self) -> (u32, u32);

    /// Grab the current frame at native resolution, unmirrored.
    fn grab_frame(&mut self) -> Result<RgbaImage, RestyleError>;

    /// Stop every track of the stream. Called exactly once.
    fn stop(&mut self);
}
