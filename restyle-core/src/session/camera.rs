use std::sync::Arc;

use crate::models::config::{CameraConstraints, CaptureFormat};
use crate::models::error::RestyleError;
use crate::models::image_models::EncodedImage;
use crate::processing::frame;
use crate::traits::camera_device::{CameraDevice, CameraStream};

/// Capture view state machine.
///
/// State transitions:
/// ```text
/// closed → requesting → live → captured
///              ↓          ↓
///            failed     closed
/// ```
/// Cancelling from requesting, live or failed returns to closed.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraState {
    Closed,
    Requesting,
    Live { width: u32, height: u32 },
    Captured,
    Failed(RestyleError),
}

impl CameraState {
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live { .. })
    }

    pub fn is_requesting(&self) -> bool {
        matches!(self, Self::Requesting)
    }
}

/// Exclusively-held live stream.
///
/// Released exactly once: on `release`, or on drop if never released
/// explicitly. Every exit path of the capture view goes through here.
pub struct CameraResource {
    stream: Option<Box<dyn CameraStream>>,
}

impl CameraResource {
    pub fn new(stream: Box<dyn CameraStream>) -> Self {
        Self { stream: Some(stream) }
    }

    pub fn stream_mut(&mut self) -> Option<&mut (dyn CameraStream + 'static)> {
        self.stream.as_deref_mut()
    }

    /// Stop all tracks. Returns false if already released.
    pub fn release(&mut self) -> bool {
        match self.stream.take() {
            Some(mut stream) => {
                stream.stop();
                log::debug!("camera: stream released");
                true
            }
            None => false,
        }
    }

    pub fn is_released(&self) -> bool {
        self.stream.is_none()
    }
}

impl Drop for CameraResource {
    fn drop(&mut self) {
        self.release();
    }
}

/// Ticket for an outstanding stream request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraRequest {
    id: u64,
}

/// Live camera session backing the capture view.
///
/// Holds at most one `CameraResource`. A grant arriving after the view was
/// closed or reopened is released immediately.
pub struct CameraSession {
    device: Arc<dyn CameraDevice>,
    constraints: CameraConstraints,
    format: CaptureFormat,
    state: CameraState,
    resource: Option<CameraResource>,
    request_id: u64,
}

impl CameraSession {
    pub fn new(device: Arc<dyn CameraDevice>, constraints: CameraConstraints, format: CaptureFormat) -> Self {
        Self {
            device,
            constraints,
            format,
            state: CameraState::Closed,
            resource: None,
            request_id: 0,
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn is_available(&self) -> bool {
        self.device.is_available()
    }

    pub fn constraints(&self) -> &CameraConstraints {
        &self.constraints
    }

    /// Whether a live stream is currently held.
    pub fn holds_resource(&self) -> bool {
        self.resource.as_ref().is_some_and(|r| !r.is_released())
    }

    /// Begin a stream request. Transitions: any → requesting.
    ///
    /// Any held stream is released first.
    pub fn open(&mut self) -> CameraRequest {
        self.release_resource();
        self.request_id += 1;
        self.state = CameraState::Requesting;
        CameraRequest { id: self.request_id }
    }

    /// Deliver the outcome of a stream request.
    ///
    /// Transitions: requesting → live / failed. Stale grants are released.
    pub fn complete_request(
        &mut self,
        request: CameraRequest,
        outcome: Result<Box<dyn CameraStream>, RestyleError>,
    ) -> Result<(), RestyleError> {
        if request.id != self.request_id || !self.state.is_requesting() {
            log::debug!("camera: ignoring stale stream request {}", request.id);
            if let Ok(stream) = outcome {
                drop(CameraResource::new(stream));
            }
            return Ok(());
        }

        match outcome {
            Ok(stream) => {
                let (width, height) = stream.resolution();
                self.resource = Some(CameraResource::new(stream));
                self.state = CameraState::Live { width, height };
                log::info!("camera: live at {}x{}", width, height);
                Ok(())
            }
            Err(e) => {
                let error = match e {
                    RestyleError::CameraUnavailable(_) => e,
                    other => RestyleError::CameraUnavailable(other.to_string()),
                };
                log::warn!("camera: {}", error);
                self.state = CameraState::Failed(error.clone());
                Err(error)
            }
        }
    }

    /// Open and request synchronously from the device.
    pub fn activate(&mut self) -> Result<(), RestyleError> {
        let request = self.open();
        let outcome = if self.device.is_available() {
            self.device.request_stream(&self.constraints)
        } else {
            Err(RestyleError::CameraUnavailable("no camera device found".into()))
        };
        self.complete_request(request, outcome)
    }

    /// Capture a mirrored still and end the session.
    ///
    /// Transitions: live → captured, or live → failed if the frame cannot be
    /// grabbed. The stream is released either way.
    pub fn capture(&mut self) -> Result<EncodedImage, RestyleError> {
        if !self.state.is_live() {
            return Err(RestyleError::CameraUnavailable("camera is not live".into()));
        }

        let grabbed = match self.resource.as_mut().and_then(|r| r.stream_mut()) {
            Some(stream) => stream.grab_frame(),
            None => Err(RestyleError::CameraUnavailable("camera stream is gone".into())),
        };
        self.release_resource();

        match grabbed.and_then(|raw| frame::process_capture(&raw, self.format)) {
            Ok(image) => {
                self.state = CameraState::Captured;
                log::info!("camera: captured still ({} bytes)", image.len());
                Ok(image)
            }
            Err(e) => {
                self.state = CameraState::Failed(e.clone());
                Err(e)
            }
        }
    }

    /// Cancel the capture view. Transitions: any → closed.
    ///
    /// Pending requests become stale.
    pub fn close(&mut self) {
        self.release_resource();
        self.request_id += 1;
        self.state = CameraState::Closed;
    }

    fn release_resource(&mut self) {
        if let Some(mut resource) = self.resource.take() {
            resource.release();
        }
    }
}
