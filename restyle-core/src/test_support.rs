//! Shared fixtures and mock collaborators for unit tests.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::collections::VecDeque;
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use parking_lot::Mutex;

use crate::models::config::CameraConstraints;
use crate::models::error::RestyleError;
use crate::models::image_models::StyledResult;
use crate::models::state::SessionState;
use crate::session::camera::CameraState;
use crate::session::transform::TransformRequest;
use crate::traits::camera_device::{CameraDevice, CameraStream};
use crate::traits::session_delegate::SessionDelegate;
use crate::traits::share_target::{SharePayload, ShareTarget};
use crate::traits::transform_provider::{TransformFailure, TransformProvider};

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| Rgba([(x * 40) as u8, (y * 40) as u8, 128, 255]));
    let mut buf = Cursor::new(Vec::new());
    PngEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
        .unwrap();
    buf.into_inner()
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let rgb = vec![200u8; (width * height * 3) as usize];
    let mut buf = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buf, 90)
        .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf.into_inner()
}

/// Camera whose streams count how often they are stopped.
pub struct MockCamera {
    pub available: bool,
    pub deny: Option<String>,
    pub frame: RgbaImage,
    pub opened: AtomicUsize,
    pub stopped: Arc<AtomicUsize>,
    pub last_constraints: Mutex<Option<CameraConstraints>>,
}

impl MockCamera {
    pub fn new() -> Self {
        // Left column red so mirroring is observable.
        let frame = RgbaImage::from_fn(8, 6, |x, _| {
            if x == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        Self {
            available: true,
            deny: None,
            frame,
            opened: AtomicUsize::new(0),
            stopped: Arc::new(AtomicUsize::new(0)),
            last_constraints: Mutex::new(None),
        }
    }

    pub fn denying(reason: &str) -> Self {
        Self {
            deny: Some(reason.to_string()),
            ..Self::new()
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn stopped(&self) -> usize {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn stream(&self) -> Box<dyn CameraStream> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Box::new(MockStream {
            frame: self.frame.clone(),
            stopped: Arc::clone(&self.stopped),
        })
    }
}

impl CameraDevice for MockCamera {
    fn is_available(&self) -> bool {
        self.available
    }

    fn request_stream(&self, constraints: &CameraConstraints) -> Result<Box<dyn CameraStream>, RestyleError> {
        *self.last_constraints.lock() = Some(constraints.clone());
        if let Some(reason) = &self.deny {
            return Err(RestyleError::CameraUnavailable(reason.clone()));
        }
        Ok(self.stream())
    }
}

pub struct MockStream {
    frame: RgbaImage,
    stopped: Arc<AtomicUsize>,
}

impl CameraStream for MockStream {
    fn resolution(&self) -> (u32, u32) {
        self.frame.dimensions()
    }

    fn grab_frame(&mut self) -> Result<RgbaImage, RestyleError> {
        Ok(self.frame.clone())
    }

    fn stop(&mut self) {
        self.stopped.fetch_add(1, Ordering::SeqCst);
    }
}

/// Camera whose requests each block on their own gate.
///
/// Request `n` takes the `n`th gate and is granted a black frame of the
/// paired size, so tests can tell which request a live stream came from.
pub struct GatedCamera {
    started: Mutex<Sender<()>>,
    gates: Mutex<VecDeque<(Receiver<()>, (u32, u32))>>,
    pub stopped: Arc<AtomicUsize>,
}

impl GatedCamera {
    pub fn new(started: Sender<()>, gates: Vec<(Receiver<()>, (u32, u32))>) -> Self {
        Self {
            started: Mutex::new(started),
            gates: Mutex::new(gates.into()),
            stopped: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn stopped(&self) -> usize {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl CameraDevice for GatedCamera {
    fn is_available(&self) -> bool {
        true
    }

    fn request_stream(&self, _constraints: &CameraConstraints) -> Result<Box<dyn CameraStream>, RestyleError> {
        let Some((gate, (width, height))) = self.gates.lock().pop_front() else {
            return Err(RestyleError::CameraUnavailable("no more gated requests".into()));
        };
        let _ = self.started.lock().send(());
        let _ = gate.recv();
        Ok(Box::new(MockStream {
            frame: RgbaImage::new(width, height),
            stopped: Arc::clone(&self.stopped),
        }))
    }
}

/// Transform provider with a scripted answer.
pub struct MockTransform {
    pub answer: Result<Vec<u8>, TransformFailure>,
    pub calls: AtomicUsize,
    pub last_request: Mutex<Option<TransformRequest>>,
}

impl MockTransform {
    pub fn returning(bytes: &[u8]) -> Self {
        Self::answering(Ok(bytes.to_vec()))
    }

    pub fn failing(failure: TransformFailure) -> Self {
        Self::answering(Err(failure))
    }

    fn answering(answer: Result<Vec<u8>, TransformFailure>) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TransformProvider for MockTransform {
    fn transform(&self, request: &TransformRequest) -> Result<Vec<u8>, TransformFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock() = Some(request.clone());
        self.answer.clone()
    }
}

/// Transform provider that blocks its first call until released.
pub struct GatedTransform {
    pub calls: AtomicUsize,
    started: Mutex<Sender<()>>,
    gate: Mutex<Receiver<()>>,
}

impl GatedTransform {
    pub fn new(started: Sender<()>, gate: Receiver<()>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            started: Mutex::new(started),
            gate: Mutex::new(gate),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TransformProvider for GatedTransform {
    fn transform(&self, _request: &TransformRequest) -> Result<Vec<u8>, TransformFailure> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call == 0 {
            let _ = self.started.lock().send(());
            let _ = self.gate.lock().recv();
        }
        Ok(b"slow".to_vec())
    }
}

/// Share target with scripted support and outcome.
pub struct MockShare {
    pub supported: bool,
    pub outcome: Result<(), String>,
    pub shared: Mutex<Vec<SharePayload>>,
}

impl MockShare {
    pub fn new(supported: bool, outcome: Result<(), String>) -> Self {
        Self {
            supported,
            outcome,
            shared: Mutex::new(Vec::new()),
        }
    }
}

impl ShareTarget for MockShare {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn can_share(&self, _payload: &SharePayload) -> bool {
        self.supported
    }

    fn share(&self, payload: &SharePayload) -> Result<(), String> {
        self.shared.lock().push(payload.clone());
        self.outcome.clone()
    }
}

/// Delegate that records every notification.
#[derive(Default)]
pub struct RecordingDelegate {
    pub states: Mutex<Vec<&'static str>>,
    pub camera_states: Mutex<Vec<CameraState>>,
    pub errors: Mutex<Vec<RestyleError>>,
    pub results: Mutex<Vec<StyledResult>>,
}

impl SessionDelegate for RecordingDelegate {
    fn on_state_changed(&self, state: &SessionState) {
        self.states.lock().push(state.name());
    }

    fn on_camera_state_changed(&self, state: &CameraState) {
        self.camera_states.lock().push(state.clone());
    }

    fn on_error(&self, error: &RestyleError) {
        self.errors.lock().push(error.clone());
    }

    fn on_result_ready(&self, result: &StyledResult) {
        self.results.lock().push(result.clone());
    }
}
