use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::catalog::{StyleCatalog, StyleDirective};
use crate::models::config::SessionConfiguration;
use crate::models::error::RestyleError;
use crate::models::export::ExportReceipt;
use crate::models::image_models::{EncodedImage, SourceImage, StyledResult};
use crate::models::state::{SessionEvent, SessionState};
use crate::processing::codec::ImageCodec;
use crate::processing::comparison::{ComparisonLayer, ComparisonView, Size};
use crate::session::acquisition::{AcquisitionSource, ImageAcquisition};
use crate::session::actions::ResultActions;
use crate::session::camera::{CameraResource, CameraSession, CameraState};
use crate::session::transform::TransformRequest;
use crate::traits::camera_device::CameraDevice;
use crate::traits::session_delegate::SessionDelegate;
use crate::traits::share_target::ShareTarget;
use crate::traits::transform_provider::TransformProvider;
use crate::traits::url_store::ObjectUrlStore;

/// Internal mutable controller state, protected by `parking_lot::Mutex`.
struct ControllerState {
    session: SessionState,
    /// Bumped by every acquisition start and every discard. Completions
    /// carrying an older epoch are stale.
    epoch: u64,
    camera: Option<CameraSession>,
}

impl ControllerState {
    fn new() -> Self {
        Self {
            session: SessionState::Empty,
            epoch: 0,
            camera: None,
        }
    }

    fn camera_state(&self) -> CameraState {
        self.camera
            .as_ref()
            .map(|camera| camera.state().clone())
            .unwrap_or(CameraState::Closed)
    }
}

/// Permission to complete one acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquisitionTicket {
    epoch: u64,
}

/// Permission to complete one transform, carrying the request to execute.
#[derive(Debug, Clone)]
pub struct TransformTicket {
    epoch: u64,
    directive: StyleDirective,
    request: TransformRequest,
}

impl TransformTicket {
    pub fn directive(&self) -> &StyleDirective {
        &self.directive
    }

    pub fn request(&self) -> &TransformRequest {
        &self.request
    }
}

/// Top-level coordinator of a restyle session.
///
/// Every asynchronous operation is split into `begin_*` (which checks the
/// state machine and hands out a ticket) and `complete_*` (which applies the
/// outcome only if the ticket is still current). The convenience methods
/// `acquire`, `capture_from_camera` and `apply_style` run both halves with
/// the blocking call in between, outside the internal lock.
///
/// ```text
/// [upload / camera] → ImageAcquisition → SessionState ← TransformRequest ← [style]
///                                            ↓
///                             ComparisonView / ResultActions
/// ```
pub struct SessionController {
    config: SessionConfiguration,
    catalog: StyleCatalog,
    acquisition: ImageAcquisition,
    camera_device: Option<Arc<dyn CameraDevice>>,
    inner: Arc<Mutex<ControllerState>>,
    delegate: Option<Arc<dyn SessionDelegate>>,
}

impl SessionController {
    pub fn new(
        config: SessionConfiguration,
        catalog: StyleCatalog,
        urls: Arc<dyn ObjectUrlStore>,
    ) -> Result<Self, RestyleError> {
        config.validate().map_err(RestyleError::Configuration)?;
        Ok(Self {
            config,
            catalog,
            acquisition: ImageAcquisition::new(urls),
            camera_device: None,
            inner: Arc::new(Mutex::new(ControllerState::new())),
            delegate: None,
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn SessionDelegate>) {
        self.delegate = Some(delegate);
    }

    /// Replace the camera device. Any session on the previous device is closed.
    pub fn set_camera_device(&mut self, device: Arc<dyn CameraDevice>) {
        if let Some(mut camera) = self.inner.lock().camera.take() {
            camera.close();
        }
        self.camera_device = Some(device);
    }

    pub fn config(&self) -> &SessionConfiguration {
        &self.config
    }

    pub fn catalog(&self) -> &StyleCatalog {
        &self.catalog
    }

    /// Snapshot of the current session state.
    pub fn state(&self) -> SessionState {
        self.inner.lock().session.clone()
    }

    pub fn camera_state(&self) -> CameraState {
        self.inner.lock().camera_state()
    }

    /// Whether a live camera stream is currently held.
    pub fn holds_camera(&self) -> bool {
        self.inner
            .lock()
            .camera
            .as_ref()
            .is_some_and(CameraSession::holds_resource)
    }

    pub fn camera_available(&self) -> bool {
        self.camera_device.as_ref().is_some_and(|d| d.is_available())
    }

    // --- Acquisition ---

    /// Start an acquisition. Returns `None` while another is outstanding.
    ///
    /// Any in-flight transform becomes stale.
    pub fn begin_acquisition(&self) -> Option<AcquisitionTicket> {
        let (ticket, snapshot) = {
            let mut inner = self.inner.lock();
            if inner.session.is_acquiring() {
                log::debug!("controller: acquisition already in progress");
                return None;
            }
            inner.epoch += 1;
            let session = std::mem::take(&mut inner.session);
            inner.session = session.reduce(SessionEvent::AcquisitionStarted);
            (AcquisitionTicket { epoch: inner.epoch }, inner.session.clone())
        };
        self.notify_state(&snapshot);
        Some(ticket)
    }

    /// Apply an acquisition outcome. Returns whether it was applied.
    ///
    /// On success the previous source's display URL is revoked and any prior
    /// result and directive are cleared. On failure the prior content stays.
    pub fn complete_acquisition(
        &self,
        ticket: AcquisitionTicket,
        outcome: Result<SourceImage, RestyleError>,
    ) -> bool {
        let (snapshot, replaced) = {
            let mut inner = self.inner.lock();
            if ticket.epoch != inner.epoch || !inner.session.is_acquiring() {
                log::debug!("controller: dropping stale acquisition (epoch {})", ticket.epoch);
                if let Ok(source) = &outcome {
                    self.acquisition.release(source);
                }
                return false;
            }

            let replaced = match &outcome {
                Ok(_) => inner.session.source_image().cloned(),
                Err(_) => None,
            };
            let event = match &outcome {
                Ok(source) => SessionEvent::AcquisitionSucceeded(source.clone()),
                Err(e) => SessionEvent::AcquisitionFailed(e.clone()),
            };
            let session = std::mem::take(&mut inner.session);
            inner.session = session.reduce(event);
            (inner.session.clone(), replaced)
        };

        if let Some(old) = replaced {
            self.acquisition.release(&old);
        }
        if let Err(e) = &outcome {
            self.notify_error(e);
        }
        self.notify_state(&snapshot);
        true
    }

    /// Acquire a new source image from a file or capture.
    ///
    /// Returns whether the session state changed.
    pub fn acquire(&self, source: AcquisitionSource) -> bool {
        let Some(ticket) = self.begin_acquisition() else {
            return false;
        };
        let outcome = self.acquisition.produce(source);
        self.complete_acquisition(ticket, outcome)
    }

    // --- Camera ---

    /// Open the capture view and request a stream.
    ///
    /// On failure `CameraUnavailable` is recorded as the session's last
    /// error; the session content is left as it was.
    pub fn open_camera(&self) -> Result<(), RestyleError> {
        let Some(device) = self.camera_device.clone() else {
            let error = RestyleError::CameraUnavailable("no camera device configured".into());
            self.record_camera_failure(&error);
            return Err(error);
        };

        let (request, constraints, camera_state) = {
            let mut inner = self.inner.lock();
            let camera = inner.camera.get_or_insert_with(|| {
                CameraSession::new(
                    Arc::clone(&device),
                    self.config.camera.clone(),
                    self.config.capture_format,
                )
            });
            let request = camera.open();
            (request, camera.constraints().clone(), camera.state().clone())
        };
        self.notify_camera(&camera_state);

        let outcome = if device.is_available() {
            device.request_stream(&constraints)
        } else {
            Err(RestyleError::CameraUnavailable("no camera device found".into()))
        };

        let (result, camera_state) = {
            let mut inner = self.inner.lock();
            match inner.camera.as_mut() {
                Some(camera) => (camera.complete_request(request, outcome), camera.state().clone()),
                None => {
                    log::debug!("controller: releasing camera stream with no session to receive it");
                    if let Ok(stream) = outcome {
                        drop(CameraResource::new(stream));
                    }
                    (Ok(()), CameraState::Closed)
                }
            }
        };
        self.notify_camera(&camera_state);

        if let Err(e) = &result {
            self.record_camera_failure(e);
        }
        result
    }

    /// Cancel the capture view, releasing any held stream.
    ///
    /// The camera session is kept so request ids keep increasing; a grant
    /// for a request made before the close is released when it arrives.
    pub fn close_camera(&self) {
        let was_open = {
            let mut inner = self.inner.lock();
            match inner.camera.as_mut() {
                Some(camera) => {
                    let was_open = *camera.state() != CameraState::Closed;
                    camera.close();
                    was_open
                }
                None => false,
            }
        };
        if was_open {
            self.notify_camera(&CameraState::Closed);
        }
    }

    /// Capture a still from the live camera and acquire it as the new source.
    ///
    /// Returns `false` without touching the session when no camera is live,
    /// so an in-flight transform survives a stray capture press. Otherwise
    /// the capture view closes and the stream is released regardless of the
    /// outcome.
    pub fn capture_from_camera(&self) -> bool {
        let live = self
            .inner
            .lock()
            .camera
            .as_ref()
            .is_some_and(|camera| camera.state().is_live());
        if !live {
            log::debug!("controller: capture requested without a live camera");
            return false;
        }
        let Some(ticket) = self.begin_acquisition() else {
            return false;
        };

        let (captured, captured_state, closed) = {
            let mut inner = self.inner.lock();
            match inner.camera.as_mut() {
                Some(camera) => {
                    let captured = camera.capture();
                    let captured_state = camera.state().clone();
                    camera.close();
                    (captured, captured_state, true)
                }
                None => (
                    Err(RestyleError::CameraUnavailable("camera is not open".into())),
                    CameraState::Closed,
                    false,
                ),
            }
        };
        self.notify_camera(&captured_state);
        if closed {
            self.notify_camera(&CameraState::Closed);
        }

        let outcome = captured.and_then(|still| self.acquisition.produce(AcquisitionSource::Capture(still)));
        self.complete_acquisition(ticket, outcome)
    }

    fn record_camera_failure(&self, error: &RestyleError) {
        let snapshot = {
            let mut inner = self.inner.lock();
            let session = std::mem::take(&mut inner.session);
            inner.session = session.reduce(SessionEvent::CameraFailed(error.clone()));
            inner.session.clone()
        };
        self.notify_error(error);
        self.notify_state(&snapshot);
    }

    // --- Transform ---

    /// Start a transform with the catalog directive `directive_id`.
    ///
    /// Returns `None` when no source is present, a transform or acquisition
    /// is outstanding, or the directive is unknown.
    pub fn begin_transform(&self, directive_id: &str) -> Option<TransformTicket> {
        let Some(directive) = self.catalog.find(directive_id).cloned() else {
            log::warn!("controller: unknown style directive {}", directive_id);
            return None;
        };

        let (ticket, snapshot) = {
            let mut inner = self.inner.lock();
            if !inner.session.can_transform() {
                log::debug!(
                    "controller: transform {} refused in state {}",
                    directive.id,
                    inner.session.name()
                );
                return None;
            }
            let source = inner.session.source_image()?;
            let request = TransformRequest::new(source, &directive);

            let session = std::mem::take(&mut inner.session);
            inner.session = session.reduce(SessionEvent::TransformStarted(directive.clone()));
            let ticket = TransformTicket {
                epoch: inner.epoch,
                directive,
                request,
            };
            (ticket, inner.session.clone())
        };

        log::info!("controller: applying style {}", ticket.directive.id);
        self.notify_state(&snapshot);
        Some(ticket)
    }

    /// Apply a transform outcome. Returns whether it was applied.
    ///
    /// Completions for a source that has since been replaced or discarded
    /// are ignored.
    pub fn complete_transform(&self, ticket: TransformTicket, outcome: Result<StyledResult, RestyleError>) -> bool {
        let snapshot = {
            let mut inner = self.inner.lock();
            if ticket.epoch != inner.epoch || !inner.session.is_in_flight() {
                log::debug!(
                    "controller: dropping stale transform {} (epoch {})",
                    ticket.directive.id,
                    ticket.epoch
                );
                return false;
            }
            let event = match &outcome {
                Ok(result) => SessionEvent::TransformSucceeded {
                    directive: ticket.directive.clone(),
                    result: result.clone(),
                },
                Err(e) => SessionEvent::TransformFailed(e.clone()),
            };
            let session = std::mem::take(&mut inner.session);
            inner.session = session.reduce(event);
            inner.session.clone()
        };

        match &outcome {
            Ok(result) => {
                log::info!("controller: style {} applied", ticket.directive.id);
                if let Some(ref delegate) = self.delegate {
                    delegate.on_result_ready(result);
                }
            }
            Err(e) => {
                log::warn!("controller: style {} failed: {}", ticket.directive.id, e);
                self.notify_error(e);
            }
        }
        self.notify_state(&snapshot);
        true
    }

    /// Select a style and run the transform to completion.
    ///
    /// A no-op returning `false` while another transform is in flight.
    pub fn apply_style(&self, provider: &dyn TransformProvider, directive_id: &str) -> bool {
        let Some(ticket) = self.begin_transform(directive_id) else {
            return false;
        };
        let outcome = ticket.request().execute(provider);
        self.complete_transform(ticket, outcome)
    }

    /// Clear the last error, restoring the content shown before it.
    pub fn dismiss_error(&self) {
        let snapshot = {
            let mut inner = self.inner.lock();
            if inner.session.last_error().is_none() {
                return;
            }
            let session = std::mem::take(&mut inner.session);
            inner.session = session.reduce(SessionEvent::ErrorDismissed);
            inner.session.clone()
        };
        self.notify_state(&snapshot);
    }

    // --- Result actions ---

    /// Before/after view over the current source and result.
    pub fn comparison(&self) -> Option<ComparisonView> {
        let state = self.state();
        let source = state.source_image()?;
        let result = state.styled_result()?;
        Some(ComparisonView::new(
            ComparisonLayer::new(source.display_url(), layer_size(source.encoded())),
            ComparisonLayer::new(result.to_data_url(), layer_size(result.encoded())),
        ))
    }

    /// Download the current result. Never alters session state.
    pub fn download(&self) -> Result<ExportReceipt, RestyleError> {
        let state = self.state();
        ResultActions::new(&self.config)
            .download(state.styled_result(), state.applied().map(|applied| &applied.directive))
            .inspect_err(|e| self.notify_error(e))
    }

    /// Share the current result. Never alters session state.
    pub fn share(&self, target: Option<&dyn ShareTarget>) -> Result<(), RestyleError> {
        let state = self.state();
        ResultActions::new(&self.config)
            .share(target, state.styled_result())
            .inspect_err(|e| self.notify_error(e))
    }

    /// Reset to the empty state and release every held resource.
    ///
    /// Idempotent; in-flight completions become stale.
    pub fn discard(&self) {
        let (old_source, closed_camera, snapshot) = {
            let mut inner = self.inner.lock();
            inner.epoch += 1;
            let old_source = inner.session.source_image().cloned();
            let closed_camera = match inner.camera.as_mut() {
                Some(camera) => {
                    let was_open = *camera.state() != CameraState::Closed;
                    camera.close();
                    was_open
                }
                None => false,
            };
            let session = std::mem::take(&mut inner.session);
            inner.session = session.reduce(SessionEvent::Discarded);
            (old_source, closed_camera, inner.session.clone())
        };

        if let Some(old) = old_source {
            self.acquisition.release(&old);
        }
        if closed_camera {
            self.notify_camera(&CameraState::Closed);
        }
        log::info!("controller: session discarded");
        self.notify_state(&snapshot);
    }

    // --- Internal helpers ---

    fn notify_state(&self, state: &SessionState) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(state);
        }
    }

    fn notify_camera(&self, state: &CameraState) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_camera_state_changed(state);
        }
    }

    fn notify_error(&self, error: &RestyleError) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_error(error);
        }
    }
}

fn layer_size(image: &EncodedImage) -> Size {
    let (width, height) = ImageCodec::dimensions(image).unwrap_or((0, 0));
    Size::new(width as f64, height as f64)
}
