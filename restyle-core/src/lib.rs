//! # restyle-core
//!
//! Platform-agnostic photo restyle pipeline.
//!
//! Turns a user photo (file upload or live camera capture) into a normalized
//! encoded image, submits it to an external style-transform capability, and
//! manages the before/after comparison and export lifecycle. Platform layers
//! (browser shell, desktop app) implement the collaborator traits and drive a
//! `SessionController`.
//!
//! ## Architecture
//!
//! ```text
//! restyle-core (this crate)
//! ├── traits/       ← CameraDevice, CameraStream, TransformProvider, ShareTarget, ObjectUrlStore, SessionDelegate
//! ├── models/       ← RestyleError, SessionState, SessionConfiguration, StyleCatalog, SourceImage, etc.
//! ├── processing/   ← ImageCodec, frame mirroring, ComparisonView
//! ├── session/      ← CameraSession, ImageAcquisition, TransformRequest, ResultActions, SessionController
//! └── storage/      ← object URL stores, export writer, metadata sidecars
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export key types at crate root for convenience.
pub use models::catalog::{StyleCatalog, StyleDirective};
pub use models::config::{CameraConstraints, CameraFacing, CaptureFormat, SessionConfiguration};
pub use models::error::{ErrorKind, RestyleError};
pub use models::export::{ExportMetadata, ExportReceipt};
pub use models::image_models::{EncodedImage, SourceImage, StyledResult};
pub use models::state::{AppliedStyle, Loaded, SessionEvent, SessionState};
pub use processing::codec::ImageCodec;
pub use processing::comparison::{
    ComparisonLayer, ComparisonLayout, ComparisonView, ControlBounds, ImageFit, PointerInput, PointerPhase, RawPointer,
    RevealSlider, Size,
};
pub use session::acquisition::{AcquisitionSource, ImageAcquisition};
pub use session::actions::ResultActions;
pub use session::camera::{CameraResource, CameraSession, CameraState};
pub use session::controller::{AcquisitionTicket, SessionController, TransformTicket};
pub use session::transform::TransformRequest;
pub use storage::object_urls::{BlobUrlStore, DataUrlStore};
pub use traits::camera_device::{CameraDevice, CameraStream};
pub use traits::session_delegate::SessionDelegate;
pub use traits::share_target::{ShareFile, SharePayload, ShareTarget};
pub use traits::transform_provider::{TransformFailure, TransformProvider};
pub use traits::url_store::ObjectUrlStore;
