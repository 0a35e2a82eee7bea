use crate::models::error::RestyleError;
use crate::models::image_models::StyledResult;
use crate::models::state::SessionState;
use crate::session::camera::CameraState;

/// Event delegate for session notifications.
///
/// Methods are called on whichever thread completed the operation, never
/// while the controller holds its internal lock.
pub trait SessionDelegate: Send + Sync {
    /// Called after every applied session transition.
    fn on_state_changed(&self, state: &SessionState);

    /// Called when the capture view's camera changes state.
    fn on_camera_state_changed(&self, state: &CameraState);

    /// Called for every surfaced error, including transient export errors
    /// that do not enter session state.
    fn on_error(&self, error: &RestyleError);

    /// Called when a transform completes and its result becomes current.
    fn on_result_ready(&self, result: &StyledResult);
}
