use crate::models::error::RestyleError;
use crate::session::transform::TransformRequest;

/// Why the transform capability did not return an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformFailure {
    /// The capability declined to produce an image (e.g. safety filtering).
    Blocked(String),
    /// Network or service failure.
    Unavailable(String),
}

impl From<TransformFailure> for RestyleError {
    fn from(failure: TransformFailure) -> Self {
        match failure {
            TransformFailure::Blocked(reason) => RestyleError::GenerationBlocked(reason),
            TransformFailure::Unavailable(reason) => RestyleError::GenerationUnavailable(reason),
        }
    }
}

/// The external style-transform capability.
///
/// The call blocks until the capability answers; platform layers run it on
/// a worker and report back through the session controller.
pub trait TransformProvider: Send + Sync {
    /// Transform the request's image. Returns encoded image bytes (PNG).
    fn transform(&self, request: &TransformRequest) -> Result<Vec<u8>, TransformFailure>;
}
