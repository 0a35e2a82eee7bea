use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced anywhere in the restyle pipeline.
///
/// Acquisition- and generation-layer errors are captured into
/// `SessionState` by the controller; export errors are returned to the
/// caller and never touch session state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RestyleError {
    #[error("could not read image: {0}")]
    Decode(String),

    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),

    #[error("generation blocked: {0}")]
    GenerationBlocked(String),

    #[error("generation unavailable: {0}")]
    GenerationUnavailable(String),

    #[error("sharing is not supported on this platform")]
    ShareUnsupported,

    #[error("share failed: {0}")]
    ShareFailed(String),

    #[error("no styled result to export")]
    NothingToExport,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration failed: {0}")]
    Configuration(String),
}

/// Fieldless discriminant of `RestyleError`, for display logic and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Decode,
    CameraUnavailable,
    GenerationBlocked,
    GenerationUnavailable,
    ShareUnsupported,
    ShareFailed,
    NothingToExport,
    Storage,
    Configuration,
}

impl RestyleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Decode(_) => ErrorKind::Decode,
            Self::CameraUnavailable(_) => ErrorKind::CameraUnavailable,
            Self::GenerationBlocked(_) => ErrorKind::GenerationBlocked,
            Self::GenerationUnavailable(_) => ErrorKind::GenerationUnavailable,
            Self::ShareUnsupported => ErrorKind::ShareUnsupported,
            Self::ShareFailed(_) => ErrorKind::ShareFailed,
            Self::NothingToExport => ErrorKind::NothingToExport,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// Whether the user can retry the same action and reasonably expect a
    /// different outcome.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::GenerationUnavailable(_) | Self::ShareFailed(_) | Self::Storage(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(
            RestyleError::GenerationBlocked("unsafe".into()).kind(),
            ErrorKind::GenerationBlocked
        );
        assert_eq!(RestyleError::ShareUnsupported.kind(), ErrorKind::ShareUnsupported);
        assert_eq!(RestyleError::Decode("eof".into()).kind(), ErrorKind::Decode);
    }

    #[test]
    fn blocked_is_not_transient() {
        assert!(!RestyleError::GenerationBlocked("policy".into()).is_transient());
        assert!(RestyleError::GenerationUnavailable("503".into()).is_transient());
    }

    #[test]
    fn display_preserves_cause() {
        let err = RestyleError::GenerationBlocked("face edits are not allowed".into());
        assert_eq!(err.to_string(), "generation blocked: face edits are not allowed");
    }
}
