use super::catalog::StyleDirective;
use super::error::{ErrorKind, RestyleError};
use super::image_models::{SourceImage, StyledResult};

/// A style that was successfully applied to the current source.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedStyle {
    pub directive: StyleDirective,
    pub result: StyledResult,
}

/// Displayable content of a session: a source and, optionally, its styled result.
///
/// A styled result cannot exist without a source.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub source: SourceImage,
    pub applied: Option<AppliedStyle>,
}

/// Restyle session state machine.
///
/// State transitions:
/// ```text
/// empty → acquiring → ready → transforming → styled
///             ↓                    ↓
///           failed              failed
///
/// any state → acquiring   (new upload or capture)
/// any state → empty       (discard)
/// failed    → transforming (retry with a style)
/// ```
///
/// `Acquiring` and `Failed` keep the content that was on screen before, so
/// a failed replacement never destroys a valid source or result.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Empty,
    Acquiring {
        prior: Option<Loaded>,
    },
    Ready {
        source: SourceImage,
    },
    Transforming {
        source: SourceImage,
        directive: StyleDirective,
        prior: Option<AppliedStyle>,
    },
    Styled {
        source: SourceImage,
        applied: AppliedStyle,
    },
    Failed {
        error: RestyleError,
        prior: Option<Loaded>,
        attempted: Option<StyleDirective>,
    },
}

/// Inputs to `SessionState::reduce`.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    AcquisitionStarted,
    AcquisitionSucceeded(SourceImage),
    AcquisitionFailed(RestyleError),
    CameraFailed(RestyleError),
    TransformStarted(StyleDirective),
    TransformSucceeded {
        directive: StyleDirective,
        result: StyledResult,
    },
    TransformFailed(RestyleError),
    ErrorDismissed,
    Discarded,
}

impl SessionEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::AcquisitionStarted => "acquisition-started",
            Self::AcquisitionSucceeded(_) => "acquisition-succeeded",
            Self::AcquisitionFailed(_) => "acquisition-failed",
            Self::CameraFailed(_) => "camera-failed",
            Self::TransformStarted(_) => "transform-started",
            Self::TransformSucceeded { .. } => "transform-succeeded",
            Self::TransformFailed(_) => "transform-failed",
            Self::ErrorDismissed => "error-dismissed",
            Self::Discarded => "discarded",
        }
    }
}

impl SessionState {
    /// Total transition function. Events that do not apply to the current
    /// state leave it unchanged.
    pub fn reduce(self, event: SessionEvent) -> SessionState {
        let from = self.name();
        let event_name = event.name();

        let next = match (self, event) {
            (_, SessionEvent::Discarded) => SessionState::Empty,

            (state @ SessionState::Acquiring { .. }, SessionEvent::AcquisitionStarted) => state,
            (state, SessionEvent::AcquisitionStarted) => SessionState::Acquiring {
                prior: state.into_loaded(),
            },

            (SessionState::Acquiring { .. }, SessionEvent::AcquisitionSucceeded(source)) => {
                SessionState::Ready { source }
            }

            (SessionState::Acquiring { prior }, SessionEvent::AcquisitionFailed(error)) => {
                SessionState::Failed {
                    error,
                    prior,
                    attempted: None,
                }
            }

            (state @ (SessionState::Acquiring { .. } | SessionState::Transforming { .. }), SessionEvent::CameraFailed(_)) => {
                state
            }
            (state, SessionEvent::CameraFailed(error)) => SessionState::Failed {
                error,
                prior: state.into_loaded(),
                attempted: None,
            },

            (SessionState::Ready { source }, SessionEvent::TransformStarted(directive)) => {
                SessionState::Transforming {
                    source,
                    directive,
                    prior: None,
                }
            }
            (SessionState::Styled { source, applied }, SessionEvent::TransformStarted(directive)) => {
                SessionState::Transforming {
                    source,
                    directive,
                    prior: Some(applied),
                }
            }
            (
                SessionState::Failed {
                    prior: Some(loaded), ..
                },
                SessionEvent::TransformStarted(directive),
            ) => SessionState::Transforming {
                source: loaded.source,
                directive,
                prior: loaded.applied,
            },

            (SessionState::Transforming { source, .. }, SessionEvent::TransformSucceeded { directive, result }) => {
                SessionState::Styled {
                    source,
                    applied: AppliedStyle { directive, result },
                }
            }

            (
                SessionState::Transforming {
                    source,
                    directive,
                    prior,
                },
                SessionEvent::TransformFailed(error),
            ) => SessionState::Failed {
                error,
                prior: Some(Loaded {
                    source,
                    applied: prior,
                }),
                attempted: Some(directive),
            },

            (SessionState::Failed { prior, .. }, SessionEvent::ErrorDismissed) => Self::from_loaded(prior),

            (state, _) => {
                log::debug!("session: ignoring {} in state {}", event_name, from);
                return state;
            }
        };

        log::debug!("session: {} --{}--> {}", from, event_name, next.name());
        next
    }

    /// Rebuild a resting state from displayable content.
    pub fn from_loaded(loaded: Option<Loaded>) -> SessionState {
        match loaded {
            None => SessionState::Empty,
            Some(Loaded {
                source,
                applied: Some(applied),
            }) => SessionState::Styled { source, applied },
            Some(Loaded { source, applied: None }) => SessionState::Ready { source },
        }
    }

    /// The content currently on screen, dropping any in-flight work and error.
    pub fn into_loaded(self) -> Option<Loaded> {
        match self {
            SessionState::Empty => None,
            SessionState::Acquiring { prior } | SessionState::Failed { prior, .. } => prior,
            SessionState::Ready { source } => Some(Loaded { source, applied: None }),
            SessionState::Transforming { source, prior, .. } => Some(Loaded {
                source,
                applied: prior,
            }),
            SessionState::Styled { source, applied } => Some(Loaded {
                source,
                applied: Some(applied),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Empty => "empty",
            SessionState::Acquiring { .. } => "acquiring",
            SessionState::Ready { .. } => "ready",
            SessionState::Transforming { .. } => "transforming",
            SessionState::Styled { .. } => "styled",
            SessionState::Failed { .. } => "failed",
        }
    }

    pub fn source_image(&self) -> Option<&SourceImage> {
        match self {
            SessionState::Empty => None,
            SessionState::Acquiring { prior } | SessionState::Failed { prior, .. } => {
                prior.as_ref().map(|loaded| &loaded.source)
            }
            SessionState::Ready { source }
            | SessionState::Transforming { source, .. }
            | SessionState::Styled { source, .. } => Some(source),
        }
    }

    /// The style whose result is currently shown, if any. Unlike
    /// `selected_directive`, never the directive of a pending or failed attempt.
    pub fn applied(&self) -> Option<&AppliedStyle> {
        match self {
            SessionState::Empty | SessionState::Ready { .. } => None,
            SessionState::Acquiring { prior } | SessionState::Failed { prior, .. } => {
                prior.as_ref().and_then(|loaded| loaded.applied.as_ref())
            }
            SessionState::Transforming { prior, .. } => prior.as_ref(),
            SessionState::Styled { applied, .. } => Some(applied),
        }
    }

    pub fn selected_directive(&self) -> Option<&StyleDirective> {
        match self {
            SessionState::Transforming { directive, .. } => Some(directive),
            SessionState::Failed {
                attempted: Some(directive),
                ..
            } => Some(directive),
            _ => self.applied().map(|applied| &applied.directive),
        }
    }

    pub fn styled_result(&self) -> Option<&StyledResult> {
        self.applied().map(|applied| &applied.result)
    }

    pub fn last_error(&self) -> Option<&RestyleError> {
        match self {
            SessionState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn last_error_kind(&self) -> Option<ErrorKind> {
        self.last_error().map(RestyleError::kind)
    }

    /// A transform is outstanding; style selection must be disabled.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, SessionState::Transforming { .. })
    }

    pub fn is_acquiring(&self) -> bool {
        matches!(self, SessionState::Acquiring { .. })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SessionState::Empty)
    }

    /// Whether a new transform may start from this state.
    pub fn can_transform(&self) -> bool {
        !self.is_in_flight() && !self.is_acquiring() && self.source_image().is_some()
    }
}
