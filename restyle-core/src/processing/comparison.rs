//! Before/after reveal control.
//!
//! Mouse, touch and keyboard input are normalized into a single
//! `PointerInput` stream that feeds one drag reducer, so every modality
//! clamps and releases identically. The divider position `p` is a
//! percentage of the control width; the `after` image renders beneath and
//! the `before` image is clipped with a right inset of `100 - p` percent,
//! leaving `[0, p]` visible.

/// Lowest divider position, in percent.
pub const MIN_POSITION: f64 = 0.0;
/// Highest divider position, in percent.
pub const MAX_POSITION: f64 = 100.0;
/// Divider position when a comparison first opens.
pub const DEFAULT_POSITION: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// Input as delivered by the platform, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPointer {
    Mouse { phase: PointerPhase, client_x: f64 },
    /// `touches` holds the client x of each active touch point.
    Touch { phase: PointerPhase, touches: Vec<f64> },
    /// Arrow-key nudge in percent.
    Key { delta: f64 },
}

/// Normalized input consumed by `RevealSlider`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Press { x: f64 },
    Move { x: f64 },
    Release,
    Nudge(f64),
}

impl RawPointer {
    /// Collapse a platform event into a pointer input. Touch events without
    /// an active touch point only count as a release.
    pub fn normalize(&self) -> Option<PointerInput> {
        match self {
            RawPointer::Mouse { phase, client_x } => Some(Self::from_phase(*phase, Some(*client_x))),
            RawPointer::Touch { phase, touches } => match (phase, touches.first()) {
                (PointerPhase::Up, _) => Some(PointerInput::Release),
                (phase, Some(x)) => Some(Self::from_phase(*phase, Some(*x))),
                (_, None) => None,
            },
            RawPointer::Key { delta } => Some(PointerInput::Nudge(*delta)),
        }
    }

    fn from_phase(phase: PointerPhase, x: Option<f64>) -> PointerInput {
        match (phase, x) {
            (PointerPhase::Down, Some(x)) => PointerInput::Press { x },
            (PointerPhase::Move, Some(x)) => PointerInput::Move { x },
            _ => PointerInput::Release,
        }
    }
}

/// Horizontal extent of the control, in the same units as pointer x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlBounds {
    pub left: f64,
    pub width: f64,
}

impl ControlBounds {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Map a client x to a clamped percentage. `None` for a collapsed control.
    pub fn percent_at(&self, x: f64) -> Option<f64> {
        if self.width.is_nan() || self.width <= 0.0 || !x.is_finite() {
            return None;
        }
        let clamped = x.clamp(self.left, self.left + self.width);
        Some(((clamped - self.left) / self.width * MAX_POSITION).clamp(MIN_POSITION, MAX_POSITION))
    }
}

/// Drag state of the divider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealSlider {
    position: f64,
    dragging: bool,
}

impl Default for RevealSlider {
    fn default() -> Self {
        Self {
            position: DEFAULT_POSITION,
            dragging: false,
        }
    }
}

impl RevealSlider {
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Apply one input. Returns whether the divider moved.
    ///
    /// `Release` must be forwarded from a global listener so a drag ending
    /// outside the control never sticks.
    pub fn apply(&mut self, input: PointerInput, bounds: ControlBounds) -> bool {
        match input {
            PointerInput::Press { .. } => {
                self.dragging = true;
                false
            }
            PointerInput::Release => {
                self.dragging = false;
                false
            }
            PointerInput::Move { x } if self.dragging => match bounds.percent_at(x) {
                Some(p) => self.set_position(p),
                None => false,
            },
            PointerInput::Move { .. } => false,
            PointerInput::Nudge(delta) => self.set_position(self.position + delta),
        }
    }

    pub fn set_position(&mut self, position: f64) -> bool {
        if !position.is_finite() {
            return false;
        }
        let next = position.clamp(MIN_POSITION, MAX_POSITION);
        let moved = next != self.position;
        self.position = next;
        moved
    }

    /// Right-edge clip inset of the `before` layer, in percent.
    pub fn before_clip_inset(&self) -> f64 {
        MAX_POSITION - self.position
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// How an image is scaled into the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFit {
    /// Letterbox: the whole image is visible.
    #[default]
    Contain,
    /// Fill the control, cropping overflow.
    Cover,
}

impl ImageFit {
    /// Centered draw rectangle for an image of `intrinsic` size.
    pub fn place(&self, intrinsic: Size, container: Size) -> Rect {
        if intrinsic.width.is_nan() || intrinsic.height.is_nan() || intrinsic.width <= 0.0 || intrinsic.height <= 0.0 {
            return Rect {
                x: 0.0,
                y: 0.0,
                width: container.width,
                height: container.height,
            };
        }
        let sx = container.width / intrinsic.width;
        let sy = container.height / intrinsic.height;
        let scale = match self {
            ImageFit::Contain => sx.min(sy),
            ImageFit::Cover => sx.max(sy),
        };
        let width = intrinsic.width * scale;
        let height = intrinsic.height * scale;
        Rect {
            x: (container.width - width) / 2.0,
            y: (container.height - height) / 2.0,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonLayer {
    pub url: String,
    pub size: Size,
    pub fit: ImageFit,
}

impl ComparisonLayer {
    pub fn new(url: impl Into<String>, size: Size) -> Self {
        Self {
            url: url.into(),
            size,
            fit: ImageFit::default(),
        }
    }

    pub fn with_fit(mut self, fit: ImageFit) -> Self {
        self.fit = fit;
        self
    }
}

/// Geometry for one frame of the comparison control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonLayout {
    pub after: Rect,
    pub before: Rect,
    /// Right inset of the `before` clip, in percent of the control width.
    pub before_clip_inset: f64,
    /// Divider x, relative to the control's left edge.
    pub handle_x: f64,
}

/// Interactive before/after view over two images.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonView {
    before: ComparisonLayer,
    after: ComparisonLayer,
    slider: RevealSlider,
}

impl ComparisonView {
    pub fn new(before: ComparisonLayer, after: ComparisonLayer) -> Self {
        Self {
            before,
            after,
            slider: RevealSlider::default(),
        }
    }

    pub fn before(&self) -> &ComparisonLayer {
        &self.before
    }

    pub fn after(&self) -> &ComparisonLayer {
        &self.after
    }

    pub fn slider(&self) -> &RevealSlider {
        &self.slider
    }

    pub fn position(&self) -> f64 {
        self.slider.position()
    }

    /// Feed a platform event. Returns whether the divider moved.
    pub fn handle(&mut self, event: &RawPointer, bounds: ControlBounds) -> bool {
        match event.normalize() {
            Some(input) => self.slider.apply(input, bounds),
            None => false,
        }
    }

    pub fn layout(&self, container: Size) -> ComparisonLayout {
        ComparisonLayout {
            after: self.after.fit.place(self.after.size, container),
            before: self.before.fit.place(self.before.size, container),
            before_clip_inset: self.slider.before_clip_inset(),
            handle_x: container.width * self.slider.position() / MAX_POSITION,
        }
    }
}
