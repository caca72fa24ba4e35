//! Element identity and viewport geometry

/// Reference to an element owned by the host document.
///
/// Identity is by value: two `ElementId`s refer to the same element when
/// they compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ElementId(pub u64);

impl ElementId {
    /// The window itself, used as the target of window-level events.
    pub const WINDOW: ElementId = ElementId(0);

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Bounding rectangle relative to the top-left corner of the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Whether the rectangle overlaps the vertical band `[0, viewport_height)`.
    ///
    /// Horizontal position is ignored.
    pub fn intersects_vertical_band(&self, viewport_height: f64) -> bool {
        self.bottom() > 0.0 && self.top < viewport_height
    }
}

/// Size of the visible viewport in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}
