//! Drawing sink abstraction and overlay styling.

use kurbo::{Line, Point};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Rendering was requested before a drawing sink was attached.
    #[error("No drawing sink attached: {0}")]
    SinkNotAttached(&'static str),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Grid display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    /// No grid (plain background).
    None,
    /// Full grid lines.
    #[default]
    Lines,
    /// Only corner crosses (+).
    CrossPlus,
    /// Only corner dots (.).
    Dots,
}

impl GridStyle {
    /// Cycle to the next grid style.
    pub fn next(self) -> Self {
        match self {
            GridStyle::None => GridStyle::Lines,
            GridStyle::Lines => GridStyle::CrossPlus,
            GridStyle::CrossPlus => GridStyle::Dots,
            GridStyle::Dots => GridStyle::None,
        }
    }

    /// Get display name for this grid style.
    pub fn name(self) -> &'static str {
        match self {
            GridStyle::None => "None",
            GridStyle::Lines => "Lines",
            GridStyle::CrossPlus => "Crosses",
            GridStyle::Dots => "Dots",
        }
    }
}

/// Colors used by the overlay.
#[derive(Debug, Clone, Copy)]
pub struct OverlayColors {
    pub grid: Color,
    pub guide: Color,
}

impl Default for OverlayColors {
    fn default() -> Self {
        Self {
            grid: Color::from_rgba8(200, 200, 200, 100),
            guide: Color::from_rgba8(236, 72, 153, 180), // Pink-500 with alpha
        }
    }
}

/// Destination for overlay primitives, in screen coordinates.
///
/// Implementations can record into a Vello scene, a display list, or a
/// test buffer.
pub trait DrawSink {
    /// Stroke a straight segment.
    fn stroke_line(&mut self, line: Line, color: Color, width: f64);

    /// Fill a small dot.
    fn fill_dot(&mut self, center: Point, radius: f64, color: Color);
}
