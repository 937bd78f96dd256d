//! Grid and ruler geometry.

use crate::camera::CameraState;
use crate::snap::GuideAxis;
use kurbo::Rect;

/// Upper bound on grid lines per axis; beyond this the grid is too dense to draw.
pub const MAX_GRID_LINES: usize = 1000;

/// World coordinates of the grid lines covering a region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridLines {
    /// x coordinates of vertical lines, ascending.
    pub vertical: Vec<f64>,
    /// y coordinates of horizontal lines, ascending.
    pub horizontal: Vec<f64>,
    /// Covered region, expanded outward to grid multiples.
    pub bounds: Rect,
}

impl GridLines {
    /// Grid lines covering `bounds`.
    ///
    /// Empty for an empty region, a non-positive grid size, or a grid too
    /// dense to draw.
    pub fn visible(bounds: Rect, grid_size: f64) -> Self {
        if !(grid_size > 0.0 && grid_size.is_finite()) || bounds.is_zero_area() {
            return Self::default();
        }

        let start_x = (bounds.x0 / grid_size).floor() * grid_size;
        let start_y = (bounds.y0 / grid_size).floor() * grid_size;
        let end_x = (bounds.x1 / grid_size).ceil() * grid_size;
        let end_y = (bounds.y1 / grid_size).ceil() * grid_size;

        let (Some(vertical), Some(horizontal)) = (
            steps(start_x, end_x, grid_size),
            steps(start_y, end_y, grid_size),
        ) else {
            log::debug!("Grid of size {} too dense for {:?}, skipping", grid_size, bounds);
            return Self::default();
        };

        Self {
            vertical,
            horizontal,
            bounds: Rect::new(start_x, start_y, end_x, end_y),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertical.is_empty() && self.horizontal.is_empty()
    }

    /// Grid intersections, row by row.
    pub fn intersections(&self) -> impl Iterator<Item = kurbo::Point> + '_ {
        self.horizontal
            .iter()
            .flat_map(move |&y| self.vertical.iter().map(move |&x| kurbo::Point::new(x, y)))
    }
}

/// Multiples of `step` from `start` to `end` inclusive, or `None` if too many.
///
/// Computed by index rather than accumulation to avoid drift.
fn steps(start: f64, end: f64, step: f64) -> Option<Vec<f64>> {
    let count = ((end - start) / step).round();
    if !count.is_finite() || count < 0.0 || count >= MAX_GRID_LINES as f64 {
        return None;
    }
    let count = count as usize;
    Some((0..=count).map(|i| start + i as f64 * step).collect())
}

/// A tick mark on a screen ruler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RulerTick {
    /// World coordinate labelled by this tick.
    pub value: f64,
    /// Offset along the ruler in screen pixels.
    pub offset: f64,
    /// Major ticks carry labels.
    pub major: bool,
}

/// Smallest "nice" step (1, 2 or 5 times a power of ten) that is at least `min_step`.
pub fn nice_step(min_step: f64) -> f64 {
    if !(min_step > 0.0 && min_step.is_finite()) {
        return 1.0;
    }
    let magnitude = 10f64.powf(min_step.log10().floor());
    for multiplier in [1.0, 2.0, 5.0, 10.0] {
        let step = multiplier * magnitude;
        if step >= min_step {
            return step;
        }
    }
    10.0 * magnitude
}

/// Ticks for a ruler of `screen_length` pixels along one edge of the viewport.
///
/// A [`GuideAxis::Vertical`] ruler runs down the left edge and labels y;
/// [`GuideAxis::Horizontal`] runs along the top and labels x. Ticks are at
/// least `min_spacing` pixels apart; every fifth step is major. Empty when
/// more than [`MAX_GRID_LINES`] ticks would be needed.
pub fn ruler_ticks(camera: &CameraState, screen_length: f64, axis: GuideAxis, min_spacing: f64) -> Vec<RulerTick> {
    if !(camera.zoom > 0.0 && camera.zoom.is_finite()) || !(screen_length > 0.0) || !(min_spacing > 0.0) {
        return Vec::new();
    }

    let step = nice_step(min_spacing / camera.zoom);
    let translation = match axis {
        GuideAxis::Horizontal => camera.x,
        GuideAxis::Vertical => camera.y,
    };
    let world_start = (0.0 - translation) / camera.zoom;
    let world_end = (screen_length - translation) / camera.zoom;

    let first = (world_start / step).ceil() as i64;
    let last = (world_end / step).floor() as i64;
    if last < first {
        return Vec::new();
    }
    if last.saturating_sub(first) as usize >= MAX_GRID_LINES {
        log::debug!("Ruler with step {} too dense for {} px, skipping", step, screen_length);
        return Vec::new();
    }

    (first..=last)
        .map(|i| {
            let value = i as f64 * step;
            RulerTick {
                value,
                offset: value * camera.zoom + translation,
                major: i % 5 == 0,
            }
        })
        .collect()
}
