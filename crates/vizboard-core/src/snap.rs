//! Snap functionality for aligning dragged elements to the grid and to each other.
//!
//! [`compute_snap`] is a pure function of an explicit [`SnapContext`]
//! snapshot: it holds no state between calls and never mutates elements.
//! Callers apply the returned delta to every dragged element before
//! committing positions to the store.

use crate::config::{ALIGNMENT_SNAP_THRESHOLD, DEFAULT_GRID_SIZE, GUIDE_PADDING, SnapConfig};
use crate::element::{Element, ElementId};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Orientation of an alignment guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideAxis {
    /// A line of constant x, produced by horizontal alignment of edges/centers.
    Vertical,
    /// A line of constant y.
    Horizontal,
}

/// An alignment guide line in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    pub axis: GuideAxis,
    /// Fixed coordinate of the line (x for vertical, y for horizontal).
    pub position: f64,
    /// Start of the span along the perpendicular axis.
    pub start: f64,
    /// End of the span along the perpendicular axis.
    pub end: f64,
}

/// Result of a snap computation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapResult {
    /// Correction to add to every dragged element's x.
    pub delta_x: f64,
    /// Correction to add to every dragged element's y.
    pub delta_y: f64,
    /// Alignment guides to display, vertical first.
    pub guides: Vec<Guide>,
}

impl SnapResult {
    /// A result with no correction and no guides.
    pub fn none() -> Self {
        Self::default()
    }

    /// The correction as a vector.
    pub fn delta(&self) -> Vec2 {
        Vec2::new(self.delta_x, self.delta_y)
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.delta_x != 0.0 || self.delta_y != 0.0 || !self.guides.is_empty()
    }
}

/// Read-only accessors onto the host's editor state.
///
/// Hosts that keep this state behind their own types implement this and use
/// [`SnapContext::capture`] to take one consistent snapshot per pointer move.
pub trait SnapSource {
    fn snap_enabled(&self) -> bool;
    fn grid_size(&self) -> f64;
    fn elements(&self) -> &HashMap<ElementId, Element>;
    /// Element ids in z-order; also the order targets are considered in.
    fn element_ids(&self) -> &[ElementId];
    fn camera_zoom(&self) -> f64;
}

/// Snapshot of everything a snap computation reads.
#[derive(Debug, Clone, Copy)]
pub struct SnapContext<'a> {
    /// Whether grid snapping applies. Alignment snapping always does.
    pub snap_enabled: bool,
    /// Grid cell size in world units.
    pub grid_size: f64,
    /// Current camera zoom.
    pub zoom: f64,
    pub elements: &'a HashMap<ElementId, Element>,
    pub element_ids: &'a [ElementId],
    /// Alignment distance in screen pixels.
    pub alignment_threshold: f64,
    /// Guide overshoot in world units.
    pub guide_padding: f64,
}

impl<'a> SnapContext<'a> {
    /// Context with default grid, threshold and padding at zoom 1.
    pub fn new(elements: &'a HashMap<ElementId, Element>, element_ids: &'a [ElementId]) -> Self {
        Self {
            snap_enabled: true,
            grid_size: DEFAULT_GRID_SIZE,
            zoom: 1.0,
            elements,
            element_ids,
            alignment_threshold: ALIGNMENT_SNAP_THRESHOLD,
            guide_padding: GUIDE_PADDING,
        }
    }

    /// Snapshot an accessor bundle.
    pub fn capture(source: &'a impl SnapSource) -> Self {
        Self {
            snap_enabled: source.snap_enabled(),
            grid_size: source.grid_size(),
            zoom: source.camera_zoom(),
            ..Self::new(source.elements(), source.element_ids())
        }
    }

    /// Apply snap settings from configuration.
    pub fn with_config(mut self, config: &SnapConfig) -> Self {
        self.snap_enabled = config.enabled;
        self.alignment_threshold = config.alignment_threshold;
        self.guide_padding = config.guide_padding;
        self
    }

    pub fn with_grid(mut self, enabled: bool, grid_size: f64) -> Self {
        self.snap_enabled = enabled;
        self.grid_size = grid_size;
        self
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    /// Alignment threshold in world units, or `None` when the zoom is unusable.
    pub fn world_threshold(&self) -> Option<f64> {
        if self.zoom > 0.0 && self.zoom.is_finite() {
            Some(self.alignment_threshold / self.zoom)
        } else {
            None
        }
    }
}

/// Union bounding box of the dragged elements at their proposed positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragBox {
    pub rect: Rect,
}

impl DragBox {
    /// Build the box, or `None` if no dragged id resolves to an element.
    ///
    /// Dragged ids without a proposal use their stored position.
    pub fn from_proposal(
        elements: &HashMap<ElementId, Element>,
        dragged_ids: &[ElementId],
        proposed: &HashMap<ElementId, Point>,
    ) -> Option<Self> {
        dragged_ids
            .iter()
            .filter_map(|id| {
                let element = elements.get(id)?;
                let position = proposed.get(id).copied().unwrap_or(element.position);
                Some(element.bounds_at(position))
            })
            .reduce(|acc, rect| acc.union(rect))
            .map(|rect| Self { rect })
    }

    pub fn left(&self) -> f64 {
        self.rect.x0
    }

    pub fn top(&self) -> f64 {
        self.rect.y0
    }

    pub fn right(&self) -> f64 {
        self.rect.x1
    }

    pub fn bottom(&self) -> f64 {
        self.rect.y1
    }

    pub fn center_x(&self) -> f64 {
        (self.rect.x0 + self.rect.x1) / 2.0
    }

    pub fn center_y(&self) -> f64 {
        (self.rect.y0 + self.rect.y1) / 2.0
    }
}

/// Reference lines of a rectangle along one axis: start, center, end.
fn reference_lines(rect: Rect, axis: GuideAxis) -> [f64; 3] {
    match axis {
        GuideAxis::Vertical => [rect.x0, (rect.x0 + rect.x1) / 2.0, rect.x1],
        GuideAxis::Horizontal => [rect.y0, (rect.y0 + rect.y1) / 2.0, rect.y1],
    }
}

/// Extent of a rectangle along the axis perpendicular to the guide.
fn perpendicular_extent(rect: Rect, axis: GuideAxis) -> (f64, f64) {
    match axis {
        GuideAxis::Vertical => (rect.y0, rect.y1),
        GuideAxis::Horizontal => (rect.x0, rect.x1),
    }
}

/// Best alignment found on one axis.
#[derive(Debug, Clone, Copy)]
struct Alignment {
    /// Signed correction making the drag line equal the target line.
    delta: f64,
    /// Target line coordinate.
    target: f64,
    /// Target rectangle, for the guide's span.
    target_rect: Rect,
}

/// Closest aligning pair on `axis`; the first pair wins ties.
fn find_alignment(drag: Rect, targets: &[Rect], axis: GuideAxis, threshold: f64) -> Option<Alignment> {
    let mut best: Option<Alignment> = None;
    let mut best_distance = f64::INFINITY;

    for drag_line in reference_lines(drag, axis) {
        for target_rect in targets {
            for target_line in reference_lines(*target_rect, axis) {
                let delta = target_line - drag_line;
                let distance = delta.abs();
                if distance <= threshold && distance < best_distance {
                    best_distance = distance;
                    best = Some(Alignment {
                        delta,
                        target: target_line,
                        target_rect: *target_rect,
                    });
                }
            }
        }
    }

    best
}

fn guide_for(alignment: &Alignment, snapped: Rect, axis: GuideAxis, padding: f64) -> Guide {
    let (drag_start, drag_end) = perpendicular_extent(snapped, axis);
    let (target_start, target_end) = perpendicular_extent(alignment.target_rect, axis);
    Guide {
        axis,
        position: alignment.target,
        start: drag_start.min(target_start) - padding,
        end: drag_end.max(target_end) + padding,
    }
}

/// Snap a point to the nearest grid intersection.
///
/// Exact half-cell ties round away from zero (`f64::round`), so `10` snaps
/// to `20` and `-10` to `-20` on a 20-unit grid.
///
/// Returns the point unchanged for a non-positive or non-finite grid size.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    if !(grid_size > 0.0 && grid_size.is_finite()) {
        return point;
    }
    Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}

/// Compute the snap correction for a drag in progress.
///
/// The dragged elements move as one rigid body. Alignment to other
/// elements' edges/centers (or the world origin) wins over grid snapping
/// on each axis independently. Missing elements and degenerate input
/// degrade to no snap.
pub fn compute_snap(
    ctx: &SnapContext<'_>,
    dragged_ids: &[ElementId],
    proposed: &HashMap<ElementId, Point>,
) -> SnapResult {
    if dragged_ids.is_empty() {
        return SnapResult::none();
    }
    let Some(drag_box) = DragBox::from_proposal(ctx.elements, dragged_ids, proposed) else {
        return SnapResult::none();
    };
    let drag = drag_box.rect;
    if !(drag.x0.is_finite() && drag.y0.is_finite() && drag.x1.is_finite() && drag.y1.is_finite()) {
        return SnapResult::none();
    }

    let (mut delta_x, mut delta_y) = (0.0, 0.0);
    if ctx.snap_enabled {
        let origin = Point::new(drag_box.left(), drag_box.top());
        let snapped = snap_to_grid(origin, ctx.grid_size);
        delta_x = snapped.x - origin.x;
        delta_y = snapped.y - origin.y;
    }

    let mut vertical = None;
    let mut horizontal = None;
    if let Some(threshold) = ctx.world_threshold() {
        let dragged: HashSet<&ElementId> = dragged_ids.iter().collect();
        let mut targets: Vec<Rect> = ctx
            .element_ids
            .iter()
            .filter(|id| !dragged.contains(id))
            .filter_map(|id| ctx.elements.get(id))
            .filter(|element| element.is_snap_target())
            .map(Element::bounds)
            .collect();
        // World origin, independently on each axis
        targets.push(Rect::ZERO);

        vertical = find_alignment(drag, &targets, GuideAxis::Vertical, threshold);
        horizontal = find_alignment(drag, &targets, GuideAxis::Horizontal, threshold);
    }

    if let Some(alignment) = &vertical {
        delta_x = alignment.delta;
    }
    if let Some(alignment) = &horizontal {
        delta_y = alignment.delta;
    }

    let snapped = drag + Vec2::new(delta_x, delta_y);
    let mut guides = Vec::with_capacity(2);
    if let Some(alignment) = &vertical {
        guides.push(guide_for(alignment, snapped, GuideAxis::Vertical, ctx.guide_padding));
    }
    if let Some(alignment) = &horizontal {
        guides.push(guide_for(alignment, snapped, GuideAxis::Horizontal, ctx.guide_padding));
    }

    log::trace!(
        "snap: {} dragged, delta=({:.3}, {:.3}), {} guides",
        dragged_ids.len(),
        delta_x,
        delta_y,
        guides.len()
    );

    SnapResult {
        delta_x,
        delta_y,
        guides,
    }
}
