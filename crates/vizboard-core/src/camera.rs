//! Camera module for pan/zoom transforms.

use crate::config::CameraConfig;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Zoom factor applied when the wheel scrolls down (zoom out).
pub const WHEEL_ZOOM_OUT: f64 = 0.9;
/// Zoom factor applied when the wheel scrolls up (zoom in).
pub const WHEEL_ZOOM_IN: f64 = 1.1;

/// Snapshot of the view transform.
///
/// A world point `w` appears on screen at `w * zoom + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    /// Horizontal translation in screen pixels.
    pub x: f64,
    /// Vertical translation in screen pixels.
    pub y: f64,
    /// Scale factor from world units to screen pixels.
    pub zoom: f64,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

impl CameraState {
    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        Point::new(
            (screen_point.x - self.x) / self.zoom,
            (screen_point.y - self.y) / self.zoom,
        )
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        Point::new(
            world_point.x * self.zoom + self.x,
            world_point.y * self.zoom + self.y,
        )
    }
}

/// Partial camera update. Absent fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub zoom: Option<f64>,
}

impl CameraPatch {
    /// Patch that only moves the camera.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            zoom: None,
        }
    }

    /// Patch that only changes the zoom.
    pub fn zoom(zoom: f64) -> Self {
        Self {
            zoom: Some(zoom),
            ..Self::default()
        }
    }
}

impl From<CameraState> for CameraPatch {
    fn from(state: CameraState) -> Self {
        Self {
            x: Some(state.x),
            y: Some(state.y),
            zoom: Some(state.zoom),
        }
    }
}

/// Captured at the start of a pan drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanGesture {
    /// Camera translation when the drag began.
    pub start_camera: Vec2,
    /// Pointer position (screen) when the drag began.
    pub start_pointer: Point,
}

/// Callback invoked with the new camera state after every mutation.
pub type CameraListener = Box<dyn FnMut(CameraState)>;

/// Camera manages the view transform for the canvas.
///
/// It handles panning (translation) and zooming (scaling) operations,
/// converting between screen coordinates and world coordinates.
pub struct CameraModel {
    state: CameraState,
    min_zoom: f64,
    max_zoom: f64,
    /// Screen size of the viewport, once the host has reported it.
    viewport_size: Option<Size>,
    on_change: Option<CameraListener>,
}

impl Default for CameraModel {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl fmt::Debug for CameraModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraModel")
            .field("state", &self.state)
            .field("min_zoom", &self.min_zoom)
            .field("max_zoom", &self.max_zoom)
            .field("viewport_size", &self.viewport_size)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

impl CameraModel {
    /// Create a camera at the origin with zoom 1, clamped to the configured bounds.
    ///
    /// Unusable bounds (non-positive, non-finite or inverted) fall back to the defaults.
    pub fn new(config: CameraConfig) -> Self {
        let usable = config.min_zoom > 0.0 && config.max_zoom.is_finite() && config.min_zoom <= config.max_zoom;
        let config = if usable {
            config
        } else {
            log::warn!(
                "Ignoring zoom bounds [{}, {}], using defaults",
                config.min_zoom,
                config.max_zoom
            );
            CameraConfig::default()
        };
        let mut camera = Self {
            state: CameraState::default(),
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            viewport_size: None,
            on_change: None,
        };
        camera.state.zoom = camera.clamp_zoom(camera.state.zoom);
        camera
    }

    /// Register the change listener, replacing any previous one.
    pub fn set_on_change(&mut self, listener: impl FnMut(CameraState) + 'static) {
        self.on_change = Some(Box::new(listener));
    }

    /// Remove the change listener.
    pub fn clear_on_change(&mut self) {
        self.on_change = None;
    }

    /// Current camera state (a copy).
    pub fn camera(&self) -> CameraState {
        self.state
    }

    pub fn zoom(&self) -> f64 {
        self.state.zoom
    }

    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    /// Report the screen size of the viewport.
    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport_size = Some(size);
    }

    pub fn viewport_size(&self) -> Option<Size> {
        self.viewport_size
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    fn notify(&mut self) {
        log::trace!(
            "camera -> x={:.2} y={:.2} zoom={:.3}",
            self.state.x,
            self.state.y,
            self.state.zoom
        );
        let state = self.state;
        if let Some(listener) = self.on_change.as_mut() {
            listener(state);
        }
    }

    /// Merge a partial update. Zoom is clamped to the allowed range.
    pub fn set_camera(&mut self, patch: CameraPatch) {
        if let Some(x) = patch.x {
            self.state.x = x;
        }
        if let Some(y) = patch.y {
            self.state.y = y;
        }
        if let Some(zoom) = patch.zoom {
            self.state.zoom = self.clamp_zoom(zoom);
        }
        self.notify();
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts world coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(Vec2::new(self.state.x, self.state.y)) * Affine::scale(self.state.zoom)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to world coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.state.zoom) * Affine::translate(Vec2::new(-self.state.x, -self.state.y))
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.state.screen_to_world(screen_point)
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.state.world_to_screen(world_point)
    }

    /// Wheel zoom, keeping the world point under the cursor fixed on screen.
    ///
    /// Positive `delta_y` (scrolling down) zooms out.
    pub fn zoom_at_cursor(&mut self, cursor: Point, delta_y: f64) {
        let factor = if delta_y > 0.0 { WHEEL_ZOOM_OUT } else { WHEEL_ZOOM_IN };
        self.zoom_at(cursor, factor);
    }

    /// Zoom by `factor`, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = self.clamp_zoom(self.state.zoom * factor);

        // Resolve the anchor with the old zoom
        let world_before = self.screen_to_world(screen_point);

        self.state.zoom = new_zoom;
        self.state.x = screen_point.x - world_before.x * new_zoom;
        self.state.y = screen_point.y - world_before.y * new_zoom;
        self.notify();
    }

    /// Start a pan drag at `pointer` (screen coordinates).
    pub fn begin_pan(&self, pointer: Point) -> PanGesture {
        PanGesture {
            start_camera: Vec2::new(self.state.x, self.state.y),
            start_pointer: pointer,
        }
    }

    /// Continue a pan drag. Zoom is unchanged.
    pub fn pan_to(&mut self, gesture: &PanGesture, pointer: Point) {
        self.state.x = gesture.start_camera.x + (pointer.x - gesture.start_pointer.x);
        self.state.y = gesture.start_camera.y + (pointer.y - gesture.start_pointer.y);
        self.notify();
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.state.x += delta.x;
        self.state.y += delta.y;
        self.notify();
    }

    /// The visible region in world coordinates.
    ///
    /// Zero-sized (anchored at the world point under the screen origin) until
    /// the viewport size is known.
    pub fn viewport_bounds(&self) -> Rect {
        let origin = self.screen_to_world(Point::ZERO);
        let size = match self.viewport_size {
            Some(size) => Size::new(size.width / self.state.zoom, size.height / self.state.zoom),
            None => Size::ZERO,
        };
        Rect::from_origin_size(origin, size)
    }

    /// Reset camera to the origin at zoom 1.
    pub fn reset(&mut self) {
        self.state = CameraState {
            x: 0.0,
            y: 0.0,
            zoom: self.clamp_zoom(1.0),
        };
        self.notify();
    }

    /// Fit the camera to show the given world rectangle, centered in the viewport.
    ///
    /// Does nothing until the viewport size is known.
    pub fn fit_to_bounds(&mut self, bounds: Rect, padding: f64) {
        let Some(viewport) = self.viewport_size else {
            return;
        };
        if bounds.is_zero_area() {
            self.reset();
            return;
        }

        let padded = Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );

        let scale_x = padded.width / bounds.width();
        let scale_y = padded.height / bounds.height();
        let zoom = self.clamp_zoom(scale_x.min(scale_y));

        let bounds_center = bounds.center();
        self.state = CameraState {
            x: viewport.width / 2.0 - bounds_center.x * zoom,
            y: viewport.height / 2.0 - bounds_center.y * zoom,
            zoom,
        };
        self.notify();
    }
}
