//! Vello-backed drawing sink.

use crate::renderer::DrawSink;
use kurbo::{Affine, Circle, Line, Point, Stroke};
use peniko::{Color, Fill};
use vello::Scene;

/// Records overlay primitives into a Vello scene.
pub struct VelloSink {
    /// The Vello scene being built.
    scene: Scene,
}

impl Default for VelloSink {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloSink {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
        }
    }

    /// Get the scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the built scene, leaving an empty one behind.
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Clear recorded primitives before building the next frame.
    pub fn reset(&mut self) {
        self.scene.reset();
    }
}

impl DrawSink for VelloSink {
    fn stroke_line(&mut self, line: Line, color: Color, width: f64) {
        self.scene
            .stroke(&Stroke::new(width), Affine::IDENTITY, color, None, &line);
    }

    fn fill_dot(&mut self, center: Point, radius: f64, color: Color) {
        self.scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            color,
            None,
            &Circle::new(center, radius),
        );
    }
}
