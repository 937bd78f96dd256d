//! Element snapshots read from the external store.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an element.
pub type ElementId = Uuid;

/// A positioned element on the canvas.
///
/// Elements are owned by the host's store. The core only ever reads
/// snapshots of them and hands back deltas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Top-left corner in world coordinates.
    pub position: Point,
    /// Width and height in world units.
    pub size: Size,
    /// Hidden elements are still synchronized but never act as snap targets.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Locked elements can still be dragged but never act as snap targets.
    #[serde(default)]
    pub locked: bool,
    /// Opaque rendering payload, passed through to renderers untouched.
    #[serde(default)]
    pub data: serde_json::Value,
}

fn default_visible() -> bool {
    true
}

impl Element {
    /// Create a visible, unlocked element with a fresh id.
    pub fn new(position: Point, size: Size) -> Self {
        Self::with_id(Uuid::new_v4(), position, size)
    }

    /// Create a visible, unlocked element with the given id.
    pub fn with_id(id: ElementId, position: Point, size: Size) -> Self {
        Self {
            id,
            position,
            size,
            visible: true,
            locked: false,
            data: serde_json::Value::Null,
        }
    }

    /// Builder-style visibility setter.
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Builder-style lock setter.
    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Builder-style payload setter.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    /// Bounding rectangle at the stored position.
    pub fn bounds(&self) -> Rect {
        self.bounds_at(self.position)
    }

    /// Bounding rectangle if the element's top-left were at `position`.
    pub fn bounds_at(&self, position: Point) -> Rect {
        Rect::from_origin_size(position, self.size)
    }

    /// Whether this element may act as an alignment target.
    pub fn is_snap_target(&self) -> bool {
        self.visible && !self.locked
    }
}
