//! Vizboard Core Library
//!
//! Platform-agnostic direct-manipulation core for the Vizboard editor:
//! the camera model, retained scene synchronization, and drag snapping.

pub mod camera;
pub mod config;
pub mod element;
pub mod grid;
pub mod scene;
pub mod snap;

pub use camera::{CameraModel, CameraPatch, CameraState, PanGesture};
pub use config::{CameraConfig, ConfigError, ConfigResult, EditorConfig, GridConfig, SnapConfig};
pub use element::{Element, ElementId};
pub use grid::{GridLines, RulerTick, nice_step, ruler_ticks};
pub use scene::{ElementRenderer, SceneSync, SyncStats};
pub use snap::{DragBox, Guide, GuideAxis, SnapContext, SnapResult, SnapSource, compute_snap, snap_to_grid};
