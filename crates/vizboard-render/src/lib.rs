//! Vizboard Render Library
//!
//! Overlay rendering for the editor canvas: the background grid and the
//! alignment guides produced while dragging. Drawing goes through the
//! [`DrawSink`] abstraction; the `vello-renderer` feature provides a sink
//! backed by a Vello scene.

mod overlay;
mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use overlay::GridRenderer;
pub use renderer::{DrawSink, GridStyle, OverlayColors, RenderError, RenderResult};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloSink;
