//! Grid and alignment-guide overlay.

use crate::renderer::{DrawSink, GridStyle, OverlayColors, RenderError, RenderResult};
use kurbo::{Line, Point};
use vizboard_core::camera::CameraModel;
use vizboard_core::config::{DEFAULT_GRID_SIZE, GridConfig};
use vizboard_core::grid::GridLines;
use vizboard_core::snap::{Guide, GuideAxis};

/// Half-length of the cross arms, in screen pixels.
const CROSS_SIZE: f64 = 3.0;
/// Dot radius, in screen pixels.
const DOT_RADIUS: f64 = 1.5;
const GRID_STROKE_WIDTH: f64 = 0.5;
const GUIDE_STROKE_WIDTH: f64 = 1.0;

/// Draws the background grid and alignment guides into an attached sink.
///
/// All output is in screen space, so stroke widths stay constant across
/// zoom levels.
pub struct GridRenderer<S: DrawSink> {
    sink: Option<S>,
    style: GridStyle,
    grid_size: f64,
    colors: OverlayColors,
}

impl<S: DrawSink> Default for GridRenderer<S> {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE)
    }
}

impl<S: DrawSink> GridRenderer<S> {
    /// Create a renderer with no sink attached.
    pub fn new(grid_size: f64) -> Self {
        Self {
            sink: None,
            style: GridStyle::default(),
            grid_size,
            colors: OverlayColors::default(),
        }
    }

    pub fn from_config(config: &GridConfig) -> Self {
        Self::new(config.size)
    }

    /// Attach a drawing sink, returning the previously attached one.
    pub fn attach_sink(&mut self, sink: S) -> Option<S> {
        self.sink.replace(sink)
    }

    /// Detach and return the drawing sink.
    pub fn detach_sink(&mut self) -> Option<S> {
        self.sink.take()
    }

    pub fn sink(&self) -> Option<&S> {
        self.sink.as_ref()
    }

    pub fn sink_mut(&mut self) -> Option<&mut S> {
        self.sink.as_mut()
    }

    pub fn style(&self) -> GridStyle {
        self.style
    }

    pub fn set_style(&mut self, style: GridStyle) {
        self.style = style;
    }

    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    pub fn set_grid_size(&mut self, grid_size: f64) {
        self.grid_size = grid_size;
    }

    pub fn set_colors(&mut self, colors: OverlayColors) {
        self.colors = colors;
    }

    fn attached_sink(&mut self, operation: &'static str) -> RenderResult<&mut S> {
        self.sink.as_mut().ok_or(RenderError::SinkNotAttached(operation))
    }

    /// Draw the grid covering the camera's visible region.
    ///
    /// Returns the number of primitives emitted. Nothing is drawn until the
    /// camera knows its viewport size.
    pub fn render_grid(&mut self, camera: &CameraModel) -> RenderResult<usize> {
        let style = self.style;
        let color = self.colors.grid;
        let lines = GridLines::visible(camera.viewport_bounds(), self.grid_size);
        let sink = self.attached_sink("render_grid")?;

        let mut count = 0;
        match style {
            GridStyle::None => {}
            GridStyle::Lines => {
                let bounds = lines.bounds;
                for &x in &lines.vertical {
                    let from = camera.world_to_screen(Point::new(x, bounds.y0));
                    let to = camera.world_to_screen(Point::new(x, bounds.y1));
                    sink.stroke_line(Line::new(from, to), color, GRID_STROKE_WIDTH);
                    count += 1;
                }
                for &y in &lines.horizontal {
                    let from = camera.world_to_screen(Point::new(bounds.x0, y));
                    let to = camera.world_to_screen(Point::new(bounds.x1, y));
                    sink.stroke_line(Line::new(from, to), color, GRID_STROKE_WIDTH);
                    count += 1;
                }
            }
            GridStyle::CrossPlus => {
                for point in lines.intersections() {
                    let p = camera.world_to_screen(point);
                    sink.stroke_line(
                        Line::new((p.x - CROSS_SIZE, p.y), (p.x + CROSS_SIZE, p.y)),
                        color,
                        1.0,
                    );
                    sink.stroke_line(
                        Line::new((p.x, p.y - CROSS_SIZE), (p.x, p.y + CROSS_SIZE)),
                        color,
                        1.0,
                    );
                    count += 2;
                }
            }
            GridStyle::Dots => {
                for point in lines.intersections() {
                    sink.fill_dot(camera.world_to_screen(point), DOT_RADIUS, color);
                    count += 1;
                }
            }
        }

        log::trace!("Rendered {:?} grid: {} primitives", style, count);
        Ok(count)
    }

    /// Draw alignment guides.
    pub fn render_guides(&mut self, camera: &CameraModel, guides: &[Guide]) -> RenderResult<usize> {
        let color = self.colors.guide;
        let sink = self.attached_sink("render_guides")?;

        for guide in guides {
            let (from, to) = match guide.axis {
                GuideAxis::Vertical => (
                    Point::new(guide.position, guide.start),
                    Point::new(guide.position, guide.end),
                ),
                GuideAxis::Horizontal => (
                    Point::new(guide.start, guide.position),
                    Point::new(guide.end, guide.position),
                ),
            };
            let line = Line::new(camera.world_to_screen(from), camera.world_to_screen(to));
            sink.stroke_line(line, color, GUIDE_STROKE_WIDTH);
        }
        Ok(guides.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;
    use peniko::Color;
    use vizboard_core::camera::CameraPatch;
    use vizboard_core::config::CameraConfig;

    #[derive(Debug, Default)]
    struct RecordingSink {
        lines: Vec<(Line, f64)>,
        dots: Vec<Point>,
    }

    impl DrawSink for RecordingSink {
        fn stroke_line(&mut self, line: Line, _color: Color, width: f64) {
            self.lines.push((line, width));
        }

        fn fill_dot(&mut self, center: Point, _radius: f64, _color: Color) {
            self.dots.push(center);
        }
    }

    fn camera(width: f64, height: f64) -> CameraModel {
        let mut camera = CameraModel::new(CameraConfig::default());
        camera.set_viewport_size(Size::new(width, height));
        camera
    }

    fn renderer() -> GridRenderer<RecordingSink> {
        let mut renderer = GridRenderer::new(20.0);
        renderer.attach_sink(RecordingSink::default());
        renderer
    }

    #[test]
    fn test_render_without_sink_fails() {
        let mut renderer: GridRenderer<RecordingSink> = GridRenderer::new(20.0);
        let camera = camera(100.0, 100.0);
        assert!(matches!(
            renderer.render_grid(&camera),
            Err(RenderError::SinkNotAttached("render_grid"))
        ));
        assert!(matches!(
            renderer.render_guides(&camera, &[]),
            Err(RenderError::SinkNotAttached(_))
        ));
    }

    #[test]
    fn test_render_after_detach_fails() {
        let mut renderer = renderer();
        assert!(renderer.detach_sink().is_some());
        assert!(renderer.render_grid(&camera(100.0, 100.0)).is_err());
    }

    #[test]
    fn test_grid_lines() {
        let mut renderer = renderer();
        let count = renderer.render_grid(&camera(100.0, 60.0)).unwrap();
        // x: 0..100 step 20 -> 6 lines; y: 0..60 -> 4 lines
        assert_eq!(count, 10);
        let sink = renderer.sink().unwrap();
        assert_eq!(sink.lines.len(), 10);
        let (first, width) = sink.lines[0];
        assert_eq!(first.p0, Point::new(0.0, 0.0));
        assert_eq!(first.p1, Point::new(0.0, 60.0));
        assert_eq!(width, GRID_STROKE_WIDTH);
    }

    #[test]
    fn test_grid_lines_follow_camera() {
        let mut renderer = renderer();
        let mut camera = camera(100.0, 100.0);
        camera.set_camera(CameraPatch { x: Some(10.0), y: Some(0.0), zoom: Some(2.0) });
        renderer.render_grid(&camera).unwrap();

        // World x=0 lands at screen x=10, world x=20 at 50
        let xs: Vec<f64> = renderer
            .sink()
            .unwrap()
            .lines
            .iter()
            .filter(|(line, _)| line.p0.x == line.p1.x)
            .map(|(line, _)| line.p0.x)
            .collect();
        assert!(xs.contains(&10.0));
        assert!(xs.contains(&50.0));
    }

    #[test]
    fn test_grid_without_viewport_size() {
        let mut renderer = renderer();
        let camera = CameraModel::new(CameraConfig::default());
        assert_eq!(renderer.render_grid(&camera).unwrap(), 0);
    }

    #[test]
    fn test_grid_styles() {
        let mut renderer = renderer();
        let camera = camera(40.0, 40.0);

        renderer.set_style(GridStyle::Dots);
        assert_eq!(renderer.render_grid(&camera).unwrap(), 9);
        assert_eq!(renderer.sink().unwrap().dots.len(), 9);

        renderer.set_style(GridStyle::CrossPlus);
        assert_eq!(renderer.render_grid(&camera).unwrap(), 18);

        renderer.set_style(GridStyle::None);
        assert_eq!(renderer.render_grid(&camera).unwrap(), 0);
    }

    #[test]
    fn test_guides() {
        let mut renderer = renderer();
        let mut camera = camera(200.0, 200.0);
        camera.set_camera(CameraPatch::zoom(2.0));
        let guides = [
            Guide { axis: GuideAxis::Vertical, position: 10.0, start: -5.0, end: 50.0 },
            Guide { axis: GuideAxis::Horizontal, position: 20.0, start: 0.0, end: 30.0 },
        ];

        assert_eq!(renderer.render_guides(&camera, &guides).unwrap(), 2);
        let lines = &renderer.sink().unwrap().lines;
        assert_eq!(lines[0].0, Line::new((20.0, -10.0), (20.0, 100.0)));
        assert_eq!(lines[1].0, Line::new((0.0, 40.0), (60.0, 40.0)));
        assert_eq!(lines[0].1, GUIDE_STROKE_WIDTH);
    }
}
