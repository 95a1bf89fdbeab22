//! Drawing surface abstraction
//!
//! The raster canvas is an external collaborator. Effects talk to it only
//! through [`Surface`], so any 2D backend with filled/stroked paths and
//! linear/radial gradients can host the visualizer.

use crate::color::Color;
use glam::Vec2;

/// Axis-aligned rectangle in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner
    pub origin: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    /// Create from position and extent
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Rectangle covering a whole `width` x `height` surface
    pub fn full(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }
}

/// One gradient color stop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Offset along the gradient in `[0, 1]`
    pub offset: f32,
    /// Color at this offset
    pub color: Color,
}

impl ColorStop {
    /// Create a stop
    pub fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Fill or stroke source
#[derive(Debug, Clone, PartialEq)]
pub enum Paint<G> {
    /// Flat color
    Solid(Color),
    /// A gradient handle created by the same surface
    Gradient(G),
}

/// Soft glow drawn around a stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    /// Blur radius in pixels
    pub blur: f32,
    /// Glow color
    pub color: Color,
}

/// Stroke style
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke<G> {
    /// Stroke source
    pub paint: Paint<G>,
    /// Line width in pixels
    pub width: f32,
    /// Optional glow
    pub glow: Option<Glow>,
}

/// Path building command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Start a new subpath
    MoveTo(Vec2),
    /// Straight segment
    LineTo(Vec2),
    /// Quadratic curve through a control point
    QuadTo {
        /// Control point
        control: Vec2,
        /// End point
        to: Vec2,
    },
    /// Close the current subpath
    Close,
}

/// A vector path
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    /// Create an empty path
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty path with room for `capacity` commands
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    /// Start a subpath at `point`
    pub fn move_to(&mut self, point: Vec2) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(point));
        self
    }

    /// Line to `point`
    pub fn line_to(&mut self, point: Vec2) -> &mut Self {
        self.commands.push(PathCommand::LineTo(point));
        self
    }

    /// Quadratic curve to `to` via `control`
    pub fn quad_to(&mut self, control: Vec2, to: Vec2) -> &mut Self {
        self.commands.push(PathCommand::QuadTo { control, to });
        self
    }

    /// Close the current subpath
    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// Recorded commands
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Whether the path has no commands
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Closed polyline through `points`
    pub fn polygon(points: impl IntoIterator<Item = Vec2>) -> Self {
        let mut path = Self::new();
        for (i, point) in points.into_iter().enumerate() {
            if i == 0 {
                path.move_to(point);
            } else {
                path.line_to(point);
            }
        }
        if !path.is_empty() {
            path.close();
        }
        path
    }

    /// Smooth open curve through `points`
    ///
    /// Each point becomes the control of a quadratic segment ending halfway
    /// to the next point.
    pub fn smooth_curve(points: &[Vec2]) -> Self {
        let mut path = Self::with_capacity(points.len());
        let Some(first) = points.first() else {
            return path;
        };
        path.move_to(*first);
        for pair in points.windows(2) {
            let mid = (pair[0] + pair[1]) * 0.5;
            path.quad_to(pair[0], mid);
        }
        path
    }
}

/// A 2D drawing surface
pub trait Surface {
    /// Gradient handle produced by this surface
    type Gradient: Clone;

    /// Current size in pixels as `(width, height)`
    fn size(&self) -> (f32, f32);

    /// Linear gradient from `start` to `end`
    fn linear_gradient(&mut self, start: Vec2, end: Vec2, stops: &[ColorStop]) -> Self::Gradient;

    /// Radial gradient between two circles
    fn radial_gradient(
        &mut self,
        inner_center: Vec2,
        inner_radius: f32,
        outer_center: Vec2,
        outer_radius: f32,
        stops: &[ColorStop],
    ) -> Self::Gradient;

    /// Fill a rectangle
    fn fill_rect(&mut self, rect: Rect, paint: &Paint<Self::Gradient>);

    /// Fill a circle
    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint<Self::Gradient>);

    /// Stroke a path
    fn stroke_path(&mut self, path: &Path, stroke: &Stroke<Self::Gradient>);
}
