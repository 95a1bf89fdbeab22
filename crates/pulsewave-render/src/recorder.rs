//! Recording surface
//!
//! A [`Surface`] that rasterizes nothing and keeps the frame as a list of
//! [`DrawCommand`]s. Headless hosts replay the list onto their own backend;
//! tests inspect it.

use crate::color::Color;
use crate::surface::{ColorStop, Paint, Path, Rect, Stroke, Surface};
use glam::Vec2;
use std::rc::Rc;

/// Gradient geometry and stops as requested by an effect
#[derive(Debug, Clone, PartialEq)]
pub enum GradientSpec {
    /// Linear gradient
    Linear {
        /// Start point
        start: Vec2,
        /// End point
        end: Vec2,
        /// Color stops
        stops: Vec<ColorStop>,
    },
    /// Two-circle radial gradient
    Radial {
        /// Inner circle center
        inner_center: Vec2,
        /// Inner circle radius
        inner_radius: f32,
        /// Outer circle center
        outer_center: Vec2,
        /// Outer circle radius
        outer_radius: f32,
        /// Color stops
        stops: Vec<ColorStop>,
    },
}

/// Shared gradient handle; clones point at the same `GradientSpec`
pub type GradientHandle = Rc<GradientSpec>;

/// One recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Rectangle fill
    FillRect {
        /// Target rectangle
        rect: Rect,
        /// Fill
        paint: Paint<GradientHandle>,
    },
    /// Circle fill
    FillCircle {
        /// Center
        center: Vec2,
        /// Radius
        radius: f32,
        /// Fill
        paint: Paint<GradientHandle>,
    },
    /// Path stroke
    StrokePath {
        /// Path
        path: Path,
        /// Stroke style
        stroke: Stroke<GradientHandle>,
    },
}

impl DrawCommand {
    /// Solid color used by this command, if any
    pub fn solid_color(&self) -> Option<Color> {
        let paint = match self {
            DrawCommand::FillRect { paint, .. } | DrawCommand::FillCircle { paint, .. } => paint,
            DrawCommand::StrokePath { stroke, .. } => &stroke.paint,
        };
        match paint {
            Paint::Solid(color) => Some(*color),
            Paint::Gradient(_) => None,
        }
    }
}

/// Surface that records draw commands
#[derive(Debug, Default)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
    gradients_created: u64,
}

impl RecordingSurface {
    /// Create a recorder for a `width` x `height` surface
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Change the reported size
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Commands recorded since the last [`RecordingSurface::take_commands`]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the recorded commands
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Total number of gradients this surface has constructed
    pub fn gradients_created(&self) -> u64 {
        self.gradients_created
    }
}

impl Surface for RecordingSurface {
    type Gradient = GradientHandle;

    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn linear_gradient(&mut self, start: Vec2, end: Vec2, stops: &[ColorStop]) -> GradientHandle {
        self.gradients_created += 1;
        Rc::new(GradientSpec::Linear {
            start,
            end,
            stops: stops.to_vec(),
        })
    }

    fn radial_gradient(
        &mut self,
        inner_center: Vec2,
        inner_radius: f32,
        outer_center: Vec2,
        outer_radius: f32,
        stops: &[ColorStop],
    ) -> GradientHandle {
        self.gradients_created += 1;
        Rc::new(GradientSpec::Radial {
            inner_center,
            inner_radius,
            outer_center,
            outer_radius,
            stops: stops.to_vec(),
        })
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint<GradientHandle>) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            paint: paint.clone(),
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint<GradientHandle>) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            paint: paint.clone(),
        });
    }

    fn stroke_path(&mut self, path: &Path, stroke: &Stroke<GradientHandle>) {
        self.commands.push(DrawCommand::StrokePath {
            path: path.clone(),
            stroke: stroke.clone(),
        });
    }
}
