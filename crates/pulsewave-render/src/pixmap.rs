//! Raster surface backed by a tiny-skia pixmap
//!
//! Software rendering for headless hosts: frames land in an RGBA pixmap that
//! can be uploaded as a texture or encoded to PNG.
//!
//! Glow is approximated by a wider translucent stroke under the main stroke;
//! radial gradients ignore the inner radius (every effect uses zero).

use crate::color::{Color, BACKGROUND};
use crate::surface::{ColorStop, Paint, Path, PathCommand, Rect, Stroke, Surface};
use crate::{RenderError, Result};
use glam::Vec2;
use tiny_skia as sk;
use tracing::{debug, trace};

/// Opacity of the glow underlay relative to the glow color
const GLOW_ALPHA: f32 = 0.35;

/// [`Surface`] that rasterizes into an owned [`sk::Pixmap`]
pub struct PixmapSurface {
    pixmap: sk::Pixmap,
}

impl PixmapSurface {
    /// Create a pixmap cleared to the visualizer background
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let mut pixmap =
            sk::Pixmap::new(width, height).ok_or(RenderError::InvalidSize { width, height })?;
        pixmap.fill(to_skia(BACKGROUND));
        debug!("PixmapSurface created: {}x{}", width, height);
        Ok(Self { pixmap })
    }

    /// Replace the pixmap with a cleared one of the new size
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        *self = Self::new(width, height)?;
        Ok(())
    }

    /// Underlying pixmap
    pub fn pixmap(&self) -> &sk::Pixmap {
        &self.pixmap
    }

    /// Premultiplied pixel at `(x, y)`
    pub fn pixel(&self, x: u32, y: u32) -> Option<sk::PremultipliedColorU8> {
        self.pixmap.pixel(x, y)
    }

    fn paint(paint: &Paint<sk::Shader<'static>>) -> sk::Paint<'static> {
        let mut out = sk::Paint::default();
        out.anti_alias = true;
        out.shader = match paint {
            Paint::Solid(color) => sk::Shader::SolidColor(to_skia(*color)),
            Paint::Gradient(shader) => shader.clone(),
        };
        out
    }

    fn stroke(&mut self, path: &sk::Path, paint: &sk::Paint<'_>, width: f32) {
        let stroke = sk::Stroke {
            width: width.max(0.0),
            line_join: sk::LineJoin::Round,
            line_cap: sk::LineCap::Round,
            ..Default::default()
        };
        self.pixmap
            .stroke_path(path, paint, &stroke, sk::Transform::identity(), None);
    }
}

impl Surface for PixmapSurface {
    type Gradient = sk::Shader<'static>;

    fn size(&self) -> (f32, f32) {
        (self.pixmap.width() as f32, self.pixmap.height() as f32)
    }

    fn linear_gradient(&mut self, start: Vec2, end: Vec2, stops: &[ColorStop]) -> Self::Gradient {
        sk::LinearGradient::new(
            point(start),
            point(end),
            skia_stops(stops),
            sk::SpreadMode::Pad,
            sk::Transform::identity(),
        )
        .unwrap_or_else(|| fallback_shader(stops))
    }

    fn radial_gradient(
        &mut self,
        inner_center: Vec2,
        _inner_radius: f32,
        outer_center: Vec2,
        outer_radius: f32,
        stops: &[ColorStop],
    ) -> Self::Gradient {
        sk::RadialGradient::new(
            point(inner_center),
            point(outer_center),
            outer_radius,
            skia_stops(stops),
            sk::SpreadMode::Pad,
            sk::Transform::identity(),
        )
        .unwrap_or_else(|| fallback_shader(stops))
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint<Self::Gradient>) {
        let Some(rect) = sk::Rect::from_xywh(rect.origin.x, rect.origin.y, rect.size.x, rect.size.y)
        else {
            return;
        };
        self.pixmap
            .fill_rect(rect, &Self::paint(paint), sk::Transform::identity(), None);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint<Self::Gradient>) {
        let Some(circle) = sk::PathBuilder::from_circle(center.x, center.y, radius) else {
            return;
        };
        self.pixmap.fill_path(
            &circle,
            &Self::paint(paint),
            sk::FillRule::Winding,
            sk::Transform::identity(),
            None,
        );
    }

    fn stroke_path(&mut self, path: &Path, stroke: &Stroke<Self::Gradient>) {
        let Some(path) = skia_path(path) else {
            trace!("Skipping degenerate path");
            return;
        };

        if let Some(glow) = stroke.glow {
            let underlay = Paint::Solid(glow.color.with_alpha(glow.color.a * GLOW_ALPHA));
            self.stroke(&path, &Self::paint(&underlay), stroke.width + glow.blur);
        }
        let paint = Self::paint(&stroke.paint);
        self.stroke(&path, &paint, stroke.width);
    }
}

fn to_skia(color: Color) -> sk::Color {
    sk::Color::from_rgba(
        color.r.clamp(0.0, 1.0),
        color.g.clamp(0.0, 1.0),
        color.b.clamp(0.0, 1.0),
        color.a.clamp(0.0, 1.0),
    )
    .unwrap_or(sk::Color::TRANSPARENT)
}

fn point(v: Vec2) -> sk::Point {
    sk::Point::from_xy(v.x, v.y)
}

fn skia_stops(stops: &[ColorStop]) -> Vec<sk::GradientStop> {
    stops
        .iter()
        .map(|stop| sk::GradientStop::new(stop.offset, to_skia(stop.color)))
        .collect()
}

/// Degenerate gradients (zero length or radius) paint their last stop
fn fallback_shader(stops: &[ColorStop]) -> sk::Shader<'static> {
    let color = stops.last().map_or(Color::TRANSPARENT, |stop| stop.color);
    sk::Shader::SolidColor(to_skia(color))
}

fn skia_path(path: &Path) -> Option<sk::Path> {
    let mut builder = sk::PathBuilder::new();
    for command in path.commands() {
        match *command {
            PathCommand::MoveTo(p) => builder.move_to(p.x, p.y),
            PathCommand::LineTo(p) => builder.line_to(p.x, p.y),
            PathCommand::QuadTo { control, to } => {
                builder.quad_to(control.x, control.y, to.x, to.y)
            }
            PathCommand::Close => builder.close(),
        }
    }
    builder.finish()
}
