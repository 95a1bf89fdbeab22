//! Radial gradient blobs arranged around the center
//!
//! Blob gradients change with every bin each frame and are built directly;
//! only the center glow goes through the resource cache.

use super::{EffectRenderer, FrameContext};
use crate::color::{frequency_color, Color, HslaSpec};
use crate::surface::{ColorStop, Paint, Rect, Surface};
use glam::Vec2;
use pulsewave_core::{Band, EffectKind};
use std::f32::consts::TAU;

/// Fraction of the smaller surface side a blob may drift from the center
const MAX_DISTANCE_FACTOR: f32 = 0.4;

/// Cloud of soft blobs, one per even bin, pulsing outward on beats
#[derive(Debug, Clone, Copy, Default)]
pub struct Nebula;

impl<S: Surface> EffectRenderer<S> for Nebula {
    fn kind(&self) -> EffectKind {
        EffectKind::Nebula
    }

    fn render(&mut self, ctx: &mut FrameContext<'_, S>) {
        let center = ctx.center();
        let pulse = ctx.beat_intensity() * 1.2;
        let max_distance = ctx.width.min(ctx.height) * MAX_DISTANCE_FACTOR;
        let len = ctx.spectrum.len();
        let len_f = len as f32;

        for index in (0..len).step_by(2) {
            let position = index as f32;
            let band = if position < len_f * 0.1 {
                Band::Bass
            } else if position < len_f * 0.5 {
                Band::Mid
            } else {
                Band::High
            };
            let magnitude = ctx.spectrum[index] as f32;
            let intensity = magnitude / 255.0 * ctx.sensitivity * 0.7 * ctx.energy(band);
            if intensity <= 0.0 {
                continue;
            }

            let angle = position / len_f * TAU;
            let distance = (intensity * 200.0 + pulse).min(max_distance);
            let at = center + Vec2::from_angle(angle) * distance;
            let extent = intensity * 50.0;
            let inner = frequency_color(ctx.phase(), magnitude, intensity).resolve();
            let gradient = ctx.surface.radial_gradient(
                at,
                0.0,
                at,
                extent,
                &[
                    ColorStop::new(0.0, inner),
                    ColorStop::new(1.0, Color::TRANSPARENT),
                ],
            );
            let paint = Paint::Gradient(gradient);
            ctx.surface
                .fill_circle(at, intensity * 50.0 * ctx.sensitivity * 0.8, &paint);
        }

        if pulse > 0.0 {
            let reach = (pulse * 10.0).round() / 10.0;
            let core = HslaSpec::new(ctx.phase(), 80.0, 50.0, ctx.beat_intensity() / 255.0 * 0.3);
            let key = format!(
                "nebula-core-{:.0}-{:.0}-{:.1}-{}",
                center.x,
                center.y,
                reach,
                core.cache_key()
            );
            let inner = ctx.color(core);
            let paint = ctx.gradient(&key, |surface| {
                surface.radial_gradient(
                    center,
                    0.0,
                    center,
                    reach,
                    &[
                        ColorStop::new(0.0, inner),
                        ColorStop::new(1.0, Color::TRANSPARENT),
                    ],
                )
            });
            let full = Rect::full(ctx.width, ctx.height);
            ctx.surface.fill_rect(full, &paint);
        }
    }
}
