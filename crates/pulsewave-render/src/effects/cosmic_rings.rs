//! Concentric spectrum rings with a sparkle overlay

use super::{bin_level, EffectRenderer, FrameContext};
use crate::color::frequency_color;
use crate::surface::{Glow, Paint, Path, Stroke, Surface};
use glam::Vec2;
use pulsewave_core::{Band, EffectKind};
use rand::Rng;
use std::f32::consts::TAU;

/// Ring base radii and the band each one follows
const RINGS: [(f32, Band); 5] = [
    (100.0, Band::Bass),
    (160.0, Band::Bass),
    (220.0, Band::Mid),
    (280.0, Band::Mid),
    (340.0, Band::High),
];

const SEGMENTS: usize = 32;
const GLOW_BLUR: f32 = 20.0;
/// Only every n-th bin may spawn a sparkle
const SPARKLE_STRIDE: usize = 8;
const SPARKLE_MIN_INTENSITY: f32 = 0.4;
const SPARKLE_MAX_RADIUS: f32 = 350.0;

/// Five rings whose radius breathes with the spectrum
#[derive(Debug, Clone, Copy, Default)]
pub struct CosmicRings;

impl CosmicRings {
    fn draw_rings<S: Surface>(ctx: &mut FrameContext<'_, S>) {
        let center = ctx.center();
        let beat = ctx.beat_intensity();
        let phase = ctx.phase();
        let spectrum = ctx.spectrum;
        let len = spectrum.len();

        for (base_radius, band) in RINGS {
            let energy = ctx.energy(band);
            let sensitivity = ctx.sensitivity;
            let pulse = beat / 255.0 * 50.0 * energy;

            // i == SEGMENTS closes the loop on the first segment's bin
            let outline = Path::polygon((0..=SEGMENTS).map(|i| {
                let angle = i as f32 / SEGMENTS as f32 * TAU;
                let bin = (i % SEGMENTS) * len / SEGMENTS;
                let intensity = bin_level(spectrum, bin) * energy;
                let radius = base_radius + intensity * 80.0 * sensitivity + pulse;
                center + Vec2::from_angle(angle) * radius
            }));

            let color = ctx.color(frequency_color(phase, base_radius + beat, energy));
            let stroke = Stroke {
                paint: Paint::Solid(color),
                width: 2.0 + beat / 255.0 * 5.0 * energy,
                glow: Some(Glow {
                    blur: GLOW_BLUR,
                    color,
                }),
            };
            ctx.surface.stroke_path(&outline, &stroke);
        }
    }

    fn draw_sparkles<S: Surface>(ctx: &mut FrameContext<'_, S>) {
        let center = ctx.center();
        let phase = ctx.phase();
        let len = ctx.spectrum.len() as f32;

        for index in (0..ctx.spectrum.len()).step_by(SPARKLE_STRIDE) {
            let position = index as f32;
            let band = if position < len * 0.3 {
                Band::Bass
            } else if position < len * 0.6 {
                Band::Mid
            } else {
                Band::High
            };
            let intensity = ctx.bin(index) * ctx.energy(band);
            if intensity <= SPARKLE_MIN_INTENSITY {
                continue;
            }

            let angle = ctx.rng.random_range(0.0..TAU);
            let radius = ctx.rng.random_range(0.0..SPARKLE_MAX_RADIUS);
            let at = center + Vec2::from_angle(angle) * radius;

            let paint = ctx.solid(frequency_color(phase, radius, intensity));
            ctx.surface.fill_circle(at, intensity * 4.0, &paint);
        }
    }
}

impl<S: Surface> EffectRenderer<S> for CosmicRings {
    fn kind(&self) -> EffectKind {
        EffectKind::CosmicRings
    }

    fn render(&mut self, ctx: &mut FrameContext<'_, S>) {
        Self::draw_rings(ctx);
        Self::draw_sparkles(ctx);
    }
}
