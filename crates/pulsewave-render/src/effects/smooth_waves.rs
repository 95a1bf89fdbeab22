//! Three smooth spectrum waves with beat-triggered light beams

use super::{bin_level, EffectRenderer, FrameContext};
use crate::color::{band_hue, Color, HslaSpec};
use crate::surface::{ColorStop, Glow, Paint, Path, Rect, Stroke, Surface};
use glam::Vec2;
use pulsewave_core::{Band, EffectKind};

/// Extra fade on top of the engine's trail fade, for longer wave trails
pub const WAVE_FADE: Color = Color {
    r: 15.0 / 255.0,
    g: 15.0 / 255.0,
    b: 19.0 / 255.0,
    a: 0.2,
};

const WAVE_AMPLITUDE: f32 = 50.0;
const WAVE_SPACING: f32 = 100.0;
const SWAY_AMPLITUDE: f64 = 30.0;
const GLOW_BLUR: f32 = 15.0;
const BEAM_COUNT: usize = 3;
const BEAM_WIDTH: f32 = 40.0;
/// Beams fire when the beat exceeds the detector threshold by this factor
const BEAM_TRIGGER: f32 = 1.2;

/// Wave per band, drawn as quadratic curves over the lower half of the spectrum
#[derive(Debug, Clone, Copy, Default)]
pub struct SmoothWaves;

impl SmoothWaves {
    fn draw_wave<S: Surface>(ctx: &mut FrameContext<'_, S>, wave: usize, sway: f32, drift: f32) {
        let band = Band::ALL[wave];
        let energy = ctx.energy(band);
        let sensitivity = ctx.sensitivity;
        let spectrum = ctx.spectrum;
        let (width, height) = (ctx.width, ctx.height);

        let samples = spectrum.len() / 2;
        if samples == 0 {
            return;
        }
        let slice = width / samples as f32;
        let offset = wave as f32;
        let lane = (offset - 1.0) * WAVE_SPACING;

        let points: Vec<Vec2> = (0..samples)
            .map(|i| {
                let x = i as f32 * slice;
                let value = bin_level(spectrum, i) * 255.0 / 128.0 * sensitivity * energy;
                let y = height / 2.0
                    + (x * 0.02 + offset + drift).sin() * WAVE_AMPLITUDE
                    + value * 100.0
                    + lane
                    + sway;
                Vec2::new(x, y)
            })
            .collect();
        let curve = Path::smooth_curve(&points);

        let hue = band_hue(ctx.phase(), wave);
        let alpha = energy * 0.5;
        let edge = HslaSpec::new(hue, 80.0, 50.0, alpha);
        let middle = HslaSpec::new(hue + 30.0, 80.0, 50.0, alpha);
        let key = format!(
            "wave-{:.0}-{}-{}",
            width,
            edge.cache_key(),
            middle.cache_key()
        );
        let (edge_color, middle_color) = (ctx.color(edge), ctx.color(middle));
        let paint = ctx.gradient(&key, |surface| {
            surface.linear_gradient(
                Vec2::ZERO,
                Vec2::new(width, 0.0),
                &[
                    ColorStop::new(0.0, edge_color),
                    ColorStop::new(0.5, middle_color),
                    ColorStop::new(1.0, edge_color),
                ],
            )
        });

        let stroke = Stroke {
            paint,
            width: 3.0 + ctx.beat_intensity() / 255.0 * 5.0 * energy,
            glow: Some(Glow {
                blur: GLOW_BLUR,
                color: edge_color,
            }),
        };
        ctx.surface.stroke_path(&curve, &stroke);
    }

    fn draw_beams<S: Surface>(ctx: &mut FrameContext<'_, S>) {
        let (width, height) = (ctx.width, ctx.height);
        let alpha = ctx.beat_intensity() / 255.0 * 0.3;

        for i in 0..BEAM_COUNT {
            let x = (width * (i + 1) as f32 / (BEAM_COUNT + 1) as f32).round();
            let hue = ctx.phase() + i as f32 * 40.0;
            let dark = HslaSpec::new(hue, 80.0, 50.0, 0.0);
            let lit = HslaSpec::new(hue, 80.0, 50.0, alpha);
            let key = format!("beam-{:.0}-{:.0}-{}", x, height, lit.cache_key());
            let (dark_color, lit_color) = (ctx.color(dark), ctx.color(lit));
            let paint = ctx.gradient(&key, |surface| {
                surface.linear_gradient(
                    Vec2::new(x, 0.0),
                    Vec2::new(x, height),
                    &[
                        ColorStop::new(0.0, dark_color),
                        ColorStop::new(0.5, lit_color),
                        ColorStop::new(1.0, dark_color),
                    ],
                )
            });
            ctx.surface.fill_rect(
                Rect::new(x - BEAM_WIDTH / 2.0, 0.0, BEAM_WIDTH, height),
                &paint,
            );
        }
    }
}

impl<S: Surface> EffectRenderer<S> for SmoothWaves {
    fn kind(&self) -> EffectKind {
        EffectKind::SmoothWaves
    }

    fn render(&mut self, ctx: &mut FrameContext<'_, S>) {
        let full = Rect::full(ctx.width, ctx.height);
        ctx.surface.fill_rect(full, &Paint::Solid(WAVE_FADE));

        // Timestamps grow without bound; reduce them in f64
        let drift = (ctx.time_ms * 0.001).rem_euclid(std::f64::consts::TAU) as f32;
        let sway = ((ctx.time_ms * 0.002).sin() * SWAY_AMPLITUDE) as f32;

        for wave in 0..Band::ALL.len() {
            Self::draw_wave(ctx, wave, sway, drift);
        }

        if ctx.beat_intensity() > ctx.beat_threshold * BEAM_TRIGGER {
            Self::draw_beams(ctx);
        }
    }
}
