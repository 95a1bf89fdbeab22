//! Vertical spectrum bars rising from the bottom edge

use super::{bin_level, EffectRenderer, FrameContext};
use crate::color::{band_hue, HslaSpec};
use crate::surface::{ColorStop, Rect, Surface};
use glam::Vec2;
use pulsewave_core::EffectKind;

/// Number of bars across the surface
pub const BAR_COUNT: usize = 64;
/// Fraction of the surface height a full-scale bar may reach
const MAX_HEIGHT_FACTOR: f32 = 0.8;
/// Perceptual curve applied to normalized magnitudes
const CURVE_EXPONENT: f32 = 1.3;
/// Gap between adjacent bars in pixels
const BAR_GAP: f32 = 1.0;

/// 64 bars fed by the first 64 bins, split into bass/mid/high thirds
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyWaterfall;

impl FrequencyWaterfall {
    /// Band index and height factor for bar `index`
    fn band_factor<S: Surface>(ctx: &FrameContext<'_, S>, index: usize) -> (usize, f32) {
        if index < BAR_COUNT / 3 {
            (0, ctx.bands.bass * 0.6)
        } else if index < BAR_COUNT * 2 / 3 {
            (1, ctx.bands.mid * 0.8)
        } else {
            (2, ctx.bands.high)
        }
    }
}

impl<S: Surface> EffectRenderer<S> for FrequencyWaterfall {
    fn kind(&self) -> EffectKind {
        EffectKind::FrequencyWaterfall
    }

    fn render(&mut self, ctx: &mut FrameContext<'_, S>) {
        let (width, height) = (ctx.width, ctx.height);
        let bar_width = width / BAR_COUNT as f32;
        let max_height = height * MAX_HEIGHT_FACTOR;
        let phase = ctx.phase();

        for index in 0..BAR_COUNT {
            let (band_index, factor) = Self::band_factor(ctx, index);
            let value = bin_level(ctx.spectrum, index).powf(CURVE_EXPONENT);
            let bar_height = (value * max_height * factor * ctx.sensitivity * 0.7).round();
            if bar_height <= 0.0 {
                continue;
            }

            let top = height - bar_height;
            let lit = HslaSpec::new(band_hue(phase, band_index), 80.0, 50.0, value * factor);
            let clear = HslaSpec::new(lit.hue, 80.0, 50.0, 0.0);
            // The key fully describes both stops, so colors resolve only on a miss
            let key = format!("bar-{:.0}-{:.0}-{}", top, height, lit.cache_key());
            let paint = ctx.gradient(&key, |surface| {
                surface.linear_gradient(
                    Vec2::new(0.0, top),
                    Vec2::new(0.0, height),
                    &[
                        ColorStop::new(0.0, lit.resolve()),
                        ColorStop::new(1.0, clear.resolve()),
                    ],
                )
            });

            let x = index as f32 * bar_width;
            ctx.surface.fill_rect(
                Rect::new(x, top, (bar_width - BAR_GAP).max(0.0), bar_height),
                &paint,
            );
        }
    }
}
