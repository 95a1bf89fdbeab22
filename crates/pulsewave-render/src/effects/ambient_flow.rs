//! Drifting particles tinted by band

use super::{EffectRenderer, FrameContext};
use crate::color::band_hue;
use crate::surface::{Paint, Surface};
use pulsewave_core::{EffectKind, Particle};

/// Advances the particle field and draws each particle as a dot
#[derive(Debug, Clone, Copy, Default)]
pub struct AmbientFlow;

impl<S: Surface> EffectRenderer<S> for AmbientFlow {
    fn kind(&self) -> EffectKind {
        EffectKind::AmbientFlow
    }

    fn render(&mut self, ctx: &mut FrameContext<'_, S>) {
        let beat = ctx.beat_intensity();
        let phase = ctx.phase();
        let sensitivity = ctx.sensitivity;
        ctx.particles.advance(&ctx.bands, beat, sensitivity);

        for (index, particle) in ctx.particles.particles().iter().enumerate() {
            let energy = ctx.bands.get(Particle::band_for_index(index));
            let radius = (particle.size * energy * sensitivity * 0.6).min(particle.size * 3.0);
            let alpha = (energy * 0.8).min(0.4);
            if radius <= 0.0 || alpha <= 0.0 {
                continue;
            }

            let color = ctx
                .cache
                .get_or_create_color(band_hue(phase, index), 70.0, 50.0, alpha);
            ctx.surface
                .fill_circle(particle.position, radius, &Paint::Solid(color));
        }
    }
}
