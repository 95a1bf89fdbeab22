//! One centered circle per band

use super::{EffectRenderer, FrameContext};
use crate::color::band_hue;
use crate::surface::{Paint, Surface};
use pulsewave_core::{Band, EffectKind};

/// Radius of each band's circle at full energy
const RADII: [f32; 3] = [100.0, 150.0, 200.0];

/// Bass, mid and high circles sized and faded by their energy
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyBased;

impl<S: Surface> EffectRenderer<S> for FrequencyBased {
    fn kind(&self) -> EffectKind {
        EffectKind::FrequencyBased
    }

    fn render(&mut self, ctx: &mut FrameContext<'_, S>) {
        let center = ctx.center();
        let phase = ctx.phase();
        for (index, (band, radius)) in Band::ALL.into_iter().zip(RADII).enumerate() {
            let energy = ctx.energy(band);
            if energy <= 0.0 {
                continue;
            }
            let color = ctx
                .cache
                .get_or_create_color(band_hue(phase, index), 70.0, 50.0, energy);
            ctx.surface
                .fill_circle(center, radius * energy, &Paint::Solid(color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::recorder::DrawCommand;
    use pulsewave_core::BandEnergies;

    #[test]
    fn test_circle_per_band() {
        let bands = BandEnergies {
            bass: 1.0,
            mid: 0.5,
            high: 0.25,
        };
        let mut harness = Harness::new(vec![0; 256], bands, 0.0);
        harness.render(&mut FrequencyBased);

        let radii: Vec<f32> = harness
            .surface
            .commands()
            .iter()
            .map(|c| match c {
                DrawCommand::FillCircle { radius, .. } => *radius,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(radii, vec![100.0, 75.0, 50.0]);
    }

    #[test]
    fn test_alpha_follows_energy() {
        let bands = BandEnergies {
            bass: 0.5,
            mid: 0.0,
            high: 0.0,
        };
        let mut harness = Harness::new(vec![0; 256], bands, 0.0);
        harness.render(&mut FrequencyBased);

        let commands = harness.surface.commands();
        assert_eq!(commands.len(), 1);
        let color = commands[0].solid_color().unwrap();
        assert!((color.a - 0.5).abs() < 1e-3);
    }
}
