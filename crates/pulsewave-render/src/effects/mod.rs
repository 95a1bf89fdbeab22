//! Effect renderers
//!
//! Every variant consumes the same [`FrameContext`] and draws one frame onto
//! its surface. All of them color relative to the shared beat phase, so the
//! palette stays continuous when the host switches effects.

use crate::color::{Color, HslaSpec};
use crate::resource_cache::ResourceCache;
use crate::surface::{Paint, Surface};
use glam::Vec2;
use pulsewave_core::{Band, BandEnergies, BeatState, EffectKind, ParticleField};
use rand::rngs::StdRng;

mod ambient_flow;
mod cosmic_rings;
mod frequency_based;
mod nebula;
mod smooth_waves;
mod waterfall;

pub use ambient_flow::AmbientFlow;
pub use cosmic_rings::CosmicRings;
pub use frequency_based::FrequencyBased;
pub use nebula::Nebula;
pub use smooth_waves::SmoothWaves;
pub use waterfall::FrequencyWaterfall;

/// Everything an effect may read (and the few things it may touch) for one frame
pub struct FrameContext<'a, S: Surface> {
    /// Target surface
    pub surface: &'a mut S,
    /// Shared gradient/color cache
    pub cache: &'a mut ResourceCache<S::Gradient>,
    /// Ambient particles
    pub particles: &'a mut ParticleField,
    /// Per-frame randomness
    pub rng: &'a mut StdRng,
    /// This tick's magnitudes (read-only)
    pub spectrum: &'a [u8],
    /// Weighted band energies
    pub bands: BandEnergies,
    /// Beat intensity and color phase
    pub beat: BeatState,
    /// Intensity a beat must exceed
    pub beat_threshold: f32,
    /// Adaptive sensitivity multiplier
    pub sensitivity: f32,
    /// Surface width in pixels
    pub width: f32,
    /// Surface height in pixels
    pub height: f32,
    /// Tick timestamp in milliseconds
    pub time_ms: f64,
}

impl<'a, S: Surface> FrameContext<'a, S> {
    /// Surface center
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Beat intensity of this tick
    pub fn beat_intensity(&self) -> f32 {
        self.beat.current_intensity
    }

    /// Shared color phase in degrees
    pub fn phase(&self) -> f32 {
        self.beat.color_phase_offset
    }

    /// Energy of `band`
    pub fn energy(&self, band: Band) -> f32 {
        self.bands.get(band)
    }

    /// Magnitude of bin `index` normalized to `[0, 1]`, zero past the end
    pub fn bin(&self, index: usize) -> f32 {
        bin_level(self.spectrum, index)
    }

    /// Cached color
    pub fn color(&mut self, spec: HslaSpec) -> Color {
        self.cache.color(&spec)
    }

    /// Cached solid paint
    pub fn solid(&mut self, spec: HslaSpec) -> Paint<S::Gradient> {
        Paint::Solid(self.cache.color(&spec))
    }

    /// Cached gradient paint; `build` runs only on a cache miss
    pub fn gradient<F>(&mut self, key: &str, build: F) -> Paint<S::Gradient>
    where
        F: FnOnce(&mut S) -> S::Gradient,
    {
        let surface = &mut *self.surface;
        Paint::Gradient(self.cache.get_or_create(key, || build(surface)))
    }
}

/// Magnitude of bin `index` normalized to `[0, 1]`, zero past the end
pub fn bin_level(spectrum: &[u8], index: usize) -> f32 {
    spectrum.get(index).map_or(0.0, |&b| b as f32 / 255.0)
}

/// An effect variant
pub trait EffectRenderer<S: Surface> {
    /// Which selector entry this renderer answers to
    fn kind(&self) -> EffectKind;

    /// Draw one frame
    fn render(&mut self, ctx: &mut FrameContext<'_, S>);
}

/// One renderer per [`EffectKind`]
pub struct EffectSet<S: Surface> {
    renderers: Vec<Box<dyn EffectRenderer<S>>>,
}

impl<S: Surface> EffectSet<S> {
    /// The six built-in variants
    pub fn standard() -> Self {
        Self {
            renderers: vec![
                Box::new(CosmicRings),
                Box::new(Nebula),
                Box::new(AmbientFlow),
                Box::new(SmoothWaves),
                Box::new(FrequencyBased),
                Box::new(FrequencyWaterfall),
            ],
        }
    }

    /// Swap in a custom renderer for its kind
    pub fn set_renderer(&mut self, renderer: Box<dyn EffectRenderer<S>>) {
        let kind = renderer.kind();
        match self.renderers.iter_mut().find(|r| r.kind() == kind) {
            Some(slot) => *slot = renderer,
            None => self.renderers.push(renderer),
        }
    }

    /// Dispatch one frame to the renderer for `kind`; returns false if none is registered
    pub fn render(&mut self, kind: EffectKind, ctx: &mut FrameContext<'_, S>) -> bool {
        match self.renderers.iter_mut().find(|r| r.kind() == kind) {
            Some(renderer) => {
                renderer.render(ctx);
                true
            }
            None => false,
        }
    }

    /// Registered kinds, in registration order
    pub fn kinds(&self) -> Vec<EffectKind> {
        self.renderers.iter().map(|r| r.kind()).collect()
    }
}

impl<S: Surface> Default for EffectSet<S> {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::recorder::RecordingSurface;
    use pulsewave_core::PARTICLE_COUNT;
    use rand::SeedableRng;

    /// Owned state backing a [`FrameContext`] in unit tests
    pub struct Harness {
        pub surface: RecordingSurface,
        pub cache: ResourceCache<<RecordingSurface as Surface>::Gradient>,
        pub particles: ParticleField,
        pub rng: StdRng,
        pub spectrum: Vec<u8>,
        pub bands: BandEnergies,
        pub beat: BeatState,
        pub sensitivity: f32,
        pub time_ms: f64,
    }

    impl Harness {
        pub fn new(spectrum: Vec<u8>, bands: BandEnergies, beat_intensity: f32) -> Self {
            let mut rng = StdRng::seed_from_u64(42);
            let particles = ParticleField::new(800.0, 600.0, &mut rng);
            assert_eq!(particles.len(), PARTICLE_COUNT);
            Self {
                surface: RecordingSurface::new(800.0, 600.0),
                cache: ResourceCache::default(),
                particles,
                rng,
                spectrum,
                bands,
                beat: BeatState {
                    current_intensity: beat_intensity,
                    last_intensity: 0.0,
                    color_phase_offset: 60.0,
                },
                sensitivity: 2.5,
                time_ms: 1000.0,
            }
        }

        pub fn render<E: EffectRenderer<RecordingSurface>>(&mut self, effect: &mut E) {
            let (width, height) = self.surface.size();
            let mut ctx = FrameContext {
                surface: &mut self.surface,
                cache: &mut self.cache,
                particles: &mut self.particles,
                rng: &mut self.rng,
                spectrum: &self.spectrum,
                bands: self.bands,
                beat: self.beat,
                beat_threshold: 120.0,
                sensitivity: self.sensitivity,
                width,
                height,
                time_ms: self.time_ms,
            };
            effect.render(&mut ctx);
        }
    }

    pub fn full_bands() -> BandEnergies {
        BandEnergies {
            bass: 1.0,
            mid: 1.0,
            high: 1.0,
        }
    }
}
