//! Visualizer engine - one analysis and render cycle per eligible tick
//!
//! The engine owns every piece of mutable state: the spectrum buffer, the
//! analyzers, the particle field, the resource cache and the pacing clock.
//! Hosts drive it by calling [`VisualizerEngine::tick`] from their per-frame
//! callback and [`VisualizerEngine::reset`] on resize.

use crate::color::{Color, BACKGROUND};
use crate::effects::{EffectRenderer, EffectSet, FrameContext};
use crate::resource_cache::{CacheConfig, ResourceCache};
use crate::scheduler::{FrameScheduler, SchedulerConfig};
use crate::surface::{Paint, Rect, Surface};
use pulsewave_core::{
    AnalyzerConfig, BandEnergies, BeatDetector, BeatDetectorConfig, BeatState, EffectKind,
    EngineError, FrequencyBandAnalyzer, ParticleField, Result, SensitivityConfig,
    SensitivityController, SpectrumFrame, SpectrumSource, VisualizerConfig,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info, trace, warn};

/// Translucent background overwrite applied every rendered tick
pub const TRAIL_FADE: Color = Color {
    r: 15.0 / 255.0,
    g: 15.0 / 255.0,
    b: 19.0 / 255.0,
    a: 0.3,
};

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A full analysis and render cycle ran
    Rendered,
    /// Too soon after the previous frame
    Skipped,
    /// No surface or no effect selected yet
    NotReady,
}

/// Tuning for every engine component
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Band analyzer
    pub analyzer: AnalyzerConfig,
    /// Beat detector
    pub beat: BeatDetectorConfig,
    /// Adaptive sensitivity
    pub sensitivity: SensitivityConfig,
    /// Resource cache bounds
    pub cache: CacheConfig,
    /// Frame pacing
    pub scheduler: SchedulerConfig,
}

/// Audio-reactive visualizer driving one [`Surface`] from one [`SpectrumSource`]
pub struct VisualizerEngine<Src: SpectrumSource, S: Surface> {
    source: Src,
    spectrum: SpectrumFrame,
    analyzer: FrequencyBandAnalyzer,
    beat: BeatDetector,
    sensitivity: SensitivityController,
    /// Last config revision whose sensitivity was applied
    applied_sensitivity_revision: u64,
    particles: ParticleField,
    cache: ResourceCache<S::Gradient>,
    scheduler: FrameScheduler,
    effects: EffectSet<S>,
    rng: StdRng,
    width: f32,
    height: f32,
    last_effect: Option<EffectKind>,
}

impl<Src: SpectrumSource, S: Surface> VisualizerEngine<Src, S> {
    /// Create an engine with an OS-seeded RNG and default tuning
    pub fn new(source: Src, width: f32, height: f32) -> Self {
        Self::with_rng(source, width, height, StdRng::from_os_rng())
    }

    /// Create an engine with a caller-provided RNG
    pub fn with_rng(source: Src, width: f32, height: f32, rng: StdRng) -> Self {
        Self::with_config(source, width, height, rng, EngineConfig::default())
    }

    /// Create an engine with explicit tuning
    pub fn with_config(
        source: Src,
        width: f32,
        height: f32,
        mut rng: StdRng,
        config: EngineConfig,
    ) -> Self {
        let spectrum = SpectrumFrame::new(source.bin_count());
        let particles = ParticleField::new(width, height, &mut rng);
        let (width, height) = particles.bounds();

        debug!(
            "VisualizerEngine created: {} bins, {}x{} surface, cache capacity {}",
            spectrum.len(),
            width,
            height,
            config.cache.capacity
        );

        Self {
            source,
            spectrum,
            analyzer: FrequencyBandAnalyzer::new(config.analyzer),
            beat: BeatDetector::new(config.beat),
            sensitivity: SensitivityController::new(config.sensitivity),
            applied_sensitivity_revision: 0,
            particles,
            cache: ResourceCache::new(config.cache),
            scheduler: FrameScheduler::new(config.scheduler),
            effects: EffectSet::standard(),
            rng,
            width,
            height,
            last_effect: None,
        }
    }

    /// Acquire the audio stream and build an engine around it
    ///
    /// Acquisition errors are logged and returned. A permission denial is
    /// terminal: the host should not retry.
    pub fn start<F>(acquire: F, width: f32, height: f32) -> Result<Self>
    where
        F: FnOnce() -> Result<Src>,
    {
        match acquire() {
            Ok(source) => {
                info!(
                    "Audio stream acquired ({} bins), starting visualizer",
                    source.bin_count()
                );
                Ok(Self::new(source, width, height))
            }
            Err(err @ EngineError::PermissionDenied(_)) => {
                error!("Audio permission denied, visualizer will not start: {}", err);
                Err(err)
            }
            Err(err) => {
                error!("Audio stream unavailable: {}", err);
                Err(err)
            }
        }
    }

    /// Run one cycle if the tick is eligible
    ///
    /// Order within a rendered tick: spectrum refresh, sensitivity, trail
    /// fade, band analysis, beat detection, effect render, sweep check.
    pub fn tick(
        &mut self,
        timestamp_ms: f64,
        config: &VisualizerConfig,
        surface: Option<&mut S>,
    ) -> TickOutcome {
        let (Some(surface), Some(effect)) = (surface, config.effect) else {
            trace!("Tick at {:.1}ms: surface or effect not ready", timestamp_ms);
            return TickOutcome::NotReady;
        };

        let clock_restarted = self.scheduler.is_clock_restart(timestamp_ms);
        if !self.scheduler.begin_frame(timestamp_ms) {
            return TickOutcome::Skipped;
        }
        if clock_restarted {
            self.analyzer.invalidate();
            self.cache.rebase(timestamp_ms);
        }

        self.spectrum.refresh_from(&mut self.source);

        if config.sensitivity_revision != self.applied_sensitivity_revision {
            self.sensitivity.set(config.sensitivity);
            self.applied_sensitivity_revision = config.sensitivity_revision;
        }
        let sensitivity = self.sensitivity.update(self.spectrum.bins());

        let (width, height) = surface.size();
        let full = Rect::full(width, height);
        if self.last_effect != Some(effect) {
            debug!("Effect switched: {:?} -> {}", self.last_effect, effect);
            surface.fill_rect(full, &Paint::Solid(BACKGROUND));
            self.last_effect = Some(effect);
        }
        surface.fill_rect(full, &Paint::Solid(TRAIL_FADE));

        self.cache.begin_frame(timestamp_ms);
        let weights = config.weights.sanitized();
        let bands = self
            .analyzer
            .analyze(self.spectrum.bins(), &weights, timestamp_ms);
        self.beat.detect(self.spectrum.bins(), weights.bass);

        let mut ctx = FrameContext {
            surface,
            cache: &mut self.cache,
            particles: &mut self.particles,
            rng: &mut self.rng,
            spectrum: self.spectrum.bins(),
            bands,
            beat: self.beat.state(),
            beat_threshold: self.beat.threshold(),
            sensitivity,
            width,
            height,
            time_ms: timestamp_ms,
        };
        if !self.effects.render(effect, &mut ctx) {
            warn!("No renderer registered for {}", effect);
        }

        if self.scheduler.sweep_due(timestamp_ms) {
            self.cache.sweep(timestamp_ms);
        }

        TickOutcome::Rendered
    }

    /// Adopt new surface dimensions
    ///
    /// Repopulates the particle field for the new bounds and drops every
    /// cached resource, since gradients carry absolute coordinates.
    pub fn reset(&mut self, width: f32, height: f32) {
        self.particles.reset(width, height, &mut self.rng);
        let (width, height) = self.particles.bounds();
        self.width = width;
        self.height = height;
        self.cache.clear();
        debug!(
            "VisualizerEngine reset to {}x{} ({} particles)",
            width,
            height,
            self.particles.len()
        );
    }

    /// Replace the renderer for one effect kind
    pub fn set_renderer(&mut self, renderer: Box<dyn EffectRenderer<S>>) {
        debug!("Custom renderer installed for {}", renderer.kind());
        self.effects.set_renderer(renderer);
    }

    /// Beat intensity and color phase after the latest rendered tick
    pub fn beat_state(&self) -> BeatState {
        self.beat.state()
    }

    /// Current sensitivity multiplier
    pub fn sensitivity(&self) -> f32 {
        self.sensitivity.multiplier()
    }

    /// Band energies from the latest analysis
    pub fn band_energies(&self) -> BandEnergies {
        self.analyzer.latest()
    }

    /// Cached resources
    pub fn cache(&self) -> &ResourceCache<S::Gradient> {
        &self.cache
    }

    /// Ambient particle field
    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    /// Pacing state
    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    /// Latest spectrum frame
    pub fn spectrum(&self) -> &SpectrumFrame {
        &self.spectrum
    }

    /// Effect rendered by the latest tick
    pub fn last_effect(&self) -> Option<EffectKind> {
        self.last_effect
    }

    /// Dimensions from the latest reset
    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Stream collaborator
    pub fn source_mut(&mut self) -> &mut Src {
        &mut self.source
    }
}
