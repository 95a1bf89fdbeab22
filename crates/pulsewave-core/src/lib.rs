//! PulseWave Core - Audio Analysis and Simulation
//!
//! This crate contains everything between a raw byte spectrum and the values
//! the effect renderers consume:
//! - Spectrum frames and the stream collaborator seam
//! - Bass/mid/high band reduction with a short-lived cache
//! - Beat detection and the shared color phase
//! - Adaptive sensitivity
//! - The ambient particle field
//! - Host-facing configuration and error types
//!
//! Nothing in here draws. See `pulsewave-render` for surfaces and effects.

#![warn(missing_docs)]

pub use glam::Vec2;

pub mod bands;
pub mod beat;
pub mod config;
pub mod error;
pub mod particles;
pub mod sensitivity;
pub mod spectrum;

// --- Re-exports grouped by category ---

// Analysis
pub use bands::{AnalyzerConfig, Band, BandEnergies, FrequencyBandAnalyzer};
pub use beat::{BeatDetector, BeatDetectorConfig, BeatState};
pub use sensitivity::{SensitivityConfig, SensitivityController};

// Simulation
pub use particles::{Particle, ParticleField, PARTICLE_COUNT};

// Spectrum input
pub use spectrum::{SpectrumFrame, SpectrumSource, StaticSpectrum, MIN_ANALYSIS_BINS};

// Configuration & Errors
pub use config::{AnalyserSettings, BandWeights, EffectKind, ParseEffectKindError, VisualizerConfig};
pub use error::{EngineError, Result};

/// Clamp a host-provided scalar into `[min, max]`, mapping NaN to zero first
pub fn sanitize(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        return 0.0_f32.clamp(min, max);
    }
    value.clamp(min, max)
}
