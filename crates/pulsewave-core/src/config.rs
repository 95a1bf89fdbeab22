//! Host-facing configuration
//!
//! UI controls never reach into engine state. They call setters on a
//! [`VisualizerConfig`] the host owns and passes into every tick.

use crate::sanitize;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lowest adaptive sensitivity multiplier
pub const SENSITIVITY_MIN: f32 = 1.0;
/// Highest adaptive sensitivity multiplier
pub const SENSITIVITY_MAX: f32 = 5.0;

/// Per-band user weights, each in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandWeights {
    /// Bass weight
    pub bass: f32,
    /// Mid weight
    pub mid: f32,
    /// High weight
    pub high: f32,
}

impl Default for BandWeights {
    fn default() -> Self {
        Self {
            bass: 1.0,
            mid: 1.0,
            high: 1.0,
        }
    }
}

impl BandWeights {
    /// Create clamped weights
    pub fn new(bass: f32, mid: f32, high: f32) -> Self {
        Self {
            bass: sanitize(bass, 0.0, 1.0),
            mid: sanitize(mid, 0.0, 1.0),
            high: sanitize(high, 0.0, 1.0),
        }
    }

    /// Copy with every weight clamped into `[0, 1]`
    pub fn sanitized(&self) -> Self {
        Self::new(self.bass, self.mid, self.high)
    }
}

/// The selectable effect variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Concentric spectrum-perturbed rings with a particle overlay
    #[serde(rename = "cosmicRings")]
    CosmicRings,
    /// Radial gradient blobs on a pulsing circle
    #[serde(rename = "nebula")]
    Nebula,
    /// The drifting particle field
    #[serde(rename = "ambient")]
    AmbientFlow,
    /// Three band-driven sine paths
    #[serde(rename = "waves")]
    SmoothWaves,
    /// Three concentric band circles
    #[serde(rename = "frequencyBased")]
    FrequencyBased,
    /// 64 vertical bars
    #[serde(rename = "waterfall")]
    FrequencyWaterfall,
}

impl EffectKind {
    /// All variants, in selector order
    pub const ALL: [EffectKind; 6] = [
        EffectKind::CosmicRings,
        EffectKind::Nebula,
        EffectKind::AmbientFlow,
        EffectKind::SmoothWaves,
        EffectKind::FrequencyBased,
        EffectKind::FrequencyWaterfall,
    ];

    /// Selector name
    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::CosmicRings => "cosmicRings",
            EffectKind::Nebula => "nebula",
            EffectKind::AmbientFlow => "ambient",
            EffectKind::SmoothWaves => "waves",
            EffectKind::FrequencyBased => "frequencyBased",
            EffectKind::FrequencyWaterfall => "waterfall",
        }
    }

    /// Position in [`EffectKind::ALL`]
    pub fn index(&self) -> usize {
        match self {
            EffectKind::CosmicRings => 0,
            EffectKind::Nebula => 1,
            EffectKind::AmbientFlow => 2,
            EffectKind::SmoothWaves => 3,
            EffectKind::FrequencyBased => 4,
            EffectKind::FrequencyWaterfall => 5,
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown effect selector name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown effect: {0}")]
pub struct ParseEffectKindError(pub String);

impl FromStr for EffectKind {
    type Err = ParseEffectKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EffectKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ParseEffectKindError(s.to_string()))
    }
}

/// Settings a stream collaborator should apply to its frequency analyser
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyserSettings {
    /// FFT size in samples (power of 2)
    pub fft_size: usize,
    /// Temporal smoothing between analyser frames (0.0 - 1.0)
    pub smoothing_time_constant: f32,
}

impl Default for AnalyserSettings {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            smoothing_time_constant: 0.85,
        }
    }
}

impl AnalyserSettings {
    /// Number of byte bins the analyser exposes (half the FFT size)
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }
}

/// Everything the UI can change, read once per tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizerConfig {
    /// Band weights
    pub weights: BandWeights,
    /// Requested sensitivity multiplier in `[1.0, 5.0]`
    pub sensitivity: f32,
    /// Bumped by every [`VisualizerConfig::set_sensitivity`] call
    ///
    /// The engine applies each revision once, then keeps adapting.
    #[serde(skip)]
    pub sensitivity_revision: u64,
    /// Selected effect; `None` until the selector exists
    pub effect: Option<EffectKind>,
    /// Analyser settings for the stream collaborator
    #[serde(default)]
    pub analyser: AnalyserSettings,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            weights: BandWeights::default(),
            sensitivity: 2.5,
            sensitivity_revision: 0,
            effect: Some(EffectKind::CosmicRings),
            analyser: AnalyserSettings::default(),
        }
    }
}

impl VisualizerConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bass weight (clamped into `[0, 1]`)
    pub fn set_bass(&mut self, weight: f32) {
        self.weights.bass = sanitize(weight, 0.0, 1.0);
    }

    /// Set the mid weight (clamped into `[0, 1]`)
    pub fn set_mid(&mut self, weight: f32) {
        self.weights.mid = sanitize(weight, 0.0, 1.0);
    }

    /// Set the high weight (clamped into `[0, 1]`)
    pub fn set_high(&mut self, weight: f32) {
        self.weights.high = sanitize(weight, 0.0, 1.0);
    }

    /// Request a sensitivity from a UI scalar in `[0, 1]`
    ///
    /// The scalar maps linearly onto `[1.0, 5.0]`.
    pub fn set_sensitivity(&mut self, normalized: f32) {
        let normalized = sanitize(normalized, 0.0, 1.0);
        self.sensitivity =
            SENSITIVITY_MIN + normalized * (SENSITIVITY_MAX - SENSITIVITY_MIN);
        self.sensitivity_revision = self.sensitivity_revision.wrapping_add(1);
    }

    /// Select an effect
    pub fn select_effect(&mut self, effect: EffectKind) {
        self.effect = Some(effect);
    }

    /// Clear the selection (the engine idles until one is made)
    pub fn clear_effect(&mut self) {
        self.effect = None;
    }
}
