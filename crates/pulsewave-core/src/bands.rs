//! Frequency band reduction
//!
//! Collapses a byte spectrum into three normalized energies. Band edges are
//! fixed bin indices, not frequencies: with the default 2048-point analyser
//! the bass range covers roughly the first 170 Hz, mid runs to ~2.1 kHz and
//! high to ~4.3 kHz.

use crate::config::BandWeights;
use crate::spectrum::MIN_ANALYSIS_BINS;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::trace;

/// One of the three analysis bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    /// Lowest bins
    Bass,
    /// Middle bins
    Mid,
    /// Upper bins
    High,
}

impl Band {
    /// All bands, low to high
    pub const ALL: [Band; 3] = [Band::Bass, Band::Mid, Band::High];

    /// Band assigned to the `index`-th item of a round-robin (bass, mid, high, bass, ...)
    pub fn cycle(index: usize) -> Self {
        Self::ALL[index % 3]
    }
}

/// Normalized band energies, each in `[0, 1]` and already scaled by its weight
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BandEnergies {
    /// Bass energy
    pub bass: f32,
    /// Mid energy
    pub mid: f32,
    /// High energy
    pub high: f32,
}

impl BandEnergies {
    /// All bands silent
    pub const ZERO: BandEnergies = BandEnergies {
        bass: 0.0,
        mid: 0.0,
        high: 0.0,
    };

    /// Energy of one band
    pub fn get(&self, band: Band) -> f32 {
        match band {
            Band::Bass => self.bass,
            Band::Mid => self.mid,
            Band::High => self.high,
        }
    }
}

/// Configuration for [`FrequencyBandAnalyzer`]
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Bass bin range
    pub bass_bins: Range<usize>,
    /// Mid bin range
    pub mid_bins: Range<usize>,
    /// High bin range
    pub high_bins: Range<usize>,
    /// Minimum time between recomputations in milliseconds
    pub refresh_interval_ms: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            bass_bins: 0..8,
            mid_bins: 8..100,
            high_bins: 100..MIN_ANALYSIS_BINS,
            refresh_interval_ms: 1000.0 / 30.0,
        }
    }
}

/// Reduces spectra to [`BandEnergies`], memoized for a short interval
#[derive(Debug, Clone)]
pub struct FrequencyBandAnalyzer {
    config: AnalyzerConfig,
    /// Last computed energies
    cached: BandEnergies,
    /// Timestamp of the last recomputation; `None` until the first one
    last_update_ms: Option<f64>,
}

impl Default for FrequencyBandAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl FrequencyBandAnalyzer {
    /// Create an analyzer with the given configuration
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            cached: BandEnergies::ZERO,
            last_update_ms: None,
        }
    }

    /// Band energies for `spectrum` at time `now_ms`
    ///
    /// Inside the refresh interval the previous result is returned unchanged,
    /// whatever `spectrum` holds. A clock that went backwards recomputes. A
    /// spectrum too short for the configured ranges yields zero energies.
    pub fn analyze(
        &mut self,
        spectrum: &[u8],
        weights: &BandWeights,
        now_ms: f64,
    ) -> BandEnergies {
        if let Some(last) = self.last_update_ms {
            let elapsed = now_ms - last;
            if (0.0..self.config.refresh_interval_ms).contains(&elapsed) {
                return self.cached;
            }
        }

        let weights = weights.sanitized();
        self.cached = if spectrum.len() < self.required_bins() {
            trace!(
                "Spectrum too short for band analysis: {} bins, need {}",
                spectrum.len(),
                self.required_bins()
            );
            BandEnergies::ZERO
        } else {
            BandEnergies {
                bass: Self::band_energy(spectrum, &self.config.bass_bins, weights.bass),
                mid: Self::band_energy(spectrum, &self.config.mid_bins, weights.mid),
                high: Self::band_energy(spectrum, &self.config.high_bins, weights.high),
            }
        };
        self.last_update_ms = Some(now_ms);
        self.cached
    }

    /// The most recently computed energies
    pub fn latest(&self) -> BandEnergies {
        self.cached
    }

    /// Forget the cached result so the next call recomputes
    pub fn invalidate(&mut self) {
        self.last_update_ms = None;
    }

    /// Number of bins the configured ranges need
    pub fn required_bins(&self) -> usize {
        self.config
            .bass_bins
            .end
            .max(self.config.mid_bins.end)
            .max(self.config.high_bins.end)
    }

    /// Mean of `range`, normalized by 255 and weighted
    fn band_energy(spectrum: &[u8], range: &Range<usize>, weight: f32) -> f32 {
        // A muted band skips the reduction entirely
        if weight == 0.0 || range.is_empty() {
            return 0.0;
        }
        let sum: u32 = spectrum[range.clone()].iter().map(|&b| b as u32).sum();
        let mean = sum as f32 / range.len() as f32;
        (mean / 255.0) * weight
    }
}
