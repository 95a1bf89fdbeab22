//! Beat detection and the shared color phase

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Configuration for [`BeatDetector`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeatDetectorConfig {
    /// Number of leading bins summed into the intensity
    pub bass_bins: usize,
    /// Fixed gain applied to every bass bin
    pub bass_multiplier: f32,
    /// Intensity a beat must exceed
    pub threshold: f32,
    /// Minimum rise over the previous intensity for a beat to count
    pub min_rise: f32,
    /// Hue rotation per beat in degrees
    pub phase_step_degrees: f32,
}

impl Default for BeatDetectorConfig {
    fn default() -> Self {
        Self {
            bass_bins: 8,
            bass_multiplier: 2.0,
            threshold: 120.0,
            min_rise: 15.0,
            phase_step_degrees: 60.0,
        }
    }
}

/// Beat state shared with every effect
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BeatState {
    /// Intensity measured on the latest detection
    pub current_intensity: f32,
    /// Intensity measured on the detection before it
    pub last_intensity: f32,
    /// Rotating base hue in degrees, in `[0, 360)`
    pub color_phase_offset: f32,
}

/// Derives beat intensity from the bass bins and advances the color phase
#[derive(Debug, Clone, Default)]
pub struct BeatDetector {
    config: BeatDetectorConfig,
    state: BeatState,
}

impl BeatDetector {
    /// Create a detector with the given configuration
    pub fn new(config: BeatDetectorConfig) -> Self {
        Self {
            config,
            state: BeatState::default(),
        }
    }

    /// Measure the beat intensity of `spectrum`
    ///
    /// The phase advances only when the intensity is above the threshold and
    /// rose sharply since the previous call, so a sustained loud bass moves
    /// the phase once, not once per frame.
    pub fn detect(&mut self, spectrum: &[u8], bass_weight: f32) -> f32 {
        let bass_weight = crate::sanitize(bass_weight, 0.0, 1.0);
        // A muted bass never beats
        if bass_weight == 0.0 {
            self.state.current_intensity = 0.0;
            return 0.0;
        }

        let bins = self.config.bass_bins;
        let intensity = if bins == 0 || spectrum.len() < bins {
            0.0
        } else {
            let sum: f32 = spectrum[..bins]
                .iter()
                .map(|&b| b as f32 * self.config.bass_multiplier * bass_weight)
                .sum();
            sum / bins as f32
        };

        if intensity > self.config.threshold
            && intensity - self.state.last_intensity > self.config.min_rise
        {
            self.state.color_phase_offset =
                (self.state.color_phase_offset + self.config.phase_step_degrees) % 360.0;
            trace!(
                "Beat: intensity={:.1}, phase={}",
                intensity,
                self.state.color_phase_offset
            );
        }

        self.state.last_intensity = intensity;
        self.state.current_intensity = intensity;
        intensity
    }

    /// Current beat state
    pub fn state(&self) -> BeatState {
        self.state
    }

    /// Current color phase offset in degrees
    pub fn phase(&self) -> f32 {
        self.state.color_phase_offset
    }

    /// Intensity threshold for a beat
    pub fn threshold(&self) -> f32 {
        self.config.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bass_spectrum(level: u8) -> Vec<u8> {
        let mut bins = vec![0u8; 256];
        bins[..8].fill(level);
        bins
    }

    #[test]
    fn test_intensity_formula() {
        let mut detector = BeatDetector::default();
        let intensity = detector.detect(&bass_spectrum(200), 1.0);
        assert_eq!(intensity, 400.0);
        assert_eq!(detector.phase(), 60.0);

        let mut detector = BeatDetector::default();
        let intensity = detector.detect(&bass_spectrum(100), 0.5);
        assert_eq!(intensity, 100.0);
        assert_eq!(detector.phase(), 0.0);
    }

    #[test]
    fn test_muted_bass_returns_zero() {
        let mut detector = BeatDetector::default();
        assert_eq!(detector.detect(&bass_spectrum(255), 0.0), 0.0);
        assert_eq!(detector.phase(), 0.0);
    }

    #[test]
    fn test_sustained_beat_advances_once() {
        let mut detector = BeatDetector::default();
        detector.detect(&bass_spectrum(0), 1.0);
        for _ in 0..10 {
            detector.detect(&bass_spectrum(200), 1.0);
        }
        assert_eq!(detector.phase(), 60.0);
    }

    #[test]
    fn test_each_fresh_edge_advances() {
        let mut detector = BeatDetector::default();
        for _ in 0..7 {
            detector.detect(&bass_spectrum(0), 1.0);
            detector.detect(&bass_spectrum(200), 1.0);
        }
        // 7 edges * 60 = 420 -> wraps to 60
        assert_eq!(detector.phase(), 60.0);
    }

    #[test]
    fn test_small_rise_does_not_trigger() {
        let mut detector = BeatDetector::default();
        // 61*2 = 122 > 120 and rises from 0: first call triggers
        detector.detect(&bass_spectrum(61), 1.0);
        assert_eq!(detector.phase(), 60.0);
        // 66*2 = 132, only +10 over 122
        detector.detect(&bass_spectrum(66), 1.0);
        assert_eq!(detector.phase(), 60.0);
        assert_eq!(detector.state().last_intensity, 132.0);
    }

    #[test]
    fn test_short_spectrum() {
        let mut detector = BeatDetector::default();
        assert_eq!(detector.detect(&[255; 4], 1.0), 0.0);
    }
}
