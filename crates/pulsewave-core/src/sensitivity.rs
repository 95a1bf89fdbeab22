//! Adaptive sensitivity
//!
//! Quiet input raises the global gain, loud input lowers it. Plain
//! geometric feedback; clamping is the only overshoot control.

use crate::config::{SENSITIVITY_MAX, SENSITIVITY_MIN};
use crate::sanitize;
use crate::spectrum::mean;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration for [`SensitivityController`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityConfig {
    /// Multiplier at startup
    pub initial: f32,
    /// Lower clamp
    pub min: f32,
    /// Upper clamp
    pub max: f32,
    /// Mean magnitude below which the multiplier grows
    pub quiet_level: f32,
    /// Mean magnitude above which the multiplier shrinks
    pub loud_level: f32,
    /// Growth factor per quiet tick
    pub grow: f32,
    /// Shrink factor per loud tick
    pub shrink: f32,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            initial: 2.5,
            min: SENSITIVITY_MIN,
            max: SENSITIVITY_MAX,
            quiet_level: 50.0,
            loud_level: 150.0,
            grow: 1.1,
            shrink: 0.9,
        }
    }
}

/// Holds the global gain multiplier
#[derive(Debug, Clone)]
pub struct SensitivityController {
    config: SensitivityConfig,
    multiplier: f32,
}

impl Default for SensitivityController {
    fn default() -> Self {
        Self::new(SensitivityConfig::default())
    }
}

impl SensitivityController {
    /// Create a controller starting at `config.initial`
    pub fn new(config: SensitivityConfig) -> Self {
        let multiplier = sanitize(config.initial, config.min, config.max);
        Self { config, multiplier }
    }

    /// Adapt to the loudness of `spectrum` and return the new multiplier
    pub fn update(&mut self, spectrum: &[u8]) -> f32 {
        if spectrum.is_empty() {
            return self.multiplier;
        }
        let average = mean(spectrum);
        if average < self.config.quiet_level {
            self.multiplier = (self.multiplier * self.config.grow).min(self.config.max);
        } else if average > self.config.loud_level {
            self.multiplier = (self.multiplier * self.config.shrink).max(self.config.min);
        }
        self.multiplier
    }

    /// Override the multiplier (clamped); adaptation continues from here
    pub fn set(&mut self, multiplier: f32) {
        self.multiplier = sanitize(multiplier, self.config.min, self.config.max);
        debug!("Sensitivity set to {:.2}", self.multiplier);
    }

    /// Current multiplier
    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_grows_to_cap() {
        let mut controller = SensitivityController::default();
        let quiet = [10u8; 512];
        let first = controller.update(&quiet);
        assert!((first - 2.75).abs() < 1e-5);
        for _ in 0..50 {
            controller.update(&quiet);
        }
        assert_eq!(controller.multiplier(), 5.0);
    }

    #[test]
    fn test_loud_shrinks_to_floor() {
        let mut controller = SensitivityController::default();
        let loud = [220u8; 512];
        let mut previous = controller.multiplier();
        for _ in 0..50 {
            let next = controller.update(&loud);
            assert!(next <= previous);
            previous = next;
        }
        assert_eq!(controller.multiplier(), 1.0);
    }

    #[test]
    fn test_moderate_is_unchanged() {
        let mut controller = SensitivityController::default();
        controller.update(&[100u8; 512]);
        assert_eq!(controller.multiplier(), 2.5);
        // Boundaries are exclusive
        controller.update(&[50u8; 512]);
        controller.update(&[150u8; 512]);
        assert_eq!(controller.multiplier(), 2.5);
    }

    #[test]
    fn test_set_clamps() {
        let mut controller = SensitivityController::default();
        controller.set(9.0);
        assert_eq!(controller.multiplier(), 5.0);
        controller.set(f32::NAN);
        assert_eq!(controller.multiplier(), 1.0);
    }

    #[test]
    fn test_empty_spectrum_is_ignored() {
        let mut controller = SensitivityController::default();
        assert_eq!(controller.update(&[]), 2.5);
    }
}
