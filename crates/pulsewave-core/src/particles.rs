//! Ambient particle field
//!
//! A fixed population of slow drifters. Their speed is scaled every frame by
//! the beat and by the band each particle listens to; positions wrap around
//! the surface edges.

use crate::bands::{Band, BandEnergies};
use glam::Vec2;
use rand::Rng;
use tracing::debug;

/// Number of particles in a field
pub const PARTICLE_COUNT: usize = 80;

/// Upper bound on the per-frame speed scalar
const MAX_SPEED_SCALAR: f32 = 2.0;

/// A single drifting particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position in surface pixels
    pub position: Vec2,
    /// Base radius in `[1, 3]`
    pub size: f32,
    /// Base velocity, each axis in `[-0.25, 0.25]`
    pub velocity: Vec2,
}

impl Particle {
    /// Band this particle listens to, by its index in the field
    pub fn band_for_index(index: usize) -> Band {
        Band::cycle(index)
    }
}

/// Fixed set of particles confined to the surface
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
    width: f32,
    height: f32,
}

impl ParticleField {
    /// Create a populated field for a `width` x `height` surface
    pub fn new<R: Rng>(width: f32, height: f32, rng: &mut R) -> Self {
        let mut field = Self::default();
        field.reset(width, height, rng);
        field
    }

    /// Repopulate with [`PARTICLE_COUNT`] fresh particles for new bounds
    pub fn reset<R: Rng>(&mut self, width: f32, height: f32, rng: &mut R) {
        self.width = sanitize_extent(width);
        self.height = sanitize_extent(height);

        self.particles.clear();
        self.particles.reserve(PARTICLE_COUNT);
        for _ in 0..PARTICLE_COUNT {
            let position = Vec2::new(
                random_within(rng, self.width),
                random_within(rng, self.height),
            );
            self.particles.push(Particle {
                position,
                size: rng.random_range(1.0..=3.0),
                velocity: Vec2::new(
                    rng.random_range(-0.25..=0.25),
                    rng.random_range(-0.25..=0.25),
                ),
            });
        }

        debug!(
            "ParticleField reset: {} particles in {}x{}",
            self.particles.len(),
            self.width,
            self.height
        );
    }

    /// Per-frame speed scalar for a particle listening to `band_energy`
    pub fn speed_scalar(beat_intensity: f32, sensitivity: f32, band_energy: f32) -> f32 {
        let scalar = (beat_intensity / 128.0) * sensitivity * 0.5 * band_energy;
        if scalar.is_finite() {
            scalar.min(MAX_SPEED_SCALAR)
        } else {
            0.0
        }
    }

    /// Move every particle one frame and wrap it back into bounds
    pub fn advance(&mut self, energies: &BandEnergies, beat_intensity: f32, sensitivity: f32) {
        let (width, height) = (self.width, self.height);
        for (index, particle) in self.particles.iter_mut().enumerate() {
            let band_energy = energies.get(Particle::band_for_index(index));
            let scalar = Self::speed_scalar(beat_intensity, sensitivity, band_energy);
            let moved = particle.position + particle.velocity * scalar;
            particle.position = Vec2::new(wrap(moved.x, width), wrap(moved.y, height));
        }
    }

    /// The particles, in index order
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access for hosts that seed custom layouts
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Field bounds as `(width, height)`
    pub fn bounds(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Number of particles
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the field is empty (never after a reset)
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

fn sanitize_extent(extent: f32) -> f32 {
    if extent.is_finite() && extent > 0.0 {
        extent
    } else {
        0.0
    }
}

fn random_within<R: Rng>(rng: &mut R, extent: f32) -> f32 {
    if extent > 0.0 {
        rng.random_range(0.0..extent)
    } else {
        0.0
    }
}

/// Wrap `value` into `[0, extent)`
fn wrap(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}
