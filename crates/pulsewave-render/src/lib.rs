//! PulseWave Render - Surfaces, Effects and the Frame Engine
//!
//! This crate turns the analysis values from `pulsewave-core` into pictures:
//! - The [`Surface`] drawing seam, a recording implementation and a
//!   tiny-skia raster implementation
//! - Colors, including the shared procedural palette helpers
//! - A bounded cache for gradients and colors
//! - The six effect renderers
//! - Frame pacing and the [`VisualizerEngine`] that runs one cycle per tick

#![warn(missing_docs)]

use thiserror::Error;

pub mod color;
pub mod effects;
pub mod engine;
pub mod pixmap;
pub mod recorder;
pub mod resource_cache;
pub mod scheduler;
pub mod surface;

// --- Re-exports grouped by category ---

// Drawing
pub use color::{band_hue, frequency_color, frequency_hue, Color, HslaSpec, BACKGROUND};
pub use pixmap::PixmapSurface;
pub use recorder::{DrawCommand, GradientHandle, GradientSpec, RecordingSurface};
pub use surface::{ColorStop, Glow, Paint, Path, PathCommand, Rect, Stroke, Surface};

// Effects
pub use effects::{
    AmbientFlow, CosmicRings, EffectRenderer, EffectSet, FrameContext, FrequencyBased,
    FrequencyWaterfall, Nebula, SmoothWaves,
};

// Engine
pub use engine::{EngineConfig, TickOutcome, VisualizerEngine, TRAIL_FADE};
pub use resource_cache::{CacheConfig, CacheStats, ResourceCache};
pub use scheduler::{FrameScheduler, SchedulerConfig, SchedulerStats};

// Core types hosts need alongside the engine
pub use pulsewave_core::{
    BandWeights, EffectKind, EngineError, SpectrumSource, StaticSpectrum, VisualizerConfig,
};

/// Rendering errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A raster surface cannot have a zero dimension
    #[error("Invalid surface size: {width}x{height}")]
    InvalidSize {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
}

/// Result type for rendering operations
pub type Result<T> = std::result::Result<T, RenderError>;
