//! Color values and the procedural color helpers shared by the effects

use palette::encoding::Srgb;
use palette::{FromColor, Hsla, Srgba};

/// Background of the visualizer, `rgb(15, 15, 19)`
pub const BACKGROUND: Color = Color {
    r: 15.0 / 255.0,
    g: 15.0 / 255.0,
    b: 19.0 / 255.0,
    a: 1.0,
};

/// Resolved sRGB color with straight alpha, components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Fully transparent black
    pub const TRANSPARENT: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Color from 8-bit channels and a float alpha
    pub fn rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a,
        }
    }

    /// Color from hue in degrees, saturation and lightness in percent, alpha in `[0, 1]`
    ///
    /// Out-of-range inputs wrap (hue) or clamp (everything else).
    pub fn hsla(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        let hue = finite_or_zero(hue).rem_euclid(360.0);
        let saturation = (finite_or_zero(saturation) / 100.0).clamp(0.0, 1.0);
        let lightness = (finite_or_zero(lightness) / 100.0).clamp(0.0, 1.0);
        let alpha = finite_or_zero(alpha).clamp(0.0, 1.0);

        let hsla: Hsla<Srgb, f32> = Hsla::new(hue, saturation, lightness, alpha);
        let rgba: Srgba<f32> = Srgba::from_color(hsla);
        let (r, g, b, a) = rgba.into_components();
        Self { r, g, b, a }
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: finite_or_zero(alpha).clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS `rgba(...)` notation
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            self.a
        )
    }
}

/// Hue/saturation/lightness/alpha request, quantized so equal-looking colors share a cache key
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HslaSpec {
    /// Hue in degrees, `[0, 360)`
    pub hue: f32,
    /// Saturation in percent
    pub saturation: f32,
    /// Lightness in percent
    pub lightness: f32,
    /// Alpha in `[0, 1]`
    pub alpha: f32,
}

impl HslaSpec {
    /// Quantize a request: hue to 0.1°, saturation and lightness to 0.1%, alpha to 0.01
    pub fn new(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        Self {
            hue: quantize(finite_or_zero(hue).rem_euclid(360.0), 10.0) % 360.0,
            saturation: quantize(finite_or_zero(saturation).clamp(0.0, 100.0), 10.0),
            lightness: quantize(finite_or_zero(lightness).clamp(0.0, 100.0), 10.0),
            alpha: quantize(finite_or_zero(alpha).clamp(0.0, 1.0), 100.0),
        }
    }

    /// Deterministic cache key
    pub fn cache_key(&self) -> String {
        format!(
            "hsla-{:.1}-{:.1}-{:.1}-{:.2}",
            self.hue, self.saturation, self.lightness, self.alpha
        )
    }

    /// Resolve to a [`Color`]
    pub fn resolve(&self) -> Color {
        Color::hsla(self.hue, self.saturation, self.lightness, self.alpha)
    }
}

/// Hue for a frequency-like value on top of the shared color phase
pub fn frequency_hue(phase: f32, frequency: f32) -> f32 {
    (phase + frequency * 0.3).rem_euclid(360.0)
}

/// Glow color for a frequency-like value at the given intensity
///
/// Brighter and more opaque as intensity grows; alpha saturates at 0.8.
pub fn frequency_color(phase: f32, frequency: f32, intensity: f32) -> HslaSpec {
    HslaSpec::new(
        frequency_hue(phase, frequency),
        80.0,
        50.0 + intensity * 20.0,
        intensity.min(0.8),
    )
}

/// Hue offset of the `index`-th band-colored item (0°, 120°, 240° around the phase)
pub fn band_hue(phase: f32, index: usize) -> f32 {
    (phase + index as f32 * 120.0).rem_euclid(360.0)
}

fn quantize(value: f32, steps_per_unit: f32) -> f32 {
    (value * steps_per_unit).round() / steps_per_unit
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
