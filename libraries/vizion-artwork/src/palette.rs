//! Contrast and complementary color derivation
//!
//! Pure functions over [`Rgb`]; no image handling here.

use vizion_core::{ColorTriple, Rgb};

/// Luminance at or above this (in 0-255 units) is considered light
pub const LIGHT_LUMINANCE_THRESHOLD: f64 = 128.0;

/// Hue, saturation and lightness.
///
/// `h` is in degrees `[0, 360)`, `s` and `l` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    /// Rotate the hue, wrapping into `[0, 360)`
    #[must_use]
    pub fn rotate_hue(self, degrees: f64) -> Self {
        Self {
            h: (self.h + degrees).rem_euclid(360.0),
            ..self
        }
    }
}

/// Perceived luminance, `Y = 0.299R + 0.587G + 0.114B`
pub fn luminance(color: Rgb) -> f64 {
    luminance_millis(color) as f64 / 1000.0
}

// Integer form of the weights so the 128 boundary is exact.
fn luminance_millis(color: Rgb) -> u32 {
    u32::from(color.r) * 299 + u32::from(color.g) * 587 + u32::from(color.b) * 114
}

/// Black for light colors, white for dark ones. Exactly 128 counts as light.
pub fn contrast_color(base: Rgb) -> Rgb {
    if luminance_millis(base) >= 128_000 {
        Rgb::BLACK
    } else {
        Rgb::WHITE
    }
}

/// Hue rotated by 180°, saturation and lightness preserved
pub fn complementary_color(base: Rgb) -> Rgb {
    hsl_to_rgb(rgb_to_hsl(base).rotate_hue(180.0))
}

/// Full theme for a base color
pub fn derive_triple(base: Rgb) -> ColorTriple {
    ColorTriple {
        base,
        contrast: contrast_color(base),
        complementary: complementary_color(base),
    }
}

/// Convert to HSL
pub fn rgb_to_hsl(color: Rgb) -> Hsl {
    let r = f64::from(color.r) / 255.0;
    let g = f64::from(color.g) / 255.0;
    let b = f64::from(color.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let sector = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl {
        h: sector * 60.0,
        s,
        l,
    }
}

/// Convert back to 8-bit RGB, rounding each channel
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let s = hsl.s.clamp(0.0, 1.0);
    let l = hsl.l.clamp(0.0, 1.0);
    let h = hsl.h.rem_euclid(360.0) / 360.0;

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    let channel = |t: f64| (hue_to_channel(p, q, t) * 255.0).round().clamp(0.0, 255.0) as u8;

    Rgb::new(
        channel(h + 1.0 / 3.0),
        channel(h),
        channel(h - 1.0 / 3.0),
    )
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
