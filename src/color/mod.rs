//! Color types and conversions.
//!
//! The engine computes in normalized float HSV (all channels in [0, 1],
//! hue circular) and converts to 8-bit RGB only at the very end of the
//! per-effect pipeline.

use libm::fabsf;
use smart_leds::RGB8;

use crate::mathf::{clamp01, lerp, wrap01};

pub type Rgb = RGB8;

/// All-off output color.
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

/// HSV color with every channel normalized to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    /// Hue position on the color circle, wraps modulo 1.0.
    pub hue: f32,
    /// Saturation, clamped to [0, 1].
    pub sat: f32,
    /// Value (brightness), clamped to [0, 1].
    pub val: f32,
}

impl Hsv {
    pub const fn new(hue: f32, sat: f32, val: f32) -> Self {
        Self { hue, sat, val }
    }

    /// Wrap the hue onto [0, 1) and clamp saturation and value.
    pub fn sanitized(self) -> Self {
        Self {
            hue: wrap01(self.hue),
            sat: clamp01(self.sat),
            val: clamp01(self.val),
        }
    }

    /// Channel-wise linear interpolation, sanitized afterwards.
    ///
    /// Hue is interpolated on the raw values; wrapping happens on the
    /// result, so callers that need shortest-path motion pre-unwrap
    /// their stop hues.
    pub fn lerp(a: Self, b: Self, t: f32) -> Self {
        Self {
            hue: lerp(a.hue, b.hue, t),
            sat: lerp(a.sat, b.sat, t),
            val: lerp(a.val, b.val, t),
        }
        .sanitized()
    }
}

/// Convert a normalized float HSV color to 8-bit RGB.
///
/// Sector-based conversion; the result is scaled to 0-255 and
/// truncated, matching the quantization the hardware sees.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn hsv_to_rgb(hue: f32, sat: f32, val: f32) -> Rgb {
    let h = wrap01(hue) * 6.0;
    let s = clamp01(sat);
    let v = clamp01(val);

    let c = v * s;
    let x = c * (1.0 - fabsf(h % 2.0 - 1.0));
    let m = v - c;

    let (r1, g1, b1) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Rgb {
        r: ((r1 + m) * 255.0) as u8,
        g: ((g1 + m) * 255.0) as u8,
        b: ((b1 + m) * 255.0) as u8,
    }
}
