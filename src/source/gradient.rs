//! Static and gradient color sources.

use alloc::vec::Vec;
use embassy_time::Instant;

use super::{ColorSource, PatternCache, SourcePattern};
use crate::color::Hsv;
use crate::mathf::{EPSILON, clamp01};

/// A single, uniform color for the whole strip.
pub struct StaticColor {
    color: Hsv,
    reverse: bool,
}

impl StaticColor {
    pub fn new(color: Hsv) -> Self {
        Self {
            color: color.sanitized(),
            reverse: false,
        }
    }

    /// Flip the generated arrays spatially (a no-op visually for a
    /// uniform color, kept for contract uniformity).
    #[must_use]
    pub fn with_reverse(mut self) -> Self {
        self.reverse = true;
        self
    }
}

impl ColorSource for StaticColor {
    fn generate(&self, num_leds: usize, _now: Instant) -> SourcePattern {
        let mut pattern = SourcePattern::filled(num_leds, self.color);
        if self.reverse {
            pattern.reverse();
        }
        pattern
    }
}

/// One stop of a piecewise gradient: a color and its position on the
/// strip in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub color: Hsv,
    pub position: f32,
}

/// Clamp, sanitize and sort raw stops by position.
///
/// An empty list degenerates to a single black stop so that sampling
/// never has to fail.
pub(crate) fn sanitize_stops(stops: impl IntoIterator<Item = (Hsv, f32)>) -> Vec<GradientStop> {
    let mut stops: Vec<GradientStop> = stops
        .into_iter()
        .map(|(color, position)| GradientStop {
            color: color.sanitized(),
            position: clamp01(position),
        })
        .collect();
    if stops.is_empty() {
        stops.push(GradientStop {
            color: Hsv::new(0.0, 0.0, 0.0),
            position: 0.0,
        });
    }
    stops.sort_by(|a, b| a.position.total_cmp(&b.position));
    stops
}

/// Sample a sorted stop list at `t`, holding the edge colors outside
/// the first/last stop and interpolating linearly between neighbors.
pub(crate) fn sample_stops(stops: &[GradientStop], t: f32) -> Hsv {
    let first = stops[0];
    let last = stops[stops.len() - 1];
    if t <= first.position {
        return first.color.sanitized();
    }
    if t >= last.position {
        return last.color.sanitized();
    }
    for pair in stops.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if t <= hi.position {
            let span = hi.position - lo.position;
            if span < EPSILON {
                return hi.color.sanitized();
            }
            return Hsv::lerp(lo.color, hi.color, (t - lo.position) / span);
        }
    }
    last.color.sanitized()
}

/// Map pixel index to its normalized position along the strip.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn strip_position(index: usize, num_leds: usize) -> f32 {
    if num_leds <= 1 {
        0.0
    } else {
        index as f32 / (num_leds - 1) as f32
    }
}

/// Linear gradient between two HSV colors over a sub-range of the strip.
///
/// Pixels before `start_pos` hold the start color and pixels after
/// `end_pos` hold the end color; the ramp between them is linear.
pub struct Gradient {
    start: Hsv,
    end: Hsv,
    start_pos: f32,
    end_pos: f32,
    reverse: bool,
    cache: PatternCache,
}

impl Gradient {
    pub fn new(start: Hsv, end: Hsv) -> Self {
        Self {
            start: start.sanitized(),
            end: end.sanitized(),
            start_pos: 0.0,
            end_pos: 1.0,
            reverse: false,
            cache: PatternCache::new(),
        }
    }

    /// Confine the ramp to a sub-range of the strip. Positions are
    /// clamped to [0, 1] and ordered.
    #[must_use]
    pub fn with_range(mut self, start_pos: f32, end_pos: f32) -> Self {
        let a = clamp01(start_pos);
        let b = clamp01(end_pos);
        self.start_pos = if a <= b { a } else { b };
        self.end_pos = if a <= b { b } else { a };
        self
    }

    /// Flip the generated arrays spatially.
    #[must_use]
    pub fn with_reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    fn build(&self, num_leds: usize) -> SourcePattern {
        let span = self.end_pos - self.start_pos;
        let mut pattern = SourcePattern::with_capacity(num_leds);
        for i in 0..num_leds {
            let t = strip_position(i, num_leds);
            let color = if t <= self.start_pos {
                self.start
            } else if t >= self.end_pos {
                self.end
            } else {
                Hsv::lerp(self.start, self.end, (t - self.start_pos) / span)
            };
            pattern.push(color);
        }
        pattern
    }
}

impl ColorSource for Gradient {
    fn generate(&self, num_leds: usize, _now: Instant) -> SourcePattern {
        let mut pattern = self.cache.get_or_build(num_leds, |n| self.build(n));
        if self.reverse {
            pattern.reverse();
        }
        pattern
    }
}

/// Piecewise-linear gradient over N ordered `(color, position)` stops.
///
/// Stops are sorted and clamped at construction; the color is held
/// constant before the first and after the last stop. A single stop
/// degenerates to [`StaticColor`] behavior.
pub struct MultiGradient {
    stops: Vec<GradientStop>,
    reverse: bool,
    cache: PatternCache,
}

impl MultiGradient {
    pub fn new(stops: impl IntoIterator<Item = (Hsv, f32)>) -> Self {
        Self {
            stops: sanitize_stops(stops),
            reverse: false,
            cache: PatternCache::new(),
        }
    }

    /// Flip the generated arrays spatially.
    #[must_use]
    pub fn with_reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    fn build(&self, num_leds: usize) -> SourcePattern {
        let mut pattern = SourcePattern::with_capacity(num_leds);
        for i in 0..num_leds {
            pattern.push(sample_stops(&self.stops, strip_position(i, num_leds)));
        }
        pattern
    }
}

impl ColorSource for MultiGradient {
    fn generate(&self, num_leds: usize, _now: Instant) -> SourcePattern {
        let mut pattern = self.cache.get_or_build(num_leds, |n| self.build(n));
        if self.reverse {
            pattern.reverse();
        }
        pattern
    }
}
