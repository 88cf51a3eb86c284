//! Color shift: a uniform color cycling along gradient stops.

use alloc::vec::Vec;
use embassy_time::Instant;
use libm::round;

use super::gradient::{GradientStop, sample_stops, sanitize_stops};
use super::{ColorSource, SourcePattern};
use crate::color::Hsv;

/// Minimum cycle duration in seconds.
const MIN_CYCLE: f32 = 0.1;

/// Returns one uniform HSV color for the whole strip, interpolated
/// along gradient stop positions as a function of a repeating cycle.
///
/// Stop hues are unwrapped at construction (an adjacent difference
/// above 0.5 shifts the later hue by a whole turn) so the path never
/// takes the long way around the hue circle; the interpolated hue is
/// re-wrapped modulo 1.0 on output.
pub struct ColorShift {
    stops: Vec<GradientStop>,
    cycle_duration: f32,
    reverse: bool,
}

impl ColorShift {
    pub fn new(stops: impl IntoIterator<Item = (Hsv, f32)>, cycle_duration: f32) -> Self {
        let mut stops = sanitize_stops(stops);
        unwrap_hues(&mut stops);
        Self {
            stops,
            cycle_duration: if cycle_duration > MIN_CYCLE {
                cycle_duration
            } else {
                MIN_CYCLE
            },
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

    /// Color at cycle progress `t` in [0, 1].
    fn sample(&self, t: f32) -> Hsv {
        sample_stops(&self.stops, t)
    }
}

/// Shift each stop hue by whole turns so adjacent stops are never more
/// than half a turn apart.
fn unwrap_hues(stops: &mut [GradientStop]) {
    let mut previous = stops[0].color.hue;
    for stop in &mut stops[1..] {
        #[allow(clippy::cast_possible_truncation)]
        let turns = round(f64::from(previous - stop.color.hue)) as f32;
        stop.color.hue += turns;
        previous = stop.color.hue;
    }
}

impl ColorSource for ColorShift {
    fn generate(&self, num_leds: usize, now: Instant) -> SourcePattern {
        // f64 time keeps the cycle phase accurate over long runs.
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        let t = {
            let elapsed = now.as_micros() as f64 / 1e6;
            let cycle = f64::from(self.cycle_duration);
            ((elapsed % cycle) / cycle) as f32
        };

        let mut pattern = SourcePattern::filled(num_leds, self.sample(t));
        if self.reverse {
            pattern.reverse();
        }
        pattern
    }
}
