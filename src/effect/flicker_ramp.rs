//! Staged flicker ramp: converging dual-comet sweeps.
//!
//! The effect runs a fixed number of ramp/pause stages whose durations
//! shrink geometrically, sized so the whole timeline sums to a
//! requested total duration. Each ramp sends two comets from opposite
//! ends of the strip toward the center; after the last stage the strip
//! resolves to fully lit.

use alloc::vec::Vec;
use embassy_time::Instant;
use libm::{floorf, powf};

use super::{Animation, EffectOptions, EffectState};
use crate::mathf::{EPSILON, ease_in_quad};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentKind {
    Ramp,
    Pause,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    start: f32,
    end: f32,
    kind: SegmentKind,
}

/// Staged dual-comet flicker converging to a fully lit strip.
pub struct FlickerRamp {
    comet_width: usize,
    requested_duration: f32,
    num_stages: usize,
    pause_to_ramp_ratio: f32,
    convergence_factor: f32,
    timeline: Vec<Segment>,
    total_duration: f32,
}

impl FlickerRamp {
    /// New flicker ramp running for `total_duration` seconds overall.
    pub fn new(total_duration: f32) -> Self {
        let mut ramp = Self {
            comet_width: 8,
            requested_duration: if total_duration > EPSILON {
                total_duration
            } else {
                EPSILON
            },
            num_stages: 6,
            pause_to_ramp_ratio: 1.2,
            convergence_factor: 0.7,
            timeline: Vec::new(),
            total_duration: 0.0,
        };
        ramp.rebuild();
        ramp
    }

    /// Width of each comet in LEDs (floored at 1).
    #[must_use]
    pub fn with_comet_width(mut self, width: usize) -> Self {
        self.comet_width = width.max(1);
        self
    }

    /// Number of ramp/pause stages (floored at 1).
    #[must_use]
    pub fn with_stages(mut self, num_stages: usize) -> Self {
        self.num_stages = num_stages.max(1);
        self.rebuild();
        self
    }

    /// Duration of each pause relative to its ramp.
    #[must_use]
    pub fn with_pause_ratio(mut self, ratio: f32) -> Self {
        self.pause_to_ramp_ratio = if ratio > 0.0 { ratio } else { 0.0 };
        self.rebuild();
        self
    }

    /// How quickly stage durations shorten, kept below 1.
    #[must_use]
    pub fn with_convergence_factor(mut self, factor: f32) -> Self {
        self.convergence_factor = factor.clamp(0.0, 0.999);
        self.rebuild();
        self
    }

    /// Sum of all precomputed segment durations.
    pub fn total_duration(&self) -> f32 {
        self.total_duration
    }

    /// Solve the first-cycle duration from the geometric series and lay
    /// out the shrinking ramp/pause timeline.
    #[allow(clippy::cast_precision_loss)]
    fn rebuild(&mut self) {
        let factor = self.convergence_factor;
        let stages = self.num_stages;

        // 1 + f + f^2 + ... + f^(n-1): total "time units" in the effect.
        let series_sum = if factor < EPSILON {
            1.0
        } else {
            (1.0 - powf(factor, stages as f32)) / (1.0 - factor)
        };
        let initial_cycle = self.requested_duration / series_sum;

        let mut ramp_duration = initial_cycle / (1.0 + self.pause_to_ramp_ratio);
        let mut pause_duration = initial_cycle - ramp_duration;

        self.timeline.clear();
        let mut current = 0.0;
        for _ in 0..stages {
            self.timeline.push(Segment {
                start: current,
                end: current + ramp_duration,
                kind: SegmentKind::Ramp,
            });
            current += ramp_duration;
            self.timeline.push(Segment {
                start: current,
                end: current + pause_duration,
                kind: SegmentKind::Pause,
            });
            current += pause_duration;

            ramp_duration *= factor;
            pause_duration *= factor;
        }
        self.total_duration = current;
    }

    /// Render one ramp frame: two comets from opposite ends, quadratic
    /// easing, merged pixel-wise by maximum.
    #[allow(clippy::cast_precision_loss)]
    fn run_ramp(&self, state: &mut EffectState, progress: f32) {
        let num_leds = state.num_leds();
        let eased = ease_in_quad(progress);
        state.fill(0.0);

        let span = num_leds as f32;
        let head_forward = eased * span;
        let head_reverse = span - eased * span;

        stamp_max(state, self.comet_width, head_forward, false);
        stamp_max(state, self.comet_width, head_reverse, true);
    }
}

/// Stamp a tapering comet onto the brightness array, merging by max.
///
/// The taper is brightest at the leading edge. A forward comet moves
/// toward higher indices with its tail behind it; a reversed comet
/// moves toward lower indices with its tail above it.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn stamp_max(state: &mut EffectState, width: usize, head: f32, reversed: bool) {
    let num_leds = state.num_leds() as i64;
    let head = floorf(head) as i64;
    let brightness = state.brightness_mut();
    for j in 0..width {
        let position = if reversed {
            head + j as i64
        } else {
            head - 1 - j as i64
        };
        if position < 0 || position >= num_leds {
            continue;
        }
        let level = 1.0 - j as f32 / width as f32;
        #[allow(clippy::cast_sign_loss)]
        let slot = &mut brightness[position as usize];
        if level > *slot {
            *slot = level;
        }
    }
}

impl Animation for FlickerRamp {
    fn update(&mut self, state: &mut EffectState, _options: &EffectOptions, now: Instant) {
        let elapsed = state.elapsed(now);
        if state.is_finished() {
            return;
        }

        if elapsed >= self.total_duration {
            state.fill(1.0);
            state.finish();
            return;
        }

        for segment in &self.timeline {
            if segment.start <= elapsed && elapsed < segment.end {
                match segment.kind {
                    SegmentKind::Pause => state.fill(0.0),
                    SegmentKind::Ramp => {
                        let local = (elapsed - segment.start) / (segment.end - segment.start);
                        self.run_ramp(state, local);
                    }
                }
                return;
            }
        }

        // Floating-point gap between the last pause and the total: dark.
        state.fill(0.0);
    }
}
