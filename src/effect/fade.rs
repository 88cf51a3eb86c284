//! Linear fades between dark and fully lit.

use embassy_time::Instant;

use super::{Animation, EffectOptions, EffectState};

/// Minimum fade duration in seconds.
const MIN_DURATION: f32 = 0.01;

/// Which way the fade runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    /// Ramp uniform brightness from 0 to 1.
    In,
    /// Ramp uniform brightness from 1 to 0.
    Out,
}

/// Linear uniform fade over a fixed duration, with an optional delay
/// holding the pre-fade level. Snaps to the exact terminal value and
/// finishes at the duration boundary.
pub struct Fade {
    direction: FadeDirection,
    duration: f32,
    delay: f32,
}

impl Fade {
    pub fn new(direction: FadeDirection, duration: f32) -> Self {
        Self {
            direction,
            duration: if duration > MIN_DURATION {
                duration
            } else {
                MIN_DURATION
            },
            delay: 0.0,
        }
    }

    /// Hold the pre-fade level this many seconds before ramping.
    #[must_use]
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = if delay > 0.0 { delay } else { 0.0 };
        self
    }

    const fn start_level(&self) -> f32 {
        match self.direction {
            FadeDirection::In => 0.0,
            FadeDirection::Out => 1.0,
        }
    }

    const fn end_level(&self) -> f32 {
        match self.direction {
            FadeDirection::In => 1.0,
            FadeDirection::Out => 0.0,
        }
    }
}

impl Animation for Fade {
    fn update(&mut self, state: &mut EffectState, _options: &EffectOptions, now: Instant) {
        let elapsed = state.elapsed(now);
        if state.is_finished() {
            return;
        }

        if elapsed < self.delay {
            state.fill(self.start_level());
            return;
        }

        let t = elapsed - self.delay;
        if t >= self.duration {
            state.fill(self.end_level());
            state.finish();
            return;
        }

        let progress = t / self.duration;
        let level = match self.direction {
            FadeDirection::In => progress,
            FadeDirection::Out => 1.0 - progress,
        };
        state.fill(level);
    }
}
