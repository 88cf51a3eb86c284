//! Diagnostic brightness ramp.

use embassy_time::Instant;

use super::{Animation, EffectOptions, EffectState};
use crate::mathf::EPSILON;

/// Very slow linear 0-to-1 ramp for probing a device's real brightness
/// resolution. No interpolation tricks: the level is set directly.
pub struct ManualRamp {
    rise_duration: f32,
}

impl ManualRamp {
    pub fn new(rise_duration: f32) -> Self {
        Self {
            rise_duration: if rise_duration > EPSILON {
                rise_duration
            } else {
                EPSILON
            },
        }
    }
}

impl Animation for ManualRamp {
    fn update(&mut self, state: &mut EffectState, _options: &EffectOptions, now: Instant) {
        let elapsed = state.elapsed(now);
        if state.is_finished() {
            return;
        }

        let mut level = elapsed / self.rise_duration;
        if level >= 1.0 {
            level = 1.0;
            state.finish();
        }
        state.fill(level);
    }
}
