//! Liquid fill: a soft-edged wave of light filling the strip.

use embassy_time::Instant;

use super::{Animation, EffectOptions, EffectState};
use crate::mathf::clamp01;

/// Fills the strip with light behind a soft moving wavefront.
///
/// Per-pixel brightness is `clamp((position − index) / wavefront_width,
/// 0, 1)`, so the transition from dark to lit stretches over the
/// wavefront. The effect finishes fully lit once the wavefront's tail
/// clears the far end.
pub struct LiquidFill {
    wavefront_width: usize,
}

impl LiquidFill {
    /// New fill with a wavefront `width` LEDs wide (floored at 1).
    pub fn new(width: usize) -> Self {
        Self {
            wavefront_width: width.max(1),
        }
    }
}

impl Animation for LiquidFill {
    fn update(&mut self, state: &mut EffectState, options: &EffectOptions, now: Instant) {
        let num_leds = state.num_leds();
        let elapsed = state.elapsed(now);
        if state.is_finished() {
            return;
        }

        let position = elapsed * options.speed;

        #[allow(clippy::cast_precision_loss)]
        if position >= (num_leds + self.wavefront_width) as f32 {
            state.fill(1.0);
            state.finish();
            return;
        }

        #[allow(clippy::cast_precision_loss)]
        let width = self.wavefront_width as f32;
        #[allow(clippy::cast_precision_loss)]
        for (index, level) in state.brightness_mut().iter_mut().enumerate() {
            *level = clamp01((position - index as f32) / width);
        }
    }
}
