//! Constant uniform brightness.

use embassy_time::Instant;

use super::{Animation, EffectOptions, EffectState};
use crate::mathf::clamp01;

/// Holds every pixel at one brightness level. Indefinite unless a
/// duration is supplied; the duration is measured from the first
/// update call.
///
/// Ideal as an idle background layer: combined with a scrolling color
/// source it becomes a moving color zone.
pub struct StaticBrightness {
    level: f32,
    duration: Option<f32>,
}

impl StaticBrightness {
    pub fn new(level: f32) -> Self {
        Self {
            level: clamp01(level),
            duration: None,
        }
    }

    /// Finish after this many seconds of updates.
    #[must_use]
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = Some(if duration > 0.0 { duration } else { 0.0 });
        self
    }
}

impl Animation for StaticBrightness {
    fn update(&mut self, state: &mut EffectState, _options: &EffectOptions, now: Instant) {
        let elapsed = state.elapsed(now);
        if state.is_finished() {
            return;
        }

        if let Some(duration) = self.duration {
            if elapsed >= duration {
                state.finish();
                return;
            }
        }

        state.fill(self.level);
    }
}
