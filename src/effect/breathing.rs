//! Breathing effect: smooth uniform brightness modulation.

use core::f32::consts::TAU;

use embassy_time::Instant;
use libm::cosf;

use super::{Animation, EffectOptions, EffectState};
use crate::mathf::clamp01;

/// Minimum cosine cycle duration in seconds.
const MIN_CYCLE: f32 = 0.1;

/// Wave form driving the breathing cycle, chosen at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BreathingWave {
    /// Classic smooth wave: `min + (cos(2π·t/cycle)+1)/2 × (max−min)`.
    Cosine { cycle_duration: f32 },
    /// Long on/off holds joined by linear fade ramps. One cycle is
    /// fade-in, on hold, fade-out, off hold.
    Trapezoid {
        on_duration: f32,
        off_duration: f32,
        transition_duration: f32,
    },
}

/// Uniform brightness wave between a minimum and maximum level.
/// Indefinite unless a total duration is supplied.
pub struct Breathing {
    wave: BreathingWave,
    cycle_duration: f32,
    min_brightness: f32,
    max_brightness: f32,
    delay: f32,
    duration: Option<f32>,
}

impl Breathing {
    pub fn new(wave: BreathingWave) -> Self {
        let (wave, cycle_duration) = match wave {
            BreathingWave::Cosine { cycle_duration } => {
                let cycle = if cycle_duration > MIN_CYCLE {
                    cycle_duration
                } else {
                    MIN_CYCLE
                };
                (BreathingWave::Cosine { cycle_duration: cycle }, cycle)
            }
            BreathingWave::Trapezoid {
                on_duration,
                off_duration,
                transition_duration,
            } => {
                let on = if on_duration > 0.0 { on_duration } else { 0.0 };
                let off = if off_duration > 0.0 { off_duration } else { 0.0 };
                let transition = if transition_duration > 0.0 {
                    transition_duration
                } else {
                    0.0
                };
                (
                    BreathingWave::Trapezoid {
                        on_duration: on,
                        off_duration: off,
                        transition_duration: transition,
                    },
                    off + on + 2.0 * transition,
                )
            }
        };
        Self {
            wave,
            cycle_duration,
            min_brightness: 0.1,
            max_brightness: 1.0,
            delay: 0.0,
            duration: None,
        }
    }

    /// Brightness floor and ceiling, clamped to [0, 1] and ordered.
    #[must_use]
    pub fn with_levels(mut self, min: f32, max: f32) -> Self {
        self.max_brightness = clamp01(max);
        self.min_brightness = clamp01(min).min(self.max_brightness);
        self
    }

    /// Initial delay in seconds before the wave starts moving.
    #[must_use]
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = if delay > 0.0 { delay } else { 0.0 };
        self
    }

    /// Finish after this many seconds, regardless of cycle phase.
    #[must_use]
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = Some(if duration > 0.0 { duration } else { 0.0 });
        self
    }

    fn cosine_wave(&self, t: f32) -> f32 {
        let angle = t * TAU / self.cycle_duration;
        let normalized = (cosf(angle) + 1.0) / 2.0;
        self.min_brightness + normalized * (self.max_brightness - self.min_brightness)
    }

    fn trapezoid_wave(&self, t: f32) -> f32 {
        let BreathingWave::Trapezoid {
            on_duration,
            transition_duration,
            ..
        } = self.wave
        else {
            return self.min_brightness;
        };
        if self.cycle_duration <= 0.0 {
            return self.min_brightness;
        }

        let time_in_cycle = t % self.cycle_duration;
        let fade_in_end = transition_duration;
        let on_phase_end = fade_in_end + on_duration;
        let fade_out_end = on_phase_end + transition_duration;
        let range = self.max_brightness - self.min_brightness;

        if time_in_cycle < fade_in_end {
            let progress = time_in_cycle / transition_duration;
            self.min_brightness + progress * range
        } else if time_in_cycle < on_phase_end {
            self.max_brightness
        } else if time_in_cycle < fade_out_end {
            let progress = (time_in_cycle - on_phase_end) / transition_duration;
            self.max_brightness - progress * range
        } else {
            self.min_brightness
        }
    }
}

impl Animation for Breathing {
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

        let t = (elapsed - self.delay).max(0.0);
        let level = match self.wave {
            BreathingWave::Cosine { .. } => self.cosine_wave(t),
            BreathingWave::Trapezoid { .. } => self.trapezoid_wave(t),
        };
        state.fill(level);
    }
}
