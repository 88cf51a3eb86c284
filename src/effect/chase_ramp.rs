//! Accelerating comet with dynamic width.

use alloc::vec::Vec;
use embassy_time::Instant;
use libm::floorf;

use super::{Animation, EffectOptions, EffectState};
use crate::mathf::{EPSILON, Rng, clamp01, lerp, secs};

/// Default oversampling factor for sub-pixel motion.
const DEFAULT_RESOLUTION_MULTIPLIER: usize = 8;

/// A comet that starts slow, continuously accelerates and widens, and
/// orbits the strip (the stamp wraps cyclically). Reaching `max_speed`
/// triggers a timed finishing phase rendered fully lit with an optional
/// downward dither flicker; the effect then finishes fully lit.
///
/// Downsampling takes the block maximum rather than the average for a
/// brighter, sharper look during high-speed motion.
pub struct ChaseRamp {
    initial_speed: f32,
    acceleration: f32,
    max_speed: f32,
    initial_width: f32,
    max_width: f32,
    finish_duration: f32,
    resolution_multiplier: usize,

    current_speed: f32,
    head_position: f32,
    last_update: Option<Instant>,
    finishing_since: Option<f32>,
    rng: Rng,
    canvas: Vec<f32>,
}

impl ChaseRamp {
    pub fn new() -> Self {
        Self {
            initial_speed: 5.0,
            acceleration: 2.0,
            max_speed: 200.0,
            initial_width: 5.0,
            max_width: 25.0,
            finish_duration: 1.5,
            resolution_multiplier: DEFAULT_RESOLUTION_MULTIPLIER,
            current_speed: 5.0,
            head_position: -5.0,
            last_update: None,
            finishing_since: None,
            rng: Rng::new(0xC4A5_E1D3),
            canvas: Vec::new(),
        }
    }

    /// Starting and maximum speed in LEDs per second. The maximum is
    /// floored at the starting speed.
    #[must_use]
    pub fn with_speeds(mut self, initial: f32, max: f32) -> Self {
        self.initial_speed = if initial > EPSILON { initial } else { EPSILON };
        self.max_speed = if max > self.initial_speed {
            max
        } else {
            self.initial_speed
        };
        self.current_speed = self.initial_speed;
        self
    }

    /// Speed gained per second, in LEDs per second.
    #[must_use]
    pub fn with_acceleration(mut self, acceleration: f32) -> Self {
        self.acceleration = if acceleration > 0.0 { acceleration } else { 0.0 };
        self
    }

    /// Comet width in LEDs at the starting and maximum speed.
    #[must_use]
    pub fn with_widths(mut self, initial: f32, max: f32) -> Self {
        self.initial_width = if initial > 1.0 { initial } else { 1.0 };
        self.max_width = if max > self.initial_width {
            max
        } else {
            self.initial_width
        };
        self.head_position = -self.initial_width;
        self
    }

    /// How long the fully-lit finishing phase lasts.
    #[must_use]
    pub fn with_finish_duration(mut self, duration: f32) -> Self {
        self.finish_duration = if duration > 0.0 { duration } else { 0.0 };
        self
    }

    /// Oversampling factor (floored at 1).
    #[must_use]
    pub fn with_resolution_multiplier(mut self, multiplier: usize) -> Self {
        self.resolution_multiplier = multiplier.max(1);
        self
    }
}

impl Default for ChaseRamp {
    fn default() -> Self {
        Self::new()
    }
}

impl Animation for ChaseRamp {
    fn update(&mut self, state: &mut EffectState, options: &EffectOptions, now: Instant) {
        let num_leds = state.num_leds();
        let elapsed = state.elapsed(now);
        if state.is_finished() {
            return;
        }
        if num_leds == 0 {
            state.finish();
            return;
        }

        let dt = self
            .last_update
            .replace(now)
            .map_or(0.0, |last| secs(now.duration_since(last)));

        if self.finishing_since.is_none() {
            self.current_speed += self.acceleration * dt;
            if self.current_speed >= self.max_speed {
                self.current_speed = self.max_speed;
                self.finishing_since = Some(elapsed);
            }
        }

        if let Some(started) = self.finishing_since {
            if elapsed - started >= self.finish_duration {
                state.fill(1.0);
                state.finish();
                return;
            }
            // Fully lit, with downward flicker: from full brightness
            // only the negative noise direction is visible.
            let strength = options.dither_strength;
            if strength > 0.0 {
                for level in state.brightness_mut() {
                    *level = clamp01(1.0 - self.rng.range_f32(0.0, strength));
                }
            } else {
                state.fill(1.0);
            }
            return;
        }

        self.head_position += self.current_speed * dt;

        let speed_range = self.max_speed - self.initial_speed;
        let progress = if speed_range > EPSILON {
            clamp01((self.current_speed - self.initial_speed) / speed_range)
        } else {
            1.0
        };
        let width = lerp(self.initial_width, self.max_width, progress);

        let multiplier = self.resolution_multiplier;
        let hi_len = num_leds * multiplier;
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let hi_width = ((width * multiplier as f32) as usize).clamp(1, hi_len);
        self.canvas.clear();
        self.canvas.resize(hi_len, 0.0);

        // Cyclic stamp: the comet wraps around the strip as it orbits.
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        let head = floorf(self.head_position * multiplier as f32) as i64;
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
        for j in 0..hi_width {
            let position = (head - 1 - j as i64).rem_euclid(hi_len as i64) as usize;
            let level = 1.0 - j as f32 / hi_width as f32;
            if level > self.canvas[position] {
                self.canvas[position] = level;
            }
        }

        // Block-maximum downsample.
        for (i, level) in state.brightness_mut().iter_mut().enumerate() {
            let block = &self.canvas[i * multiplier..(i + 1) * multiplier];
            *level = block.iter().fold(0.0f32, |acc, &sample| acc.max(sample));
        }
    }
}
