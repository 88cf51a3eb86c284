//! Comet chase effect.
//!
//! A bright head with a linearly tapering tail crosses the strip. The
//! comet is stamped at sub-pixel precision into an oversampled canvas
//! and block-averaged back down to the real pixel count.

use alloc::vec::Vec;
use embassy_time::Instant;
use libm::floorf;

use super::{Animation, EffectOptions, EffectState};

/// Default oversampling factor for sub-pixel motion.
const DEFAULT_RESOLUTION_MULTIPLIER: usize = 8;

/// Comet chase: head position advances as `(elapsed - delay) × speed`
/// LEDs per second. Without a loop interval the effect finishes once
/// the tail clears the strip; with one, the comet re-runs after the
/// interval, blank in between.
pub struct Chase {
    width: usize,
    delay: f32,
    loop_interval: Option<f32>,
    resolution_multiplier: usize,
    canvas: Vec<f32>,
}

impl Chase {
    /// New chase with a comet `width` LEDs long (floored at 1).
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
            delay: 0.0,
            loop_interval: None,
            resolution_multiplier: DEFAULT_RESOLUTION_MULTIPLIER,
            canvas: Vec::new(),
        }
    }

    /// Blank time in seconds before the first run.
    #[must_use]
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = if delay > 0.0 { delay } else { 0.0 };
        self
    }

    /// Re-run the comet this many seconds after each crossing instead
    /// of finishing.
    #[must_use]
    pub fn with_loop_interval(mut self, interval: f32) -> Self {
        self.loop_interval = Some(if interval > 0.0 { interval } else { 0.0 });
        self
    }

    /// Oversampling factor (floored at 1).
    #[must_use]
    pub fn with_resolution_multiplier(mut self, multiplier: usize) -> Self {
        self.resolution_multiplier = multiplier.max(1);
        self
    }
}

impl Animation for Chase {
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

        if elapsed < self.delay {
            state.fill(0.0);
            return;
        }
        let run = elapsed - self.delay;

        // Time for the tail to clear the far end of the strip.
        #[allow(clippy::cast_precision_loss)]
        let crossing = (num_leds + self.width) as f32 / options.speed;

        let run_t = match self.loop_interval {
            None => {
                if run >= crossing {
                    state.fill(0.0);
                    state.finish();
                    return;
                }
                run
            }
            Some(interval) => {
                // Each cycle is one crossing plus the idle gap; the
                // position is a pure function of elapsed time.
                let cycle = crossing + interval;
                let in_cycle = run % cycle;
                if in_cycle >= crossing {
                    state.fill(0.0);
                    return;
                }
                in_cycle
            }
        };

        let multiplier = self.resolution_multiplier;
        let hi_len = num_leds * multiplier;
        let hi_width = self.width * multiplier;
        self.canvas.clear();
        self.canvas.resize(hi_len, 0.0);

        // Stamp the taper behind the head: brightest at the leading
        // edge, falling linearly to zero at the tail. Off-strip samples
        // are clipped.
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        let head = floorf(run_t * options.speed * multiplier as f32) as i64;
        #[allow(clippy::cast_precision_loss)]
        for j in 0..hi_width {
            let position = head - 1 - j as i64;
            if position < 0 || position >= hi_len as i64 {
                continue;
            }
            #[allow(clippy::cast_sign_loss)]
            {
                self.canvas[position as usize] = 1.0 - j as f32 / hi_width as f32;
            }
        }

        // Block-average downsample.
        #[allow(clippy::cast_precision_loss)]
        for (i, level) in state.brightness_mut().iter_mut().enumerate() {
            let block = &self.canvas[i * multiplier..(i + 1) * multiplier];
            *level = block.iter().sum::<f32>() / multiplier as f32;
        }
    }
}
