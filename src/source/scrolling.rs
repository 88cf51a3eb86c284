//! Scrolling wrapper: renders another source at high resolution and
//! shifts it over time for sub-pixel-accurate motion.

use embassy_time::Instant;
use libm::{floor, floorf};

use super::{ColorSource, PatternCache, SourcePattern, SourceSlot};
use crate::mathf::{EPSILON, clamp01};

/// Default oversampling factor for sub-pixel motion.
const DEFAULT_RESOLUTION_MULTIPLIER: usize = 8;

/// Minimum scroll speed in LEDs per second.
const MIN_SPEED: f32 = 1e-3;

/// How the scroll offset advances over time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollMotion {
    /// Offset grows linearly with elapsed time.
    Continuous,
    /// Advance by `scroll_fraction` of the strip, then hold for
    /// `pause` seconds, repeating.
    SegmentedPause { scroll_fraction: f32, pause: f32 },
}

/// Wraps another color source, renders it at `num_leds ×
/// resolution_multiplier` samples, optionally mirrors it into a
/// seamless back-and-forth loop, and scrolls the high-resolution
/// pattern before downsampling by stride decimation.
///
/// The wrapped source is sampled once per pixel count and cached; a
/// dynamic inner source is frozen at its first query (immutable after
/// first build).
pub struct ScrollingColorSource<'a> {
    inner: &'a SourceSlot<'a>,
    speed: f32,
    motion: ScrollMotion,
    resolution_multiplier: usize,
    mirrored: bool,
    initial_rotation: f32,
    reverse: bool,
    cache: PatternCache,
}

impl<'a> ScrollingColorSource<'a> {
    /// New continuous scroller moving at `speed` LEDs per second.
    pub fn new(inner: &'a SourceSlot<'a>, speed: f32) -> Self {
        Self {
            inner,
            speed: if speed > MIN_SPEED { speed } else { MIN_SPEED },
            motion: ScrollMotion::Continuous,
            resolution_multiplier: DEFAULT_RESOLUTION_MULTIPLIER,
            mirrored: false,
            initial_rotation: 0.0,
            reverse: false,
            cache: PatternCache::new(),
        }
    }

    /// Oversampling factor (floored at 1).
    #[must_use]
    pub fn with_resolution_multiplier(mut self, multiplier: usize) -> Self {
        self.resolution_multiplier = multiplier.max(1);
        self
    }

    /// Mirror the pattern into a seamless loop. The endpoints are not
    /// duplicated, so the seam and the wrap-around are both continuous.
    #[must_use]
    pub fn mirrored(mut self) -> Self {
        self.mirrored = true;
        self
    }

    /// One-time rotation of the base pattern, as a fraction of the
    /// pattern length in [0, 1]. Baked into the cached pattern.
    #[must_use]
    pub fn with_initial_rotation(mut self, rotation: f32) -> Self {
        self.initial_rotation = clamp01(rotation);
        self
    }

    /// Switch to segmented pause-scroll motion: each cycle advances by
    /// `scroll_fraction` of the strip, then holds for `pause` seconds.
    #[must_use]
    pub fn with_pause_scroll(mut self, scroll_fraction: f32, pause: f32) -> Self {
        self.motion = ScrollMotion::SegmentedPause {
            scroll_fraction: if scroll_fraction > EPSILON {
                scroll_fraction
            } else {
                EPSILON
            },
            pause: if pause > 0.0 { pause } else { 0.0 },
        };
        self
    }

    /// Flip the final downsampled arrays spatially.
    #[must_use]
    pub fn with_reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    fn build_base(&self, num_leds: usize, now: Instant) -> SourcePattern {
        let hi_len = num_leds * self.resolution_multiplier;
        let mut base = self.inner.generate(hi_len, now);

        if self.mirrored && base.len() >= 2 {
            // Append the reversed interior: neither endpoint repeats, so
            // the result tiles without a visible seam in either place.
            let mut mirrored = SourcePattern::with_capacity(2 * base.len() - 2);
            for i in 0..base.len() {
                mirrored.push(base.get(i));
            }
            for i in (1..base.len() - 1).rev() {
                mirrored.push(base.get(i));
            }
            base = mirrored;
        }

        if self.initial_rotation > 0.0 && !base.is_empty() {
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let shift = floorf(self.initial_rotation * base.len() as f32) as usize;
            base.rotate_right(shift);
        }

        base
    }

    /// Scroll position in LED units for the given time.
    fn position_leds(&self, num_leds: usize, now: Instant) -> f64 {
        // Elapsed time in f64 so long-running scrolls keep sub-pixel
        // precision; f32 seconds lose frame accuracy within hours.
        #[allow(clippy::cast_precision_loss)]
        let t = now.as_micros() as f64 / 1e6;
        let speed = f64::from(self.speed);

        match self.motion {
            ScrollMotion::Continuous => t * speed,
            ScrollMotion::SegmentedPause {
                scroll_fraction,
                pause,
            } => {
                #[allow(clippy::cast_precision_loss)]
                let distance = num_leds as f64 * f64::from(scroll_fraction);
                let segment = distance / speed;
                let cycle = segment + f64::from(pause);
                let completed = floor(t / cycle);
                let in_cycle = t - completed * cycle;
                // Linear advance up to the scroll threshold, then the
                // offset freezes at the segment endpoint until the next
                // cycle begins.
                let progress = if in_cycle < segment {
                    in_cycle / segment
                } else {
                    1.0
                };
                (completed + progress) * distance
            }
        }
    }
}

impl ColorSource for ScrollingColorSource<'_> {
    fn generate(&self, num_leds: usize, now: Instant) -> SourcePattern {
        if num_leds == 0 {
            return SourcePattern::default();
        }

        let base = self.cache.get_or_build(num_leds, |n| self.build_base(n, now));
        if base.is_empty() {
            return SourcePattern::filled(num_leds, crate::color::Hsv::new(0.0, 0.0, 0.0));
        }

        let len = base.len() as i64;
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        let offset = floor(
            self.position_leds(num_leds, now) * self.resolution_multiplier as f64,
        ) as i64;

        let mut pattern = SourcePattern::with_capacity(num_leds);
        for i in 0..num_leds {
            // Circular shift toward higher indices, then stride
            // decimation back down to the real pixel count.
            #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
            let sample =
                ((i * self.resolution_multiplier) as i64 - offset).rem_euclid(len) as usize;
            pattern.push(base.get(sample));
        }

        if self.reverse {
            pattern.reverse();
        }
        pattern
    }
}
