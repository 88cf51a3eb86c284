//! Color sources: time- and position-indexed generators of per-pixel HSV.
//!
//! All sources are kept in a closed [`SourceSlot`] enum and dispatched
//! through the [`ColorSource`] trait. A source instance may be shared by
//! several effects at once (for example two staggered chases painting
//! from one gradient), so generated patterns are cached behind a
//! critical section and sources are only ever queried through `&self`.

mod gradient;
mod scrolling;
mod shift;

use core::cell::RefCell;

use alloc::vec::Vec;
use critical_section::Mutex;
use embassy_time::Instant;
use heapless::LinearMap;

pub use gradient::{Gradient, GradientStop, MultiGradient, StaticColor};
pub use scrolling::{ScrollMotion, ScrollingColorSource};
pub use shift::ColorShift;

use crate::color::Hsv;

/// Per-pixel hue/saturation/value arrays produced by a color source.
///
/// The three arrays always have equal length; hue is in [0, 1) and
/// saturation/value in [0, 1].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourcePattern {
    pub hue: Vec<f32>,
    pub sat: Vec<f32>,
    pub val: Vec<f32>,
}

impl SourcePattern {
    /// Empty pattern with room for `len` pixels.
    pub fn with_capacity(len: usize) -> Self {
        Self {
            hue: Vec::with_capacity(len),
            sat: Vec::with_capacity(len),
            val: Vec::with_capacity(len),
        }
    }

    /// Uniform pattern of `len` copies of one color.
    pub fn filled(len: usize, color: Hsv) -> Self {
        let color = color.sanitized();
        let mut pattern = Self::with_capacity(len);
        for _ in 0..len {
            pattern.push(color);
        }
        pattern
    }

    pub fn len(&self) -> usize {
        self.hue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hue.is_empty()
    }

    /// Append one pixel.
    pub fn push(&mut self, color: Hsv) {
        self.hue.push(color.hue);
        self.sat.push(color.sat);
        self.val.push(color.val);
    }

    /// Color at pixel `index`.
    ///
    /// Callers stay within `len()`; out-of-range reads indicate a
    /// broken internal invariant.
    pub fn get(&self, index: usize) -> Hsv {
        Hsv::new(self.hue[index], self.sat[index], self.val[index])
    }

    /// Flip the pattern spatially in place.
    pub fn reverse(&mut self) {
        self.hue.reverse();
        self.sat.reverse();
        self.val.reverse();
    }

    /// Rotate the pattern right by `count` pixels (contents move toward
    /// higher indices, wrapping around).
    pub fn rotate_right(&mut self, count: usize) {
        if self.is_empty() {
            return;
        }
        let count = count % self.len();
        self.hue.rotate_right(count);
        self.sat.rotate_right(count);
        self.val.rotate_right(count);
    }
}

/// Number of distinct pixel counts a source keeps cached patterns for.
///
/// Pixel counts are typically stable per device but not guaranteed; a
/// query missing a full cache renders fresh without caching.
const CACHE_SLOTS: usize = 4;

/// Bounded pattern cache shared between effects querying one source.
///
/// Uses a critical section around a `RefCell`, so a source can be
/// polled from wherever the render loop runs without aliasing the
/// interior map.
pub(crate) struct PatternCache {
    inner: Mutex<RefCell<LinearMap<usize, SourcePattern, CACHE_SLOTS>>>,
}

impl PatternCache {
    pub(crate) const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(LinearMap::new())),
        }
    }

    /// Fetch the cached pattern for `num_leds`, building it on first use.
    pub(crate) fn get_or_build(
        &self,
        num_leds: usize,
        build: impl FnOnce(usize) -> SourcePattern,
    ) -> SourcePattern {
        let cached = critical_section::with(|cs| {
            self.inner.borrow(cs).borrow().get(&num_leds).cloned()
        });
        if let Some(pattern) = cached {
            return pattern;
        }

        let pattern = build(num_leds);
        critical_section::with(|cs| {
            // A full map simply skips caching; the pattern is still valid.
            let _ = self
                .inner
                .borrow(cs)
                .borrow_mut()
                .insert(num_leds, pattern.clone());
        });
        pattern
    }
}

/// A time- and position-indexed generator of per-pixel HSV color.
///
/// Static sources are pure functions of `num_leds` and return
/// bit-identical output on every call; dynamic sources are pure
/// functions of `(num_leds, now)`. `generate` never fails: all inputs
/// are sanitized when the source is constructed.
pub trait ColorSource {
    /// Produce per-pixel color arrays for a strip of `num_leds` pixels.
    fn generate(&self, num_leds: usize, now: Instant) -> SourcePattern;
}

/// Source slot: closed enum containing all color source variants.
pub enum SourceSlot<'a> {
    /// Single uniform color.
    Static(StaticColor),
    /// Linear two-color gradient over a sub-range of the strip.
    Gradient(Gradient),
    /// Piecewise-linear gradient over N ordered stops.
    MultiGradient(MultiGradient),
    /// Another source rendered at high resolution and scrolled over time.
    Scrolling(ScrollingColorSource<'a>),
    /// Uniform color cycling along gradient stops over time.
    Shift(ColorShift),
}

impl ColorSource for SourceSlot<'_> {
    fn generate(&self, num_leds: usize, now: Instant) -> SourcePattern {
        match self {
            Self::Static(source) => source.generate(num_leds, now),
            Self::Gradient(source) => source.generate(num_leds, now),
            Self::MultiGradient(source) => source.generate(num_leds, now),
            Self::Scrolling(source) => source.generate(num_leds, now),
            Self::Shift(source) => source.generate(num_leds, now),
        }
    }
}

impl From<StaticColor> for SourceSlot<'_> {
    fn from(source: StaticColor) -> Self {
        Self::Static(source)
    }
}

impl From<Gradient> for SourceSlot<'_> {
    fn from(source: Gradient) -> Self {
        Self::Gradient(source)
    }
}

impl From<MultiGradient> for SourceSlot<'_> {
    fn from(source: MultiGradient) -> Self {
        Self::MultiGradient(source)
    }
}

impl<'a> From<ScrollingColorSource<'a>> for SourceSlot<'a> {
    fn from(source: ScrollingColorSource<'a>) -> Self {
        Self::Scrolling(source)
    }
}

impl From<ColorShift> for SourceSlot<'_> {
    fn from(source: ColorShift) -> Self {
        Self::Shift(source)
    }
}
