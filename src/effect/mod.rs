//! Effect system: brightness-mask animations over a shared color source.
//!
//! Every effect owns a per-pixel brightness array and advances it once
//! per frame from injected time. [`Effect::render`] is the only
//! externally driven entry point: it runs the animation's update rule,
//! then applies spatial reversal, dither noise, the source's own value
//! channel, gamma correction, and the final HSV to RGB conversion.
//!
//! All animation algorithms live in a closed [`AnimationSlot`] enum and
//! are dispatched through the [`Animation`] trait.

mod breathing;
mod chase;
mod chase_ramp;
mod fade;
mod flicker_ramp;
mod liquid_fill;
mod manual_ramp;
mod static_brightness;

use alloc::vec;
use alloc::vec::Vec;
use embassy_time::Instant;
use libm::powf;

pub use breathing::{Breathing, BreathingWave};
pub use chase::Chase;
pub use chase_ramp::ChaseRamp;
pub use fade::{Fade, FadeDirection};
pub use flicker_ramp::FlickerRamp;
pub use liquid_fill::LiquidFill;
pub use manual_ramp::ManualRamp;
pub use static_brightness::StaticBrightness;

use crate::color::{Rgb, hsv_to_rgb};
use crate::mathf::{Rng, clamp01, secs};
use crate::source::{ColorSource, SourceSlot};
use crate::stage::DeviceId;

/// Default gamma exponent applied to computed brightness.
pub const DEFAULT_GAMMA: f32 = 2.9;

/// Minimum speed multiplier in LEDs (or cycles) per second.
const MIN_SPEED: f32 = 1e-3;

/// Options shared by every effect.
#[derive(Debug, Clone, Copy)]
pub struct EffectOptions {
    /// Animation speed multiplier; its unit is defined by the
    /// animation (LEDs per second for positional effects).
    pub speed: f32,
    /// Spatially flip the brightness array before rendering.
    pub reverse: bool,
    /// Uniform dither noise amplitude in [0, 1]; 0 disables dithering.
    pub dither_strength: f32,
    /// Gamma exponent, at least 1.
    pub gamma: f32,
}

impl Default for EffectOptions {
    fn default() -> Self {
        Self {
            speed: 1.0,
            reverse: false,
            dither_strength: 0.0,
            gamma: DEFAULT_GAMMA,
        }
    }
}

impl EffectOptions {
    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    #[must_use]
    pub fn with_dither_strength(mut self, strength: f32) -> Self {
        self.dither_strength = strength;
        self
    }

    #[must_use]
    pub fn with_gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    /// Floor and clamp every field into its valid range.
    fn sanitized(self) -> Self {
        Self {
            speed: if self.speed > MIN_SPEED {
                self.speed
            } else {
                MIN_SPEED
            },
            reverse: self.reverse,
            dither_strength: clamp01(self.dither_strength),
            gamma: if self.gamma > 1.0 { self.gamma } else { 1.0 },
        }
    }
}

/// Mutable per-effect state shared with the animation algorithms.
///
/// Owns the brightness array and the lifecycle flags; the wrapping
/// [`Effect`] owns everything else (source, options, output buffer).
pub struct EffectState {
    num_leds: usize,
    brightness: Vec<f32>,
    started_at: Option<Instant>,
    finished: bool,
}

impl EffectState {
    fn new(num_leds: usize) -> Self {
        Self {
            num_leds,
            brightness: vec![0.0; num_leds],
            started_at: None,
            finished: false,
        }
    }

    pub fn num_leds(&self) -> usize {
        self.num_leds
    }

    /// The brightness array for in-place mutation.
    pub fn brightness_mut(&mut self) -> &mut [f32] {
        &mut self.brightness
    }

    /// Set every pixel to one brightness level.
    pub fn fill(&mut self, level: f32) {
        self.brightness.fill(level);
    }

    /// Enter the terminal state. Monotonic: never cleared.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Seconds since the effect's first update call.
    ///
    /// The start instant latches on first use; there is no ambient
    /// clock to read at construction time.
    pub fn elapsed(&mut self, now: Instant) -> f32 {
        let started = *self.started_at.get_or_insert(now);
        secs(now.duration_since(started))
    }
}

/// A single animation policy: advances the brightness mask each frame
/// and decides when the effect is finished.
pub trait Animation {
    /// Advance the brightness mask for the current frame.
    fn update(&mut self, state: &mut EffectState, options: &EffectOptions, now: Instant);
}

/// Animation slot: closed enum containing all animation algorithms.
pub enum AnimationSlot {
    /// Periodic brightness wave (cosine or trapezoid).
    Breathing(Breathing),
    /// Comet with a tapering tail crossing the strip.
    Chase(Chase),
    /// Accelerating, widening comet orbiting the strip.
    ChaseRamp(ChaseRamp),
    /// Linear fade in or out.
    Fade(Fade),
    /// Staged dual-comet flicker converging to fully lit.
    FlickerRamp(FlickerRamp),
    /// Soft-edged fill sweeping across the strip.
    LiquidFill(LiquidFill),
    /// Slow diagnostic brightness ramp.
    ManualRamp(ManualRamp),
    /// Constant uniform brightness.
    StaticBrightness(StaticBrightness),
}

impl AnimationSlot {
    fn update(&mut self, state: &mut EffectState, options: &EffectOptions, now: Instant) {
        match self {
            Self::Breathing(animation) => animation.update(state, options, now),
            Self::Chase(animation) => animation.update(state, options, now),
            Self::ChaseRamp(animation) => animation.update(state, options, now),
            Self::Fade(animation) => animation.update(state, options, now),
            Self::FlickerRamp(animation) => animation.update(state, options, now),
            Self::LiquidFill(animation) => animation.update(state, options, now),
            Self::ManualRamp(animation) => animation.update(state, options, now),
            Self::StaticBrightness(animation) => animation.update(state, options, now),
        }
    }
}

impl From<Breathing> for AnimationSlot {
    fn from(animation: Breathing) -> Self {
        Self::Breathing(animation)
    }
}

impl From<Chase> for AnimationSlot {
    fn from(animation: Chase) -> Self {
        Self::Chase(animation)
    }
}

impl From<ChaseRamp> for AnimationSlot {
    fn from(animation: ChaseRamp) -> Self {
        Self::ChaseRamp(animation)
    }
}

impl From<Fade> for AnimationSlot {
    fn from(animation: Fade) -> Self {
        Self::Fade(animation)
    }
}

impl From<FlickerRamp> for AnimationSlot {
    fn from(animation: FlickerRamp) -> Self {
        Self::FlickerRamp(animation)
    }
}

impl From<LiquidFill> for AnimationSlot {
    fn from(animation: LiquidFill) -> Self {
        Self::LiquidFill(animation)
    }
}

impl From<ManualRamp> for AnimationSlot {
    fn from(animation: ManualRamp) -> Self {
        Self::ManualRamp(animation)
    }
}

impl From<StaticBrightness> for AnimationSlot {
    fn from(animation: StaticBrightness) -> Self {
        Self::StaticBrightness(animation)
    }
}

/// A running animation bound to one device, one color source, and an
/// options bundle.
pub struct Effect<'a> {
    device: DeviceId,
    state: EffectState,
    animation: AnimationSlot,
    source: &'a SourceSlot<'a>,
    options: EffectOptions,
    dither_rng: Rng,
    scratch: Vec<f32>,
    frame: Vec<Rgb>,
}

impl<'a> Effect<'a> {
    /// Bind an animation to a device with `num_leds` addressable pixels.
    pub fn new(
        device: DeviceId,
        num_leds: usize,
        source: &'a SourceSlot<'a>,
        animation: impl Into<AnimationSlot>,
    ) -> Self {
        Self {
            device,
            state: EffectState::new(num_leds),
            animation: animation.into(),
            source,
            options: EffectOptions::default(),
            dither_rng: Rng::new(0x51AE_71C4 ^ num_leds as u64),
            scratch: vec![0.0; num_leds],
            frame: vec![crate::color::BLACK; num_leds],
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: EffectOptions) -> Self {
        self.options = options.sanitized();
        self
    }

    /// The device this effect targets.
    pub fn device(&self) -> DeviceId {
        self.device
    }

    pub fn num_leds(&self) -> usize {
        self.state.num_leds()
    }

    pub fn options(&self) -> &EffectOptions {
        &self.options
    }

    /// Whether the animation has reached its terminal state.
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Compute the color frame for the current instant.
    pub fn render(&mut self, now: Instant) -> &[Rgb] {
        self.animation.update(&mut self.state, &self.options, now);

        self.scratch.clear();
        self.scratch.extend_from_slice(&self.state.brightness);
        if self.options.reverse {
            self.scratch.reverse();
        }

        if self.options.dither_strength > 0.0 {
            let strength = self.options.dither_strength;
            for level in &mut self.scratch {
                *level = clamp01(*level + self.dither_rng.range_f32(-strength, strength));
            }
        }

        let pattern = self.source.generate(self.state.num_leds, now);
        let gamma = self.options.gamma;
        for (i, pixel) in self.frame.iter_mut().enumerate() {
            // The source's own value channel scales the mask before
            // gamma, so a dim gradient stop stays dim.
            let level = powf(self.scratch[i] * pattern.val[i], gamma);
            *pixel = hsv_to_rgb(pattern.hue[i], pattern.sat[i], level);
        }
        &self.frame
    }
}
